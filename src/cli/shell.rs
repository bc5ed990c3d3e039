use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;

/// Environment variable switching the shell to line-by-line stdin input.
pub const SCRIPT_ENV: &str = "MONTHLY_BUDGET_CLI_SCRIPT";

const TABLE_SUBCOMMANDS: &[&str] = &["add", "amount", "label", "list", "remove"];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    let helper = CommandHelper::new(context.command_names());
    editor.set_helper(Some(helper));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    context.render_month();
    cli_io::print_info("Type `help` to list commands.");

    loop {
        if !context.running {
            break;
        }
        let prompt = context.prompt();
        let line = editor.readline(&prompt);

        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                cli_io::print_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            cli_io::print_warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };

    if tokens.is_empty() || tokens[0].starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let raw = &tokens[0];
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    /// Candidates for the word being typed, given the words before it.
    fn candidates(&self, previous: &[&str], needle: &str) -> Vec<String> {
        let pool: Vec<&str> = match previous {
            [] => self.commands.iter().map(String::as_str).collect(),
            [command] if matches!(*command, "charge" | "rent") => TABLE_SUBCOMMANDS.to_vec(),
            [command] if *command == "month" => vec!["prev", "next"],
            [command] if *command == "config" => vec!["show", "set"],
            [command] if *command == "help" => self.commands.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        };
        pool.into_iter()
            .filter(|name| name.starts_with(needle))
            .map(str::to_string)
            .collect()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);

        let lowered = prefix[..start].to_ascii_lowercase();
        let previous: Vec<&str> = lowered.split_whitespace().collect();
        let needle = prefix[start..].to_ascii_lowercase();
        let candidates = self
            .candidates(&previous, &needle)
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let _ = ctx;
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
