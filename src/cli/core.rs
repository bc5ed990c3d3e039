//! Core CLI loop, dispatch, and shell context helpers.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;

use crate::budget::{DefaultTablesConfig, MonthKey, Table};
use crate::config::{Config, ConfigManager, CONFIG_KEYS};
use crate::core::context::{AppContext, LoadMetadata};
use crate::core::errors::BudgetError;
use crate::core::intent::{Intent, RenderScope};
use crate::core::services::ServiceError;
use crate::core::utils::PathResolver;
use crate::storage::JsonFileStorage;
pub use crate::core::errors::CliError;

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::io as cli_io;
use super::output::{self, current_preferences};
use super::ui::views::{self, Money};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub app: AppContext,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    /// Builds a shell whose config, template and budget data live under `base`.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let registry = CommandRegistry::new(commands::all_definitions());

        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        cli_io::apply_config(&config);

        let defaults = DefaultTablesConfig::load(&config_manager.defaults_path(&config));
        let storage = JsonFileStorage::new(Some(base))?;
        let (app, metadata) =
            AppContext::bootstrap(Box::new(storage), defaults, MonthKey::current());
        tracing::info!(month = %app.active_month(), "shell started");

        let context = ShellContext {
            mode,
            registry,
            app,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            running: true,
        };
        context.report_load(&metadata);
        Ok(context)
    }

    pub(crate) fn prompt(&self) -> String {
        format!("budget {}> ", self.app.active_month())
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    fn report_load(&self, metadata: &LoadMetadata) {
        for note in &metadata.migrations {
            cli_io::print_info(format!("Migration: {}", note));
        }
        for warning in &metadata.warnings {
            cli_io::print_warning(warning);
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(definition) = self.registry.get(command) {
            let handler = definition.handler;
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if !self.can_prompt() {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    /// Applies `intent` to the budget and redraws what it invalidated.
    pub(crate) fn apply(&mut self, intent: Intent) -> Result<RenderScope, CommandError> {
        let scope = self.app.dispatch(intent)?;
        self.render(scope);
        Ok(scope)
    }

    pub(crate) fn render(&mut self, scope: RenderScope) {
        match scope {
            RenderScope::Unchanged => {}
            RenderScope::Summary => {
                self.render_summary();
                self.render_flow();
            }
            RenderScope::Full => self.render_month(),
        }
    }

    pub(crate) fn render_month(&mut self) {
        output::section(format!("Budget {}", self.app.active_month()));
        self.render_table(Table::RentDetails);
        self.render_table(Table::Charges);
        self.render_summary();
        self.render_flow();
    }

    pub(crate) fn render_table(&mut self, table: Table) {
        let money = self.money();
        let record = self.app.active_record();
        let rendered = match table {
            Table::RentDetails => format!(
                "Rent bill total: {}\n{}",
                money.format(record.rent_bill_total),
                views::render_line_table(table, &record.rent_details, &money)
            ),
            Table::Charges => views::render_line_table(table, &record.charges, &money),
        };
        let title = match table {
            Table::RentDetails => "Rent details",
            Table::Charges => "Charges",
        };
        output::section(title);
        output::block(rendered);
    }

    pub(crate) fn render_summary(&mut self) {
        let money = self.money();
        let summary = self.app.summary();
        output::section(format!("Summary {}", summary.month));
        output::block(views::render_totals(&summary.totals, &money));
        output::print(
            views::rent_check_kind(summary.rent_check.status),
            summary.rent_check.status.message(),
        );
        if let Some(details) = views::render_rent_check_details(&summary.rent_check, &money) {
            output::block(details);
        }
    }

    pub(crate) fn render_flow(&mut self) {
        let money = self.money();
        let summary = self.app.summary();
        output::section("Flow");
        output::block(views::render_flow(
            &summary.flow,
            &money,
            &current_preferences(),
        ));
    }

    fn money(&self) -> Money {
        Money::new(self.config.currency.clone(), self.config.screen_reader_mode)
    }

    pub(crate) fn show_config(&self) -> CommandResult {
        output::section("Configuration");
        let defaults_path = self.config_manager.defaults_path(&self.config);
        cli_io::print_info(format!("  currency           : {}", self.config.currency));
        cli_io::print_info(format!(
            "  defaults_path      : {}",
            defaults_path.display()
        ));
        cli_io::print_info(format!(
            "  screen_reader_mode : {}",
            on_off(self.config.screen_reader_mode)
        ));
        cli_io::print_info(format!(
            "  high_contrast_mode : {}",
            on_off(self.config.high_contrast_mode)
        ));
        cli_io::print_info(format!(
            "  data directory     : {}",
            self.config_manager.base_dir().display()
        ));
        Ok(())
    }

    pub(crate) fn set_config_value(&mut self, key: &str, value: &str) -> CommandResult {
        let key = key.to_lowercase();
        let mut updated = self.config.clone();
        updated.set_value(&key, value).map_err(|err| match err {
            BudgetError::ConfigError(message) => CommandError::InvalidArguments(format!(
                "{message} (keys: {})",
                CONFIG_KEYS.join(", ")
            )),
            other => CommandError::Core(other),
        })?;
        self.config_manager.save(&updated)?;
        self.config = updated;
        cli_io::apply_config(&self.config);

        if key == "defaults_path" {
            let path = self.config_manager.defaults_path(&self.config);
            self.app.set_defaults(DefaultTablesConfig::load(&path));
            cli_io::print_info("New months and `reset` will use the updated template.");
        }
        cli_io::print_success(format!("`{key}` updated."));
        Ok(())
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Parses a 1-based row number as shown in the tables into an index.
pub(crate) fn parse_row_number(input: &str) -> Result<usize, CommandError> {
    match input.trim().parse::<usize>() {
        Ok(number) if number >= 1 => Ok(number - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "invalid row number `{}` (rows start at 1)",
            input
        ))),
    }
}

/// Parses an amount the way the budget inputs do: anything that is not a
/// non-negative number becomes 0, with a warning.
pub(crate) fn parse_amount(input: &str) -> f64 {
    let normalized = input.trim().replace(',', ".");
    if normalized.parse::<f64>().is_err() {
        cli_io::print_warning(format!("`{}` is not a number; using 0.", input));
    }
    crate::budget::line_item::coerce_amount_text(input)
}

pub(crate) fn parse_month(input: &str, active: MonthKey) -> Result<MonthKey, CommandError> {
    match input.to_lowercase().as_str() {
        "prev" | "previous" => active.previous().ok_or_else(|| {
            CommandError::InvalidArguments(format!("{active} is the earliest supported month"))
        }),
        "next" => active.next().ok_or_else(|| {
            CommandError::InvalidArguments(format!("{active} is the latest supported month"))
        }),
        _ => input.parse::<MonthKey>().map_err(|_| {
            CommandError::InvalidArguments(format!(
                "invalid month `{}` (use YYYY-MM, prev or next)",
                input
            ))
        }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(err) => CommandError::Core(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
            refused @ ServiceError::MandatoryRow { .. } => {
                CommandError::Message(refused.to_string())
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(base: &std::path::Path, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_base_dir(CliMode::Script, base.to_path_buf())?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}
