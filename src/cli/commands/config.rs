use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::config::CONFIG_KEYS;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "View and change preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return context.show_config();
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    CONFIG_KEYS.join("|")
                )));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            context.set_config_value(key, value.trim())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}` (use show or set)"
        ))),
    }
}
