use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandResult, ShellContext};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "summary",
            "Show totals and the rent check",
            "summary",
            cmd_summary,
        ),
        CommandDefinition::new("flow", "Show where the salary goes", "flow", cmd_flow),
        CommandDefinition::new(
            "show",
            "Show the whole month: tables, summary and flow",
            "show",
            cmd_show,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.render_summary();
    Ok(())
}

fn cmd_flow(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.render_flow();
    Ok(())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.render_month();
    Ok(())
}
