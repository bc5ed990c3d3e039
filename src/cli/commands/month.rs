use crate::cli::core::{parse_amount, parse_month, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::commands::CommandDefinition;
use crate::core::intent::{Intent, RenderScope};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "month",
            "Show or switch the active month",
            "month [YYYY-MM|prev|next]",
            cmd_month,
        ),
        CommandDefinition::new("salary", "Set the month's salary", "salary <amount>", cmd_salary),
        CommandDefinition::new(
            "bill",
            "Set the month's total rent bill",
            "bill <amount>",
            cmd_bill,
        ),
        CommandDefinition::new(
            "duplicate",
            "Copy the previous month's tables and bill into this month",
            "duplicate",
            cmd_duplicate,
        ),
        CommandDefinition::new(
            "reset",
            "Reset charges and rent details to the default template",
            "reset [--yes]",
            cmd_reset,
        ),
    ]
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(target) = args.first() else {
        io::print_info(format!("Active month: {}", context.app.active_month()));
        return Ok(());
    };
    let month = parse_month(target, context.app.active_month())?;
    context.apply(Intent::SelectMonth(month))?;
    Ok(())
}

fn cmd_salary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let amount = single_amount(args, "salary <amount>")?;
    context.apply(Intent::SetSalary(amount))?;
    Ok(())
}

fn cmd_bill(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let amount = single_amount(args, "bill <amount>")?;
    context.apply(Intent::SetRentBillTotal(amount))?;
    Ok(())
}

fn single_amount(args: &[&str], usage: &str) -> Result<f64, CommandError> {
    match args {
        [value] => Ok(parse_amount(value)),
        _ => Err(CommandError::InvalidArguments(format!("usage: {usage}"))),
    }
}

fn cmd_duplicate(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let month = context.app.active_month();
    let Some(previous) = month.previous() else {
        io::print_warning(format!("{month} has no previous month; nothing to duplicate."));
        return Ok(());
    };
    match context.apply(Intent::DuplicatePreviousMonth)? {
        RenderScope::Unchanged => io::print_warning(format!(
            "No budget recorded for {previous}; nothing to duplicate."
        )),
        _ => io::print_success(format!("Copied {previous} into {month}.")),
    }
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let confirmed_by_flag = args
        .iter()
        .any(|arg| matches!(*arg, "--yes" | "-y"));
    if !confirmed_by_flag {
        if !context.can_prompt() {
            return Err(CommandError::InvalidArguments(
                "reset discards this month's tables; run `reset --yes` to confirm".into(),
            ));
        }
        let prompt = format!(
            "Replace the charges and rent details of {} with the defaults?",
            context.app.active_month()
        );
        if !io::confirm_action(&context.theme, &prompt, false)? {
            io::print_info("Reset cancelled.");
            return Ok(());
        }
    }
    context.apply(Intent::ResetToDefaults)?;
    io::print_success("Tables reset to the defaults.");
    Ok(())
}
