use crate::budget::{LineItem, Table};
use crate::cli::commands::CommandDefinition;
use crate::cli::core::{parse_amount, parse_row_number, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::core::intent::Intent;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "charge",
            "Edit the charges table",
            "charge [list|add [label] [amount]|label <n> <text>|amount <n> <value>|remove <n>]",
            cmd_charge,
        ),
        CommandDefinition::new(
            "rent",
            "Edit the rent details table",
            "rent [list|add [label] [amount]|label <n> <text>|amount <n> <value>|remove <n>]",
            cmd_rent,
        ),
    ]
}

fn cmd_charge(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    table_command(context, Table::Charges, "charge", args)
}

fn cmd_rent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    table_command(context, Table::RentDetails, "rent", args)
}

fn table_command(
    context: &mut ShellContext,
    table: Table,
    name: &str,
    args: &[&str],
) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        context.render_table(table);
        return Ok(());
    };

    match (action.to_lowercase().as_str(), rest) {
        ("list", []) => {
            context.render_table(table);
        }
        ("add", rest) if rest.len() <= 2 => {
            let label = rest.first().map(|label| label.to_string()).unwrap_or_default();
            let amount = rest.get(1).map(|value| parse_amount(value)).unwrap_or(0.0);
            context.apply(Intent::AddRow {
                table,
                item: LineItem::new(label, amount),
            })?;
            let rows = context.app.active_record().table(table).len();
            io::print_success(format!("Added row {rows} to {table}."));
        }
        ("label", [row, text @ ..]) if !text.is_empty() => {
            let index = parse_row_number(row)?;
            context.apply(Intent::EditLabel {
                table,
                index,
                label: text.join(" "),
            })?;
        }
        ("amount", [row, value]) => {
            let index = parse_row_number(row)?;
            context.apply(Intent::EditAmount {
                table,
                index,
                amount: parse_amount(value),
            })?;
        }
        ("remove", [row]) => {
            let index = parse_row_number(row)?;
            context.apply(Intent::RemoveRow { table, index })?;
            io::print_success(format!("Removed row {row} from {table}."));
        }
        _ => {
            let usage = context
                .command(name)
                .map(|definition| definition.usage)
                .unwrap_or_default();
            return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
        }
    }
    Ok(())
}
