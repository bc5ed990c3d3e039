//! User intents and the reducer that applies them to the budget store.

use crate::budget::line_item::sanitize_amount;
use crate::budget::{BudgetStore, DefaultTablesConfig, LineItem, MonthKey, Table};

use super::services::{ServiceResult, TableService};

/// One user action. Table indices are zero-based.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SelectMonth(MonthKey),
    SetSalary(f64),
    SetRentBillTotal(f64),
    AddRow {
        table: Table,
        item: LineItem,
    },
    EditLabel {
        table: Table,
        index: usize,
        label: String,
    },
    EditAmount {
        table: Table,
        index: usize,
        amount: f64,
    },
    RemoveRow {
        table: Table,
        index: usize,
    },
    DuplicatePreviousMonth,
    ResetToDefaults,
}

impl Intent {
    /// Whether a successful application changes persisted data.
    pub fn mutates_store(&self) -> bool {
        !matches!(self, Intent::SelectMonth(_))
    }
}

/// How much of the view an applied intent invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderScope {
    Unchanged,
    /// Totals, reconciliation and flow only.
    Summary,
    /// Tables as well as the summary.
    Full,
}

/// Applies `intent` to the active month. On error the store is left as it was.
pub fn reduce(
    store: &mut BudgetStore,
    defaults: &DefaultTablesConfig,
    active: &mut MonthKey,
    intent: Intent,
) -> ServiceResult<RenderScope> {
    match intent {
        Intent::SelectMonth(month) => {
            *active = month;
            store.get_or_create(month, defaults);
            Ok(RenderScope::Full)
        }
        Intent::DuplicatePreviousMonth => {
            if store.duplicate_previous(*active) {
                tracing::info!(month = %active, "duplicated previous month");
                Ok(RenderScope::Full)
            } else {
                tracing::debug!(month = %active, "no previous month to duplicate");
                Ok(RenderScope::Unchanged)
            }
        }
        Intent::SetSalary(amount) => {
            store.get_or_create(*active, defaults).salary = sanitize_amount(amount);
            Ok(RenderScope::Summary)
        }
        Intent::SetRentBillTotal(amount) => {
            store.get_or_create(*active, defaults).rent_bill_total = sanitize_amount(amount);
            Ok(RenderScope::Summary)
        }
        Intent::AddRow { table, item } => {
            TableService::add_row(store.get_or_create(*active, defaults), table, item);
            Ok(RenderScope::Full)
        }
        Intent::EditLabel {
            table,
            index,
            label,
        } => {
            let record = store.get_or_create(*active, defaults);
            TableService::set_label(record, table, index, label)?;
            Ok(RenderScope::Summary)
        }
        Intent::EditAmount {
            table,
            index,
            amount,
        } => {
            let record = store.get_or_create(*active, defaults);
            TableService::set_amount(record, table, index, amount)?;
            Ok(RenderScope::Summary)
        }
        Intent::RemoveRow { table, index } => {
            let record = store.get_or_create(*active, defaults);
            TableService::remove_row(record, table, index)?;
            Ok(RenderScope::Full)
        }
        Intent::ResetToDefaults => {
            store.get_or_create(*active, defaults).reseed_tables(defaults);
            tracing::info!(month = %active, "tables reset to defaults");
            Ok(RenderScope::Full)
        }
    }
}
