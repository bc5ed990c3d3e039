use crate::budget::line_item::{sanitize_amount, LineItem};
use crate::budget::record::{BudgetRecord, Table};

use super::{ServiceError, ServiceResult};

/// Row-level edits of the charges and rent-detail tables. Indices are
/// zero-based.
pub struct TableService;

impl TableService {
    /// Appends `item` and returns its index.
    pub fn add_row(record: &mut BudgetRecord, table: Table, item: LineItem) -> usize {
        let rows = record.table_mut(table);
        rows.push(LineItem::new(item.label, item.amount));
        rows.len() - 1
    }

    pub fn set_label(
        record: &mut BudgetRecord,
        table: Table,
        index: usize,
        label: String,
    ) -> ServiceResult<()> {
        Self::guard_mandatory(record, table, index, "renamed")?;
        Self::row_mut(record, table, index)?.label = label;
        Ok(())
    }

    pub fn set_amount(
        record: &mut BudgetRecord,
        table: Table,
        index: usize,
        amount: f64,
    ) -> ServiceResult<()> {
        Self::row_mut(record, table, index)?.amount = sanitize_amount(amount);
        Ok(())
    }

    pub fn remove_row(
        record: &mut BudgetRecord,
        table: Table,
        index: usize,
    ) -> ServiceResult<LineItem> {
        Self::guard_mandatory(record, table, index, "removed")?;
        Self::row_mut(record, table, index)?;
        Ok(record.table_mut(table).remove(index))
    }

    fn guard_mandatory(
        record: &BudgetRecord,
        table: Table,
        index: usize,
        action: &'static str,
    ) -> ServiceResult<()> {
        if table.is_mandatory_row(index) {
            let label = record
                .table(table)
                .get(index)
                .map(|row| row.label.clone())
                .unwrap_or_default();
            return Err(ServiceError::MandatoryRow { label, action });
        }
        Ok(())
    }

    fn row_mut(
        record: &mut BudgetRecord,
        table: Table,
        index: usize,
    ) -> ServiceResult<&mut LineItem> {
        let rows = record.table_mut(table);
        let len = rows.len();
        rows.get_mut(index).ok_or_else(|| {
            ServiceError::Invalid(format!(
                "{table} has {len} row(s); row {} does not exist",
                index + 1
            ))
        })
    }
}
