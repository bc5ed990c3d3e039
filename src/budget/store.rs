use std::collections::BTreeMap;

use super::defaults::DefaultTablesConfig;
use super::month::MonthKey;
use super::record::BudgetRecord;

/// All budget records, keyed by month.
///
/// Records are created on first access and never removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetStore {
    months: BTreeMap<MonthKey, BudgetRecord>,
}

impl BudgetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_months(months: BTreeMap<MonthKey, BudgetRecord>) -> Self {
        Self { months }
    }

    pub fn months(&self) -> &BTreeMap<MonthKey, BudgetRecord> {
        &self.months
    }

    pub fn get(&self, month: MonthKey) -> Option<&BudgetRecord> {
        self.months.get(&month)
    }

    /// Returns the record for `month`, seeding it from `defaults` when absent.
    pub fn get_or_create(
        &mut self,
        month: MonthKey,
        defaults: &DefaultTablesConfig,
    ) -> &mut BudgetRecord {
        self.months.entry(month).or_insert_with(|| {
            tracing::debug!(%month, "creating budget record");
            BudgetRecord::seeded(defaults)
        })
    }

    pub fn insert(&mut self, month: MonthKey, record: BudgetRecord) {
        self.months.insert(month, record);
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Copies the previous month's tables and bill total into `month` with a
    /// zero salary. Returns `false`, leaving the store untouched, when there
    /// is no previous month or it has no record.
    pub fn duplicate_previous(&mut self, month: MonthKey) -> bool {
        let Some(previous) = month.previous().and_then(|key| self.months.get(&key)) else {
            return false;
        };
        let copy = previous.carried_forward();
        self.months.insert(month, copy);
        true
    }
}
