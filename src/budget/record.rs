use std::fmt;

use serde::{Deserialize, Serialize};

use super::defaults::DefaultTablesConfig;
use super::line_item::{sanitize_amount, LineItem};

/// Label of the first mandatory rent-detail row.
pub const LOYER_LABEL: &str = "Loyer";
/// Label of the second mandatory rent-detail row.
pub const PROVISION_LABEL: &str = "Provision pour charges";
/// Number of leading rent-detail rows that can be neither removed nor renamed.
pub const MANDATORY_RENT_ROWS: usize = 2;

/// The two editable tables of a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Charges,
    RentDetails,
}

impl Table {
    pub fn label(&self) -> &'static str {
        match self {
            Table::Charges => "charges",
            Table::RentDetails => "rent details",
        }
    }

    /// Whether row `index` of this table is one of the mandatory rent rows.
    pub fn is_mandatory_row(&self, index: usize) -> bool {
        matches!(self, Table::RentDetails) && index < MANDATORY_RENT_ROWS
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Budget of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecord {
    #[serde(default)]
    pub salary: f64,
    /// Total of the shared rent bill; half of it is this household's share.
    #[serde(default)]
    pub rent_bill_total: f64,
    #[serde(default)]
    pub rent_details: Vec<LineItem>,
    #[serde(default)]
    pub charges: Vec<LineItem>,
}

impl Default for BudgetRecord {
    fn default() -> Self {
        Self {
            salary: 0.0,
            rent_bill_total: 0.0,
            rent_details: ensure_mandatory_rent_rows(Vec::new()),
            charges: Vec::new(),
        }
    }
}

impl BudgetRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh record whose tables are seeded from the default template.
    pub fn seeded(defaults: &DefaultTablesConfig) -> Self {
        let mut record = Self::new();
        record.reseed_tables(defaults);
        record
    }

    /// Replaces both tables with the template rows; salary and bill total are kept.
    pub fn reseed_tables(&mut self, defaults: &DefaultTablesConfig) {
        self.charges = defaults.charge_items();
        self.rent_details = ensure_mandatory_rent_rows(defaults.rent_detail_items());
    }

    pub fn table(&self, table: Table) -> &[LineItem] {
        match table {
            Table::Charges => &self.charges,
            Table::RentDetails => &self.rent_details,
        }
    }

    pub fn table_mut(&mut self, table: Table) -> &mut Vec<LineItem> {
        match table {
            Table::Charges => &mut self.charges,
            Table::RentDetails => &mut self.rent_details,
        }
    }

    /// Amount of the promoted `Loyer` row.
    pub fn loyer_amount(&self) -> f64 {
        mandatory_amount(&self.rent_details, 0, LOYER_LABEL)
    }

    /// Amount of the promoted `Provision pour charges` row.
    pub fn provision_amount(&self) -> f64 {
        mandatory_amount(&self.rent_details, 1, PROVISION_LABEL)
    }

    /// Clamps every amount and restores the mandatory rent rows.
    pub fn normalize(&mut self) {
        self.salary = sanitize_amount(self.salary);
        self.rent_bill_total = sanitize_amount(self.rent_bill_total);
        for item in self.charges.iter_mut().chain(self.rent_details.iter_mut()) {
            item.amount = sanitize_amount(item.amount);
        }
        let rows = std::mem::take(&mut self.rent_details);
        self.rent_details = ensure_mandatory_rent_rows(rows);
    }

    /// Copy carried into the following month by "duplicate previous month".
    pub fn carried_forward(&self) -> Self {
        Self {
            salary: 0.0,
            ..self.clone()
        }
    }
}

fn mandatory_amount(rows: &[LineItem], position: usize, label: &str) -> f64 {
    rows.get(position)
        .filter(|row| row.label == label)
        .or_else(|| rows.iter().find(|row| row.label == label))
        .map(|row| sanitize_amount(row.amount))
        .unwrap_or(0.0)
}

/// Puts the first `Loyer` row and the first `Provision pour charges` row at
/// positions 0 and 1, synthesizing zero-amount rows when missing. Every other
/// row keeps its relative order; later duplicates of the mandatory labels stay
/// behind as ordinary rows.
pub fn ensure_mandatory_rent_rows(rows: Vec<LineItem>) -> Vec<LineItem> {
    let loyer_at = rows.iter().position(|row| row.label == LOYER_LABEL);
    let provision_at = rows.iter().position(|row| row.label == PROVISION_LABEL);

    let mut loyer = None;
    let mut provision = None;
    let mut others = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        if Some(index) == loyer_at {
            loyer = Some(row);
        } else if Some(index) == provision_at {
            provision = Some(row);
        } else {
            others.push(row);
        }
    }

    let mut normalized = Vec::with_capacity(others.len() + MANDATORY_RENT_ROWS);
    normalized.push(loyer.unwrap_or_else(|| LineItem::new(LOYER_LABEL, 0.0)));
    normalized.push(provision.unwrap_or_else(|| LineItem::new(PROVISION_LABEL, 0.0)));
    normalized.extend(others);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::defaults::TemplateItem;

    fn labels(rows: &[LineItem]) -> Vec<&str> {
        rows.iter().map(|row| row.label.as_str()).collect()
    }

    #[test]
    fn empty_input_gets_both_mandatory_rows() {
        let rows = ensure_mandatory_rent_rows(Vec::new());
        assert_eq!(labels(&rows), vec![LOYER_LABEL, PROVISION_LABEL]);
        assert!(rows.iter().all(|row| row.amount == 0.0));
    }

    #[test]
    fn mandatory_rows_move_to_front_keeping_other_order() {
        let rows = ensure_mandatory_rent_rows(vec![
            LineItem::new("Parking", 50.0),
            LineItem::new(PROVISION_LABEL, 100.0),
            LineItem::new("Cave", 10.0),
            LineItem::new(LOYER_LABEL, 400.0),
        ]);
        assert_eq!(
            labels(&rows),
            vec![LOYER_LABEL, PROVISION_LABEL, "Parking", "Cave"]
        );
        assert_eq!(rows[0].amount, 400.0);
        assert_eq!(rows[1].amount, 100.0);
    }

    #[test]
    fn later_duplicates_survive_as_trailing_rows() {
        let rows = ensure_mandatory_rent_rows(vec![
            LineItem::new(LOYER_LABEL, 400.0),
            LineItem::new(LOYER_LABEL, 999.0),
            LineItem::new(PROVISION_LABEL, 100.0),
        ]);
        assert_eq!(labels(&rows), vec![LOYER_LABEL, PROVISION_LABEL, LOYER_LABEL]);
        assert_eq!(rows[0].amount, 400.0);
        assert_eq!(rows[2].amount, 999.0);
    }

    #[test]
    fn enforcement_is_idempotent() {
        let input = vec![
            LineItem::new("Garage", 30.0),
            LineItem::new(PROVISION_LABEL, 80.0),
            LineItem::new(PROVISION_LABEL, 5.0),
        ];
        let once = ensure_mandatory_rent_rows(input);
        let twice = ensure_mandatory_rent_rows(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn seeded_record_uses_template_rows() {
        let defaults = DefaultTablesConfig {
            charges: vec![TemplateItem::new("Internet", 30.0)],
            rent_details: vec![
                TemplateItem::new("Parking", 40.0),
                TemplateItem::new(LOYER_LABEL, 450.0),
            ],
        };
        let record = BudgetRecord::seeded(&defaults);
        assert_eq!(record.salary, 0.0);
        assert_eq!(labels(&record.charges), vec!["Internet"]);
        assert_eq!(
            labels(&record.rent_details),
            vec![LOYER_LABEL, PROVISION_LABEL, "Parking"]
        );
        assert_eq!(record.loyer_amount(), 450.0);
    }

    #[test]
    fn reseed_keeps_salary_and_bill() {
        let mut record = BudgetRecord::new();
        record.salary = 2000.0;
        record.rent_bill_total = 1000.0;
        record.charges.push(LineItem::new("Gym", 25.0));
        record.reseed_tables(&DefaultTablesConfig::default());
        assert_eq!(record.salary, 2000.0);
        assert_eq!(record.rent_bill_total, 1000.0);
        assert!(record.charges.is_empty());
        assert_eq!(labels(&record.rent_details), vec![LOYER_LABEL, PROVISION_LABEL]);
    }

    #[test]
    fn normalize_heals_corrupted_record() {
        let mut record = BudgetRecord {
            salary: -10.0,
            rent_bill_total: f64::NAN,
            rent_details: vec![LineItem {
                label: "Parking".into(),
                amount: -4.0,
            }],
            charges: vec![],
        };
        record.normalize();
        assert_eq!(record.salary, 0.0);
        assert_eq!(record.rent_bill_total, 0.0);
        assert_eq!(
            labels(&record.rent_details),
            vec![LOYER_LABEL, PROVISION_LABEL, "Parking"]
        );
        assert_eq!(record.rent_details[2].amount, 0.0);
    }

    #[test]
    fn mandatory_row_guard_only_covers_first_two_rent_rows() {
        assert!(Table::RentDetails.is_mandatory_row(0));
        assert!(Table::RentDetails.is_mandatory_row(1));
        assert!(!Table::RentDetails.is_mandatory_row(2));
        assert!(!Table::Charges.is_mandatory_row(0));
    }

    #[test]
    fn carried_forward_zeroes_salary_only() {
        let mut record = BudgetRecord::new();
        record.salary = 2500.0;
        record.rent_bill_total = 900.0;
        record.charges.push(LineItem::new("Phone", 15.0));
        let copy = record.carried_forward();
        assert_eq!(copy.salary, 0.0);
        assert_eq!(copy.rent_bill_total, 900.0);
        assert_eq!(copy.charges, record.charges);
    }
}
