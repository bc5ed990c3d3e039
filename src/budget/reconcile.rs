use super::line_item::sanitize_amount;
use super::record::BudgetRecord;

/// Absolute tolerance when comparing the expected share with the rent rows.
pub const RECONCILE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentCheckStatus {
    /// No bill total entered yet.
    NoBill,
    Match,
    Mismatch,
}

impl RentCheckStatus {
    pub fn message(&self) -> &'static str {
        match self {
            RentCheckStatus::NoBill => {
                "Enter the total rent bill to check the amounts."
            }
            RentCheckStatus::Match => {
                "OK: the expected share matches Loyer + Provision pour charges."
            }
            RentCheckStatus::Mismatch => {
                "Warning: the expected share (bill / 2) does not match Loyer + Provision pour charges."
            }
        }
    }
}

/// Compares half the rent bill with the two mandatory rent rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RentCheck {
    pub expected_share: f64,
    pub actual: f64,
    pub status: RentCheckStatus,
}

impl RentCheck {
    pub fn evaluate(record: &BudgetRecord) -> Self {
        let bill = sanitize_amount(record.rent_bill_total);
        let expected_share = bill / 2.0;
        let actual = record.loyer_amount() + record.provision_amount();
        let status = if bill <= 0.0 {
            RentCheckStatus::NoBill
        } else if (expected_share - actual).abs() <= RECONCILE_TOLERANCE {
            RentCheckStatus::Match
        } else {
            RentCheckStatus::Mismatch
        };
        Self {
            expected_share,
            actual,
            status,
        }
    }

    pub fn difference(&self) -> f64 {
        self.actual - self.expected_share
    }
}
