use super::line_item::{sanitize_amount, sum_amounts};
use super::record::BudgetRecord;

/// Derived summary numbers of a month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub salary: f64,
    /// Sum of every rent-detail row.
    pub total_rent: f64,
    /// Sum of every charge row.
    pub total_charges: f64,
    pub total_charges_global: f64,
    /// Salary minus all outgoings; negative when overspent.
    pub disposable_income: f64,
}

impl Totals {
    pub fn from_record(record: &BudgetRecord) -> Self {
        let salary = sanitize_amount(record.salary);
        let total_rent = sum_amounts(&record.rent_details);
        let total_charges = sum_amounts(&record.charges);
        let total_charges_global = total_rent + total_charges;
        Self {
            salary,
            total_rent,
            total_charges,
            total_charges_global,
            disposable_income: salary - total_charges_global,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::line_item::LineItem;

    fn record(salary: f64, rent: &[f64], charges: &[f64]) -> BudgetRecord {
        let mut record = BudgetRecord::new();
        record.salary = salary;
        for (index, amount) in rent.iter().enumerate() {
            match record.rent_details.get_mut(index) {
                Some(row) => row.amount = *amount,
                None => record.rent_details.push(LineItem::new("Extra", *amount)),
            }
        }
        record.charges = charges.iter().map(|a| LineItem::new("Charge", *a)).collect();
        record
    }

    #[test]
    fn totals_follow_the_budget_identity() {
        let totals = Totals::from_record(&record(2000.0, &[400.0, 100.0, 300.0], &[200.0, 100.0]));
        assert_eq!(totals.total_rent, 800.0);
        assert_eq!(totals.total_charges, 300.0);
        assert_eq!(totals.total_charges_global, 1100.0);
        assert_eq!(totals.disposable_income, 900.0);
    }

    #[test]
    fn zero_record_has_zero_totals() {
        let totals = Totals::from_record(&BudgetRecord::new());
        assert_eq!(totals.salary, 0.0);
        assert_eq!(totals.total_charges_global, 0.0);
        assert_eq!(totals.disposable_income, 0.0);
    }

    #[test]
    fn overspending_yields_negative_disposable_income() {
        let totals = Totals::from_record(&record(500.0, &[400.0, 100.0], &[250.0]));
        assert_eq!(totals.disposable_income, -250.0);
    }

    #[test]
    fn identity_holds_across_inputs() {
        for salary in [0.0, 1.5, 1200.0, 3999.99] {
            for rent in [0.0, 10.0, 650.0] {
                for charge in [0.0, 0.01, 75.0] {
                    let totals = Totals::from_record(&record(salary, &[rent, rent], &[charge]));
                    assert_eq!(
                        totals.total_charges_global,
                        totals.total_rent + totals.total_charges
                    );
                    assert_eq!(
                        totals.disposable_income,
                        totals.salary - totals.total_charges_global
                    );
                }
            }
        }
    }
}
