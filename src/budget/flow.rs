use super::line_item::{sanitize_amount, LineItem};
use super::record::BudgetRecord;
use super::totals::Totals;

pub const SALARY_NODE: &str = "Salary";
pub const HOUSING_NODE: &str = "Housing";
pub const CHARGES_NODE: &str = "Charges";
pub const DISPOSABLE_NODE: &str = "Disposable income";

/// Weighted edge of the money-flow graph.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowEdge {
    pub source: String,
    pub target: String,
    pub amount: f64,
}

impl FlowEdge {
    fn new(source: impl Into<String>, target: impl Into<String>, amount: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            amount,
        }
    }
}

/// Salary allocation: salary to the housing/charges/disposable categories,
/// then each category to its individual rows.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowGraph {
    pub salary: f64,
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    pub fn from_record(record: &BudgetRecord) -> Self {
        let totals = Totals::from_record(record);
        let salary = totals.salary;
        let total_rent = sanitize_amount(totals.total_rent);
        let total_charges = sanitize_amount(totals.total_charges);
        let disposable = sanitize_amount(totals.disposable_income);

        let mut edges = Vec::new();
        if salary > 0.0 {
            if total_rent > 0.0 {
                edges.push(FlowEdge::new(SALARY_NODE, HOUSING_NODE, total_rent));
            }
            if total_charges > 0.0 {
                edges.push(FlowEdge::new(SALARY_NODE, CHARGES_NODE, total_charges));
            }
            if disposable > 0.0 {
                edges.push(FlowEdge::new(SALARY_NODE, DISPOSABLE_NODE, disposable));
            }
        }
        edges.extend(leaf_edges(HOUSING_NODE, &record.rent_details));
        edges.extend(leaf_edges(CHARGES_NODE, &record.charges));
        edges.retain(|edge| edge.source != edge.target);

        Self { salary, edges }
    }

    /// Nothing to draw: no salary, or no edge survived.
    pub fn is_empty(&self) -> bool {
        self.salary <= 0.0 || self.edges.is_empty()
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&FlowEdge> {
        self.edges
            .iter()
            .find(|edge| edge.source == source && edge.target == target)
    }
}

fn leaf_edges<'a>(category: &'a str, rows: &'a [LineItem]) -> impl Iterator<Item = FlowEdge> + 'a {
    rows.iter().filter_map(move |row| {
        let amount = sanitize_amount(row.amount);
        (amount > 0.0 && !row.label.is_empty())
            .then(|| FlowEdge::new(category, format!("{category} - {}", row.label), amount))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(salary: f64, loyer: f64, charges: &[(&str, f64)]) -> BudgetRecord {
        let mut record = BudgetRecord::new();
        record.salary = salary;
        record.rent_details[0].amount = loyer;
        record.charges = charges
            .iter()
            .map(|(label, amount)| LineItem::new(*label, *amount))
            .collect();
        record
    }

    #[test]
    fn top_level_edges_split_salary() {
        let graph = FlowGraph::from_record(&record(2000.0, 800.0, &[("Internet", 300.0)]));
        assert_eq!(graph.edge(SALARY_NODE, HOUSING_NODE).unwrap().amount, 800.0);
        assert_eq!(graph.edge(SALARY_NODE, CHARGES_NODE).unwrap().amount, 300.0);
        assert_eq!(graph.edge(SALARY_NODE, DISPOSABLE_NODE).unwrap().amount, 900.0);
        assert_eq!(
            graph.edge(HOUSING_NODE, "Housing - Loyer").unwrap().amount,
            800.0
        );
        assert_eq!(
            graph.edge(CHARGES_NODE, "Charges - Internet").unwrap().amount,
            300.0
        );
        assert!(!graph.is_empty());
    }

    #[test]
    fn zero_rent_omits_housing_edge() {
        let graph = FlowGraph::from_record(&record(2000.0, 0.0, &[("Internet", 300.0)]));
        assert!(graph.edge(SALARY_NODE, HOUSING_NODE).is_none());
        assert!(graph.edge(SALARY_NODE, CHARGES_NODE).is_some());
    }

    #[test]
    fn rows_without_label_or_amount_are_skipped() {
        let graph = FlowGraph::from_record(&record(
            1500.0,
            0.0,
            &[("", 50.0), ("Gym", 0.0), ("Phone", 20.0)],
        ));
        let leaves: Vec<_> = graph
            .edges
            .iter()
            .filter(|edge| edge.source == CHARGES_NODE)
            .map(|edge| edge.target.as_str())
            .collect();
        assert_eq!(leaves, vec!["Charges - Phone"]);
    }

    #[test]
    fn overspent_month_has_no_disposable_edge() {
        let graph = FlowGraph::from_record(&record(500.0, 700.0, &[]));
        assert!(graph.edge(SALARY_NODE, DISPOSABLE_NODE).is_none());
    }

    #[test]
    fn no_salary_renders_empty() {
        let graph = FlowGraph::from_record(&record(0.0, 700.0, &[("Food", 200.0)]));
        assert!(graph.is_empty());
        assert!(FlowGraph::from_record(&BudgetRecord::new()).is_empty());
    }

    #[test]
    fn never_contains_self_loops() {
        let graph = FlowGraph::from_record(&record(2000.0, 800.0, &[("", 1.0), ("x", 2.0)]));
        assert!(graph.edges.iter().all(|edge| edge.source != edge.target));
    }
}
