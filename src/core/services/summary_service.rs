use crate::budget::{BudgetRecord, FlowGraph, MonthKey, RentCheck, Totals};

/// Everything the summary panel and flow diagram show for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub month: MonthKey,
    pub totals: Totals,
    pub rent_check: RentCheck,
    pub flow: FlowGraph,
}

pub struct SummaryService;

impl SummaryService {
    pub fn summarize(month: MonthKey, record: &BudgetRecord) -> MonthSummary {
        MonthSummary {
            month,
            totals: Totals::from_record(record),
            rent_check: RentCheck::evaluate(record),
            flow: FlowGraph::from_record(record),
        }
    }
}
