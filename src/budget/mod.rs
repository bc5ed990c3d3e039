//! Budget domain: month keys, records, the month store, the persisted schema
//! and the pure derivations (totals, flow graph, rent reconciliation).

pub mod defaults;
pub mod flow;
pub mod line_item;
pub mod month;
pub mod reconcile;
pub mod record;
pub mod schema;
pub mod store;
pub mod totals;

pub use defaults::{DefaultTablesConfig, TemplateItem};
pub use flow::{FlowEdge, FlowGraph};
pub use line_item::LineItem;
pub use month::MonthKey;
pub use reconcile::{RentCheck, RentCheckStatus};
pub use record::{BudgetRecord, Table, LOYER_LABEL, PROVISION_LABEL};
pub use schema::{LoadReport, CURRENT_SCHEMA_VERSION};
pub use store::BudgetStore;
pub use totals::Totals;
