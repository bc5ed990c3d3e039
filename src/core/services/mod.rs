pub mod summary_service;
pub mod table_service;

pub use summary_service::{MonthSummary, SummaryService};
pub use table_service::TableService;

use crate::core::errors::BudgetError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("`{label}` is a mandatory rent row and cannot be {action}")]
    MandatoryRow { label: String, action: &'static str },
    #[error("{0}")]
    Invalid(String),
}
