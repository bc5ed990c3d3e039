use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the budget, storage and configuration layers.
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Unsupported schema version v{found} (this build reads up to v{supported})")]
    UnsupportedSchema { found: u32, supported: u32 },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid month `{0}` (use YYYY-MM)")]
    InvalidMonth(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("Command failed: {0}")]
    Command(String),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
