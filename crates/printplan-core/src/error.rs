//! Error types for PrintPlan.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrintPlanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Week {index} is out of range (split has {weeks} weeks)")]
    WeekOutOfRange { index: usize, weeks: usize },

    #[error("No backward redistribution is awaiting confirmation")]
    NoPendingEdit,

    #[error("Job not found: {0}")]
    JobNotFound(String),
}

pub type Result<T> = std::result::Result<T, PrintPlanError>;
