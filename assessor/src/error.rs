//! Assessor-specific error types

use thiserror::Error;

use oracle::OracleError;
use shared::SharedError;

#[derive(Error, Debug)]
pub enum AssessorError {
    #[error("Configuration error: {field}: {message}")]
    ConfigurationError { field: String, message: String },

    #[error("Row {row} failed: {message}")]
    RowProcessing { row: String, message: String },

    #[error("Dataset error: {0}")]
    Dataset(#[from] csv::Error),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AssessorError {
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn row(row: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RowProcessing {
            row: row.into(),
            message: message.into(),
        }
    }
}

pub type AssessorResult<T> = Result<T, AssessorError>;
