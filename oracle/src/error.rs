//! Oracle error types

use std::time::Duration;
use thiserror::Error;

use shared::{OracleFailure, SharedError};
use crate::types::OracleRole;

/// Result type for oracle operations
pub type OracleResult<T> = Result<T, OracleError>;

/// Oracle error types
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Oracle request failed: {role} - {reason}")]
    ProviderError { role: OracleRole, reason: OracleFailure },

    #[error("Malformed oracle output: {message}")]
    MalformedOutput { message: String },

    #[error("Oracle call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),
}

impl OracleError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError { message: message.into() }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedOutput { message: message.into() }
    }
}
