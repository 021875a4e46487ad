//! Shared error types for the assessment system

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Score out of range: {score} (expected 1-10)")]
    InvalidScore { score: i64 },

    #[error("Confidence out of range: {value}")]
    InvalidConfidence { value: f64 },

    #[error("Unknown perspective: {input}")]
    UnknownPerspective { input: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
