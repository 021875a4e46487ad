//! Shared types for the multi-perspective assessment system
//!
//! Contains only the value types that cross the boundary between the oracle
//! clients and the assessment pipeline, plus the common error type and
//! tracing setup used by every binary.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
