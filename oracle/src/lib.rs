//! Oracle library for the multi-perspective assessment system
//!
//! Provides the selector and validator capabilities consumed by the
//! assessment state machine, with an LLM-backed implementation, scripted and
//! random stand-ins, rate limiting and per-oracle performance tracking.

pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use error::{OracleError, OracleResult};
pub use services::*;
pub use traits::*;
pub use types::*;
