//! Multi-perspective assessment pipeline
//!
//! Turns raw survey records into validated profiles, runs an emotional,
//! cultural and ethical selector/validator assessment for every host country,
//! and aggregates the weighted scores into a recommendation with a full
//! audit trail.

pub mod config;
pub mod core;
pub mod error;
pub mod orchestrator;
pub mod reporter;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::{AssessmentConfig, ConcurrencyConfig, LenientPolicy, PerspectiveWeights, ProfileRules};
pub use core::{FeatureCatalog, PerspectiveAssessor, Profile, ProfileValidator, RawRecord, RejectionReason};
pub use error::{AssessorError, AssessorResult};
pub use orchestrator::{AssessmentOrchestrator, RecordOutcome};
pub use reporter::{MockReporter, Reporter, TracingReporter};
pub use services::{CsvDatasetLoader, RealResultWriter, ResultWriter};
pub use types::*;
