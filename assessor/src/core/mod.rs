//! Core assessment logic
//!
//! Everything here is free of file and network I/O. Oracles are reached only
//! through the `Selector` and `Validator` traits.

pub mod aggregator;
pub mod assessor;
pub mod context;
pub mod features;
pub mod perspective;
pub mod profile;
pub mod summary;

pub use aggregator::{country_scores, recommend, weighted_score};
pub use assessor::PerspectiveAssessor;
pub use context::{base_context, FeedbackContext};
pub use features::{CanonicalFeature, ExtractedFeatures, FeatureCatalog, FeatureSpec, FeatureValue, RawRecord};
pub use perspective::{focus_directive, PerspectiveDescriptor};
pub use profile::{Profile, ProfileValidator, RejectionReason};
pub use summary::summarize;
