//! Data-sufficiency validation and profile rendering

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::config::ProfileRules;
use crate::core::features::{display_name, ExtractedFeatures};

/// Why a record was turned away before assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectionReason {
    MissingCoreFeatures { missing: Vec<String> },
    InvalidAge { value: String },
    AgeBelowMinimum { age: f64, min_age: u32 },
    InsufficientFeatures { found: usize, required: usize },
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::MissingCoreFeatures { missing } => {
                write!(f, "Missing core features: {}", missing.join(", "))
            }
            RejectionReason::InvalidAge { value } => write!(f, "Invalid age value: {value}"),
            RejectionReason::AgeBelowMinimum { age, min_age } => {
                write!(f, "Age ({}) below minimum ({min_age})", format_number(*age))
            }
            RejectionReason::InsufficientFeatures { found, required } => {
                write!(f, "Insufficient features: {found} < {required}")
            }
        }
    }
}

/// A validated, immutable profile ready for the oracles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    features: ExtractedFeatures,
    display: String,
    rendered: String,
}

impl Profile {
    fn build(features: ExtractedFeatures) -> Self {
        let display = features
            .iter()
            .map(|f| format!("{}: {}", display_name(&f.name), f.value))
            .collect::<Vec<_>>()
            .join("; ");
        let rendered = features
            .iter()
            .map(|f| format!("{}={}", f.field_code, f.value))
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            features,
            display,
            rendered,
        }
    }

    /// `Display Name: value; ...`
    pub fn display(&self) -> &str {
        &self.display
    }

    /// `code=value; ...`, the form sent to the oracles
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    pub fn features(&self) -> &ExtractedFeatures {
        &self.features
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.features.names()
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

/// Applies `ProfileRules` to extracted features
#[derive(Debug, Clone, Default)]
pub struct ProfileValidator {
    rules: ProfileRules,
}

impl ProfileValidator {
    pub fn new(rules: ProfileRules) -> Self {
        Self { rules }
    }

    /// Accept the features as a profile or explain the first failed rule
    pub fn validate(&self, features: ExtractedFeatures) -> Result<Profile, RejectionReason> {
        let missing: Vec<String> = self
            .rules
            .core_features
            .iter()
            .filter(|name| !features.contains(name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(RejectionReason::MissingCoreFeatures { missing });
        }

        if let Some(age) = features.get("age") {
            let value = age.value.as_f64().ok_or_else(|| RejectionReason::InvalidAge {
                value: age.value.to_string(),
            })?;
            if value < f64::from(self.rules.min_age) {
                return Err(RejectionReason::AgeBelowMinimum {
                    age: value,
                    min_age: self.rules.min_age,
                });
            }
        }

        if features.len() < self.rules.min_features_required {
            return Err(RejectionReason::InsufficientFeatures {
                found: features.len(),
                required: self.rules.min_features_required,
            });
        }

        Ok(Profile::build(features))
    }
}
