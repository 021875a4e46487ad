//! Assessment configuration and startup validation

use std::collections::HashSet;
use std::time::Duration;
use serde::{Deserialize, Serialize};

use shared::Perspective;
use crate::error::{AssessorError, AssessorResult};

/// Data-sufficiency rules applied before any oracle is contacted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRules {
    pub min_age: u32,
    pub min_features_required: usize,
    pub core_features: Vec<String>,
}

impl Default for ProfileRules {
    fn default() -> Self {
        Self {
            min_age: 15,
            min_features_required: 3,
            core_features: vec![
                "age".to_string(),
                "gender".to_string(),
                "country_of_origin".to_string(),
            ],
        }
    }
}

/// Per-perspective weights of the country score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveWeights {
    pub emotional: f64,
    pub cultural: f64,
    pub ethical: f64,
}

impl PerspectiveWeights {
    const SUM_TOLERANCE: f64 = 1e-6;

    pub fn weight(&self, perspective: Perspective) -> f64 {
        match perspective {
            Perspective::Emotional => self.emotional,
            Perspective::Cultural => self.cultural,
            Perspective::Ethical => self.ethical,
        }
    }

    pub fn sum(&self) -> f64 {
        self.emotional + self.cultural + self.ethical
    }

    pub fn validate(&self) -> AssessorResult<()> {
        for perspective in Perspective::ALL {
            let weight = self.weight(perspective);
            if !weight.is_finite() || weight < 0.0 {
                return Err(AssessorError::config(
                    format!("weights.{perspective}"),
                    format!("weight must be a non-negative number, got {weight}"),
                ));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(AssessorError::config("weights", format!("weights must sum to 1.0, got {sum}")));
        }
        Ok(())
    }
}

impl Default for PerspectiveWeights {
    fn default() -> Self {
        Self {
            emotional: 0.3,
            cultural: 0.4,
            ethical: 0.3,
        }
    }
}

/// Force-accept rule for high, well-supported scores the validator rejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenientPolicy {
    pub enabled: bool,
    pub min_score: u8,
    pub min_features: usize,
    pub marker: String,
}

impl LenientPolicy {
    pub const DEFAULT_MARKER: &'static str = " [Lenient validation applied]";

    pub fn applies(&self, score: u8, feature_count: usize) -> bool {
        self.enabled && score >= self.min_score && feature_count >= self.min_features
    }
}

impl Default for LenientPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            min_score: 6,
            min_features: 5,
            marker: Self::DEFAULT_MARKER.to_string(),
        }
    }
}

/// Bounded parallelism and call spacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcurrencyConfig {
    /// Perspective assessors in flight for one individual
    pub max_in_flight: usize,
    /// Individuals processed at once
    pub individual_concurrency: usize,
    /// Minimum gap between any two oracle calls
    pub min_call_spacing: Duration,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 3,
            individual_concurrency: 1,
            min_call_spacing: Duration::from_millis(500),
        }
    }
}

/// Complete configuration for an assessment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    pub profile_rules: ProfileRules,
    pub weights: PerspectiveWeights,
    pub countries: Vec<String>,
    pub max_iterations: u32,
    pub max_context_chars: usize,
    pub lenient: LenientPolicy,
    pub concurrency: ConcurrencyConfig,
    pub oracle_timeout: Duration,
    pub progress_interval: usize,
}

impl AssessmentConfig {
    pub const DEFAULT_COUNTRIES: [&'static str; 5] = ["United States", "Canada", "Germany", "Sweden", "Australia"];

    /// Check every invariant the pipeline relies on
    pub fn validate(&self) -> AssessorResult<()> {
        self.weights.validate()?;

        if self.countries.is_empty() {
            return Err(AssessorError::config("countries", "at least one host country is required"));
        }
        let mut seen = HashSet::new();
        for country in &self.countries {
            if country.trim().is_empty() {
                return Err(AssessorError::config("countries", "country names must not be blank"));
            }
            if !seen.insert(country.as_str()) {
                return Err(AssessorError::config("countries", format!("duplicate country '{country}'")));
            }
        }

        if self.max_iterations == 0 {
            return Err(AssessorError::config("max_iterations", "iteration budget must be at least 1"));
        }
        if self.concurrency.max_in_flight == 0 {
            return Err(AssessorError::config("concurrency.max_in_flight", "must be at least 1"));
        }
        if self.concurrency.individual_concurrency == 0 {
            return Err(AssessorError::config("concurrency.individual_concurrency", "must be at least 1"));
        }
        if self.oracle_timeout.is_zero() {
            return Err(AssessorError::config("oracle_timeout", "must be greater than zero"));
        }
        if self.progress_interval == 0 {
            return Err(AssessorError::config("progress_interval", "must be at least 1"));
        }
        Ok(())
    }

    pub fn with_countries(mut self, countries: Vec<String>) -> Self {
        self.countries = countries;
        self
    }
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            profile_rules: ProfileRules::default(),
            weights: PerspectiveWeights::default(),
            countries: Self::DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            max_iterations: 3,
            max_context_chars: 8_000,
            lenient: LenientPolicy::default(),
            concurrency: ConcurrencyConfig::default(),
            oracle_timeout: Duration::from_secs(120),
            progress_interval: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AssessmentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.countries.len(), 5);
        assert_eq!(config.countries[0], "United States");
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = AssessmentConfig::default();
        config.weights.cultural = 0.5;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AssessorError::ConfigurationError { ref field, .. } if field == "weights"));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let weights = PerspectiveWeights {
            emotional: -0.2,
            cultural: 0.9,
            ethical: 0.3,
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_structural_limits_rejected() {
        assert!(AssessmentConfig::default().with_countries(vec![]).validate().is_err());
        assert!(AssessmentConfig::default()
            .with_countries(vec!["A".to_string(), "A".to_string()])
            .validate()
            .is_err());

        let mut zero_iterations = AssessmentConfig::default();
        zero_iterations.max_iterations = 0;
        assert!(zero_iterations.validate().is_err());

        let mut zero_window = AssessmentConfig::default();
        zero_window.concurrency.max_in_flight = 0;
        assert!(zero_window.validate().is_err());
    }

    #[test]
    fn test_lenient_policy_thresholds() {
        let policy = LenientPolicy::default();
        assert!(policy.applies(6, 5));
        assert!(!policy.applies(5, 10));
        assert!(!policy.applies(9, 4));

        let disabled = LenientPolicy {
            enabled: false,
            ..LenientPolicy::default()
        };
        assert!(!disabled.applies(10, 20));
    }
}
