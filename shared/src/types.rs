//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{SharedError, SharedResult};

/// Unique identifier for an assessed individual
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndividualId(Uuid);

impl IndividualId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IndividualId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a single (perspective, country) assessment
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(Uuid);

impl AssessmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AssessmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three independent judgment lenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    Emotional,
    Cultural,
    Ethical,
}

impl Perspective {
    /// Every perspective in reporting order
    pub const ALL: [Perspective; 3] = [
        Perspective::Emotional,
        Perspective::Cultural,
        Perspective::Ethical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::Emotional => "emotional",
            Perspective::Cultural => "cultural",
            Perspective::Ethical => "ethical",
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Perspective {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "emotional" => Ok(Perspective::Emotional),
            "cultural" => Ok(Perspective::Cultural),
            "ethical" => Ok(Perspective::Ethical),
            _ => Err(SharedError::UnknownPerspective { input: s.to_string() }),
        }
    }
}

/// Score, reasoning and confidence produced by a selector oracle.
///
/// Fields are private so that every instance has passed range validation:
/// the score is an integer in `[1, 10]` and the confidence lies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedPerspectiveResponse")]
pub struct PerspectiveResponse {
    score: u8,
    reasoning: String,
    confidence: f64,
}

#[derive(Deserialize)]
struct UncheckedPerspectiveResponse {
    score: i64,
    reasoning: String,
    confidence: f64,
}

impl TryFrom<UncheckedPerspectiveResponse> for PerspectiveResponse {
    type Error = SharedError;

    fn try_from(raw: UncheckedPerspectiveResponse) -> Result<Self, Self::Error> {
        Self::new(raw.score, raw.reasoning, raw.confidence)
    }
}

impl PerspectiveResponse {
    pub const MIN_SCORE: u8 = 1;
    pub const MAX_SCORE: u8 = 10;

    pub const FALLBACK_SCORE: u8 = 5;
    pub const FALLBACK_REASONING: &'static str = "technical error, neutral score assigned";
    pub const FALLBACK_CONFIDENCE: f64 = 0.1;

    /// Validate and build a response. Confidence above 1 is read as a
    /// ten-point or percentage-like scale and rescaled.
    pub fn new(score: i64, reasoning: impl Into<String>, confidence: f64) -> SharedResult<Self> {
        if score < Self::MIN_SCORE as i64 || score > Self::MAX_SCORE as i64 {
            return Err(SharedError::InvalidScore { score });
        }

        Ok(Self {
            score: score as u8,
            reasoning: reasoning.into(),
            confidence: normalize_confidence(confidence)?,
        })
    }

    /// Neutral response substituted when the selector cannot be reached
    pub fn fallback() -> Self {
        Self {
            score: Self::FALLBACK_SCORE,
            reasoning: Self::FALLBACK_REASONING.to_string(),
            confidence: Self::FALLBACK_CONFIDENCE,
        }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

/// Map a raw oracle confidence onto `[0, 1]`
pub fn normalize_confidence(raw: f64) -> SharedResult<f64> {
    if raw.is_nan() || raw < 0.0 {
        return Err(SharedError::InvalidConfidence { value: raw });
    }
    if raw > 1.0 {
        return Ok((raw / 10.0).min(1.0));
    }
    Ok(raw)
}

/// Verdict produced by a validator oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritiqueResponse {
    pub accepted: bool,
    pub feedback: String,
    #[serde(default)]
    pub issues: Vec<String>,
}

impl CritiqueResponse {
    pub const VALIDATOR_ERROR_TAG: &'static str = "validator_error";

    pub fn accept(feedback: impl Into<String>) -> Self {
        Self {
            accepted: true,
            feedback: feedback.into(),
            issues: Vec::new(),
        }
    }

    pub fn reject(feedback: impl Into<String>, issues: Vec<String>) -> Self {
        Self {
            accepted: false,
            feedback: feedback.into(),
            issues,
        }
    }

    /// Default outcome when the validator itself fails: accept, tagged
    pub fn validator_error() -> Self {
        Self {
            accepted: true,
            feedback: "validation failed due to technical error".to_string(),
            issues: vec![Self::VALIDATOR_ERROR_TAG.to_string()],
        }
    }

    pub fn is_validator_error(&self) -> bool {
        self.issues.iter().any(|issue| issue == Self::VALIDATOR_ERROR_TAG)
    }
}

/// Failure reasons for oracle invocations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OracleFailure {
    /// Authentication failed (missing or invalid API key)
    AuthenticationFailed,
    /// Rate limit exceeded
    RateLimitExceeded,
    /// Invalid request format or parameters
    InvalidRequest(String),
    /// Model not found or unavailable
    ModelUnavailable(String),
    /// Network/connection error
    NetworkError(String),
    /// Server error from the backing service
    ServerError(String),
    /// Request timeout
    Timeout,
    /// Service temporarily unavailable
    ServiceUnavailable,
    /// Output could not be parsed into the expected record
    MalformedOutput(String),
    /// Unknown or unhandled error
    Unknown(String),
}

impl fmt::Display for OracleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleFailure::AuthenticationFailed => write!(f, "authentication failed"),
            OracleFailure::RateLimitExceeded => write!(f, "rate limit exceeded"),
            OracleFailure::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            OracleFailure::ModelUnavailable(model) => write!(f, "model unavailable: {model}"),
            OracleFailure::NetworkError(msg) => write!(f, "network error: {msg}"),
            OracleFailure::ServerError(msg) => write!(f, "server error: {msg}"),
            OracleFailure::Timeout => write!(f, "request timed out"),
            OracleFailure::ServiceUnavailable => write!(f, "service unavailable"),
            OracleFailure::MalformedOutput(msg) => write!(f, "malformed output: {msg}"),
            OracleFailure::Unknown(msg) => write!(f, "unknown error: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_range_is_enforced() {
        assert!(PerspectiveResponse::new(0, "too low", 0.5).is_err());
        assert!(PerspectiveResponse::new(11, "too high", 0.5).is_err());
        assert_eq!(PerspectiveResponse::new(1, "min", 0.5).unwrap().score(), 1);
        assert_eq!(PerspectiveResponse::new(10, "max", 0.5).unwrap().score(), 10);
    }

    #[test]
    fn test_confidence_normalization() {
        assert_eq!(normalize_confidence(0.75).unwrap(), 0.75);
        assert_eq!(normalize_confidence(8.0).unwrap(), 0.8);
        assert_eq!(normalize_confidence(85.0).unwrap(), 1.0);
        assert!(normalize_confidence(-0.1).is_err());
        assert!(normalize_confidence(f64::NAN).is_err());
    }

    #[test]
    fn test_fallback_response_values() {
        let fallback = PerspectiveResponse::fallback();
        assert_eq!(fallback.score(), 5);
        assert_eq!(fallback.confidence(), 0.1);
        assert_eq!(fallback.reasoning(), "technical error, neutral score assigned");
    }

    #[test]
    fn test_deserialization_validates_ranges() {
        let ok: PerspectiveResponse =
            serde_json::from_str(r#"{"score": 7, "reasoning": "grounded", "confidence": 9}"#).unwrap();
        assert_eq!(ok.score(), 7);
        assert_eq!(ok.confidence(), 0.9);

        let out_of_range =
            serde_json::from_str::<PerspectiveResponse>(r#"{"score": 12, "reasoning": "x", "confidence": 0.5}"#);
        assert!(out_of_range.is_err());
    }

    #[test]
    fn test_perspective_parsing() {
        assert_eq!("Cultural".parse::<Perspective>().unwrap(), Perspective::Cultural);
        assert!("spiritual".parse::<Perspective>().is_err());
        assert_eq!(Perspective::Ethical.to_string(), "ethical");
    }

    #[test]
    fn test_validator_error_critique() {
        let critique = CritiqueResponse::validator_error();
        assert!(critique.accepted);
        assert!(critique.is_validator_error());
        assert!(!CritiqueResponse::reject("weak", vec![]).is_validator_error());
    }
}
