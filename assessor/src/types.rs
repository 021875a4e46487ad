//! Assessment records produced by the pipeline

use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared::{AssessmentId, CritiqueResponse, IndividualId, Perspective, PerspectiveResponse};

/// One finalized (perspective, country) outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentTrace {
    pub assessment_id: AssessmentId,
    pub perspective: Perspective,
    pub host_country: String,
    pub profile_features: Vec<String>,
    /// Exact context passed to the final selector call
    pub context_used: String,
    pub iterations: u32,
    pub response: PerspectiveResponse,
    pub critique: CritiqueResponse,
    pub is_validated: bool,
    pub lenient_override: bool,
    /// Accepted only because the iteration budget ran out
    pub forced_acceptance: bool,
    pub timestamp: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl AssessmentTrace {
    pub fn score(&self) -> u8 {
        self.response.score()
    }
}

/// Per-perspective scores and their weighted combination for one country
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountryScoreSet {
    pub emotional: u8,
    pub cultural: u8,
    pub ethical: u8,
    pub weighted: f64,
}

impl CountryScoreSet {
    pub fn score(&self, perspective: Perspective) -> u8 {
        match perspective {
            Perspective::Emotional => self.emotional,
            Perspective::Cultural => self.cultural,
            Perspective::Ethical => self.ethical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryScores {
    pub country: String,
    #[serde(flatten)]
    pub scores: CountryScoreSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Validated,
    PartialValidation,
}

impl ValidationStatus {
    pub fn from_traces(traces: &[AssessmentTrace]) -> Self {
        if traces.iter().all(|t| t.is_validated) {
            ValidationStatus::Validated
        } else {
            ValidationStatus::PartialValidation
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Validated => "validated",
            ValidationStatus::PartialValidation => "partial_validation",
        }
    }
}

/// Complete assessment of one individual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefugeeAssessment {
    pub individual_id: IndividualId,
    pub source_row: String,
    pub profile_display: String,
    pub profile_rendered: String,
    pub available_features: Vec<String>,
    /// In configured country order
    pub country_scores: Vec<CountryScores>,
    pub recommended_country: String,
    pub recommendation_score: f64,
    pub traces: Vec<AssessmentTrace>,
    pub assessed_at: DateTime<Utc>,
    pub total_processing_ms: u64,
    pub validation_status: ValidationStatus,
}

impl RefugeeAssessment {
    pub fn scores_for(&self, country: &str) -> Option<&CountryScoreSet> {
        self.country_scores
            .iter()
            .find(|c| c.country == country)
            .map(|c| &c.scores)
    }

    pub fn traces_for<'a>(&'a self, country: &'a str) -> impl Iterator<Item = &'a AssessmentTrace> + 'a {
        self.traces.iter().filter(move |t| t.host_country == country)
    }
}

/// Flat, persisted form of a trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub agent_type: Perspective,
    pub host_country: String,
    pub profile_features: Vec<String>,
    pub prompt_used: String,
    pub selector_iterations: u32,
    pub selector_final_score: u8,
    pub selector_final_reasoning: String,
    pub selector_confidence: f64,
    pub validator_accepted: bool,
    pub validator_feedback: String,
    pub validator_issues: Vec<String>,
    pub is_validated: bool,
    pub lenient_override: bool,
    pub assessment_id: String,
    pub timestamp: String,
    pub processing_time_ms: u64,
}

impl From<&AssessmentTrace> for TraceRecord {
    fn from(trace: &AssessmentTrace) -> Self {
        Self {
            agent_type: trace.perspective,
            host_country: trace.host_country.clone(),
            profile_features: trace.profile_features.clone(),
            prompt_used: trace.context_used.clone(),
            selector_iterations: trace.iterations,
            selector_final_score: trace.response.score(),
            selector_final_reasoning: trace.response.reasoning().to_string(),
            selector_confidence: trace.response.confidence(),
            validator_accepted: trace.critique.accepted,
            validator_feedback: trace.critique.feedback.clone(),
            validator_issues: trace.critique.issues.clone(),
            is_validated: trace.is_validated,
            lenient_override: trace.lenient_override,
            assessment_id: trace.assessment_id.to_string(),
            timestamp: trace.timestamp.to_rfc3339(),
            processing_time_ms: trace.elapsed_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentOverview {
    pub total_individuals_assessed: usize,
    pub rejected_individuals: usize,
    pub errored_individuals: usize,
    pub assessment_framework: String,
    pub perspectives: Vec<Perspective>,
    pub perspective_weights: BTreeMap<String, f64>,
    pub host_countries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub mean_recommendation_score: Option<f64>,
    /// Sample standard deviation; undefined below two assessments
    pub std_recommendation_score: Option<f64>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationStatistics {
    pub fully_validated: usize,
    pub partially_validated: usize,
    pub validation_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStatistics {
    pub mean_processing_time_ms: Option<f64>,
    pub total_processing_time_hours: f64,
}

/// Run-level summary persisted alongside the assessments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub assessment_overview: AssessmentOverview,
    pub country_recommendations: BTreeMap<String, usize>,
    pub score_statistics: ScoreStatistics,
    pub validation_statistics: ValidationStatistics,
    pub processing_statistics: ProcessingStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub row_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFailure {
    pub row_id: String,
    pub message: String,
}

/// Everything a batch run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub total_records: usize,
    pub assessments: Vec<RefugeeAssessment>,
    pub rejected: Vec<RejectedRecord>,
    pub failures: Vec<RowFailure>,
    pub summary: SummaryRecord,
    /// Set when the run stopped on shutdown before every row was processed
    #[serde(default)]
    pub interrupted: bool,
}
