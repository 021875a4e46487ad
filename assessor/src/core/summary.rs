//! Run-level summary statistics

use std::collections::BTreeMap;

use shared::Perspective;

use crate::config::AssessmentConfig;
use crate::types::{
    AssessmentOverview, ProcessingStatistics, RefugeeAssessment, ScoreStatistics, SummaryRecord,
    ValidationStatistics, ValidationStatus,
};

pub const ASSESSMENT_FRAMEWORK: &str = "Three-perspective Selector-Validator architecture";

const MS_PER_HOUR: f64 = 3_600_000.0;

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator)
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Summarise a completed run
pub fn summarize(
    assessments: &[RefugeeAssessment],
    rejected: usize,
    errored: usize,
    config: &AssessmentConfig,
) -> SummaryRecord {
    let scores: Vec<f64> = assessments.iter().map(|a| a.recommendation_score).collect();
    let times: Vec<f64> = assessments.iter().map(|a| a.total_processing_ms as f64).collect();

    let mut country_recommendations = BTreeMap::new();
    for assessment in assessments {
        *country_recommendations
            .entry(assessment.recommended_country.clone())
            .or_insert(0) += 1;
    }

    let fully_validated = assessments
        .iter()
        .filter(|a| a.validation_status == ValidationStatus::Validated)
        .count();
    let partially_validated = assessments.len() - fully_validated;

    let perspective_weights = Perspective::ALL
        .iter()
        .map(|p| (p.as_str().to_string(), config.weights.weight(*p)))
        .collect();

    SummaryRecord {
        assessment_overview: AssessmentOverview {
            total_individuals_assessed: assessments.len(),
            rejected_individuals: rejected,
            errored_individuals: errored,
            assessment_framework: ASSESSMENT_FRAMEWORK.to_string(),
            perspectives: Perspective::ALL.to_vec(),
            perspective_weights,
            host_countries: config.countries.clone(),
        },
        country_recommendations,
        score_statistics: ScoreStatistics {
            mean_recommendation_score: mean(&scores),
            std_recommendation_score: sample_std(&scores),
            min_score: scores.iter().copied().reduce(f64::min),
            max_score: scores.iter().copied().reduce(f64::max),
        },
        validation_statistics: ValidationStatistics {
            fully_validated,
            partially_validated,
            validation_rate: if assessments.is_empty() {
                None
            } else {
                Some(fully_validated as f64 / assessments.len() as f64)
            },
        },
        processing_statistics: ProcessingStatistics {
            mean_processing_time_ms: mean(&times),
            total_processing_time_hours: times.iter().sum::<f64>() / MS_PER_HOUR,
        },
    }
}
