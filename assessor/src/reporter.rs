//! Pipeline event reporting

use tracing::{debug, info, warn};

use shared::logging;
use crate::core::profile::RejectionReason;
use crate::types::{AssessmentTrace, RefugeeAssessment};

const COMPONENT: &str = "assessor";

/// Receives pipeline events as they happen
#[mockall::automock]
pub trait Reporter: Send + Sync {
    fn profile_rejected(&self, row_id: &str, reason: &RejectionReason, feature_names: &[String]);

    fn row_failed(&self, row_id: &str, error: &str);

    fn trace_finalized(&self, trace: &AssessmentTrace);

    fn assessment_completed(&self, assessment: &RefugeeAssessment);

    fn progress(&self, processed: usize, total: usize, valid: usize);
}

/// Reporter writing events to `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn profile_rejected(&self, row_id: &str, reason: &RejectionReason, feature_names: &[String]) {
        warn!(row = row_id, %reason, "Profile rejected");
        warn!(
            row = row_id,
            count = feature_names.len(),
            "Available fields: {}",
            feature_names.join(", ")
        );
    }

    fn row_failed(&self, row_id: &str, error: &str) {
        logging::log_error(COMPONENT, &format!("Row {row_id}"), &error);
    }

    fn trace_finalized(&self, trace: &AssessmentTrace) {
        debug!(
            perspective = %trace.perspective,
            country = %trace.host_country,
            score = trace.score(),
            iterations = trace.iterations,
            validated = trace.is_validated,
            lenient = trace.lenient_override,
            elapsed_ms = trace.elapsed_ms,
            "Perspective assessment finalized"
        );
    }

    fn assessment_completed(&self, assessment: &RefugeeAssessment) {
        info!(
            individual = %assessment.individual_id,
            row = %assessment.source_row,
            status = assessment.validation_status.as_str(),
            "Assessment complete: {} ({:.1}/10)",
            assessment.recommended_country,
            assessment.recommendation_score
        );
    }

    fn progress(&self, processed: usize, total: usize, valid: usize) {
        let percent = if total == 0 {
            100.0
        } else {
            processed as f64 / total as f64 * 100.0
        };
        logging::log_progress(
            COMPONENT,
            "Progress",
            &format!("{processed}/{total} ({percent:.1}%), valid assessments: {valid}"),
        );
    }
}
