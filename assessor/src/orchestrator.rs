//! Assessment orchestrator
//!
//! Drives every record through extraction, profile validation, the
//! (country x perspective) assessor grid and aggregation. Oracles and the
//! event reporter are injected so the whole pipeline runs against scripted
//! oracles in tests.

use std::any::Any;
use std::future::{self, Future};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use futures_util::FutureExt;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use oracle::{Selector, Validator};
use shared::{logging, IndividualId};

use crate::config::AssessmentConfig;
use crate::core::{
    country_scores, recommend, summarize, FeatureCatalog, PerspectiveAssessor, PerspectiveDescriptor, Profile,
    ProfileValidator, RawRecord, RejectionReason,
};
use crate::error::{AssessorError, AssessorResult};
use crate::reporter::Reporter;
use crate::types::{AssessmentTrace, RefugeeAssessment, RejectedRecord, RowFailure, RunReport, ValidationStatus};

const COMPONENT: &str = "assessor";

/// Result of running one record through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Assessed(Box<RefugeeAssessment>),
    Rejected { row_id: String, reason: RejectionReason },
}

/// Coordinates the per-individual pipeline and batch runs
pub struct AssessmentOrchestrator {
    config: AssessmentConfig,
    catalog: FeatureCatalog,
    profile_validator: ProfileValidator,
    descriptors: Vec<PerspectiveDescriptor>,
    assessor: PerspectiveAssessor,
    reporter: Arc<dyn Reporter>,
}

impl AssessmentOrchestrator {
    /// Create an orchestrator; fails if the configuration is unusable
    pub fn new(
        config: AssessmentConfig,
        selector: Arc<dyn Selector>,
        validator: Arc<dyn Validator>,
        reporter: Arc<dyn Reporter>,
    ) -> AssessorResult<Self> {
        config.validate()?;

        Ok(Self {
            catalog: FeatureCatalog::survey(),
            profile_validator: ProfileValidator::new(config.profile_rules.clone()),
            descriptors: PerspectiveDescriptor::all(&config.weights),
            assessor: PerspectiveAssessor::new(selector, validator, &config),
            reporter,
            config,
        })
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Assess one individual; `None` when the profile is rejected
    pub async fn assess_individual(&self, record: &RawRecord) -> AssessorResult<Option<RefugeeAssessment>> {
        match self.process_record(record).await? {
            RecordOutcome::Assessed(assessment) => Ok(Some(*assessment)),
            RecordOutcome::Rejected { .. } => Ok(None),
        }
    }

    /// Run one record and report what happened to it
    pub async fn process_record(&self, record: &RawRecord) -> AssessorResult<RecordOutcome> {
        let started = Instant::now();
        let features = self.catalog.extract(record);
        let feature_names = features.names();

        let profile = match self.profile_validator.validate(features) {
            Ok(profile) => profile,
            Err(reason) => {
                self.reporter.profile_rejected(&record.row_id, &reason, &feature_names);
                return Ok(RecordOutcome::Rejected {
                    row_id: record.row_id.clone(),
                    reason,
                });
            }
        };

        debug!(row = %record.row_id, features = profile.feature_count(), "Profile accepted: {}", profile.display());

        let traces = self.run_assessors(&profile).await;
        for trace in &traces {
            self.reporter.trace_finalized(trace);
        }

        let assessment = self.assemble(record, &profile, traces, started)?;
        self.reporter.assessment_completed(&assessment);
        Ok(RecordOutcome::Assessed(Box::new(assessment)))
    }

    /// Run every (country, perspective) pair in country-major order
    async fn run_assessors(&self, profile: &Profile) -> Vec<AssessmentTrace> {
        let jobs: Vec<(&str, &PerspectiveDescriptor)> = self
            .config
            .countries
            .iter()
            .flat_map(|country| self.descriptors.iter().map(move |d| (country.as_str(), d)))
            .collect();

        stream::iter(jobs)
            .map(|(country, descriptor)| self.assessor.assess(descriptor, profile, country))
            .buffered(self.config.concurrency.max_in_flight.max(1))
            .collect()
            .await
    }

    fn assemble(
        &self,
        record: &RawRecord,
        profile: &Profile,
        traces: Vec<AssessmentTrace>,
        started: Instant,
    ) -> AssessorResult<RefugeeAssessment> {
        let scores = self
            .config
            .countries
            .iter()
            .map(|country| {
                country_scores(country, &traces, &self.config.weights).ok_or_else(|| {
                    AssessorError::row(&record.row_id, format!("incomplete perspective scores for {country}"))
                })
            })
            .collect::<AssessorResult<Vec<_>>>()?;

        let (recommended_country, recommendation_score) = recommend(&scores)
            .map(|(country, score)| (country.to_string(), score))
            .ok_or_else(|| AssessorError::row(&record.row_id, "no host country scores"))?;

        Ok(RefugeeAssessment {
            individual_id: IndividualId::new(),
            source_row: record.row_id.clone(),
            profile_display: profile.display().to_string(),
            profile_rendered: profile.rendered().to_string(),
            available_features: profile.feature_names(),
            country_scores: scores,
            recommended_country,
            recommendation_score,
            validation_status: ValidationStatus::from_traces(&traces),
            traces,
            assessed_at: Utc::now(),
            total_processing_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Assess already-parsed records
    pub async fn assess_records(&self, records: Vec<RawRecord>) -> RunReport {
        self.assess_dataset(records.into_iter().map(Ok).collect()).await
    }

    /// Assess a dataset whose rows may have failed to load
    ///
    /// Row errors are logged with the row identifier and counted; they never
    /// stop the run. Results keep input order.
    pub async fn assess_dataset(&self, rows: Vec<AssessorResult<RawRecord>>) -> RunReport {
        self.assess_dataset_until(rows, future::pending::<()>()).await
    }

    /// Like `assess_dataset`, but stops taking rows once `shutdown` resolves
    ///
    /// Rows finished before the signal are kept and the report is marked
    /// interrupted.
    pub async fn assess_dataset_until<S>(&self, rows: Vec<AssessorResult<RawRecord>>, shutdown: S) -> RunReport
    where
        S: Future<Output = ()>,
    {
        let total = rows.len();
        let interval = self.config.progress_interval.max(1);
        info!(
            total,
            countries = self.config.countries.len(),
            call_spacing_ms = self.assessor.call_spacing().as_millis() as u64,
            "Starting dataset assessment"
        );

        let mut outcomes = stream::iter(rows.into_iter().enumerate())
            .map(|(index, row)| async move {
                match row {
                    Ok(record) => (index, self.process_isolated(&record).await),
                    Err(e) => (index, Err(e)),
                }
            })
            .buffered(self.config.concurrency.individual_concurrency.max(1));
        tokio::pin!(shutdown);

        let mut assessments = Vec::new();
        let mut rejected = Vec::new();
        let mut failures = Vec::new();
        let mut processed = 0;
        let mut interrupted = false;

        loop {
            let (index, outcome) = tokio::select! {
                next = outcomes.next() => match next {
                    Some(next) => next,
                    None => break,
                },
                _ = &mut shutdown => {
                    warn!(processed, total, "Shutdown requested, keeping finished rows");
                    interrupted = true;
                    break;
                }
            };

            match outcome {
                Ok(RecordOutcome::Assessed(assessment)) => assessments.push(*assessment),
                Ok(RecordOutcome::Rejected { row_id, reason }) => rejected.push(RejectedRecord {
                    row_id,
                    reason: reason.to_string(),
                }),
                Err(e) => {
                    let failure = row_failure(index, e);
                    self.reporter.row_failed(&failure.row_id, &failure.message);
                    failures.push(failure);
                }
            }

            processed += 1;
            if processed % interval == 0 {
                self.reporter.progress(processed, total, assessments.len());
            }
        }

        let summary = summarize(&assessments, rejected.len(), failures.len(), &self.config);
        logging::log_success(
            COMPONENT,
            &format!(
                "Assessed {} of {} records ({} rejected, {} errored)",
                assessments.len(),
                total,
                rejected.len(),
                failures.len()
            ),
        );

        RunReport {
            total_records: total,
            assessments,
            rejected,
            failures,
            summary,
            interrupted,
        }
    }

    /// Run one record, turning a panic anywhere below it into a row error
    async fn process_isolated(&self, record: &RawRecord) -> AssessorResult<RecordOutcome> {
        match AssertUnwindSafe(self.process_record(record)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => Err(AssessorError::row(
                &record.row_id,
                format!("processing panicked: {}", panic_message(panic.as_ref())),
            )),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

fn row_failure(index: usize, error: AssessorError) -> RowFailure {
    match error {
        AssessorError::RowProcessing { row, message } => RowFailure { row_id: row, message },
        other => RowFailure {
            row_id: index.to_string(),
            message: other.to_string(),
        },
    }
}
