//! Result persistence
//!
//! A run is written as four files in the output directory:
//! `assessments.json`, `assessment_traces.json`, `assessment_summary.json`
//! and the flat `refugee_assessments.csv` table.

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use serde::Serialize;
use tokio::fs;
use tracing::info;

use shared::Perspective;

use crate::error::{AssessorError, AssessorResult};
use crate::types::{RefugeeAssessment, RunReport, TraceRecord};

pub const ASSESSMENTS_FILE: &str = "assessments.json";
pub const TRACES_FILE: &str = "assessment_traces.json";
pub const SUMMARY_FILE: &str = "assessment_summary.json";
pub const TABLE_FILE: &str = "refugee_assessments.csv";

/// Persists the outcome of a run
#[mockall::automock]
#[async_trait]
pub trait ResultWriter: Send + Sync {
    /// Write every output file and return their paths
    async fn write(&self, report: &RunReport) -> AssessorResult<Vec<PathBuf>>;
}

/// Writes results to a directory on disk
#[derive(Debug, Clone)]
pub struct RealResultWriter {
    output_dir: PathBuf,
}

impl RealResultWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> AssessorResult<PathBuf> {
        let path = self.output_dir.join(name);
        let content = serde_json::to_string_pretty(value)?;
        fs::write(&path, content).await?;
        info!(path = %path.display(), "Saved {}", name);
        Ok(path)
    }
}

#[async_trait]
impl ResultWriter for RealResultWriter {
    async fn write(&self, report: &RunReport) -> AssessorResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir).await?;

        let traces: Vec<TraceRecord> = report
            .assessments
            .iter()
            .flat_map(|a| a.traces.iter().map(TraceRecord::from))
            .collect();

        let mut written = vec![
            self.write_json(ASSESSMENTS_FILE, &report.assessments).await?,
            self.write_json(TRACES_FILE, &traces).await?,
            self.write_json(SUMMARY_FILE, &report.summary).await?,
        ];

        let table_path = self.output_dir.join(TABLE_FILE);
        fs::write(&table_path, render_table(report)?).await?;
        info!(path = %table_path.display(), rows = report.assessments.len(), "Saved {}", TABLE_FILE);
        written.push(table_path);

        Ok(written)
    }
}

/// Column-name form of a country: lowercase with spaces as underscores
pub fn country_key(country: &str) -> String {
    country.to_lowercase().replace(' ', "_")
}

/// Header of the flat results table for the given countries
pub fn table_header(countries: &[String]) -> Vec<String> {
    let mut header: Vec<String> = [
        "refugee_id",
        "profile_string",
        "total_features",
        "recommended_country",
        "recommendation_score",
        "validation_status",
        "processing_time_ms",
        "assessment_timestamp",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();

    for country in countries {
        let key = country_key(country);
        for suffix in ["emotional", "cultural", "ethical", "weighted"] {
            header.push(format!("{key}_{suffix}"));
        }
    }

    for perspective in Perspective::ALL {
        for suffix in ["reasoning", "confidence", "iterations", "validated"] {
            header.push(format!("{perspective}_{suffix}"));
        }
    }

    header
}

fn table_row(assessment: &RefugeeAssessment, countries: &[String]) -> Vec<String> {
    let mut row = vec![
        assessment.source_row.clone(),
        assessment.profile_display.clone(),
        assessment.available_features.len().to_string(),
        assessment.recommended_country.clone(),
        assessment.recommendation_score.to_string(),
        assessment.validation_status.as_str().to_string(),
        assessment.total_processing_ms.to_string(),
        assessment.assessed_at.to_rfc3339(),
    ];

    for country in countries {
        match assessment.scores_for(country) {
            Some(scores) => {
                row.extend(Perspective::ALL.iter().map(|p| scores.score(*p).to_string()));
                row.push(scores.weighted.to_string());
            }
            None => row.extend(std::iter::repeat(String::new()).take(4)),
        }
    }

    for perspective in Perspective::ALL {
        let trace = assessment
            .traces_for(&assessment.recommended_country)
            .find(|t| t.perspective == perspective);
        match trace {
            Some(trace) => row.extend([
                trace.response.reasoning().to_string(),
                trace.response.confidence().to_string(),
                trace.iterations.to_string(),
                trace.is_validated.to_string(),
            ]),
            None => row.extend(std::iter::repeat(String::new()).take(4)),
        }
    }

    row
}

/// Render the flat results table as CSV
pub fn render_table(report: &RunReport) -> AssessorResult<Vec<u8>> {
    let countries = &report.summary.assessment_overview.host_countries;
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(table_header(countries))?;
    for assessment in &report.assessments {
        writer.write_record(table_row(assessment, countries))?;
    }

    writer
        .into_inner()
        .map_err(|e| AssessorError::IoError(e.into_error()))
}
