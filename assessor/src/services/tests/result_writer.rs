//! Tests for RealResultWriter and the flat results table

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::fs;

use oracle::{ScriptedSelector, ScriptedValidator};

use crate::config::AssessmentConfig;
use crate::core::features::RawRecord;
use crate::orchestrator::AssessmentOrchestrator;
use crate::reporter::TracingReporter;
use crate::services::result_writer::{
    country_key, render_table, table_header, RealResultWriter, ResultWriter, ASSESSMENTS_FILE, SUMMARY_FILE,
    TABLE_FILE, TRACES_FILE,
};
use crate::types::{RunReport, TraceRecord};

async fn sample_report() -> RunReport {
    let mut config =
        AssessmentConfig::default().with_countries(vec!["United States".to_string(), "Canada".to_string()]);
    config.concurrency.min_call_spacing = Duration::ZERO;
    let selector = ScriptedSelector::constant(7, "s2q15=28 suggests adaptability", 0.8).unwrap();
    let orchestrator = AssessmentOrchestrator::new(
        config,
        Arc::new(selector),
        Arc::new(ScriptedValidator::always_accept()),
        Arc::new(TracingReporter),
    )
    .unwrap();

    orchestrator
        .assess_records(vec![
            RawRecord::new("0")
                .with("s2q15", 28)
                .with("s2q14", "Female")
                .with("s2q16", "Somalia"),
            RawRecord::new("1").with("s2q15", 12).with("s2q14", "Male").with("s2q16", "Sudan"),
        ])
        .await
}

#[test]
fn test_country_key() {
    assert_eq!(country_key("United States"), "united_states");
    assert_eq!(country_key("Canada"), "canada");
}

#[test]
fn test_table_header_layout() {
    let header = table_header(&["United States".to_string()]);

    assert_eq!(&header[..3], &["refugee_id", "profile_string", "total_features"]);
    assert!(header.contains(&"united_states_weighted".to_string()));
    assert!(header.contains(&"cultural_reasoning".to_string()));
    assert!(header.contains(&"ethical_validated".to_string()));
    assert_eq!(header.len(), 8 + 4 + 12);
}

#[tokio::test]
async fn test_render_table_one_row_per_assessment() {
    let report = sample_report().await;
    let table = String::from_utf8(render_table(&report).unwrap()).unwrap();

    let mut reader = csv::Reader::from_reader(table.as_bytes());
    let headers = reader.headers().unwrap().clone();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

    assert_eq!(rows.len(), 1);
    let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
    assert_eq!(&rows[0][column("refugee_id")], "0");
    assert_eq!(
        &rows[0][column("profile_string")],
        "Age: 28; Gender: Female; Country Of Origin: Somalia"
    );
    assert_eq!(&rows[0][column("total_features")], "3");
    assert_eq!(&rows[0][column("united_states_cultural")], "7");
    assert_eq!(&rows[0][column("recommended_country")], "United States");
    assert_eq!(&rows[0][column("recommendation_score")], "7");
    assert_eq!(&rows[0][column("canada_weighted")], "7");
    assert_eq!(&rows[0][column("validation_status")], "validated");
    assert_eq!(&rows[0][column("emotional_reasoning")], "s2q15=28 suggests adaptability");
    assert_eq!(&rows[0][column("ethical_iterations")], "1");
}

#[tokio::test]
async fn test_writer_creates_all_files() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("results");
    let writer = RealResultWriter::new(&output);
    let report = sample_report().await;

    let written = writer.write(&report).await.unwrap();

    assert_eq!(written.len(), 4);
    for name in [ASSESSMENTS_FILE, TRACES_FILE, SUMMARY_FILE, TABLE_FILE] {
        assert!(output.join(name).exists(), "{name} missing");
    }

    let traces: Vec<TraceRecord> =
        serde_json::from_str(&fs::read_to_string(output.join(TRACES_FILE)).await.unwrap()).unwrap();
    assert_eq!(traces.len(), 6);
    assert!(traces.iter().all(|t| t.selector_final_score == 7));

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.join(SUMMARY_FILE)).await.unwrap()).unwrap();
    assert_eq!(summary["assessment_overview"]["total_individuals_assessed"], 1);
    assert_eq!(summary["assessment_overview"]["rejected_individuals"], 1);
    assert_eq!(summary["country_recommendations"]["United States"], 1);
    assert!(summary["score_statistics"]["std_recommendation_score"].is_null());
}
