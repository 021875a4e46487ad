//! Tests for CsvDatasetLoader

use crate::core::features::{FeatureCatalog, FeatureValue};
use crate::core::profile::{ProfileValidator, RejectionReason};
use crate::error::AssessorError;
use crate::services::dataset::CsvDatasetLoader;
use super::common::csv_file;

const SURVEY: &str = "\
hhid,s2q15,s2q14,s2q16,hhsize,s4q7
H-001,28,Female,Somalia,5,
H-002,34.5, Male ,South Sudan,NaN,Primary
H-003,12,Female,Somalia,3,None
";

#[test]
fn test_load_parses_cells() {
    let file = csv_file(SURVEY);
    let rows = CsvDatasetLoader::new(file.path()).load().unwrap();

    assert_eq!(rows.len(), 3);
    let first = rows[0].as_ref().unwrap();
    assert_eq!(first.row_id, "0");
    assert_eq!(first.value("s2q15"), Some(&FeatureValue::Integer(28)));
    assert_eq!(first.value("s2q14"), Some(&FeatureValue::Text("Female".to_string())));
    assert_eq!(first.value("s4q7"), None);

    let second = rows[1].as_ref().unwrap();
    assert_eq!(second.value("s2q15"), Some(&FeatureValue::Float(34.5)));
    assert_eq!(second.value("s2q14"), Some(&FeatureValue::Text("Male".to_string())));
    assert_eq!(second.value("hhsize"), None);
}

#[test]
fn test_id_column_names_rows() {
    let file = csv_file(SURVEY);
    let rows = CsvDatasetLoader::new(file.path())
        .with_id_column("hhid")
        .load()
        .unwrap();

    let ids: Vec<&str> = rows.iter().map(|r| r.as_ref().unwrap().row_id.as_str()).collect();
    assert_eq!(ids, vec!["H-001", "H-002", "H-003"]);
}

#[test]
fn test_unknown_id_column_is_configuration_error() {
    let file = csv_file(SURVEY);
    let result = CsvDatasetLoader::new(file.path()).with_id_column("missing").load();

    assert!(matches!(result, Err(AssessorError::ConfigurationError { .. })));
}

#[test]
fn test_sample_size_limits_rows() {
    let file = csv_file(SURVEY);
    let rows = CsvDatasetLoader::new(file.path()).with_sample_size(2).load().unwrap();

    assert_eq!(rows.len(), 2);
}

#[test]
fn test_malformed_row_is_reported_in_place() {
    let data = "s2q15,s2q14,s2q16\n28,Female,Somalia\n30,Male\n41,Female,Eritrea\n";
    let rows = CsvDatasetLoader::new("unused.csv")
        .load_from_reader(data.as_bytes())
        .unwrap();

    assert_eq!(rows.len(), 3);
    assert!(rows[0].is_ok());
    match &rows[1] {
        Err(AssessorError::RowProcessing { row, message }) => {
            assert_eq!(row, "1");
            assert!(message.contains("malformed CSV row"));
        }
        other => panic!("expected row error, got {other:?}"),
    }
    assert_eq!(rows[2].as_ref().unwrap().row_id, "2");
}

#[test]
fn test_na_tokens_load_as_missing() {
    let data = "s2q15,s2q14,s2q16,s4q7\n28,NA,Somalia,None\n31,Male,N/A,#N/A\n";
    let rows = CsvDatasetLoader::new("unused.csv")
        .load_from_reader(data.as_bytes())
        .unwrap();

    let first = rows[0].as_ref().unwrap();
    assert_eq!(first.value("s2q14"), None);
    assert_eq!(first.value("s4q7"), None);
    assert_eq!(rows[1].as_ref().unwrap().value("s2q16"), None);

    let catalog = FeatureCatalog::survey();
    let rejection = ProfileValidator::default()
        .validate(catalog.extract(first))
        .unwrap_err();
    assert_eq!(
        rejection,
        RejectionReason::MissingCoreFeatures {
            missing: vec!["gender".to_string()]
        }
    );
}

#[test]
fn test_missing_file_fails() {
    let result = CsvDatasetLoader::new("/nonexistent/survey.csv").load();

    assert!(matches!(result, Err(AssessorError::Dataset(_))));
}
