//! Tests for the LLM-backed selector and validator

use std::sync::Arc;
use std::time::Duration;

use shared::{OracleFailure, Perspective};
use crate::error::OracleError;
use crate::services::llm_oracle::{LlmSelector, LlmValidator};
use crate::services::performance_tracker::RealPerformanceTracker;
use crate::traits::{MockProviderClient, PerformanceTracker, Selector, Validator};
use crate::types::{CritiqueRequest, OracleRole, ProviderResponse};

fn reply(content: &str) -> ProviderResponse {
    ProviderResponse {
        content: content.to_string(),
        tokens_used: 42,
        prompt_tokens: 30,
        completion_tokens: 12,
        model_used: "test-model".to_string(),
        response_time: Duration::from_millis(250),
    }
}

fn critique_request() -> CritiqueRequest {
    CritiqueRequest {
        perspective: Perspective::Ethical,
        host_country: "Sweden".to_string(),
        profile: "s2q15=30; s2q14=Male; s2q16=Somalia".to_string(),
        score: 4,
        reasoning: "s9q2_6=No limits legal employment".to_string(),
        available_features: vec!["age".to_string(), "gender".to_string(), "country_of_origin".to_string()],
    }
}

#[tokio::test]
async fn test_selector_parses_reply_and_records_success() {
    let mut client = MockProviderClient::new();
    client
        .expect_complete()
        .withf(|role, messages| *role == OracleRole::Selector && messages[1].content.contains("HOST COUNTRY: Canada"))
        .times(1)
        .returning(|_, _| Ok(reply("Assessment: {\"score\": 8, \"reasoning\": \"s4q7=Secondary\", \"confidence\": 0.7}")));

    let tracker = Arc::new(RealPerformanceTracker::new());
    let selector = LlmSelector::new(Arc::new(client), tracker.clone());

    let response = selector.propose("PROFILE DATA:\ns2q15=28\n\nHOST COUNTRY: Canada").await.unwrap();
    assert_eq!(response.score(), 8);
    assert_eq!(response.confidence(), 0.7);

    let stats = tracker.get_stats().await.unwrap();
    assert_eq!(stats[&OracleRole::Selector].successful_requests, 1);
    assert_eq!(stats[&OracleRole::Selector].total_tokens, 42);
}

#[tokio::test]
async fn test_selector_out_of_range_reply_is_an_error() {
    let mut client = MockProviderClient::new();
    client
        .expect_complete()
        .returning(|_, _| Ok(reply("{\"score\": 14, \"reasoning\": \"too keen\", \"confidence\": 0.9}")));

    let tracker = Arc::new(RealPerformanceTracker::new());
    let selector = LlmSelector::new(Arc::new(client), tracker.clone());

    let error = selector.propose("context").await.unwrap_err();
    assert!(matches!(error, OracleError::SharedError(_)));

    let stats = tracker.get_stats().await.unwrap();
    assert_eq!(stats[&OracleRole::Selector].failed_requests, 1);
    assert_eq!(stats[&OracleRole::Selector].successful_requests, 0);
}

#[tokio::test]
async fn test_selector_transport_failure_is_reported() {
    let mut client = MockProviderClient::new();
    client
        .expect_complete()
        .returning(|_, _| Err(OracleFailure::ServiceUnavailable));

    let selector = LlmSelector::new(Arc::new(client), Arc::new(RealPerformanceTracker::new()));

    match selector.propose("context").await {
        Err(OracleError::ProviderError { role, reason }) => {
            assert_eq!(role, OracleRole::Selector);
            assert_eq!(reason, OracleFailure::ServiceUnavailable);
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_validator_renders_request_and_parses_verdict() {
    let mut client = MockProviderClient::new();
    client
        .expect_complete()
        .withf(|role, messages| {
            *role == OracleRole::Validator
                && messages[1].content.contains("Score: 4/10")
                && messages[1].content.contains("AVAILABLE FIELDS: age, gender, country_of_origin")
        })
        .returning(|_, _| {
            Ok(reply(
                "{\"is_valid\": false, \"feedback\": \"cite s9q2_6 explicitly\", \"issues\": [\"grounding\"]}",
            ))
        });

    let validator = LlmValidator::new(Arc::new(client), Arc::new(RealPerformanceTracker::new()));
    let critique = validator.critique(&critique_request()).await.unwrap();

    assert!(!critique.accepted);
    assert_eq!(critique.feedback, "cite s9q2_6 explicitly");
    assert_eq!(critique.issues, vec!["grounding".to_string()]);
}

#[tokio::test]
async fn test_validator_prose_reply_is_malformed() {
    let mut client = MockProviderClient::new();
    client
        .expect_complete()
        .returning(|_, _| Ok(reply("The assessment looks fine to me.")));

    let validator = LlmValidator::new(Arc::new(client), Arc::new(RealPerformanceTracker::new()));
    let error = validator.critique(&critique_request()).await.unwrap_err();
    assert!(matches!(error, OracleError::MalformedOutput { .. }));
}
