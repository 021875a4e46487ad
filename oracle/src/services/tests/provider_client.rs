//! Tests for the HTTP provider client against a mock server

use std::time::Duration;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared::OracleFailure;
use crate::core::ChatMessage;
use crate::services::provider_client::RealProviderClient;
use crate::traits::ProviderClient;
use crate::types::{parse_base_url, OracleMode, OracleRole, OracleSettings};

fn settings(mode: OracleMode, server: &MockServer) -> OracleSettings {
    let mut settings = OracleSettings::for_mode(mode);
    settings.base_url = parse_base_url(&server.uri()).unwrap();
    settings.model = "test-model".to_string();
    settings.request_timeout = Duration::from_secs(5);
    if mode == OracleMode::OpenAi {
        settings.api_key = Some("sk-test".to_string());
    }
    settings
}

fn messages() -> Vec<ChatMessage> {
    vec![ChatMessage::system("system"), ChatMessage::user("assess")]
}

#[tokio::test]
async fn test_ollama_chat_returns_message_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({ "model": "test-model", "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "test-model",
            "message": { "role": "assistant", "content": "{\"score\": 7}" },
            "prompt_eval_count": 120,
            "eval_count": 30
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RealProviderClient::new(settings(OracleMode::Ollama, &server)).unwrap();
    let response = client.complete(OracleRole::Selector, &messages()).await.unwrap();

    assert_eq!(response.content, "{\"score\": 7}");
    assert_eq!(response.tokens_used, 150);
    assert_eq!(response.prompt_tokens, 120);
    assert_eq!(response.model_used, "test-model");
}

#[tokio::test]
async fn test_openai_chat_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "test-model-0613",
            "choices": [{ "message": { "role": "assistant", "content": "{\"is_valid\": true}" } }],
            "usage": { "prompt_tokens": 40, "completion_tokens": 8, "total_tokens": 48 }
        })))
        .mount(&server)
        .await;

    let client = RealProviderClient::new(settings(OracleMode::OpenAi, &server)).unwrap();
    let response = client.complete(OracleRole::Validator, &messages()).await.unwrap();

    assert_eq!(response.content, "{\"is_valid\": true}");
    assert_eq!(response.tokens_used, 48);
    assert_eq!(response.model_used, "test-model-0613");
}

#[tokio::test]
async fn test_status_codes_map_to_failures() {
    let cases = [
        (401, OracleFailure::AuthenticationFailed),
        (404, OracleFailure::ModelUnavailable("test-model".to_string())),
        (429, OracleFailure::RateLimitExceeded),
        (503, OracleFailure::ServiceUnavailable),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let client = RealProviderClient::new(settings(OracleMode::Ollama, &server)).unwrap();
        let failure = client.complete(OracleRole::Selector, &messages()).await.unwrap_err();
        assert_eq!(failure, expected, "status {status}");
    }
}

#[tokio::test]
async fn test_missing_content_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "done": true })))
        .mount(&server)
        .await;

    let client = RealProviderClient::new(settings(OracleMode::Ollama, &server)).unwrap();
    let failure = client.complete(OracleRole::Selector, &messages()).await.unwrap_err();
    assert!(matches!(failure, OracleFailure::MalformedOutput(_)));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let mut slow = settings(OracleMode::Ollama, &server);
    slow.request_timeout = Duration::from_millis(100);
    let client = RealProviderClient::new(slow).unwrap();

    let failure = client.complete(OracleRole::Selector, &messages()).await.unwrap_err();
    assert_eq!(failure, OracleFailure::Timeout);
}

#[test]
fn test_random_mode_has_no_client() {
    assert!(RealProviderClient::new(OracleSettings::for_mode(OracleMode::Random)).is_err());
}
