//! HTTP chat completion client for Ollama and OpenAI-compatible services

use std::time::Instant;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use shared::OracleFailure;
use crate::core::ChatMessage;
use crate::error::{OracleError, OracleResult};
use crate::traits::ProviderClient;
use crate::types::{OracleMode, OracleRole, OracleSettings, ProviderResponse};

/// Real provider client backed by `reqwest`
pub struct RealProviderClient {
    client: reqwest::Client,
    settings: OracleSettings,
}

impl RealProviderClient {
    /// Create a client for an LLM mode; random mode has no transport
    pub fn new(settings: OracleSettings) -> OracleResult<Self> {
        if settings.mode == OracleMode::Random {
            return Err(OracleError::config("random mode does not use an HTTP provider"));
        }
        settings.validate()?;

        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| OracleError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &OracleSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> Result<Url, OracleFailure> {
        self.settings
            .base_url
            .join(path)
            .map_err(|e| OracleFailure::InvalidRequest(format!("bad endpoint '{path}': {e}")))
    }

    fn wire_messages(messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|m| json!({ "role": m.role, "content": m.content }))
            .collect()
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, OracleFailure> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                OracleFailure::Timeout
            } else {
                OracleFailure::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                400 => OracleFailure::InvalidRequest(body),
                401 | 403 => OracleFailure::AuthenticationFailed,
                404 => OracleFailure::ModelUnavailable(self.settings.model.clone()),
                429 => OracleFailure::RateLimitExceeded,
                503 => OracleFailure::ServiceUnavailable,
                _ => OracleFailure::ServerError(status.to_string()),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| OracleFailure::MalformedOutput(format!("Failed to parse response: {e}")))
    }

    async fn ollama_chat(&self, messages: &[ChatMessage]) -> Result<ProviderResponse, OracleFailure> {
        let request_start = Instant::now();
        let mut options = json!({
            "temperature": self.settings.temperature,
            "num_predict": self.settings.max_tokens,
        });
        if let Some(seed) = self.settings.seed {
            options["seed"] = json!(seed);
        }

        let body = json!({
            "model": self.settings.model,
            "messages": Self::wire_messages(messages),
            "stream": false,
            "format": "json",
            "options": options,
        });

        let url = self.endpoint("api/chat")?;
        let response_json = self.send(self.client.post(url).json(&body)).await?;
        let response_time = request_start.elapsed();

        let content = response_json
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| OracleFailure::MalformedOutput("No content in response".to_string()))?;

        let prompt_tokens = response_json.get("prompt_eval_count").and_then(Value::as_u64).unwrap_or(0) as u32;
        let completion_tokens = response_json.get("eval_count").and_then(Value::as_u64).unwrap_or(0) as u32;

        Ok(ProviderResponse {
            content: content.to_string(),
            tokens_used: prompt_tokens + completion_tokens,
            prompt_tokens,
            completion_tokens,
            model_used: self.settings.model.clone(),
            response_time,
        })
    }

    async fn openai_chat(&self, messages: &[ChatMessage]) -> Result<ProviderResponse, OracleFailure> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(OracleFailure::AuthenticationFailed)?;

        let request_start = Instant::now();
        let mut body = json!({
            "model": self.settings.model,
            "messages": Self::wire_messages(messages),
            "max_tokens": self.settings.max_tokens,
            "temperature": self.settings.temperature,
            "response_format": { "type": "json_object" },
        });
        if let Some(seed) = self.settings.seed {
            body["seed"] = json!(seed);
        }

        let url = self.endpoint("chat/completions")?;
        let request = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body);
        let response_json = self.send(request).await?;
        let response_time = request_start.elapsed();

        let content = response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| OracleFailure::MalformedOutput("No content in response".to_string()))?;

        let usage = response_json.get("usage");
        let token_count = |key: &str| {
            usage
                .and_then(|u| u.get(key))
                .and_then(Value::as_u64)
                .unwrap_or(0) as u32
        };

        Ok(ProviderResponse {
            content: content.to_string(),
            tokens_used: token_count("total_tokens"),
            prompt_tokens: token_count("prompt_tokens"),
            completion_tokens: token_count("completion_tokens"),
            model_used: response_json
                .get("model")
                .and_then(Value::as_str)
                .unwrap_or(self.settings.model.as_str())
                .to_string(),
            response_time,
        })
    }
}

#[async_trait]
impl ProviderClient for RealProviderClient {
    async fn complete(&self, role: OracleRole, messages: &[ChatMessage]) -> Result<ProviderResponse, OracleFailure> {
        debug!(%role, mode = %self.settings.mode, model = %self.settings.model, "Sending chat request");

        let result = match self.settings.mode {
            OracleMode::Ollama => self.ollama_chat(messages).await,
            OracleMode::OpenAi => self.openai_chat(messages).await,
            OracleMode::Random => Err(OracleFailure::InvalidRequest("random mode has no provider".to_string())),
        };

        if let Err(failure) = &result {
            warn!(%role, %failure, "Provider request failed");
        }
        result
    }
}
