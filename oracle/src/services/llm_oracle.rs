//! Selector and validator oracles backed by a chat completion provider

use std::sync::Arc;
use async_trait::async_trait;
use tracing::{debug, info};

use shared::{CritiqueResponse, OracleFailure, PerspectiveResponse};
use crate::core::{parse_selector_reply, parse_validator_reply, ChatMessage, PromptHandler};
use crate::error::{OracleError, OracleResult};
use crate::traits::{PerformanceTracker, ProviderClient, Selector, Validator};
use crate::types::{CritiqueRequest, OracleRole};

/// Send a transcript and parse the reply, recording one outcome per call
async fn exchange<T>(
    client: &dyn ProviderClient,
    tracker: &dyn PerformanceTracker,
    role: OracleRole,
    messages: &[ChatMessage],
    parse: impl FnOnce(&str) -> OracleResult<T>,
) -> OracleResult<T> {
    let reply = match client.complete(role, messages).await {
        Ok(reply) => reply,
        Err(reason) => {
            tracker.record_failure(role, reason.clone()).await?;
            return Err(OracleError::ProviderError { role, reason });
        }
    };

    match parse(&reply.content) {
        Ok(parsed) => {
            tracker
                .record_success(role, reply.response_time, reply.tokens_used)
                .await?;
            Ok(parsed)
        }
        Err(e) => {
            debug!(%role, content = %reply.content, "Unparseable oracle reply");
            tracker
                .record_failure(role, OracleFailure::MalformedOutput(e.to_string()))
                .await?;
            Err(e)
        }
    }
}

/// Selector that asks the model for a JSON score record
pub struct LlmSelector {
    client: Arc<dyn ProviderClient>,
    tracker: Arc<dyn PerformanceTracker>,
    prompts: PromptHandler,
}

impl LlmSelector {
    pub fn new(client: Arc<dyn ProviderClient>, tracker: Arc<dyn PerformanceTracker>) -> Self {
        Self {
            client,
            tracker,
            prompts: PromptHandler::new(),
        }
    }
}

#[async_trait]
impl Selector for LlmSelector {
    async fn propose(&self, context: &str) -> OracleResult<PerspectiveResponse> {
        let messages = self.prompts.selector_messages(context);
        let response = exchange(
            self.client.as_ref(),
            self.tracker.as_ref(),
            OracleRole::Selector,
            &messages,
            parse_selector_reply,
        )
        .await?;

        info!(
            score = response.score(),
            confidence = response.confidence(),
            "Selector responded"
        );
        Ok(response)
    }
}

/// Validator that asks the model for a JSON verdict
pub struct LlmValidator {
    client: Arc<dyn ProviderClient>,
    tracker: Arc<dyn PerformanceTracker>,
    prompts: PromptHandler,
}

impl LlmValidator {
    pub fn new(client: Arc<dyn ProviderClient>, tracker: Arc<dyn PerformanceTracker>) -> Self {
        Self {
            client,
            tracker,
            prompts: PromptHandler::new(),
        }
    }
}

#[async_trait]
impl Validator for LlmValidator {
    async fn critique(&self, request: &CritiqueRequest) -> OracleResult<CritiqueResponse> {
        let messages = self.prompts.validator_messages(request);
        let critique = exchange(
            self.client.as_ref(),
            self.tracker.as_ref(),
            OracleRole::Validator,
            &messages,
            parse_validator_reply,
        )
        .await?;

        info!(
            perspective = %request.perspective,
            accepted = critique.accepted,
            issues = critique.issues.len(),
            "Validator responded"
        );
        Ok(critique)
    }
}
