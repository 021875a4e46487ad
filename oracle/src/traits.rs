//! Oracle capability traits for dependency injection

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;

use shared::{CritiqueResponse, OracleFailure, PerspectiveResponse};
use crate::core::ChatMessage;
use crate::error::OracleResult;
use crate::types::{CritiqueRequest, OracleRole, OracleStats, ProviderResponse};

/// Proposes a score and reasoning for a rendered assessment context
#[mockall::automock]
#[async_trait]
pub trait Selector: Send + Sync {
    /// Produce a validated response; malformed model output must surface as an error
    async fn propose(&self, context: &str) -> OracleResult<PerspectiveResponse>;
}

/// Reviews a selector response for grounding and plausibility
#[mockall::automock]
#[async_trait]
pub trait Validator: Send + Sync {
    /// Accept or reject a proposed score with feedback and issue tags
    async fn critique(&self, request: &CritiqueRequest) -> OracleResult<CritiqueResponse>;
}

/// Chat completion transport to the backing model service
#[mockall::automock]
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Send a chat transcript and return the raw completion
    async fn complete(&self, role: OracleRole, messages: &[ChatMessage]) -> Result<ProviderResponse, OracleFailure>;
}

/// Performance tracking trait
#[mockall::automock]
#[async_trait]
pub trait PerformanceTracker: Send + Sync {
    /// Record successful request
    async fn record_success(&self, role: OracleRole, response_time: Duration, tokens: u32) -> OracleResult<()>;

    /// Record failed request
    async fn record_failure(&self, role: OracleRole, failure: OracleFailure) -> OracleResult<()>;

    /// Get per-role statistics
    async fn get_stats(&self) -> OracleResult<HashMap<OracleRole, OracleStats>>;
}

#[async_trait]
impl<T: Selector + ?Sized> Selector for Arc<T> {
    async fn propose(&self, context: &str) -> OracleResult<PerspectiveResponse> {
        (**self).propose(context).await
    }
}

#[async_trait]
impl<T: Selector + ?Sized> Selector for Box<T> {
    async fn propose(&self, context: &str) -> OracleResult<PerspectiveResponse> {
        (**self).propose(context).await
    }
}

#[async_trait]
impl<T: Validator + ?Sized> Validator for Arc<T> {
    async fn critique(&self, request: &CritiqueRequest) -> OracleResult<CritiqueResponse> {
        (**self).critique(request).await
    }
}

#[async_trait]
impl<T: Validator + ?Sized> Validator for Box<T> {
    async fn critique(&self, request: &CritiqueRequest) -> OracleResult<CritiqueResponse> {
        (**self).critique(request).await
    }
}
