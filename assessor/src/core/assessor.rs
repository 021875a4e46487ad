//! Selector/validator refinement for one (perspective, country) pair
//!
//! Each iteration runs PROPOSE (selector call on the current context) and
//! CRITIQUE (validator call on the proposal). An accepted critique ends the
//! run; a rejection carries its feedback into the next PROPOSE. The final
//! iteration is accepted unconditionally and marked unvalidated if the
//! critique disagreed. Oracle failures never escape: a failed selector call
//! yields the neutral fallback response and a failed validator call yields a
//! tagged default acceptance. The call timeout starts once the shared rate
//! limiter has granted a slot.

use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

use oracle::{CritiqueRequest, RateLimiter, Selector, Validator};
use shared::{AssessmentId, CritiqueResponse, PerspectiveResponse};

use crate::config::{AssessmentConfig, LenientPolicy};
use crate::core::context::{base_context, FeedbackContext};
use crate::core::perspective::PerspectiveDescriptor;
use crate::core::profile::Profile;
use crate::types::AssessmentTrace;

/// Runs the propose/critique cycle with a fixed oracle pair and limits
#[derive(Clone)]
pub struct PerspectiveAssessor {
    selector: Arc<dyn Selector>,
    validator: Arc<dyn Validator>,
    limiter: Arc<RateLimiter>,
    max_iterations: u32,
    max_context_chars: usize,
    lenient: LenientPolicy,
    oracle_timeout: Duration,
}

impl PerspectiveAssessor {
    pub fn new(selector: Arc<dyn Selector>, validator: Arc<dyn Validator>, config: &AssessmentConfig) -> Self {
        Self {
            selector,
            validator,
            limiter: Arc::new(RateLimiter::new(config.concurrency.min_call_spacing)),
            max_iterations: config.max_iterations.max(1),
            max_context_chars: config.max_context_chars,
            lenient: config.lenient.clone(),
            oracle_timeout: config.oracle_timeout,
        }
    }

    /// Minimum gap this assessor keeps between oracle calls
    pub fn call_spacing(&self) -> Duration {
        self.limiter.spacing()
    }

    /// Assess one profile for one country from one perspective
    pub async fn assess(
        &self,
        descriptor: &PerspectiveDescriptor,
        profile: &Profile,
        host_country: &str,
    ) -> AssessmentTrace {
        let started = Instant::now();
        let perspective = descriptor.perspective;
        let features = profile.feature_names();
        let mut context = FeedbackContext::new(
            base_context(descriptor.focus, profile.rendered(), host_country, &features),
            self.max_context_chars,
        );

        let mut iteration = 0;
        loop {
            iteration += 1;
            debug!(%perspective, country = host_country, iteration, "Perspective iteration");

            let rendered = context.render();
            let response = self.propose(&rendered, descriptor).await;

            let request = CritiqueRequest {
                perspective,
                host_country: host_country.to_string(),
                profile: profile.rendered().to_string(),
                score: response.score(),
                reasoning: response.reasoning().to_string(),
                available_features: features.clone(),
            };
            let mut critique = self.critique(&request).await;

            let lenient_override = !critique.accepted && self.lenient.applies(response.score(), features.len());
            if lenient_override {
                info!(%perspective, country = host_country, score = response.score(), "Applying lenient validation override");
                critique.accepted = true;
                critique.feedback.push_str(&self.lenient.marker);
            }

            if critique.accepted || iteration >= self.max_iterations {
                let forced_acceptance = !critique.accepted;
                if forced_acceptance {
                    warn!(%perspective, country = host_country, iteration, "Iteration budget exhausted, accepting unvalidated response");
                }

                return AssessmentTrace {
                    assessment_id: AssessmentId::new(),
                    perspective,
                    host_country: host_country.to_string(),
                    profile_features: features,
                    context_used: rendered,
                    iterations: iteration,
                    response,
                    is_validated: critique.accepted,
                    critique,
                    lenient_override,
                    forced_acceptance,
                    timestamp: Utc::now(),
                    elapsed_ms: started.elapsed().as_millis() as u64,
                };
            }

            context.push_feedback(critique.feedback);
        }
    }

    async fn propose(&self, context: &str, descriptor: &PerspectiveDescriptor) -> PerspectiveResponse {
        self.limiter.acquire().await;
        match timeout(self.oracle_timeout, self.selector.propose(context)).await {
            Ok(Ok(response)) => {
                debug!(
                    perspective = %descriptor.perspective,
                    score = response.score(),
                    confidence = response.confidence(),
                    "Selector proposal"
                );
                response
            }
            Ok(Err(e)) => {
                warn!(perspective = %descriptor.perspective, error = %e, "Selector failed, using fallback response");
                PerspectiveResponse::fallback()
            }
            Err(_) => {
                warn!(
                    perspective = %descriptor.perspective,
                    timeout_ms = self.oracle_timeout.as_millis() as u64,
                    "Selector timed out, using fallback response"
                );
                PerspectiveResponse::fallback()
            }
        }
    }

    async fn critique(&self, request: &CritiqueRequest) -> CritiqueResponse {
        self.limiter.acquire().await;
        match timeout(self.oracle_timeout, self.validator.critique(request)).await {
            Ok(Ok(critique)) => critique,
            Ok(Err(e)) => {
                warn!(perspective = %request.perspective, error = %e, "Validator failed, accepting by default");
                CritiqueResponse::validator_error()
            }
            Err(_) => {
                warn!(perspective = %request.perspective, "Validator timed out, accepting by default");
                CritiqueResponse::validator_error()
            }
        }
    }
}
