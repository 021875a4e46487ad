//! Offline oracles for exercising the pipeline without a model server

use std::sync::Mutex;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shared::{CritiqueResponse, OracleFailure, PerspectiveResponse};
use crate::error::{OracleError, OracleResult};
use crate::traits::{Selector, Validator};
use crate::types::{CritiqueRequest, OracleRole};

/// Selector drawing uniform scores; reproducible when seeded
pub struct RandomSelector {
    rng: Mutex<StdRng>,
}

impl RandomSelector {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng: Mutex::new(rng) }
    }
}

#[async_trait]
impl Selector for RandomSelector {
    async fn propose(&self, _context: &str) -> OracleResult<PerspectiveResponse> {
        let (score, confidence) = {
            let mut rng = self.rng.lock().map_err(|_| OracleError::ProviderError {
                role: OracleRole::Selector,
                reason: OracleFailure::Unknown("random generator poisoned".to_string()),
            })?;
            let score: i64 = rng.gen_range(PerspectiveResponse::MIN_SCORE as i64..=PerspectiveResponse::MAX_SCORE as i64);
            let confidence: f64 = rng.gen_range(0.3..=0.9);
            (score, confidence)
        };

        Ok(PerspectiveResponse::new(
            score,
            format!("random score {score} assigned without model reasoning"),
            (confidence * 100.0).round() / 100.0,
        )?)
    }
}

/// Validator that accepts every response
#[derive(Debug, Clone, Default)]
pub struct PermissiveValidator;

#[async_trait]
impl Validator for PermissiveValidator {
    async fn critique(&self, request: &CritiqueRequest) -> OracleResult<CritiqueResponse> {
        Ok(CritiqueResponse::accept(format!(
            "accepted {} score {} without review",
            request.perspective, request.score
        )))
    }
}
