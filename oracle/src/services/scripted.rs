//! Scripted oracles that replay a fixed sequence of outcomes
//!
//! Each call consumes the next step; once the script is exhausted the last
//! step repeats. Every input is recorded so callers can inspect what the
//! oracle was asked.

use std::sync::{Arc, Mutex};
use async_trait::async_trait;

use shared::{CritiqueResponse, OracleFailure, PerspectiveResponse};
use crate::error::{OracleError, OracleResult};
use crate::traits::{Selector, Validator};
use crate::types::{CritiqueRequest, OracleRole};

/// One scripted outcome
#[derive(Debug, Clone)]
pub enum Step<T> {
    Respond(T),
    Fail(OracleFailure),
    /// Never resolves; exercises caller timeouts
    Hang,
}

#[derive(Debug)]
struct Script<T> {
    steps: Vec<Step<T>>,
    cursor: usize,
}

impl<T: Clone> Script<T> {
    fn new(steps: Vec<Step<T>>) -> Self {
        Self { steps, cursor: 0 }
    }

    fn next(&mut self) -> Option<Step<T>> {
        let index = self.cursor.min(self.steps.len().checked_sub(1)?);
        self.cursor += 1;
        self.steps.get(index).cloned()
    }
}

async fn play<T>(step: Option<Step<T>>, role: OracleRole) -> OracleResult<T> {
    match step {
        Some(Step::Respond(value)) => Ok(value),
        Some(Step::Fail(reason)) => Err(OracleError::ProviderError { role, reason }),
        Some(Step::Hang) => std::future::pending().await,
        None => Err(OracleError::ProviderError {
            role,
            reason: OracleFailure::Unknown("empty script".to_string()),
        }),
    }
}

/// Selector replaying scripted responses
#[derive(Debug)]
pub struct ScriptedSelector {
    script: Mutex<Script<PerspectiveResponse>>,
    contexts: Mutex<Vec<String>>,
}

impl ScriptedSelector {
    pub fn new(steps: Vec<Step<PerspectiveResponse>>) -> Self {
        Self {
            script: Mutex::new(Script::new(steps)),
            contexts: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with the same score
    pub fn constant(score: i64, reasoning: &str, confidence: f64) -> OracleResult<Self> {
        let response = PerspectiveResponse::new(score, reasoning, confidence)?;
        Ok(Self::new(vec![Step::Respond(response)]))
    }

    /// Contexts received so far, in call order
    pub fn contexts(&self) -> Vec<String> {
        self.contexts.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.contexts.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Selector for ScriptedSelector {
    async fn propose(&self, context: &str) -> OracleResult<PerspectiveResponse> {
        if let Ok(mut contexts) = self.contexts.lock() {
            contexts.push(context.to_string());
        }
        let step = self.script.lock().ok().and_then(|mut script| script.next());
        play(step, OracleRole::Selector).await
    }
}

/// Validator replaying scripted verdicts
#[derive(Debug)]
pub struct ScriptedValidator {
    script: Mutex<Script<CritiqueResponse>>,
    requests: Mutex<Vec<CritiqueRequest>>,
}

impl ScriptedValidator {
    pub fn new(steps: Vec<Step<CritiqueResponse>>) -> Self {
        Self {
            script: Mutex::new(Script::new(steps)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always_accept() -> Self {
        Self::new(vec![Step::Respond(CritiqueResponse::accept("grounded in the profile"))])
    }

    pub fn always_reject(feedback: &str) -> Self {
        Self::new(vec![Step::Respond(CritiqueResponse::reject(
            feedback,
            vec!["insufficient_grounding".to_string()],
        ))])
    }

    pub fn requests(&self) -> Vec<CritiqueRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Validator for ScriptedValidator {
    async fn critique(&self, request: &CritiqueRequest) -> OracleResult<CritiqueResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let step = self.script.lock().ok().and_then(|mut script| script.next());
        play(step, OracleRole::Validator).await
    }
}

/// Selector dispatching to the first route whose markers all occur in the context
pub struct RoutedSelector {
    routes: Vec<(Vec<String>, Arc<dyn Selector>)>,
    fallback: Arc<dyn Selector>,
}

impl RoutedSelector {
    pub fn new(fallback: Arc<dyn Selector>) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
        }
    }

    pub fn route(mut self, markers: &[&str], selector: Arc<dyn Selector>) -> Self {
        let markers = markers.iter().map(|m| m.to_string()).collect();
        self.routes.push((markers, selector));
        self
    }
}

#[async_trait]
impl Selector for RoutedSelector {
    async fn propose(&self, context: &str) -> OracleResult<PerspectiveResponse> {
        let target = self
            .routes
            .iter()
            .find(|(markers, _)| markers.iter().all(|m| context.contains(m.as_str())))
            .map(|(_, selector)| selector)
            .unwrap_or(&self.fallback);

        target.propose(context).await
    }
}
