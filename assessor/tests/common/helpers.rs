//! Builder for orchestrators wired to scripted oracles

use std::sync::Arc;
use std::time::Duration;

use assessor::{AssessmentConfig, AssessmentOrchestrator, Reporter, TracingReporter};
use oracle::{ScriptedValidator, Selector, Validator};
use super::fixtures::TestFixtures;

/// Builder pattern for creating test orchestrators with sensible defaults
pub struct OrchestratorBuilder {
    config: AssessmentConfig,
    selector: Arc<dyn Selector>,
    validator: Arc<dyn Validator>,
    reporter: Arc<dyn Reporter>,
}

impl OrchestratorBuilder {
    /// Two host countries, no call spacing, a constant selector and an
    /// accepting validator
    pub fn new() -> Self {
        let mut config = AssessmentConfig::default()
            .with_countries(TestFixtures::countries(&[TestFixtures::COUNTRY_A, TestFixtures::COUNTRY_B]));
        config.concurrency.min_call_spacing = Duration::ZERO;

        Self {
            config,
            selector: TestFixtures::constant(5),
            validator: Arc::new(ScriptedValidator::always_accept()),
            reporter: Arc::new(TracingReporter),
        }
    }

    pub fn with_countries(mut self, names: &[&str]) -> Self {
        self.config = self.config.with_countries(TestFixtures::countries(names));
        self
    }

    /// Adjust the configuration in place
    pub fn with_config<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut AssessmentConfig),
    {
        setup(&mut self.config);
        self
    }

    pub fn with_selector(mut self, selector: Arc<dyn Selector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn build(self) -> AssessmentOrchestrator {
        AssessmentOrchestrator::new(self.config, self.selector, self.validator, self.reporter)
            .expect("valid test configuration")
    }
}
