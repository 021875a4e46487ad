//! Common test utilities and infrastructure
//!
//! Shared fixtures and the orchestrator builder used by the integration
//! suites.

#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::OrchestratorBuilder;
