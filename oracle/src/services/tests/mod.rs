//! Tests for oracle services
//!
//! These cover the HTTP client against a mock server, the LLM oracles with a
//! mocked transport, the scripted and random stand-ins, rate limiting and
//! performance tracking.

pub mod llm_oracle;
pub mod provider_client;
pub mod rate_limiter;
