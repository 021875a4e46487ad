//! Oracle services implementations

pub mod llm_oracle;
pub mod performance_tracker;
pub mod provider_client;
pub mod random;
pub mod rate_limiter;
pub mod scripted;

#[cfg(test)]
pub mod tests;

pub use llm_oracle::*;
pub use performance_tracker::*;
pub use provider_client::*;
pub use random::*;
pub use rate_limiter::*;
pub use scripted::*;
