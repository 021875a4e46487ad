//! Performance tracking implementation

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use shared::OracleFailure;
use crate::error::OracleResult;
use crate::traits::PerformanceTracker;
use crate::types::{OracleRole, OracleStats};

/// Real performance tracker with in-memory statistics
#[derive(Clone, Default)]
pub struct RealPerformanceTracker {
    stats: Arc<RwLock<HashMap<OracleRole, OracleStats>>>,
}

impl RealPerformanceTracker {
    /// Create new performance tracker
    pub fn new() -> Self {
        Self::default()
    }
}

fn unix_now() -> Option<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}

#[async_trait]
impl PerformanceTracker for RealPerformanceTracker {
    async fn record_success(&self, role: OracleRole, response_time: Duration, tokens: u32) -> OracleResult<()> {
        let mut stats = self.stats.write().await;
        let role_stats = stats.entry(role).or_default();

        role_stats.total_requests += 1;
        role_stats.successful_requests += 1;
        role_stats.total_response_time_ms += response_time.as_millis() as u64;
        role_stats.total_tokens += u64::from(tokens);
        role_stats.last_used = unix_now();

        debug!(%role, response_ms = response_time.as_millis() as u64, tokens, "Recorded oracle success");
        Ok(())
    }

    async fn record_failure(&self, role: OracleRole, failure: OracleFailure) -> OracleResult<()> {
        let mut stats = self.stats.write().await;
        let role_stats = stats.entry(role).or_default();

        role_stats.total_requests += 1;
        role_stats.failed_requests += 1;
        role_stats.last_used = unix_now();

        debug!(%role, %failure, "Recorded oracle failure");
        Ok(())
    }

    async fn get_stats(&self) -> OracleResult<HashMap<OracleRole, OracleStats>> {
        let stats = self.stats.read().await;
        Ok(stats.clone())
    }
}
