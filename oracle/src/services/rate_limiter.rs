//! Minimum spacing between oracle calls shared across all assessors
//!
//! Callers acquire a slot before starting the oracle call, so time spent
//! queued here is never charged to the call's own timeout.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Grants call slots no closer together than `spacing`
#[derive(Debug)]
pub struct RateLimiter {
    spacing: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last_call: Mutex::new(None),
        }
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Wait for the next free slot. Waiters are served in lock order.
    pub async fn acquire(&self) {
        if self.spacing.is_zero() {
            return;
        }

        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            let ready_at = previous + self.spacing;
            if ready_at > Instant::now() {
                trace!(wait_ms = (ready_at - Instant::now()).as_millis() as u64, "Rate limiting oracle call");
                sleep_until(ready_at).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}
