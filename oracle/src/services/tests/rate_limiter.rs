//! Tests for the shared rate limiter

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::services::rate_limiter::RateLimiter;

#[tokio::test(start_paused = true)]
async fn test_first_call_is_immediate() {
    let limiter = RateLimiter::new(Duration::from_millis(500));
    let start = Instant::now();
    limiter.acquire().await;
    assert!(start.elapsed() < Duration::from_millis(1));
}

#[tokio::test(start_paused = true)]
async fn test_calls_are_spaced() {
    let limiter = RateLimiter::new(Duration::from_millis(500));
    let start = Instant::now();

    limiter.acquire().await;
    limiter.acquire().await;
    limiter.acquire().await;

    assert!(start.elapsed() >= Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_zero_spacing_never_waits() {
    let limiter = RateLimiter::new(Duration::ZERO);
    let start = Instant::now();
    for _ in 0..10 {
        limiter.acquire().await;
    }
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_waiters_share_one_schedule() {
    let limiter = Arc::new(RateLimiter::new(Duration::from_millis(500)));
    let start = Instant::now();

    let waiters: Vec<_> = (0..4)
        .map(|_| {
            let limiter = limiter.clone();
            tokio::spawn(async move {
                limiter.acquire().await;
                Instant::now()
            })
        })
        .collect();

    let mut granted = Vec::new();
    for waiter in waiters {
        granted.push(waiter.await.unwrap());
    }
    granted.sort();

    assert!(granted[3] - start >= Duration::from_millis(1500));
    for pair in granted.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(500));
    }
    assert_eq!(limiter.spacing(), Duration::from_millis(500));
}
