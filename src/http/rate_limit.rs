//! Request pacing
//!
//! Uses the governor crate to keep a minimum interval between consecutive
//! page requests, so a fast run does not saturate the service.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::sync::Arc;
use std::time::Duration;

/// Token bucket allowing one request per interval
#[derive(Clone)]
pub struct Pacer {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
    interval: Duration,
}

impl Pacer {
    /// Create a pacer; `None` when the interval is zero (no pacing)
    pub fn new(interval: Duration) -> Option<Self> {
        let quota = Quota::with_period(interval)?;
        Some(Self {
            limiter: Arc::new(Governor::direct(quota)),
            interval,
        })
    }

    /// Minimum spacing between requests
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next request may be sent
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer")
            .field("interval", &self.interval)
            .finish()
    }
}
