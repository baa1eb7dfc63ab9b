//! Retry policy implementation

use super::types::{AbortReason, Action, RetryState};
use crate::decode::decode_page;
use crate::error::Error;
use crate::http::FetchOutcome;
use std::time::Duration;
use tracing::debug;

/// Policy constants for retrying
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Transient failures tolerated in a row before aborting
    pub max_retries: u32,
    /// Backoff after the n-th consecutive failure is `backoff_base^n` seconds
    pub backoff_base: u32,
    /// Upper bound for a single backoff
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: 2,
            max_backoff: Duration::from_secs(300),
        }
    }
}

impl RetryConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max retries
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the exponential backoff base
    #[must_use]
    pub fn with_backoff_base(mut self, base: u32) -> Self {
        self.backoff_base = base;
        self
    }

    /// Set the backoff cap
    #[must_use]
    pub fn with_max_backoff(mut self, max: Duration) -> Self {
        self.max_backoff = max;
        self
    }
}

/// Turns fetch outcomes into driver actions
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a policy from config
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Get the config
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Decide what to do with one fetch outcome, updating the run counters
    pub fn decide(&self, outcome: FetchOutcome, state: &mut RetryState) -> Action {
        match outcome {
            FetchOutcome::Success(body) => match decode_page(&body) {
                Ok(page) => {
                    state.consecutive_failures = 0;
                    state.records_retrieved += page.len() as u64;
                    Action::Proceed(page)
                }
                Err(Error::MalformedResponse { message }) => {
                    Action::Abort(AbortReason::MalformedResponse(message))
                }
                Err(e) => Action::Abort(AbortReason::MalformedResponse(e.to_string())),
            },
            FetchOutcome::RateLimited { retry_after_secs } => {
                Action::WaitThenRetry(Duration::from_secs(retry_after_secs))
            }
            FetchOutcome::TransientFailure(cause) => {
                state.consecutive_failures += 1;
                if state.consecutive_failures > self.config.max_retries {
                    return Action::Abort(AbortReason::MaxRetriesExceeded {
                        failures: state.consecutive_failures,
                        last_error: cause,
                    });
                }
                let delay = self.backoff(state.consecutive_failures);
                debug!(
                    failures = state.consecutive_failures,
                    delay_secs = delay.as_secs(),
                    "Scheduling backoff"
                );
                Action::BackoffThenRetry(delay)
            }
            FetchOutcome::FatalFailure { status } => {
                Action::Abort(AbortReason::NonRetryableStatus(status))
            }
        }
    }

    /// Backoff delay after `failures` consecutive transient failures
    pub fn backoff(&self, failures: u32) -> Duration {
        let secs = u64::from(self.config.backoff_base).saturating_pow(failures);
        std::cmp::min(Duration::from_secs(secs), self.config.max_backoff)
    }
}
