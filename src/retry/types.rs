//! Retry decision types

use crate::decode::Page;
use std::fmt;
use std::time::Duration;

/// What the driver should do after a fetch
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Process this page
    Proceed(Page),
    /// Server asked us to slow down; wait, then resubmit the same cursor
    WaitThenRetry(Duration),
    /// Connectivity problem; back off, then resubmit the same cursor
    BackoffThenRetry(Duration),
    /// Stop the run
    Abort(AbortReason),
}

/// Why a run stopped before the last page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// Too many consecutive transient failures
    MaxRetriesExceeded {
        /// Failures in the final streak
        failures: u32,
        /// Description of the last failure
        last_error: String,
    },
    /// The service answered with a status that is never retried
    NonRetryableStatus(u16),
    /// The response body did not have the expected shape
    MalformedResponse(String),
    /// Cancelled from outside (Ctrl-C)
    UserInterrupt,
    /// Writing or closing the output failed
    SinkFailure(String),
}

impl AbortReason {
    /// Check if the run was cancelled by the user
    pub fn is_user_interrupt(&self) -> bool {
        matches!(self, Self::UserInterrupt)
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxRetriesExceeded { .. } => f.write_str("max retries exceeded"),
            Self::NonRetryableStatus(status) => write!(f, "non-retryable HTTP status {status}"),
            Self::MalformedResponse(message) => write!(f, "malformed response: {message}"),
            Self::UserInterrupt => f.write_str("user interrupt"),
            Self::SinkFailure(message) => write!(f, "sink failure: {message}"),
        }
    }
}

/// Per-run counters owned by the driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    /// Transient failures since the last success
    pub consecutive_failures: u32,
    /// Records in all successfully decoded pages
    pub records_retrieved: u64,
}

impl RetryState {
    /// Fresh counters for a new run
    pub fn new() -> Self {
        Self::default()
    }
}
