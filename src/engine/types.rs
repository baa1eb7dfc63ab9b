//! Engine types
//!
//! Driver states, run configuration and the final summary.

use crate::retry::AbortReason;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Where the driver is in its pagination loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    /// Not started
    #[default]
    Idle,
    /// A request is in flight
    Fetching,
    /// A page is being written
    Processing,
    /// Sleeping before a retry
    Waiting,
    /// Last page processed
    Done,
    /// Stopped early
    Aborted,
}

impl DriverState {
    /// Check if no further transitions will happen
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every page was retrieved
    Done,
    /// The run stopped early
    Aborted(AbortReason),
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => f.write_str("done"),
            Self::Aborted(reason) => write!(f, "aborted: {reason}"),
        }
    }
}

/// Final report of a run, emitted on every terminal state
#[derive(Debug, Clone)]
pub struct SearchSummary {
    /// How the run ended
    pub outcome: RunOutcome,
    /// Records in pages that were fully processed
    pub records_retrieved: u64,
    /// Pages fully processed
    pub pages_fetched: usize,
    /// Requests sent, including retries
    pub attempts: usize,
    /// Output file, if anything was written
    pub output: Option<PathBuf>,
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Run duration
    pub duration: Duration,
}

impl SearchSummary {
    /// Check if every page was retrieved
    pub fn is_done(&self) -> bool {
        matches!(self.outcome, RunOutcome::Done)
    }

    /// Reason for stopping early, if any
    pub fn abort_reason(&self) -> Option<&AbortReason> {
        match &self.outcome {
            RunOutcome::Done => None,
            RunOutcome::Aborted(reason) => Some(reason),
        }
    }

    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match &self.outcome {
            RunOutcome::Done => 0,
            RunOutcome::Aborted(reason) if reason.is_user_interrupt() => 130,
            RunOutcome::Aborted(_) => 1,
        }
    }
}
