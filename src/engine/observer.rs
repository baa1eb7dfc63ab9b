//! Run observer
//!
//! The driver reports progress through an injected [`SearchObserver`] rather
//! than logging on its own. [`TracingObserver`] forwards everything to
//! `tracing`.

use super::types::SearchSummary;
use crate::error::Error;
use crate::retry::AbortReason;
use crate::types::Cursor;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

/// Receives progress events from a search run. All methods default to no-ops.
pub trait SearchObserver: Send + Sync {
    /// A request is about to be sent
    fn on_request(&self, _cursor: &Cursor, _attempt: usize) {}

    /// A page was decoded
    fn on_page(&self, _page: usize, _records: usize, _next: Option<&Cursor>) {}

    /// A batch reached the sink
    fn on_batch_written(&self, _rows: usize, _path: &Path) {}

    /// The service asked us to wait
    fn on_rate_limited(&self, _wait: Duration) {}

    /// A transient failure triggered a backoff
    fn on_backoff(&self, _failures: u32, _delay: Duration) {}

    /// Writing or closing the sink failed
    fn on_sink_error(&self, _error: &Error) {}

    /// The run is stopping early
    fn on_abort(&self, _reason: &AbortReason) {}

    /// The run reached a terminal state
    fn on_finish(&self, _summary: &SearchSummary) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Observer emitting `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn on_request(&self, cursor: &Cursor, attempt: usize) {
        info!(cursor = %cursor, attempt, "Sending request to API");
    }

    fn on_page(&self, page: usize, records: usize, next: Option<&Cursor>) {
        if records == 0 {
            info!(page, "No records found in page");
        } else {
            info!(page, records, has_more = next.is_some(), "Processing results");
        }
    }

    fn on_batch_written(&self, rows: usize, path: &Path) {
        info!(rows, path = %path.display(), "Results saved");
    }

    fn on_rate_limited(&self, wait: Duration) {
        warn!(wait_secs = wait.as_secs(), "Rate limit exceeded, waiting before retrying");
    }

    fn on_backoff(&self, failures: u32, delay: Duration) {
        warn!(failures, delay_secs = delay.as_secs(), "Connection error, backing off");
    }

    fn on_sink_error(&self, error: &Error) {
        error!(%error, "Failed to write output");
    }

    fn on_abort(&self, reason: &AbortReason) {
        match reason {
            AbortReason::UserInterrupt => warn!("Process interrupted by the user"),
            AbortReason::MaxRetriesExceeded {
                failures,
                last_error,
            } => error!(failures, %last_error, "Maximum number of retries reached, aborting"),
            other => error!(reason = %other, "Search aborted"),
        }
    }

    fn on_finish(&self, summary: &SearchSummary) {
        info!(
            records = summary.records_retrieved,
            pages = summary.pages_fetched,
            attempts = summary.attempts,
            duration_ms = summary.duration.as_millis() as u64,
            outcome = %summary.outcome,
            "Search completed"
        );
    }
}
