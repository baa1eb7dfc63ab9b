//! Execution engine module
//!
//! The pagination loop that drives a search run.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SearchDriver` - owns the cursor, counters and sink for one run
//! - `CancelToken` - cooperative cancellation racing every wait
//! - `SearchObserver` - injected progress reporting
//! - `SearchSummary` - the report emitted on every terminal state
//!
//! The loop is strictly sequential: page N+1 needs the cursor from page N,
//! so exactly one request is outstanding at any time and batches reach the
//! sink in retrieval order.

mod cancel;
mod observer;
mod types;

pub use cancel::CancelToken;
pub use observer::{NoopObserver, SearchObserver, TracingObserver};
pub use types::{DriverState, RunOutcome, SearchSummary};

use crate::error::Result;
use crate::http::{Pacer, PageFetcher};
use crate::output::{OutputConfig, RecordSink};
use crate::query::SearchRequest;
use crate::retry::{AbortReason, Action, RetryPolicy, RetryState};
use crate::types::{Cursor, Record};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

/// Drives one search from the start cursor to a terminal state
pub struct SearchDriver {
    /// Page fetcher
    fetcher: Box<dyn PageFetcher>,
    /// Retry decisions
    policy: RetryPolicy,
    /// Where batches go
    output: OutputConfig,
    /// Optional spacing between requests
    pacer: Option<Pacer>,
    /// Progress reporting
    observer: Arc<dyn SearchObserver>,
    /// Current state
    state: DriverState,
}

impl SearchDriver {
    /// Create a driver with the default policy, no pacing and no reporting
    pub fn new(fetcher: Box<dyn PageFetcher>, output: OutputConfig) -> Self {
        Self {
            fetcher,
            policy: RetryPolicy::default(),
            output,
            pacer: None,
            observer: Arc::new(NoopObserver),
            state: DriverState::Idle,
        }
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Space requests with a pacer
    #[must_use]
    pub fn with_pacer(mut self, pacer: Option<Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Set the observer
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SearchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Current state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Run the search to completion, abort or cancellation.
    ///
    /// Always returns a summary; the sink is closed on every exit path and
    /// whatever was written stays written.
    pub async fn run(&mut self, request: &SearchRequest, cancel: &CancelToken) -> SearchSummary {
        let started_at = Utc::now();
        let clock = Instant::now();

        let mut retry_state = RetryState::new();
        let mut cursor = Cursor::start();
        let mut sink: Option<Box<dyn RecordSink>> = None;
        let mut records_retrieved: u64 = 0;
        let mut pages_fetched = 0;
        let mut attempts = 0;

        self.state = DriverState::Idle;

        let mut outcome = loop {
            if cancel.is_cancelled() {
                break RunOutcome::Aborted(AbortReason::UserInterrupt);
            }
            if let Some(pacer) = &self.pacer {
                if cancel.run_until_cancelled(pacer.wait()).await.is_none() {
                    break RunOutcome::Aborted(AbortReason::UserInterrupt);
                }
            }

            self.state = DriverState::Fetching;
            attempts += 1;
            self.observer.on_request(&cursor, attempts);
            let fetched = self.fetcher.fetch(request, &cursor).await;

            match self.policy.decide(fetched, &mut retry_state) {
                Action::Proceed(page) => {
                    self.state = DriverState::Processing;
                    self.observer
                        .on_page(pages_fetched + 1, page.len(), page.next_cursor.as_ref());

                    if !page.is_empty() {
                        if let Err(e) = self.write_batch(&mut sink, &page.records) {
                            self.observer.on_sink_error(&e);
                            break RunOutcome::Aborted(AbortReason::SinkFailure(e.to_string()));
                        }
                    }
                    pages_fetched += 1;
                    records_retrieved += page.len() as u64;

                    match page.next_cursor {
                        Some(next) => cursor = next,
                        None => break RunOutcome::Done,
                    }
                }
                Action::WaitThenRetry(wait) => {
                    self.state = DriverState::Waiting;
                    self.observer.on_rate_limited(wait);
                    if !cancel.sleep(wait).await {
                        break RunOutcome::Aborted(AbortReason::UserInterrupt);
                    }
                }
                Action::BackoffThenRetry(delay) => {
                    self.state = DriverState::Waiting;
                    self.observer
                        .on_backoff(retry_state.consecutive_failures, delay);
                    if !cancel.sleep(delay).await {
                        break RunOutcome::Aborted(AbortReason::UserInterrupt);
                    }
                }
                Action::Abort(reason) => break RunOutcome::Aborted(reason),
            }
        };

        let output = sink.as_ref().map(|s| s.path().to_path_buf());
        if let Some(sink) = sink.take() {
            if let Err(e) = sink.close() {
                self.observer.on_sink_error(&e);
                if outcome == RunOutcome::Done {
                    outcome = RunOutcome::Aborted(AbortReason::SinkFailure(e.to_string()));
                }
            }
        }

        self.state = match outcome {
            RunOutcome::Done => DriverState::Done,
            RunOutcome::Aborted(ref reason) => {
                self.observer.on_abort(reason);
                DriverState::Aborted
            }
        };

        let summary = SearchSummary {
            outcome,
            records_retrieved,
            pages_fetched,
            attempts,
            output,
            started_at,
            duration: clock.elapsed(),
        };
        self.observer.on_finish(&summary);
        summary
    }

    /// Open the sink on first use and write one whole batch
    fn write_batch(
        &self,
        sink: &mut Option<Box<dyn RecordSink>>,
        records: &[Record],
    ) -> Result<()> {
        if sink.is_none() {
            *sink = Some(self.output.open()?);
        }
        if let Some(sink) = sink.as_mut() {
            let rows = sink.write_batch(records)?;
            self.observer.on_batch_written(rows, sink.path());
        }
        Ok(())
    }
}

impl std::fmt::Debug for SearchDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchDriver")
            .field("policy", &self.policy)
            .field("output", &self.output)
            .field("pacer", &self.pacer)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
