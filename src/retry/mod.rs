//! Retry policy module
//!
//! Centralizes every retry, wait and abort decision of a search run.
//!
//! # Overview
//!
//! The page fetcher only classifies what happened on the wire. The
//! [`RetryPolicy`] turns that [`FetchOutcome`](crate::http::FetchOutcome)
//! into an [`Action`] for the driver:
//!
//! - **Success** decodes into a page and resets the failure streak
//! - **Rate limited** waits as instructed by the server, without limit
//! - **Transient failure** backs off exponentially, up to `max_retries`
//! - **Fatal failure** aborts immediately

mod policy;
mod types;

pub use policy::{RetryConfig, RetryPolicy};
pub use types::{AbortReason, Action, RetryState};

#[cfg(test)]
mod tests;
