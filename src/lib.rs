// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # epmc-harvest
//!
//! Bulk retrieval of Europe PMC search results.
//!
//! A search term and optional filters are sent to the Europe PMC REST search
//! endpoint; every page of results is followed through the service's cursor
//! and written to CSV, JSON or XLSX as it arrives.
//!
//! ## Features
//!
//! - **Cursor Pagination**: Follows `nextCursorMark` until the service stops returning one
//! - **Rate Limit Aware**: Honors `429` with `Retry-After`, without counting it as a failure
//! - **Bounded Retries**: Exponential backoff for connection errors and timeouts
//! - **Incremental Output**: Each page is persisted before the next is requested
//! - **Cancellable**: Ctrl-C stops the run at the next wait or request boundary
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use epmc_harvest::engine::{CancelToken, SearchDriver, TracingObserver};
//! use epmc_harvest::http::HttpPageFetcher;
//! use epmc_harvest::output::{OutputConfig, OutputFormat};
//! use epmc_harvest::query::SearchRequest;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> epmc_harvest::Result<()> {
//!     let request = SearchRequest::builder("malaria")
//!         .years(Some(2010), Some(2021))
//!         .build()?;
//!
//!     let mut driver = SearchDriver::new(
//!         Box::new(HttpPageFetcher::new()?),
//!         OutputConfig::new(OutputFormat::Csv),
//!     )
//!     .with_observer(Arc::new(TracingObserver));
//!
//!     let summary = driver.run(&request, &CancelToken::new()).await;
//!     println!("{} records", summary.records_retrieved);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        SearchDriver                          │
//! │  Idle → Fetching → Processing → (Waiting) → Done | Aborted   │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────┬──────────────┬───┴──────────┬──────────┬──────────┐
//! │  Query   │     HTTP     │    Retry     │  Decode  │  Output  │
//! ├──────────┼──────────────┼──────────────┼──────────┼──────────┤
//! │ Normalize│ GET + cursor │ 429 wait     │ Page     │ CSV      │
//! │ Validate │ Classify     │ Backoff      │ Cursor   │ JSON     │
//! │ Filters  │ Pacing       │ Abort        │          │ XLSX     │
//! └──────────┴──────────────┴──────────────┴──────────┴──────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Search term handling and request parameters
pub mod query;

/// Response decoding
pub mod decode;

/// CSV, JSON and XLSX sinks
pub mod output;

/// Retry and abort decisions
pub mod retry;

/// HTTP page fetching and pacing
pub mod http;

/// Pagination driver
pub mod engine;

/// YAML configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::HarvestConfig;
pub use engine::{CancelToken, SearchDriver, SearchSummary};
pub use query::SearchRequest;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
