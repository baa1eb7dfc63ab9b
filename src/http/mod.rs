//! HTTP module
//!
//! Performs single page request/response cycles against the search service.
//!
//! # Features
//!
//! - **Outcome Classification**: 200, 429, other statuses and transport
//!   errors map onto [`FetchOutcome`]; no retrying happens here
//! - **Retry-After**: advisory header parsed on 429 with a configurable default
//! - **Pacing**: token bucket spacing between consecutive requests using governor

mod client;
mod rate_limit;

pub use client::{
    FetchOutcome, HttpFetcherConfig, HttpFetcherConfigBuilder, HttpPageFetcher, PageFetcher,
    EUROPE_PMC_SEARCH_URL,
};
pub use rate_limit::Pacer;
