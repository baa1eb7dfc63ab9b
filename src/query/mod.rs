//! Search request module
//!
//! Builds the immutable [`SearchRequest`] handed to the search driver.
//!
//! # Overview
//!
//! Query terms are normalized (trimmed, lowercased) and validated against the
//! character allow-list accepted by the service before a request can exist.
//! The request renders itself into query parameters for a given cursor.

mod normalize;
mod request;

pub use normalize::{normalize_query, validate_query};
pub use request::{
    SearchRequest, SearchRequestBuilder, YearRange, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
