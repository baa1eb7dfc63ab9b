//! Response decoder module
//!
//! Turns a raw search response body into a [`Page`].
//!
//! # Overview
//!
//! The service answers with
//! `{ "resultList": { "result": [...] }, "nextCursorMark": "..." }`.
//! A body that does not have this shape is a malformed response.

mod page;

pub use page::{decode_page, Page};

#[cfg(test)]
mod tests;
