//! Query term normalization and validation

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Anything outside letters, digits, ampersand and space
static FORBIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9& ]").expect("static pattern is valid"));

/// Trim surrounding whitespace and lowercase the term
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Reject empty terms and terms containing unsupported characters
pub fn validate_query(query: &str) -> Result<()> {
    if query.is_empty() {
        return Err(Error::invalid_query(query, "search term is empty"));
    }

    if let Some(found) = FORBIDDEN.find(query) {
        return Err(Error::invalid_query(
            query,
            format!("unsupported character '{}'", found.as_str()),
        ));
    }

    Ok(())
}
