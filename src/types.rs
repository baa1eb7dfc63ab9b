//! Common types used throughout epmc-harvest
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// One search result entry, exactly as returned by the service
pub type Record = JsonObject;

// ============================================================================
// Cursor
// ============================================================================

/// Sentinel cursor value meaning "first page"
pub const START_CURSOR: &str = "*";

/// Opaque pagination token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// The cursor for the first page
    pub fn start() -> Self {
        Self(START_CURSOR.to_string())
    }

    /// Wrap a token returned by the service.
    ///
    /// Absent or empty tokens mean there are no further pages.
    pub fn next(token: Option<String>) -> Option<Self> {
        token.none_if_empty().map(Self)
    }

    /// Borrow the raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Open Access Filter
// ============================================================================

/// Open-access filter value (`isOpenAccess=Y|N`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum OpenAccess {
    /// Only open-access articles
    #[serde(rename = "Y")]
    #[value(name = "Y")]
    Yes,
    /// Only non-open-access articles
    #[serde(rename = "N")]
    #[value(name = "N")]
    No,
}

impl OpenAccess {
    /// Query parameter value
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Yes => "Y",
            Self::No => "N",
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_start() {
        let cursor = Cursor::start();
        assert_eq!(cursor.as_str(), START_CURSOR);
        assert_eq!(cursor.as_str(), "*");
        assert_eq!(cursor.to_string(), "*");
    }

    #[test]
    fn test_cursor_next() {
        assert_eq!(
            Cursor::next(Some("AoE/abc".to_string())).map(|c| c.as_str().to_string()),
            Some("AoE/abc".to_string())
        );
        assert_eq!(Cursor::next(Some(String::new())), None);
        assert_eq!(Cursor::next(None), None);
    }

    #[test]
    fn test_open_access_param() {
        assert_eq!(OpenAccess::Yes.as_param(), "Y");
        assert_eq!(OpenAccess::No.as_param(), "N");

        let parsed: OpenAccess = serde_json::from_str("\"N\"").unwrap();
        assert_eq!(parsed, OpenAccess::No);
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("test".to_string()).none_if_empty(),
            Some("test".to_string())
        );
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
        assert_eq!("test".to_string().none_if_empty(), Some("test".to_string()));
        assert_eq!(String::new().none_if_empty(), None);
    }
}
