//! Error types for epmc-harvest
//!
//! This module defines the error hierarchy for setup and I/O failures.
//! Failures that end a running search are not errors: they are reported as
//! [`AbortReason`](crate::retry::AbortReason)s in the run summary so the
//! retrieved-record count survives them.

use thiserror::Error;

/// The main error type for epmc-harvest
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// A config field parsed but holds an unusable value
    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue {
        /// Dotted path of the field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Config file is not valid YAML for [`HarvestConfig`](crate::config::HarvestConfig)
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON (de)serialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Query Errors
    // ============================================================================
    /// Search term rejected before any request is sent
    #[error("Invalid search term '{query}': {message}")]
    InvalidQuery {
        /// The normalized term
        query: String,
        /// Why it was rejected
        message: String,
    },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint is not a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response body does not have the search result shape
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// Decoder message
        message: String,
    },

    // ============================================================================
    // Output Errors
    // ============================================================================
    /// Output file could not be opened or encoded
    #[error("Output error: {message}")]
    Output {
        /// Description including the path
        message: String,
    },

    /// CSV encoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook could not be built or saved
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Anything else, usually an error with added context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid query error
    pub fn invalid_query(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }
}

/// Result type alias for epmc-harvest
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
