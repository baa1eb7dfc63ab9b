//! Harvest configuration
//!
//! Policy constants for a run, loaded from an optional YAML file. Every field
//! has a default so an empty document (or no file at all) is valid; CLI
//! flags are applied on top by the runner.
//!
//! ```yaml
//! http:
//!   base_url: https://www.ebi.ac.uk/europepmc/webservices/rest/search
//!   timeout_secs: 60
//!   page_delay_ms: 2000
//! retry:
//!   max_retries: 3
//!   backoff_base: 2
//!   max_backoff_secs: 300
//!   default_retry_after_secs: 60
//! output:
//!   mode: accumulate
//! ```

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpFetcherConfig, Pacer, EUROPE_PMC_SEARCH_URL};
use crate::output::BatchMode;
use crate::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete harvest configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarvestConfig {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSection,

    /// Retry and backoff settings
    #[serde(default)]
    pub retry: RetrySection,

    /// Output settings
    #[serde(default)]
    pub output: OutputSection,
}

impl HarvestConfig {
    /// Load and validate a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document, treat it as all defaults
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse but cannot drive a run
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.http.base_url).map_err(|e| {
            Error::invalid_value("http.base_url", format!("'{}': {e}", self.http.base_url))
        })?;

        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "http.timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.retry.backoff_base == 0 {
            return Err(Error::invalid_value(
                "retry.backoff_base",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Fetcher settings derived from the `http` and `retry` sections
    pub fn fetcher_config(&self) -> HttpFetcherConfig {
        let mut builder = HttpFetcherConfig::builder()
            .base_url(&self.http.base_url)
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .default_retry_after(Duration::from_secs(self.retry.default_retry_after_secs));
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }

    /// Retry policy constants
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .with_max_retries(self.retry.max_retries)
            .with_backoff_base(self.retry.backoff_base)
            .with_max_backoff(Duration::from_secs(self.retry.max_backoff_secs))
    }

    /// Request pacer, if a page delay is configured
    pub fn pacer(&self) -> Option<Pacer> {
        Pacer::new(Duration::from_millis(self.http.page_delay_ms))
    }

    /// Batch mode for document and spreadsheet output
    pub fn batch_mode(&self) -> BatchMode {
        self.output.mode
    }
}

// ============================================================================
// HTTP Section
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    /// Search endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Minimum spacing between page requests in milliseconds (0 disables)
    #[serde(default = "default_page_delay")]
    pub page_delay_ms: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            user_agent: None,
            page_delay_ms: default_page_delay(),
        }
    }
}

fn default_base_url() -> String {
    EUROPE_PMC_SEARCH_URL.to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_page_delay() -> u64 {
    2000
}

// ============================================================================
// Retry Section
// ============================================================================

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Consecutive transient failures tolerated before aborting
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Exponential backoff base in seconds
    #[serde(default = "default_backoff_base")]
    pub backoff_base: u32,

    /// Cap on a single backoff in seconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,

    /// Wait after a 429 without a usable `Retry-After`
    #[serde(default = "default_retry_after")]
    pub default_retry_after_secs: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_base: default_backoff_base(),
            max_backoff_secs: default_max_backoff(),
            default_retry_after_secs: default_retry_after(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base() -> u32 {
    2
}

fn default_max_backoff() -> u64 {
    300
}

fn default_retry_after() -> u64 {
    60
}

// ============================================================================
// Output Section
// ============================================================================

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Batch handling for JSON and XLSX
    #[serde(default)]
    pub mode: BatchMode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = HarvestConfig::from_yaml_str("").unwrap();
        assert_eq!(config, HarvestConfig::default());
        assert_eq!(config.http.base_url, EUROPE_PMC_SEARCH_URL);
        assert_eq!(config.http.page_delay_ms, 2000);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.backoff_base, 2);
        assert_eq!(config.output.mode, BatchMode::Accumulate);
    }

    #[test]
    fn test_partial_override() {
        let yaml = r"
retry:
  max_retries: 5
output:
  mode: per_batch
";
        let config = HarvestConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.backoff_base, 2);
        assert_eq!(config.http.timeout_secs, 60);
        assert_eq!(config.batch_mode(), BatchMode::PerBatch);
    }

    #[test]
    fn test_conversions() {
        let yaml = r"
http:
  base_url: http://localhost:8080/search
  timeout_secs: 5
  user_agent: harvest-test
  page_delay_ms: 0
retry:
  backoff_base: 3
  max_backoff_secs: 30
  default_retry_after_secs: 10
";
        let config = HarvestConfig::from_yaml_str(yaml).unwrap();

        let fetcher = config.fetcher_config();
        assert_eq!(fetcher.base_url, "http://localhost:8080/search");
        assert_eq!(fetcher.timeout, Duration::from_secs(5));
        assert_eq!(fetcher.default_retry_after, Duration::from_secs(10));
        assert_eq!(fetcher.user_agent, "harvest-test");

        let retry = config.retry_config();
        assert_eq!(retry.backoff_base, 3);
        assert_eq!(retry.max_backoff, Duration::from_secs(30));

        assert!(config.pacer().is_none());
    }

    #[test]
    fn test_default_pacer_interval() {
        let pacer = HarvestConfig::default().pacer().unwrap();
        assert_eq!(pacer.interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_rejects_zero_backoff_base() {
        let result = HarvestConfig::from_yaml_str("retry:\n  backoff_base: 0\n");
        assert!(matches!(
            result,
            Err(Error::InvalidConfigValue { ref field, .. }) if field == "retry.backoff_base"
        ));
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = HarvestConfig::from_yaml_str("http:\n  base_url: not a url\n");
        assert!(matches!(
            result,
            Err(Error::InvalidConfigValue { ref field, .. }) if field == "http.base_url"
        ));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let result = HarvestConfig::from_yaml_str("retry:\n  retries: 4\n");
        assert!(matches!(result, Err(Error::YamlParse(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.yaml");
        std::fs::write(&path, "http:\n  page_delay_ms: 500\n").unwrap();

        let config = HarvestConfig::from_file(&path).unwrap();
        assert_eq!(config.http.page_delay_ms, 500);

        assert!(HarvestConfig::from_file(dir.path().join("missing.yaml")).is_err());
    }
}
