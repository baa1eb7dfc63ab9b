//! Page fetcher
//!
//! Sends exactly one search request per call and classifies what came back:
//! - 200 is a success carrying the raw body
//! - 429 is rate limiting with the advisory `Retry-After` delay
//! - every other status is fatal
//! - transport errors (timeouts, refused connections, DNS, resets) are transient

use crate::error::{Error, Result};
use crate::query::SearchRequest;
use crate::types::Cursor;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Europe PMC REST search endpoint
pub const EUROPE_PMC_SEARCH_URL: &str = "https://www.ebi.ac.uk/europepmc/webservices/rest/search";

/// Classified result of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// HTTP 200 with the raw response body
    Success(String),
    /// HTTP 429; wait this many seconds before resubmitting
    RateLimited {
        /// `Retry-After` value, or the configured default
        retry_after_secs: u64,
    },
    /// Network-level failure worth retrying
    TransientFailure(String),
    /// Any other HTTP status
    FatalFailure {
        /// Status code as received
        status: u16,
    },
}

/// Performs one page request/response cycle
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page identified by `cursor`
    async fn fetch(&self, request: &SearchRequest, cursor: &Cursor) -> FetchOutcome;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, request: &SearchRequest, cursor: &Cursor) -> FetchOutcome {
        (**self).fetch(request, cursor).await
    }
}

/// Configuration for the HTTP page fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Search endpoint
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Wait used when a 429 carries no usable `Retry-After`
    pub default_retry_after: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            base_url: EUROPE_PMC_SEARCH_URL.to_string(),
            timeout: Duration::from_secs(60),
            default_retry_after: Duration::from_secs(60),
            user_agent: format!("epmc-harvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpFetcherConfig {
    /// Create a new config builder
    pub fn builder() -> HttpFetcherConfigBuilder {
        HttpFetcherConfigBuilder::default()
    }
}

/// Builder for HTTP fetcher config
#[derive(Default)]
pub struct HttpFetcherConfigBuilder {
    config: HttpFetcherConfig,
}

impl HttpFetcherConfigBuilder {
    /// Set the search endpoint
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the fallback rate-limit wait
    pub fn default_retry_after(mut self, wait: Duration) -> Self {
        self.config.default_retry_after = wait;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpFetcherConfig {
        self.config
    }
}

/// Page fetcher backed by reqwest
pub struct HttpPageFetcher {
    client: Client,
    endpoint: Url,
    config: HttpFetcherConfig,
}

impl HttpPageFetcher {
    /// Create a fetcher against the public Europe PMC endpoint
    pub fn new() -> Result<Self> {
        Self::with_config(HttpFetcherConfig::default())
    }

    /// Create a fetcher with custom configuration
    pub fn with_config(config: HttpFetcherConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    async fn classify(&self, response: Response) -> FetchOutcome {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return FetchOutcome::RateLimited {
                retry_after_secs: extract_retry_after(&response)
                    .unwrap_or(self.config.default_retry_after.as_secs()),
            };
        }

        if status != StatusCode::OK {
            return FetchOutcome::FatalFailure {
                status: status.as_u16(),
            };
        }

        match response.text().await {
            Ok(body) => FetchOutcome::Success(body),
            Err(e) => FetchOutcome::TransientFailure(format!("failed to read body: {e}")),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, request: &SearchRequest, cursor: &Cursor) -> FetchOutcome {
        let params = request.to_params(cursor);
        debug!(endpoint = %self.endpoint, cursor = %cursor, "Sending search request");

        match self
            .client
            .get(self.endpoint.clone())
            .query(&params)
            .send()
            .await
        {
            Ok(response) => self.classify(response).await,
            Err(e) => FetchOutcome::TransientFailure(describe_transport_error(&e)),
        }
    }
}

impl std::fmt::Debug for HttpPageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageFetcher")
            .field("endpoint", &self.endpoint.as_str())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Extract the `Retry-After` header as whole seconds
fn extract_retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        format!("request failed: {e}")
    }
}
