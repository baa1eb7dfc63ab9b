//! CLI runner - executes a search

use crate::cli::commands::Cli;
use crate::config::HarvestConfig;
use crate::engine::{CancelToken, SearchDriver, SearchSummary, TracingObserver};
use crate::error::Result;
use crate::http::HttpPageFetcher;
use crate::output::{BatchMode, FieldSet, OutputConfig};
use crate::query::SearchRequest;
use crate::retry::RetryPolicy;
use chrono::Local;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load the config file (if any) and apply flag overrides
    pub fn config(&self) -> Result<HarvestConfig> {
        let mut config = match &self.cli.config {
            Some(path) => HarvestConfig::from_file(path)?,
            None => HarvestConfig::default(),
        };

        if let Some(max_retries) = self.cli.max_retries {
            config.retry.max_retries = max_retries;
        }
        if self.cli.per_batch {
            config.output.mode = BatchMode::PerBatch;
        }
        Ok(config)
    }

    /// Build the search request from the arguments
    pub fn request(&self) -> Result<SearchRequest> {
        if self.cli.start_year.is_some() != self.cli.end_year.is_some() {
            warn!("Year filter needs both --start-year and --end-year, ignoring it");
        }

        SearchRequest::builder(&self.cli.query)
            .years(self.cli.start_year, self.cli.end_year)
            .article_type(self.cli.article_type.clone())
            .open_access(self.cli.open_access)
            .lang(self.cli.lang.clone())
            .build()
    }

    /// Output target for the run
    pub fn output(&self, config: &HarvestConfig) -> OutputConfig {
        let mut output = OutputConfig::new(self.cli.format)
            .with_fields(FieldSet::from_include_extra(self.cli.include_extra))
            .with_mode(config.batch_mode());
        if let Some(path) = &self.cli.output {
            output = output.with_path(path);
        }
        output
    }

    /// Run the search to a terminal state
    pub async fn run(&self) -> Result<SearchSummary> {
        let config = self.config()?;
        let request = self.request()?;
        let output = self.output(&config);

        info!(query = %request.query(), "Building query for search term");
        if let Some(range) = request.year_range() {
            info!(start = range.start, end = range.end, "Filtering by years");
        }
        if let Some(article_type) = request.article_type() {
            info!(article_type, "Filtering by article type");
        }
        if let Some(open_access) = request.open_access() {
            info!(open_access = open_access.as_param(), "Filtering by open access");
        }
        if let Some(lang) = request.lang() {
            info!(lang, "Filtering by language");
        }
        info!(now = %Local::now(), "Search date and time");
        info!(
            endpoint = %config.http.base_url,
            format = ?output.format,
            path = %output.path.display(),
            "Sending query to API"
        );

        let fetcher = HttpPageFetcher::with_config(config.fetcher_config())?;

        let cancel = CancelToken::new();
        let signal = cancel.clone();
        tokio::spawn(async move {
            if forward_interrupts(&signal, tokio::signal::ctrl_c).await {
                eprintln!("\nSecond interruption, exiting immediately");
                std::process::exit(130);
            }
        });

        let mut driver = SearchDriver::new(Box::new(fetcher), output)
            .with_policy(RetryPolicy::new(config.retry_config()))
            .with_pacer(config.pacer())
            .with_observer(Arc::new(TracingObserver));

        let summary = driver.run(&request, &cancel).await;
        print_summary(&summary);
        Ok(summary)
    }
}

/// Cancel on the first interrupt; `true` once a second one arrives.
///
/// The first interrupt lets an in-flight request finish; the second means
/// the user does not want to wait for it. Returns `false` if the signal
/// source fails.
async fn forward_interrupts<F, Fut>(cancel: &CancelToken, mut next_signal: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = next_signal().await {
        warn!(error = %e, "Could not listen for Ctrl-C");
        return false;
    }
    eprintln!("\nInterruption detected, stopping after the current request...");
    cancel.cancel();

    next_signal().await.is_ok()
}

fn print_summary(summary: &SearchSummary) {
    match summary.abort_reason() {
        None => println!("Search completed."),
        Some(reason) => println!("Search stopped: {reason}"),
    }
    println!("Total records retrieved: {}", summary.records_retrieved);
    println!(
        "Pages: {}, requests: {}, duration: {:.1}s",
        summary.pages_fetched,
        summary.attempts,
        summary.duration.as_secs_f64()
    );
    if let Some(path) = &summary.output {
        println!("Output: {}", path.display());
    }
}
