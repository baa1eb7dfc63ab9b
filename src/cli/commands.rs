//! CLI arguments

use crate::output::OutputFormat;
use crate::types::OpenAccess;
use clap::Parser;
use std::path::PathBuf;

/// Search Europe PMC and save every matching record
#[derive(Parser, Debug, Clone)]
#[command(name = "epmc-harvest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Search term (e.g. "cancer", "machine learning")
    pub query: String,

    /// Output format
    #[arg(value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Start year of the publication range
    #[arg(long, alias = "start_year")]
    pub start_year: Option<u16>,

    /// End year of the publication range
    #[arg(long, alias = "end_year")]
    pub end_year: Option<u16>,

    /// Article type (e.g. "research-article", "review")
    #[arg(long, alias = "article_type")]
    pub article_type: Option<String>,

    /// Only open access (Y) or only closed access (N) articles
    #[arg(long, alias = "open_access", value_enum)]
    pub open_access: Option<OpenAccess>,

    /// Article language (e.g. "eng")
    #[arg(long)]
    pub lang: Option<String>,

    /// Add abstract and full-text availability columns
    #[arg(long, alias = "include_extra")]
    pub include_extra: bool,

    /// Output file (defaults to records.<ext> in the working directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write JSON and XLSX batch by batch instead of once at the end
    #[arg(long)]
    pub per_batch: bool,

    /// Harvest configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Consecutive transient failures tolerated before aborting
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_arguments() {
        let cli = Cli::try_parse_from(["epmc-harvest", "malaria"]).unwrap();
        assert_eq!(cli.query, "malaria");
        assert_eq!(cli.format, OutputFormat::Csv);
        assert!(cli.start_year.is_none());
        assert!(!cli.include_extra);
        assert!(!cli.per_batch);
    }

    #[test]
    fn test_all_arguments() {
        let cli = Cli::try_parse_from([
            "epmc-harvest",
            "machine learning",
            "excel",
            "--start-year",
            "2010",
            "--end-year",
            "2021",
            "--article-type",
            "review",
            "--open-access",
            "Y",
            "--lang",
            "eng",
            "--include-extra",
            "--output",
            "out.xlsx",
            "--per-batch",
            "--max-retries",
            "5",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Excel);
        assert_eq!(cli.start_year, Some(2010));
        assert_eq!(cli.end_year, Some(2021));
        assert_eq!(cli.article_type.as_deref(), Some("review"));
        assert_eq!(cli.open_access, Some(OpenAccess::Yes));
        assert_eq!(cli.lang.as_deref(), Some("eng"));
        assert!(cli.include_extra);
        assert_eq!(cli.output, Some(PathBuf::from("out.xlsx")));
        assert!(cli.per_batch);
        assert_eq!(cli.max_retries, Some(5));
        assert!(cli.verbose);
    }

    #[test]
    fn test_underscore_aliases() {
        let cli = Cli::try_parse_from([
            "epmc-harvest",
            "cancer",
            "json",
            "--start_year",
            "2000",
            "--open_access",
            "N",
            "--include_extra",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.start_year, Some(2000));
        assert_eq!(cli.open_access, Some(OpenAccess::No));
        assert!(cli.include_extra);
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["epmc-harvest", "cancer", "parquet"]).is_err());
    }

    #[test]
    fn test_rejects_invalid_open_access() {
        assert!(Cli::try_parse_from(["epmc-harvest", "cancer", "--open-access", "maybe"]).is_err());
    }
}
