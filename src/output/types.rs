//! Output types and the sink trait

use super::{CsvSink, JsonSink, XlsxSink};
use crate::error::Result;
use crate::types::{JsonValue, Record};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fields written by default, in column order
pub const STANDARD_FIELDS: &[&str] = &[
    "isOpenAccess",
    "citedByCount",
    "id",
    "pmcid",
    "pmid",
    "authorString",
    "title",
    "journalTitle",
    "pubYear",
    "journalVolume",
    "pageInfo",
    "doi",
];

/// Standard fields plus abstract and full-text availability
pub const EXTENDED_FIELDS: &[&str] = &[
    "isOpenAccess",
    "citedByCount",
    "id",
    "pmcid",
    "pmid",
    "authorString",
    "title",
    "journalTitle",
    "pubYear",
    "journalVolume",
    "pageInfo",
    "doi",
    "abstract",
    "hasFullText",
];

/// Output file format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Comma-separated values, appended across runs
    #[default]
    Csv,
    /// JSON array of raw records
    Json,
    /// Excel workbook
    Excel,
}

impl OutputFormat {
    /// File written when no explicit path is given
    pub fn default_path(self) -> PathBuf {
        PathBuf::from(match self {
            Self::Csv => "records.csv",
            Self::Json => "records.json",
            Self::Excel => "records.xlsx",
        })
    }
}

/// Which allow-list of fields is projected into rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSet {
    /// The twelve bibliographic columns
    #[default]
    Standard,
    /// Adds `abstract` and `hasFullText`
    Extended,
}

impl FieldSet {
    /// Pick the set from an "include extra" flag
    pub fn from_include_extra(include_extra: bool) -> Self {
        if include_extra {
            Self::Extended
        } else {
            Self::Standard
        }
    }

    /// Column names in order
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Standard => STANDARD_FIELDS,
            Self::Extended => EXTENDED_FIELDS,
        }
    }
}

/// How the document and spreadsheet formats treat successive batches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// Collect every batch and write one document at close
    #[default]
    Accumulate,
    /// Write each batch on its own: JSON appends one array per batch,
    /// XLSX rewrites the workbook so only the last batch survives
    PerBatch,
}

/// Append-capable output opened once per run
pub trait RecordSink: Send {
    /// Persist one batch as a whole; returns the number of rows emitted
    fn write_batch(&mut self, records: &[Record]) -> Result<usize>;

    /// Flush and release the output; returns the total rows emitted
    fn close(self: Box<Self>) -> Result<usize>;

    /// Target file
    fn path(&self) -> &Path;
}

/// Where and how records are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// File format
    pub format: OutputFormat,
    /// Target file
    pub path: PathBuf,
    /// Projected CSV columns
    pub fields: FieldSet,
    /// Batch handling for JSON and XLSX
    pub mode: BatchMode,
}

impl OutputConfig {
    /// Config for a format at its default path
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            path: format.default_path(),
            fields: FieldSet::default(),
            mode: BatchMode::default(),
        }
    }

    /// Set the target file
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the projected fields
    #[must_use]
    pub fn with_fields(mut self, fields: FieldSet) -> Self {
        self.fields = fields;
        self
    }

    /// Set the batch mode
    #[must_use]
    pub fn with_mode(mut self, mode: BatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Open the sink
    pub fn open(&self) -> Result<Box<dyn RecordSink>> {
        Ok(match self.format {
            OutputFormat::Csv => Box::new(CsvSink::open(&self.path, self.fields)?),
            OutputFormat::Json => Box::new(JsonSink::open(&self.path, self.mode)?),
            OutputFormat::Excel => Box::new(XlsxSink::open(&self.path, self.mode)?),
        })
    }
}

/// Render one field value as a cell: null and missing are empty
pub fn stringify(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Project a record onto the given columns
pub fn project(record: &Record, fields: &[&str]) -> Vec<String> {
    fields
        .iter()
        .map(|field| stringify(record.get(*field)))
        .collect()
}
