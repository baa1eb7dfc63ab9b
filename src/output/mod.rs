//! Output module
//!
//! Append-only persistence of record batches.
//!
//! # Overview
//!
//! [`OutputConfig::open`] yields a [`RecordSink`] for one of three formats:
//! - **CSV**: appended to a persistent file, header written at most once
//! - **JSON**: one array per run, or one array per batch in per-batch mode
//! - **XLSX**: one workbook per run, or rewritten per batch in per-batch mode
//!
//! CSV rows are projected onto a [`FieldSet`] so every row has the same width
//! as the header. XLSX writes every field seen, and rows past the sheet limit
//! continue on further sheets.

mod document;
mod spreadsheet;
mod tabular;
mod types;

pub use document::JsonSink;
pub use spreadsheet::{XlsxSink, MAX_SHEET_ROWS};
pub use tabular::CsvSink;
pub use types::{
    project, stringify, BatchMode, FieldSet, OutputConfig, OutputFormat, RecordSink,
    EXTENDED_FIELDS, STANDARD_FIELDS,
};
