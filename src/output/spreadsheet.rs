//! XLSX sink
//!
//! Workbooks cannot be appended to, so the sheet is rebuilt on every save.
//! Accumulate mode saves once at close with every row of the run; per-batch
//! mode saves after each batch, leaving only the last batch in the file.
//!
//! Columns are every key seen in the records, in first-seen order. Rows that
//! do not fit under one header continue on `records_2`, `records_3`, ...

use super::types::{BatchMode, RecordSink};
use crate::error::Result;
use crate::types::{JsonValue, Record};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};
use tracing::debug;

const SHEET_NAME: &str = "records";

/// Data rows that fit below the header of one worksheet
pub const MAX_SHEET_ROWS: usize = 1_048_575;

/// Longest text a single cell accepts
const MAX_CELL_CHARS: usize = 32_767;

/// Non-null cells of one record, keyed by column index
type Row = Vec<(usize, JsonValue)>;

/// Excel workbook sink
#[derive(Debug)]
pub struct XlsxSink {
    path: PathBuf,
    mode: BatchMode,
    columns: Vec<String>,
    rows: Vec<Row>,
    sheet_rows: usize,
    rows_written: usize,
}

impl XlsxSink {
    /// Prepare a sink for `path`; nothing is written until the first save
    pub fn open(path: impl AsRef<Path>, mode: BatchMode) -> Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            mode,
            columns: Vec::new(),
            rows: Vec::new(),
            sheet_rows: MAX_SHEET_ROWS,
            rows_written: 0,
        })
    }

    /// Rows held for the next save
    pub fn buffered_rows(&self) -> usize {
        self.rows.len()
    }

    /// Header of the next save
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn column_index(&mut self, key: &str) -> usize {
        match self.columns.iter().position(|c| c == key) {
            Some(index) => index,
            None => {
                self.columns.push(key.to_string());
                self.columns.len() - 1
            }
        }
    }

    fn add_rows(&mut self, records: &[Record]) {
        self.rows.reserve(records.len());
        for record in records {
            let row: Row = record
                .iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (self.column_index(key), value.clone()))
                .collect();
            self.rows.push(row);
        }
    }

    fn save(&self) -> Result<()> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        // An empty run still gets a sheet with its header
        let chunks: Vec<&[Row]> = if self.rows.is_empty() {
            vec![&self.rows[..]]
        } else {
            self.rows.chunks(self.sheet_rows).collect()
        };

        for (index, chunk) in chunks.iter().enumerate() {
            let sheet = workbook.add_worksheet();
            sheet.set_name(sheet_name(index))?;
            self.write_sheet(sheet, chunk, &header)?;
        }

        workbook.save(&self.path)?;
        debug!(
            path = %self.path.display(),
            rows = self.rows.len(),
            sheets = chunks.len(),
            "Saved workbook"
        );
        Ok(())
    }

    fn write_sheet(&self, sheet: &mut Worksheet, rows: &[Row], header: &Format) -> Result<()> {
        for (col, field) in self.columns.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, field, header)?;
        }

        for (i, row) in rows.iter().enumerate() {
            let r = i as u32 + 1;
            for (col, value) in row {
                let c = *col as u16;
                match value {
                    JsonValue::Null => {}
                    JsonValue::Bool(b) => {
                        sheet.write_boolean(r, c, *b)?;
                    }
                    JsonValue::Number(n) => match n.as_f64() {
                        Some(f) => {
                            sheet.write_number(r, c, f)?;
                        }
                        None => {
                            sheet.write_string(r, c, n.to_string())?;
                        }
                    },
                    JsonValue::String(s) => {
                        sheet.write_string(r, c, fit_cell(s))?;
                    }
                    other => {
                        sheet.write_string(r, c, fit_cell(&other.to_string()))?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// `records`, then `records_2`, `records_3`, ...
fn sheet_name(index: usize) -> String {
    if index == 0 {
        SHEET_NAME.to_string()
    } else {
        format!("{SHEET_NAME}_{}", index + 1)
    }
}

/// Cut text to the cell limit on a char boundary
fn fit_cell(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

impl RecordSink for XlsxSink {
    fn write_batch(&mut self, records: &[Record]) -> Result<usize> {
        match self.mode {
            BatchMode::Accumulate => self.add_rows(records),
            BatchMode::PerBatch => {
                self.columns.clear();
                self.rows.clear();
                self.add_rows(records);
                self.save()?;
            }
        }
        self.rows_written += records.len();
        Ok(records.len())
    }

    fn close(self: Box<Self>) -> Result<usize> {
        if self.mode == BatchMode::Accumulate {
            self.save()?;
        }
        Ok(self.rows_written)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
