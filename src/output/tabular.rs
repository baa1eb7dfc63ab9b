//! CSV sink
//!
//! Appends rows to a persistent file. Whether the header is still needed is
//! decided once, at open, from the size of the existing file.

use super::types::{project, FieldSet, RecordSink};
use crate::error::{Error, Result};
use crate::types::Record;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV file sink
#[derive(Debug)]
pub struct CsvSink {
    file: File,
    path: PathBuf,
    fields: &'static [&'static str],
    header_written: bool,
    rows_written: usize,
}

impl CsvSink {
    /// Open `path` for appending, creating it if needed
    pub fn open(path: impl AsRef<Path>, fields: FieldSet) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::output(format!("Failed to open {}: {e}", path.display())))?;
        let header_written = file.metadata()?.len() > 0;

        debug!(path = %path.display(), header_written, "Opened CSV sink");

        Ok(Self {
            file,
            path,
            fields: fields.fields(),
            header_written,
            rows_written: 0,
        })
    }

    /// Whether the target already has a header row
    pub fn header_written(&self) -> bool {
        self.header_written
    }

    /// Rows emitted by this sink so far
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn encode(&self, records: &[Record]) -> Result<(Vec<u8>, usize)> {
        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
        if !self.header_written {
            writer.write_record(self.fields)?;
        }

        let mut rows = 0;
        for record in records {
            let row = project(record, self.fields);
            if row.iter().all(String::is_empty) {
                continue;
            }
            writer.write_record(&row)?;
            rows += 1;
        }

        let buffer = writer
            .into_inner()
            .map_err(|e| Error::output(format!("Failed to encode CSV batch: {e}")))?;
        Ok((buffer, rows))
    }
}

impl RecordSink for CsvSink {
    fn write_batch(&mut self, records: &[Record]) -> Result<usize> {
        // Encode first so a failing record leaves the file untouched
        let (buffer, rows) = self.encode(records)?;
        self.file.write_all(&buffer)?;
        self.file.flush()?;

        self.header_written = true;
        self.rows_written += rows;
        Ok(rows)
    }

    fn close(mut self: Box<Self>) -> Result<usize> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(self.rows_written)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
