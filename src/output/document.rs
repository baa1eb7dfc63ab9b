//! JSON sink
//!
//! In accumulate mode the whole run becomes one array written at close. In
//! per-batch mode every batch is appended as its own array, so a multi-page
//! run leaves several concatenated documents in the file.

use super::types::{BatchMode, RecordSink};
use crate::error::{Error, Result};
use crate::types::Record;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const INDENT: &[u8] = b"    ";

/// JSON document sink
#[derive(Debug)]
pub struct JsonSink {
    file: File,
    path: PathBuf,
    mode: BatchMode,
    pending: Vec<Record>,
    rows_written: usize,
}

impl JsonSink {
    /// Open `path`; truncated in accumulate mode, appended in per-batch mode
    pub fn open(path: impl AsRef<Path>, mode: BatchMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        match mode {
            BatchMode::Accumulate => options.write(true).create(true).truncate(true),
            BatchMode::PerBatch => options.create(true).append(true),
        };
        let file = options
            .open(&path)
            .map_err(|e| Error::output(format!("Failed to open {}: {e}", path.display())))?;

        Ok(Self {
            file,
            path,
            mode,
            pending: Vec::new(),
            rows_written: 0,
        })
    }

    /// Records buffered for the final document
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

fn to_pretty_json(records: &[Record]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut serializer)?;
    Ok(buffer)
}

impl RecordSink for JsonSink {
    fn write_batch(&mut self, records: &[Record]) -> Result<usize> {
        match self.mode {
            BatchMode::Accumulate => self.pending.extend_from_slice(records),
            BatchMode::PerBatch => {
                let buffer = to_pretty_json(records)?;
                self.file.write_all(&buffer)?;
                self.file.flush()?;
            }
        }
        self.rows_written += records.len();
        Ok(records.len())
    }

    fn close(self: Box<Self>) -> Result<usize> {
        let Self {
            file,
            mode,
            pending,
            rows_written,
            ..
        } = *self;

        if mode == BatchMode::Accumulate {
            let buffer = to_pretty_json(&pending)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(&buffer)?;
            writer.flush()?;
        }
        Ok(rows_written)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
