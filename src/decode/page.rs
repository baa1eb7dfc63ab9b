//! Search response decoding

use crate::error::{Error, Result};
use crate::types::{Cursor, Record};
use serde::Deserialize;

/// One batch of results plus the cursor for the following batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Records in the order the service returned them
    pub records: Vec<Record>,
    /// Cursor for the next page, `None` when this was the last one
    pub next_cursor: Option<Cursor>,
}

impl Page {
    /// Number of records in this page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the page carries no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if this is the final page
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    result_list: ResultList,
    #[serde(default)]
    next_cursor_mark: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultList {
    result: Vec<Record>,
}

/// Decode a response body into a page
pub fn decode_page(body: &str) -> Result<Page> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| Error::malformed(e.to_string()))?;

    Ok(Page {
        records: response.result_list.result,
        next_cursor: Cursor::next(response.next_cursor_mark),
    })
}
