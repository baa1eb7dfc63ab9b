//! Search request value and builder

use super::normalize::{normalize_query, validate_query};
use crate::error::{Error, Result};
use crate::types::{Cursor, OpenAccess};
use serde::Serialize;
use std::fmt;

/// Largest page the service will return
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Page size used unless overridden
pub const DEFAULT_PAGE_SIZE: u32 = MAX_PAGE_SIZE;

/// Inclusive publication year range (`pubYear=START:END`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    /// First year
    pub start: u16,
    /// Last year
    pub end: u16,
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// A validated search against the remote service.
///
/// Immutable once built; the pagination cursor is supplied separately on
/// every request so the driver alone owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    query: String,
    result_type: String,
    page_size: u32,
    sort: String,
    format: String,
    year_range: Option<YearRange>,
    article_type: Option<String>,
    open_access: Option<OpenAccess>,
    lang: Option<String>,
}

impl SearchRequest {
    /// Start building a request for a raw, user-supplied term
    pub fn builder(query: impl Into<String>) -> SearchRequestBuilder {
        SearchRequestBuilder::new(query)
    }

    /// Normalized query term
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Records per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Sort key (empty means service default)
    pub fn sort(&self) -> &str {
        &self.sort
    }

    /// Publication year filter
    pub fn year_range(&self) -> Option<YearRange> {
        self.year_range
    }

    /// Article type filter
    pub fn article_type(&self) -> Option<&str> {
        self.article_type.as_deref()
    }

    /// Open-access filter
    pub fn open_access(&self) -> Option<OpenAccess> {
        self.open_access
    }

    /// Language filter
    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Render the query parameters for one page request
    pub fn to_params(&self, cursor: &Cursor) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", self.query.clone()),
            ("resultType", self.result_type.clone()),
            ("pageSize", self.page_size.to_string()),
            ("sort", self.sort.clone()),
            ("format", self.format.clone()),
        ];

        if let Some(range) = self.year_range {
            params.push(("pubYear", range.to_string()));
        }
        if let Some(article_type) = &self.article_type {
            params.push(("articleType", article_type.clone()));
        }
        if let Some(open_access) = self.open_access {
            params.push(("isOpenAccess", open_access.as_param().to_string()));
        }
        if let Some(lang) = &self.lang {
            params.push(("lang", lang.clone()));
        }

        params.push(("cursorMark", cursor.as_str().to_string()));
        params
    }
}

/// Builder for [`SearchRequest`]
#[derive(Debug, Clone)]
pub struct SearchRequestBuilder {
    raw_query: String,
    page_size: u32,
    sort: String,
    start_year: Option<u16>,
    end_year: Option<u16>,
    article_type: Option<String>,
    open_access: Option<OpenAccess>,
    lang: Option<String>,
}

impl SearchRequestBuilder {
    fn new(query: impl Into<String>) -> Self {
        Self {
            raw_query: query.into(),
            page_size: DEFAULT_PAGE_SIZE,
            sort: String::new(),
            start_year: None,
            end_year: None,
            article_type: None,
            open_access: None,
            lang: None,
        }
    }

    /// Set the page size (1..=1000)
    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Set the sort key
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    /// Set the publication years. The filter is only applied when both ends are given.
    #[must_use]
    pub fn years(mut self, start: Option<u16>, end: Option<u16>) -> Self {
        self.start_year = start;
        self.end_year = end;
        self
    }

    /// Filter by article type
    #[must_use]
    pub fn article_type(mut self, article_type: Option<String>) -> Self {
        self.article_type = article_type;
        self
    }

    /// Filter by open-access status
    #[must_use]
    pub fn open_access(mut self, open_access: Option<OpenAccess>) -> Self {
        self.open_access = open_access;
        self
    }

    /// Filter by language (e.g. "eng")
    #[must_use]
    pub fn lang(mut self, lang: Option<String>) -> Self {
        self.lang = lang;
        self
    }

    /// Normalize and validate, producing the request
    pub fn build(self) -> Result<SearchRequest> {
        let query = normalize_query(&self.raw_query);
        validate_query(&query)?;

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::invalid_value(
                "page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        let year_range = match (self.start_year, self.end_year) {
            (Some(start), Some(end)) if start > end => {
                return Err(Error::invalid_value(
                    "start_year",
                    format!("{start} is after end year {end}"),
                ));
            }
            (Some(start), Some(end)) => Some(YearRange { start, end }),
            _ => None,
        };

        Ok(SearchRequest {
            query,
            result_type: "lite".to_string(),
            page_size: self.page_size,
            sort: self.sort,
            format: "json".to_string(),
            year_range,
            article_type: self.article_type.filter(|s| !s.is_empty()),
            open_access: self.open_access,
            lang: self.lang.filter(|s| !s.is_empty()),
        })
    }
}
