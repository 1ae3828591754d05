//! Search request and response types
//!
//! `SearchRequest` is normalized on construction (language default, page floor, size clamp);
//! field-level validation of raw caller input is done separately by [`SearchRequest::validate`]
//! so the HTTP layer can report every offending field at once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::CatalogEntry;

/// Language used when the caller leaves it blank
pub const DEFAULT_LANGUAGE: &str = "en";

/// Page size used when the caller gives none or a non-positive one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound for page size
pub const MAX_PAGE_SIZE: u32 = 100;

/// Languages accepted from callers
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["en", "fr"];

/// Normalized search request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub language: String,
    pub page: u32,
    pub size: u32,
}

impl SearchRequest {
    /// Build a normalized request
    ///
    /// Blank language becomes `en`, negative pages become 0, non-positive sizes become 10
    /// and sizes above 100 are clamped to 100.
    pub fn new(query: impl Into<String>, language: &str, page: i64, size: i64) -> Self {
        let language = if language.trim().is_empty() {
            DEFAULT_LANGUAGE.to_string()
        } else {
            language.trim().to_string()
        };

        let page = page.clamp(0, u32::MAX as i64) as u32;
        let size = if size > 0 {
            size.min(MAX_PAGE_SIZE as i64) as u32
        } else {
            DEFAULT_PAGE_SIZE
        };

        Self {
            query: query.into(),
            language,
            page,
            size,
        }
    }

    /// Validate raw caller input before normalization
    ///
    /// Returns a map of field name to message for every violated rule.
    pub fn validate(
        query: &str,
        language: Option<&str>,
        page: i64,
        size: i64,
    ) -> Result<(), BTreeMap<String, String>> {
        let mut errors = BTreeMap::new();

        if query.trim().is_empty() {
            errors.insert("query".to_string(), "Query cannot be empty".to_string());
        }
        if let Some(language) = language {
            if !SUPPORTED_LANGUAGES.contains(&language) {
                errors.insert(
                    "language".to_string(),
                    "Language must be 'en' or 'fr'".to_string(),
                );
            }
        }
        if page < 0 {
            errors.insert(
                "page".to_string(),
                "Page must be zero or positive".to_string(),
            );
        }
        if size <= 0 {
            errors.insert("size".to_string(), "Size must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Zero-based index of the first result on the requested page
    pub fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }
}

/// Page of search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<CatalogEntry>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl SearchResponse {
    /// Build a response, deriving `total_pages` from the count and page size
    pub fn of(results: Vec<CatalogEntry>, total_count: u64, page: u32, page_size: u32) -> Self {
        Self {
            results,
            total_count,
            page,
            page_size,
            total_pages: total_pages(total_count, page_size),
        }
    }
}

/// `ceil(total_count / page_size)`, or 0 when the page size is 0
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(page_size as u64);
    pages.min(u32::MAX as u64) as u32
}
