//! Search filter model and pagination policy.
//!
//! This module lives in `core` (zero internal deps) so it can be used by both
//! the API layer and the repository layer. [`SearchRequest`] is the raw,
//! untrusted client input; [`SearchFilter`] is the normalized form every
//! downstream query is built from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default page number for paginated listings.
pub const DEFAULT_PAGE: i64 = 1;

/// Default number of results per page.
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// Minimum accepted page size.
pub const MIN_PAGE_SIZE: i64 = 1;

/// Maximum accepted page size.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Raw request
// ---------------------------------------------------------------------------

/// Raw search input as deserialized from the request body.
///
/// All fields are optional; defaulting and validation happen in
/// [`SearchFilter::from_request`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub channels: Vec<String>,
    pub brands: Vec<String>,
    pub models: Vec<String>,
    /// Tag filters: `{ "hairstyle": ["fade", "mohawk"], "difficulty": ["beginner"] }`.
    pub tags: BTreeMap<String, Vec<String>>,
}

// ---------------------------------------------------------------------------
// Normalized filter
// ---------------------------------------------------------------------------

/// A validated, normalized search filter.
///
/// Invariants:
/// - `page >= 1`, `MIN_PAGE_SIZE <= page_size <= MAX_PAGE_SIZE`.
/// - `search` is trimmed and `None` when empty.
/// - `channels` / `brands` / `models` are sorted and deduplicated, with empty
///   strings dropped. An empty list means the dimension is inactive.
/// - `tags` maps non-empty keys to sorted, deduplicated, non-empty value
///   lists; entries whose value set normalizes to empty are dropped.
///
/// An all-empty filter imposes no constraint and selects the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchFilter {
    pub page: i64,
    pub page_size: i64,
    pub search: Option<String>,
    pub channels: Vec<String>,
    pub brands: Vec<String>,
    pub models: Vec<String>,
    pub tags: BTreeMap<String, Vec<String>>,
}

impl SearchFilter {
    /// Validate and normalize a raw [`SearchRequest`].
    ///
    /// Out-of-range `page` / `page_size` values are rejected rather than
    /// clamped: silent clamping hides caller mistakes, and the UI always
    /// sends in-range values.
    pub fn from_request(request: SearchRequest) -> Result<Self, CoreError> {
        let page = request.page.unwrap_or(DEFAULT_PAGE);
        if page < 1 {
            return Err(CoreError::Validation(format!(
                "page must be a positive integer, got {page}"
            )));
        }

        let page_size = request.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(CoreError::Validation(format!(
                "page_size must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        // The row offset must stay representable; otherwise a huge page
        // number would wrap the OFFSET computation.
        if (page - 1).checked_mul(page_size).is_none() {
            return Err(CoreError::Validation(format!(
                "page {page} is out of range for page_size {page_size}"
            )));
        }

        let search = request
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let mut tags = BTreeMap::new();
        for (key, values) in request.tags {
            if key.trim().is_empty() {
                return Err(CoreError::Validation(
                    "tags must not contain empty keys".to_string(),
                ));
            }
            let values = normalize_values(values);
            if !values.is_empty() {
                tags.insert(key, values);
            }
        }

        Ok(Self {
            page,
            page_size,
            search,
            channels: normalize_values(request.channels),
            brands: normalize_values(request.brands),
            models: normalize_values(request.models),
            tags,
        })
    }

    /// Row offset for the current page.
    ///
    /// [`from_request`](Self::from_request) guarantees the product fits in
    /// `i64`.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

/// Number of pages needed for `total` rows at `page_size` rows per page.
///
/// Zero rows yield zero pages; an empty result set is a valid terminal
/// state, not an error. This is the single pagination-math definition shared
/// by the search envelope and the admin listing endpoints.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    (total + page_size - 1) / page_size
}

/// Sort, deduplicate, and drop empty strings from a filter value list.
///
/// Sorting makes the normalized filter (and therefore the compiled predicate
/// and its parameter order) deterministic for identical requests.
fn normalize_values(values: Vec<String>) -> Vec<String> {
    let mut values: Vec<String> = values.into_iter().filter(|v| !v.is_empty()).collect();
    values.sort();
    values.dedup();
    values
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
