//! Shared query parameter types for API handlers.

use catalog_core::error::CoreError;
use catalog_core::search::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use serde::Deserialize;

/// Pagination and free-text search parameters for admin listing endpoints
/// (`?page=&page_size=&search=`).
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
}

impl ListParams {
    /// Apply defaults and the shared pagination policy.
    ///
    /// Returns `(page, page_size, search)`; out-of-range values are rejected
    /// with the same validation semantics as the search filter.
    pub fn normalize(self) -> Result<(i64, i64, Option<String>), CoreError> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        if page < 1 {
            return Err(CoreError::Validation(format!(
                "page must be a positive integer, got {page}"
            )));
        }

        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(CoreError::Validation(format!(
                "page_size must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        // The row offset must stay representable, same policy as the search
        // filter.
        if (page - 1).checked_mul(page_size).is_none() {
            return Err(CoreError::Validation(format!(
                "page {page} is out of range for page_size {page_size}"
            )));
        }

        let search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok((page, page_size, search))
    }
}
