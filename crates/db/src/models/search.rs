//! Faceted search models and DTOs.
//!
//! Contains the `video_search_mv` row type, the facet count types, and the
//! assembled response envelope returned by the search endpoint.

use std::collections::BTreeMap;

use catalog_core::search::SearchFilter;
use catalog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Search aggregate rows
// ---------------------------------------------------------------------------

/// Minimal clipper descriptor embedded in the search aggregate for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipperRef {
    pub id: DbId,
    pub name: String,
    pub brand: String,
    pub model: String,
}

/// A row from the `video_search_mv` materialized view.
#[derive(Debug, Clone, FromRow)]
pub struct SearchableVideoRow {
    pub id: DbId,
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub tags: Json<BTreeMap<String, String>>,
    pub clipper_details: Json<Vec<ClipperRef>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A video result with clipper associations in the shape the display layer
/// expects (`clippers: [{clipper: {...}}]`).
#[derive(Debug, Clone, Serialize)]
pub struct VideoResult {
    pub id: DbId,
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub tags: BTreeMap<String, String>,
    pub clippers: Vec<ClipperLink>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Wrapper matching the display layer's association shape.
#[derive(Debug, Clone, Serialize)]
pub struct ClipperLink {
    pub clipper: ClipperRef,
}

impl From<SearchableVideoRow> for VideoResult {
    fn from(row: SearchableVideoRow) -> Self {
        Self {
            id: row.id,
            video_id: row.video_id,
            title: row.title,
            description: row.description,
            channel_title: row.channel_title,
            thumbnail_url: row.thumbnail_url,
            duration: row.duration,
            tags: row.tags.0,
            clippers: row
                .clipper_details
                .0
                .into_iter()
                .map(|clipper| ClipperLink { clipper })
                .collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Faceted aggregation
// ---------------------------------------------------------------------------

/// A single facet bucket: value + count.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct FacetCount {
    pub value: String,
    pub count: i64,
}

/// A raw (key, value, count) row from the tag facet query, before regrouping
/// by key.
#[derive(Debug, Clone, FromRow)]
pub struct TagFacetRow {
    pub key: String,
    pub value: String,
    pub count: i64,
}

/// Aggregated facet counts for the current filtered result set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchFacets {
    pub channels: Vec<FacetCount>,
    pub brands: Vec<FacetCount>,
    pub models: Vec<FacetCount>,
    pub tags: BTreeMap<String, Vec<FacetCount>>,
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Pagination metadata for a search or listing response.
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// Assemble pagination metadata, deriving `total_pages` from the shared
    /// rounding rule.
    pub fn new(page: i64, page_size: i64, total: i64) -> Self {
        Self {
            page,
            page_size,
            total,
            total_pages: catalog_core::search::total_pages(total, page_size),
        }
    }
}

/// Assembled search response: page rows, pagination, facet counts, and an
/// echo of the normalized filter.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResultEnvelope {
    pub videos: Vec<VideoResult>,
    pub pagination: Pagination,
    pub facets: SearchFacets,
    pub input: SearchFilter,
}
