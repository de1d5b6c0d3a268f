//! Handler for the faceted video search.
//!
//! Validation runs before any storage call; the repository fans the six
//! reads out concurrently and fails the whole request on any storage error,
//! so the response envelope is always internally consistent.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use catalog_core::search::{SearchFilter, SearchRequest};
use catalog_db::repositories::SearchRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/search
///
/// Faceted search over the video catalog. Returns one page of results plus
/// per-dimension facet counts computed over the same filtered set.
pub async fn faceted_search(
    State(state): State<AppState>,
    Json(input): Json<SearchRequest>,
) -> AppResult<impl IntoResponse> {
    let filter = SearchFilter::from_request(input)?;

    let envelope = SearchRepo::search(&state.pool, &filter).await?;

    tracing::debug!(
        page = filter.page,
        total = envelope.pagination.total,
        "Search executed",
    );

    Ok(Json(DataResponse { data: envelope }))
}
