//! Route definitions for the faceted search.
//!
//! Mounted at `/search` in the API route tree.

use axum::routing::post;
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Search routes mounted at `/search`.
///
/// ```text
/// POST / -> faceted_search
/// ```
///
/// POST rather than GET: the tag filter is a nested map that does not fit
/// flat query parameters.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(search::faceted_search))
}
