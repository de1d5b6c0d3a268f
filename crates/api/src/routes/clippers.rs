//! Route definitions for the clipper catalog.
//!
//! Mounted at `/clippers` in the API route tree.

use axum::routing::get;
use axum::Router;

use crate::handlers::clippers;
use crate::state::AppState;

/// Clipper routes mounted at `/clippers`.
///
/// ```text
/// GET    /       -> list_clippers
/// POST   /       -> create_clipper
/// GET    /{id}   -> get_clipper
/// PUT    /{id}   -> update_clipper
/// DELETE /{id}   -> delete_clipper
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(clippers::list_clippers).post(clippers::create_clipper),
        )
        .route(
            "/{id}",
            get(clippers::get_clipper)
                .put(clippers::update_clipper)
                .delete(clippers::delete_clipper),
        )
}
