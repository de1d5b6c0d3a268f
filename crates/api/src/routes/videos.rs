//! Route definitions for the video catalog.
//!
//! Mounted at `/videos` in the API route tree.

use axum::routing::get;
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

/// Video routes mounted at `/videos`.
///
/// ```text
/// GET    /       -> list_videos
/// POST   /       -> create_video
/// GET    /{id}   -> get_video
/// PUT    /{id}   -> update_video
/// DELETE /{id}   -> delete_video
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list_videos).post(videos::create_video))
        .route(
            "/{id}",
            get(videos::get_video)
                .put(videos::update_video)
                .delete(videos::delete_video),
        )
}
