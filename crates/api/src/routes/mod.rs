pub mod clippers;
pub mod health;
pub mod search;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /search                faceted search (POST)
///
/// /videos                list, create
/// /videos/{id}           get, update, delete
///
/// /clippers              list, create
/// /clippers/{id}         get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/search", search::router())
        .nest("/videos", videos::router())
        .nest("/clippers", clippers::router())
}
