//! Handlers for the video catalog.
//!
//! Video writes replace clipper associations wholesale and refresh the
//! search aggregate (owned by the repository layer).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::types::DbId;
use catalog_db::models::search::Pagination;
use catalog_db::models::video::{VideoInput, VideoWithClippers};
use catalog_db::repositories::VideoRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Paginated video listing payload.
#[derive(Debug, Serialize)]
pub struct VideoListResponse {
    pub videos: Vec<VideoWithClippers>,
    pub pagination: Pagination,
}

/// GET /api/v1/videos
///
/// Paginated listing with optional free-text search over title,
/// description, and channel title.
pub async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let (page, page_size, search) = params.normalize()?;

    let (videos, total) =
        VideoRepo::list(&state.pool, page, page_size, search.as_deref()).await?;

    Ok(Json(DataResponse {
        data: VideoListResponse {
            videos,
            pagination: Pagination::new(page, page_size, total),
        },
    }))
}

/// GET /api/v1/videos/{id}
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }))?;

    Ok(Json(DataResponse { data: video }))
}

/// POST /api/v1/videos
///
/// Create a video with its clipper associations. Rejects duplicate YouTube
/// video IDs with 409.
pub async fn create_video(
    State(state): State<AppState>,
    Json(input): Json<VideoInput>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;

    if VideoRepo::find_by_video_id(&state.pool, &input.video_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A video with this YouTube ID already exists".to_string(),
        )));
    }

    let video = VideoRepo::create(&state.pool, &input).await?;

    tracing::info!(video_id = video.video.id, "Video created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: video })))
}

/// PUT /api/v1/videos/{id}
///
/// Replace a video's fields and clipper associations.
pub async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<VideoInput>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;

    let video = VideoRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }))?;

    tracing::info!(video_id = id, "Video updated");

    Ok(Json(DataResponse { data: video }))
}

/// DELETE /api/v1/videos/{id}
pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = VideoRepo::delete(&state.pool, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }));
    }

    tracing::info!(video_id = id, "Video deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Field-level validation shared by create and update.
fn validate_input(input: &VideoInput) -> Result<(), AppError> {
    if input.video_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "video_id must not be empty".to_string(),
        ));
    }
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".to_string()));
    }
    Ok(())
}
