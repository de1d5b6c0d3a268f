//! Handlers for the clipper catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::types::DbId;
use catalog_db::models::clipper::{Clipper, ClipperInput};
use catalog_db::models::search::Pagination;
use catalog_db::repositories::ClipperRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Paginated clipper listing payload.
#[derive(Debug, Serialize)]
pub struct ClipperListResponse {
    pub clippers: Vec<Clipper>,
    pub pagination: Pagination,
}

/// GET /api/v1/clippers
///
/// Paginated listing with optional free-text search over name, brand,
/// model, and description.
pub async fn list_clippers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let (page, page_size, search) = params.normalize()?;

    let (clippers, total) =
        ClipperRepo::list(&state.pool, page, page_size, search.as_deref()).await?;

    Ok(Json(DataResponse {
        data: ClipperListResponse {
            clippers,
            pagination: Pagination::new(page, page_size, total),
        },
    }))
}

/// GET /api/v1/clippers/{id}
pub async fn get_clipper(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let clipper = ClipperRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Clipper",
            id,
        }))?;

    Ok(Json(DataResponse { data: clipper }))
}

/// POST /api/v1/clippers
pub async fn create_clipper(
    State(state): State<AppState>,
    Json(input): Json<ClipperInput>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;

    let clipper = ClipperRepo::create(&state.pool, &input).await?;

    tracing::info!(clipper_id = clipper.id, "Clipper created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: clipper })))
}

/// PUT /api/v1/clippers/{id}
pub async fn update_clipper(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ClipperInput>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;

    let clipper = ClipperRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Clipper",
            id,
        }))?;

    tracing::info!(clipper_id = id, "Clipper updated");

    Ok(Json(DataResponse { data: clipper }))
}

/// DELETE /api/v1/clippers/{id}
pub async fn delete_clipper(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = ClipperRepo::delete(&state.pool, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Clipper",
            id,
        }));
    }

    tracing::info!(clipper_id = id, "Clipper deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Field-level validation shared by create and update.
fn validate_input(input: &ClipperInput) -> Result<(), AppError> {
    for (field, value) in [
        ("name", &input.name),
        ("brand", &input.brand),
        ("model", &input.model),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{field} must not be empty")));
        }
    }
    Ok(())
}
