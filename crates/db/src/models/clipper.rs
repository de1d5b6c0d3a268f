//! Clipper entity and DTOs.

use catalog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `clippers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Clipper {
    pub id: DbId,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub description: String,
    pub amazon_url: String,
    pub image_urls: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a clipper.
#[derive(Debug, Clone, Deserialize)]
pub struct ClipperInput {
    pub name: String,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amazon_url: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
}
