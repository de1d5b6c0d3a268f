//! Video entity and DTOs.

use std::collections::BTreeMap;

use catalog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use super::search::ClipperLink;

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub channel_title: String,
    pub tags: Json<BTreeMap<String, String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A video with its clipper associations attached, as returned by the
/// listing and detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct VideoWithClippers {
    #[serde(flatten)]
    pub video: Video,
    pub clippers: Vec<ClipperLink>,
}

/// DTO for creating or replacing a video.
///
/// `clipper_ids` fully replaces the video's clipper associations.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoInput {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub clipper_ids: Vec<DbId>,
}
