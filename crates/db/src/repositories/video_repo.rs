//! Repository for videos and their clipper associations.
//!
//! Write paths own the search aggregate's freshness: any change to videos or
//! to the video/clipper association refreshes `video_search_mv` after commit.

use catalog_core::types::DbId;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::collections::BTreeMap;

use crate::models::search::{ClipperLink, ClipperRef};
use crate::models::video::{Video, VideoInput, VideoWithClippers};
use crate::repositories::SearchRepo;

/// Column list for `videos` queries.
const VIDEO_COLUMNS: &str = "\
    id, video_id, title, description, thumbnail_url, duration, \
    channel_title, tags, created_at, updated_at";

/// One association row joined with its clipper descriptor.
#[derive(Debug, FromRow)]
struct AssociationRow {
    video_id: DbId,
    clipper_id: DbId,
    name: String,
    brand: String,
    model: String,
}

/// Provides CRUD operations for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// List videos newest first, optionally filtered by a case-insensitive
    /// substring over title, description, and channel title.
    ///
    /// Returns the page of videos with their clippers attached, plus the
    /// total matching count.
    pub async fn list(
        pool: &PgPool,
        page: i64,
        page_size: i64,
        search: Option<&str>,
    ) -> Result<(Vec<VideoWithClippers>, i64), sqlx::Error> {
        let (where_clause, limit_idx) = match search {
            Some(_) => (
                "WHERE (title ILIKE $1 OR description ILIKE $1 OR channel_title ILIKE $1)",
                2,
            ),
            None => ("", 1),
        };

        let list_sql = format!(
            "SELECT {VIDEO_COLUMNS} FROM videos {where_clause} \
             ORDER BY created_at DESC, id ASC \
             LIMIT ${limit_idx} OFFSET ${offset_idx}",
            offset_idx = limit_idx + 1,
        );
        let count_sql = format!("SELECT COUNT(*) FROM videos {where_clause}");

        let mut list_query = sqlx::query_as::<_, Video>(&list_sql);
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        if let Some(needle) = search {
            let pattern = format!("%{needle}%");
            list_query = list_query.bind(pattern.clone());
            count_query = count_query.bind(pattern);
        }

        let videos = list_query
            .bind(page_size)
            .bind((page - 1) * page_size)
            .fetch_all(pool)
            .await?;
        let (total,) = count_query.fetch_one(pool).await?;

        Ok((Self::attach_clippers(pool, videos).await?, total))
    }

    /// Find a video by ID with its clippers attached.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<VideoWithClippers>, sqlx::Error> {
        let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1");

        let video = sqlx::query_as::<_, Video>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match video {
            Some(video) => {
                let mut videos = Self::attach_clippers(pool, vec![video]).await?;
                Ok(videos.pop())
            }
            None => Ok(None),
        }
    }

    /// Find a video by its external (YouTube) video ID.
    pub async fn find_by_video_id(
        pool: &PgPool,
        video_id: &str,
    ) -> Result<Option<Video>, sqlx::Error> {
        let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE video_id = $1");

        sqlx::query_as::<_, Video>(&sql)
            .bind(video_id)
            .fetch_optional(pool)
            .await
    }

    /// Create a video with its clipper associations, then refresh the
    /// search aggregate.
    pub async fn create(
        pool: &PgPool,
        input: &VideoInput,
    ) -> Result<VideoWithClippers, sqlx::Error> {
        let sql = format!(
            "INSERT INTO videos \
                 (video_id, title, description, thumbnail_url, duration, channel_title, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {VIDEO_COLUMNS}"
        );

        let mut tx = pool.begin().await?;

        let video = sqlx::query_as::<_, Video>(&sql)
            .bind(&input.video_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.thumbnail_url)
            .bind(&input.duration)
            .bind(&input.channel_title)
            .bind(Json(&input.tags))
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_associations(&mut tx, video.id, &input.clipper_ids).await?;
        tx.commit().await?;

        SearchRepo::refresh(pool).await?;

        let mut videos = Self::attach_clippers(pool, vec![video]).await?;
        Ok(videos.pop().expect("created video must be present"))
    }

    /// Replace a video's fields and clipper associations, then refresh the
    /// search aggregate. Returns `None` if the video does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &VideoInput,
    ) -> Result<Option<VideoWithClippers>, sqlx::Error> {
        let sql = format!(
            "UPDATE videos SET \
                 video_id = $2, title = $3, description = $4, thumbnail_url = $5, \
                 duration = $6, channel_title = $7, tags = $8, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {VIDEO_COLUMNS}"
        );

        let mut tx = pool.begin().await?;

        let video = sqlx::query_as::<_, Video>(&sql)
            .bind(id)
            .bind(&input.video_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.thumbnail_url)
            .bind(&input.duration)
            .bind(&input.channel_title)
            .bind(Json(&input.tags))
            .fetch_optional(&mut *tx)
            .await?;

        let Some(video) = video else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM video_clippers WHERE video_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_associations(&mut tx, id, &input.clipper_ids).await?;
        tx.commit().await?;

        SearchRepo::refresh(pool).await?;

        let mut videos = Self::attach_clippers(pool, vec![video]).await?;
        Ok(videos.pop())
    }

    /// Delete a video. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            SearchRepo::refresh(pool).await?;
        }
        Ok(deleted)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Insert the video/clipper association rows for one video.
    async fn insert_associations(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        video_id: DbId,
        clipper_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        if clipper_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO video_clippers (video_id, clipper_id) \
             SELECT $1, unnest($2::bigint[])",
        )
        .bind(video_id)
        .bind(clipper_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Load clipper descriptors for a batch of videos in one query.
    async fn attach_clippers(
        pool: &PgPool,
        videos: Vec<Video>,
    ) -> Result<Vec<VideoWithClippers>, sqlx::Error> {
        if videos.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<DbId> = videos.iter().map(|v| v.id).collect();
        let rows = sqlx::query_as::<_, AssociationRow>(
            "SELECT vc.video_id, c.id AS clipper_id, c.name, c.brand, c.model \
             FROM video_clippers vc \
             JOIN clippers c ON c.id = vc.clipper_id \
             WHERE vc.video_id = ANY($1) \
             ORDER BY c.id",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut links: BTreeMap<DbId, Vec<ClipperLink>> = BTreeMap::new();
        for row in rows {
            links.entry(row.video_id).or_default().push(ClipperLink {
                clipper: ClipperRef {
                    id: row.clipper_id,
                    name: row.name,
                    brand: row.brand,
                    model: row.model,
                },
            });
        }

        Ok(videos
            .into_iter()
            .map(|video| {
                let clippers = links.remove(&video.id).unwrap_or_default();
                VideoWithClippers { video, clippers }
            })
            .collect())
    }
}
