//! Repository for clipper products.

use catalog_core::types::DbId;
use sqlx::PgPool;

use crate::models::clipper::{Clipper, ClipperInput};
use crate::repositories::SearchRepo;

/// Column list for `clippers` queries.
const CLIPPER_COLUMNS: &str = "\
    id, name, brand, model, description, amazon_url, image_urls, \
    created_at, updated_at";

/// Provides CRUD operations for clippers.
pub struct ClipperRepo;

impl ClipperRepo {
    /// List clippers newest first, optionally filtered by a case-insensitive
    /// substring over name, brand, model, and description.
    pub async fn list(
        pool: &PgPool,
        page: i64,
        page_size: i64,
        search: Option<&str>,
    ) -> Result<(Vec<Clipper>, i64), sqlx::Error> {
        let (where_clause, limit_idx) = match search {
            Some(_) => (
                "WHERE (name ILIKE $1 OR brand ILIKE $1 OR model ILIKE $1 OR description ILIKE $1)",
                2,
            ),
            None => ("", 1),
        };

        let list_sql = format!(
            "SELECT {CLIPPER_COLUMNS} FROM clippers {where_clause} \
             ORDER BY created_at DESC, id ASC \
             LIMIT ${limit_idx} OFFSET ${offset_idx}",
            offset_idx = limit_idx + 1,
        );
        let count_sql = format!("SELECT COUNT(*) FROM clippers {where_clause}");

        let mut list_query = sqlx::query_as::<_, Clipper>(&list_sql);
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        if let Some(needle) = search {
            let pattern = format!("%{needle}%");
            list_query = list_query.bind(pattern.clone());
            count_query = count_query.bind(pattern);
        }

        let clippers = list_query
            .bind(page_size)
            .bind((page - 1) * page_size)
            .fetch_all(pool)
            .await?;
        let (total,) = count_query.fetch_one(pool).await?;

        Ok((clippers, total))
    }

    /// Find a clipper by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Clipper>, sqlx::Error> {
        let sql = format!("SELECT {CLIPPER_COLUMNS} FROM clippers WHERE id = $1");

        sqlx::query_as::<_, Clipper>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a clipper.
    ///
    /// No aggregate refresh: a new clipper has no video associations yet, so
    /// it cannot appear in the search projection.
    pub async fn create(pool: &PgPool, input: &ClipperInput) -> Result<Clipper, sqlx::Error> {
        let sql = format!(
            "INSERT INTO clippers (name, brand, model, description, amazon_url, image_urls) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {CLIPPER_COLUMNS}"
        );

        sqlx::query_as::<_, Clipper>(&sql)
            .bind(&input.name)
            .bind(&input.brand)
            .bind(&input.model)
            .bind(&input.description)
            .bind(&input.amazon_url)
            .bind(&input.image_urls)
            .fetch_one(pool)
            .await
    }

    /// Replace a clipper's fields, then refresh the search aggregate (its
    /// brand/model feed the derived sets). Returns `None` if it does not
    /// exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ClipperInput,
    ) -> Result<Option<Clipper>, sqlx::Error> {
        let sql = format!(
            "UPDATE clippers SET \
                 name = $2, brand = $3, model = $4, description = $5, \
                 amazon_url = $6, image_urls = $7, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {CLIPPER_COLUMNS}"
        );

        let clipper = sqlx::query_as::<_, Clipper>(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(&input.brand)
            .bind(&input.model)
            .bind(&input.description)
            .bind(&input.amazon_url)
            .bind(&input.image_urls)
            .fetch_optional(pool)
            .await?;

        if clipper.is_some() {
            SearchRepo::refresh(pool).await?;
        }
        Ok(clipper)
    }

    /// Delete a clipper (associations cascade), then refresh the search
    /// aggregate. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clippers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            SearchRepo::refresh(pool).await?;
        }
        Ok(deleted)
    }
}
