//! Repository for the faceted video search.
//!
//! Compiles the filter once, then embeds the identical rendered predicate in
//! the page query, the count query, and every facet query, so result rows
//! and facet counts always reflect the same filtered set. The six reads are
//! independent and are issued concurrently; if any of them fails the whole
//! search fails rather than returning a partial envelope.

use std::collections::BTreeMap;

use catalog_core::predicate::{CompiledPredicate, RenderedPredicate, SqlParam};
use catalog_core::search::SearchFilter;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::models::search::{
    FacetCount, Pagination, SearchFacets, SearchResultEnvelope, SearchableVideoRow, TagFacetRow,
};

/// Column list for `video_search_mv` row queries.
const SEARCH_COLUMNS: &str = "\
    id, video_id, title, description, channel_title, thumbnail_url, \
    duration, tags, clipper_details, created_at, updated_at";

/// Provides read operations against the `video_search_mv` aggregate.
pub struct SearchRepo;

impl SearchRepo {
    // -----------------------------------------------------------------------
    // Assembled search
    // -----------------------------------------------------------------------

    /// Execute a faceted search for a validated filter.
    ///
    /// Fans out the page fetch, the total count, and the four facet
    /// aggregations concurrently, then assembles the response envelope.
    pub async fn search(
        pool: &PgPool,
        filter: &SearchFilter,
    ) -> Result<SearchResultEnvelope, sqlx::Error> {
        let rendered = CompiledPredicate::compile(filter).render(1);

        let (rows, total, channels, brands, models, tags) = tokio::try_join!(
            Self::fetch_page(pool, &rendered, filter.page_size, filter.offset()),
            Self::count(pool, &rendered),
            Self::channel_facets(pool, &rendered),
            Self::brand_facets(pool, &rendered),
            Self::model_facets(pool, &rendered),
            Self::tag_facets(pool, &rendered),
        )?;

        Ok(SearchResultEnvelope {
            videos: rows.into_iter().map(Into::into).collect(),
            pagination: Pagination::new(filter.page, filter.page_size, total),
            facets: SearchFacets {
                channels,
                brands,
                models,
                tags,
            },
            input: filter.clone(),
        })
    }

    // -----------------------------------------------------------------------
    // Page fetch and count
    // -----------------------------------------------------------------------

    /// Fetch one page of matching rows, newest first.
    ///
    /// `id ASC` breaks creation-time ties so pagination is deterministic.
    async fn fetch_page(
        pool: &PgPool,
        rendered: &RenderedPredicate,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SearchableVideoRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {SEARCH_COLUMNS} \
             FROM video_search_mv \
             {where_sql} \
             ORDER BY created_at DESC, id ASC \
             LIMIT ${limit_idx} OFFSET ${offset_idx}",
            where_sql = rendered.where_sql,
            limit_idx = rendered.next_index,
            offset_idx = rendered.next_index + 1,
        );

        bind_params(sqlx::query_as::<_, SearchableVideoRow>(&sql), &rendered.params)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count all rows matching the predicate.
    async fn count(pool: &PgPool, rendered: &RenderedPredicate) -> Result<i64, sqlx::Error> {
        let sql = format!(
            "SELECT COUNT(*) FROM video_search_mv {where_sql}",
            where_sql = rendered.where_sql,
        );

        let (count,) = bind_params(sqlx::query_as::<_, (i64,)>(&sql), &rendered.params)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    // -----------------------------------------------------------------------
    // Facet aggregation
    // -----------------------------------------------------------------------
    //
    // Facet counts apply the full predicate, including the dimension being
    // faceted: selecting a brand shows that brand's count frozen at the
    // post-filter total. Kept for compatibility with the existing UI.

    /// Channel facet counts (single-valued per row).
    async fn channel_facets(
        pool: &PgPool,
        rendered: &RenderedPredicate,
    ) -> Result<Vec<FacetCount>, sqlx::Error> {
        let sql = format!(
            "SELECT channel_title AS value, COUNT(*) AS count \
             FROM video_search_mv \
             {where_sql} \
             GROUP BY channel_title \
             ORDER BY count DESC, value ASC",
            where_sql = rendered.where_sql,
        );

        bind_params(sqlx::query_as::<_, FacetCount>(&sql), &rendered.params)
            .fetch_all(pool)
            .await
    }

    /// Brand facet counts; a video contributes to every brand in its set.
    async fn brand_facets(
        pool: &PgPool,
        rendered: &RenderedPredicate,
    ) -> Result<Vec<FacetCount>, sqlx::Error> {
        Self::array_facets(pool, rendered, "brands").await
    }

    /// Model facet counts; a video contributes to every model in its set.
    async fn model_facets(
        pool: &PgPool,
        rendered: &RenderedPredicate,
    ) -> Result<Vec<FacetCount>, sqlx::Error> {
        Self::array_facets(pool, rendered, "models").await
    }

    /// Group-count an array column by unnesting it per matching row.
    ///
    /// `column` is one of the fixed identifiers above, never user input.
    async fn array_facets(
        pool: &PgPool,
        rendered: &RenderedPredicate,
        column: &str,
    ) -> Result<Vec<FacetCount>, sqlx::Error> {
        let sql = format!(
            "SELECT entry AS value, COUNT(*) AS count \
             FROM video_search_mv, unnest({column}) AS entry \
             {where_sql} \
             GROUP BY entry \
             ORDER BY count DESC, value ASC",
            where_sql = rendered.where_sql,
        );

        bind_params(sqlx::query_as::<_, FacetCount>(&sql), &rendered.params)
            .fetch_all(pool)
            .await
    }

    /// Tag facet counts, regrouped from (key, value) pairs into a per-key map.
    async fn tag_facets(
        pool: &PgPool,
        rendered: &RenderedPredicate,
    ) -> Result<BTreeMap<String, Vec<FacetCount>>, sqlx::Error> {
        let sql = format!(
            "SELECT key, value, COUNT(*) AS count \
             FROM video_search_mv, LATERAL jsonb_each_text(tags) AS tag(key, value) \
             {where_sql} \
             GROUP BY key, value \
             ORDER BY key ASC, count DESC, value ASC",
            where_sql = rendered.where_sql,
        );

        let rows = bind_params(sqlx::query_as::<_, TagFacetRow>(&sql), &rendered.params)
            .fetch_all(pool)
            .await?;

        let mut by_key: BTreeMap<String, Vec<FacetCount>> = BTreeMap::new();
        for row in rows {
            by_key.entry(row.key).or_default().push(FacetCount {
                value: row.value,
                count: row.count,
            });
        }
        Ok(by_key)
    }

    // -----------------------------------------------------------------------
    // Aggregate refresh
    // -----------------------------------------------------------------------

    /// Rebuild the search aggregate from the live tables.
    ///
    /// Called by the video/clipper write paths after any change that feeds
    /// the aggregate. Readers in between see the previous projection.
    pub async fn refresh(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query("REFRESH MATERIALIZED VIEW video_search_mv")
            .execute(pool)
            .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bind the rendered predicate's parameters in placeholder order.
fn bind_params<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q [SqlParam],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(value) => query.bind(value),
            SqlParam::TextArray(values) => query.bind(values),
        };
    }
    query
}
