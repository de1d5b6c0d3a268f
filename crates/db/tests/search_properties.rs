//! Integration tests for the faceted search against a live Postgres.
//!
//! Seeds a small catalog through the repositories (which refresh the search
//! aggregate on write), then exercises filtering, pagination, and facet
//! counting semantics end to end.

use std::collections::BTreeMap;

use catalog_core::search::{SearchFilter, SearchRequest};
use catalog_core::types::DbId;
use catalog_db::models::clipper::ClipperInput;
use catalog_db::models::search::{FacetCount, SearchResultEnvelope};
use catalog_db::models::video::VideoInput;
use catalog_db::repositories::{ClipperRepo, SearchRepo, VideoRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn clipper_input(name: &str, brand: &str, model: &str) -> ClipperInput {
    ClipperInput {
        name: name.to_string(),
        brand: brand.to_string(),
        model: model.to_string(),
        description: String::new(),
        amazon_url: String::new(),
        image_urls: Vec::new(),
    }
}

fn video_input(
    video_id: &str,
    title: &str,
    channel: &str,
    tags: &[(&str, &str)],
    clipper_ids: &[DbId],
) -> VideoInput {
    VideoInput {
        video_id: video_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        thumbnail_url: String::new(),
        duration: String::new(),
        channel_title: channel.to_string(),
        tags: tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        clipper_ids: clipper_ids.to_vec(),
    }
}

/// Seed the three-video catalog used throughout:
///
/// - video1: tags `{hairstyle: fade}`, brands `[Andis]`, ChannelOne,
///   title contains "fade" (mixed case)
/// - video2: tags `{hairstyle: mohawk}`, brands `[Wahl]`, ChannelTwo
/// - video3: no tags, brands `[Andis, Wahl]`, ChannelOne
///
/// Returns the three video IDs in creation order.
async fn seed_catalog(pool: &PgPool) -> (DbId, DbId, DbId) {
    let andis = ClipperRepo::create(pool, &clipper_input("Andis Fade Master", "Andis", "Master"))
        .await
        .unwrap();
    let wahl = ClipperRepo::create(pool, &clipper_input("Wahl Magic Clip", "Wahl", "Magic Clip"))
        .await
        .unwrap();

    let v1 = VideoRepo::create(
        pool,
        &video_input(
            "yt-1",
            "Skin FADE tutorial",
            "ChannelOne",
            &[("hairstyle", "fade")],
            &[andis.id],
        ),
    )
    .await
    .unwrap();

    let v2 = VideoRepo::create(
        pool,
        &video_input(
            "yt-2",
            "Mohawk styling guide",
            "ChannelTwo",
            &[("hairstyle", "mohawk")],
            &[wahl.id],
        ),
    )
    .await
    .unwrap();

    let v3 = VideoRepo::create(
        pool,
        &video_input(
            "yt-3",
            "Clipper maintenance basics",
            "ChannelOne",
            &[],
            &[andis.id, wahl.id],
        ),
    )
    .await
    .unwrap();

    (v1.video.id, v2.video.id, v3.video.id)
}

async fn search(pool: &PgPool, request: SearchRequest) -> SearchResultEnvelope {
    let filter = SearchFilter::from_request(request).expect("filter should validate");
    SearchRepo::search(pool, &filter).await.expect("search should succeed")
}

fn tags(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(key, values)| {
            (
                key.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}

fn result_ids(envelope: &SearchResultEnvelope) -> Vec<DbId> {
    envelope.videos.iter().map(|v| v.id).collect()
}

// ---------------------------------------------------------------------------
// Filtering semantics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_filter_selects_entire_catalog(pool: PgPool) {
    seed_catalog(&pool).await;

    let envelope = search(&pool, SearchRequest::default()).await;

    assert_eq!(envelope.pagination.total, 3);
    assert_eq!(envelope.videos.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dimensions_combine_with_and(pool: PgPool) {
    let (_, _, v3) = seed_catalog(&pool).await;

    // ChannelOne matches v1 and v3; Wahl matches v2 and v3; the
    // intersection is exactly v3.
    let envelope = search(
        &pool,
        SearchRequest {
            channels: vec!["ChannelOne".to_string()],
            brands: vec!["Wahl".to_string()],
            ..Default::default()
        },
    )
    .await;

    assert_eq!(result_ids(&envelope), vec![v3]);
    assert_eq!(envelope.pagination.total, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn values_within_a_dimension_combine_with_or(pool: PgPool) {
    let (v1, v2, v3) = seed_catalog(&pool).await;

    let wahl_only = search(
        &pool,
        SearchRequest {
            brands: vec!["Wahl".to_string()],
            ..Default::default()
        },
    )
    .await;
    let mut ids = result_ids(&wahl_only);
    ids.sort();
    assert_eq!(ids, vec![v2, v3]);

    // Selecting both brands is the union, not the intersection.
    let both = search(
        &pool,
        SearchRequest {
            brands: vec!["Andis".to_string(), "Wahl".to_string()],
            ..Default::default()
        },
    )
    .await;
    let mut ids = result_ids(&both);
    ids.sort();
    assert_eq!(ids, vec![v1, v2, v3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tag_filters_match_exactly(pool: PgPool) {
    let (v1, v2, _) = seed_catalog(&pool).await;

    let fade = search(
        &pool,
        SearchRequest {
            tags: tags(&[("hairstyle", &["fade"])]),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(result_ids(&fade), vec![v1]);

    let mohawk = search(
        &pool,
        SearchRequest {
            tags: tags(&[("hairstyle", &["mohawk"])]),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(result_ids(&mohawk), vec![v2]);

    // An absent tag key never matches.
    let beginner = search(
        &pool,
        SearchRequest {
            tags: tags(&[("difficulty", &["beginner"])]),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(beginner.pagination.total, 0);
    assert!(beginner.videos.is_empty());
    assert_eq!(beginner.pagination.total_pages, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn multiple_tag_keys_combine_with_and(pool: PgPool) {
    seed_catalog(&pool).await;

    // v1 has hairstyle=fade but no difficulty tag, so both keys together
    // match nothing.
    let envelope = search(
        &pool,
        SearchRequest {
            tags: tags(&[("hairstyle", &["fade"]), ("difficulty", &["beginner"])]),
            ..Default::default()
        },
    )
    .await;

    assert_eq!(envelope.pagination.total, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn free_text_search_is_case_insensitive_substring(pool: PgPool) {
    let (v1, _, _) = seed_catalog(&pool).await;

    // Only video1's title contains "fade" (as "FADE").
    let envelope = search(
        &pool,
        SearchRequest {
            search: Some("fade".to_string()),
            ..Default::default()
        },
    )
    .await;

    assert_eq!(result_ids(&envelope), vec![v1]);
    assert_eq!(envelope.pagination.total, 1);
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn pagination_math_rounds_up(pool: PgPool) {
    seed_catalog(&pool).await;

    let envelope = search(
        &pool,
        SearchRequest {
            page_size: Some(2),
            ..Default::default()
        },
    )
    .await;

    assert_eq!(envelope.videos.len(), 2);
    assert_eq!(envelope.pagination.total, 3);
    assert_eq!(envelope.pagination.total_pages, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pages_are_disjoint_and_cover_the_filtered_set(pool: PgPool) {
    let (v1, v2, v3) = seed_catalog(&pool).await;

    let page1 = search(
        &pool,
        SearchRequest {
            page: Some(1),
            page_size: Some(2),
            ..Default::default()
        },
    )
    .await;
    let page2 = search(
        &pool,
        SearchRequest {
            page: Some(2),
            page_size: Some(2),
            ..Default::default()
        },
    )
    .await;

    let mut all_ids = result_ids(&page1);
    all_ids.extend(result_ids(&page2));
    assert_eq!(all_ids.len(), 3, "no duplicate across pages");

    all_ids.sort();
    assert_eq!(all_ids, vec![v1, v2, v3]);
}

// ---------------------------------------------------------------------------
// Facet counts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn channel_facet_counts_sum_to_total(pool: PgPool) {
    seed_catalog(&pool).await;

    let unfiltered = search(&pool, SearchRequest::default()).await;
    let sum: i64 = unfiltered.facets.channels.iter().map(|f| f.count).sum();
    assert_eq!(sum, unfiltered.pagination.total);
    assert_eq!(
        unfiltered.facets.channels,
        vec![
            FacetCount {
                value: "ChannelOne".to_string(),
                count: 2
            },
            FacetCount {
                value: "ChannelTwo".to_string(),
                count: 1
            },
        ]
    );

    // The property holds under a filter too: every matching row has
    // exactly one channel.
    let filtered = search(
        &pool,
        SearchRequest {
            brands: vec!["Andis".to_string()],
            ..Default::default()
        },
    )
    .await;
    let sum: i64 = filtered.facets.channels.iter().map(|f| f.count).sum();
    assert_eq!(sum, filtered.pagination.total);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn facet_counts_reflect_the_filtered_set(pool: PgPool) {
    let (v1, _, _) = seed_catalog(&pool).await;

    // Scenario: filtering to hairstyle=fade leaves only video1, so the
    // brands facet shows Andis alone -- Wahl has no matching video.
    let envelope = search(
        &pool,
        SearchRequest {
            tags: tags(&[("hairstyle", &["fade"])]),
            ..Default::default()
        },
    )
    .await;

    assert_eq!(result_ids(&envelope), vec![v1]);
    assert_eq!(envelope.pagination.total, 1);
    assert_eq!(
        envelope.facets.brands,
        vec![FacetCount {
            value: "Andis".to_string(),
            count: 1
        }]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn facet_counts_include_the_faceted_dimension_itself(pool: PgPool) {
    seed_catalog(&pool).await;

    // Selecting a brand keeps the full predicate in its own facet query:
    // Andis shows its post-filter count, and Wahl still appears because
    // video3 matches and carries both brands.
    let envelope = search(
        &pool,
        SearchRequest {
            brands: vec!["Andis".to_string()],
            ..Default::default()
        },
    )
    .await;

    assert_eq!(envelope.pagination.total, 2);
    assert_eq!(
        envelope.facets.brands,
        vec![
            FacetCount {
                value: "Andis".to_string(),
                count: 2
            },
            FacetCount {
                value: "Wahl".to_string(),
                count: 1
            },
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tag_facets_group_by_key(pool: PgPool) {
    seed_catalog(&pool).await;

    let envelope = search(&pool, SearchRequest::default()).await;

    assert_eq!(envelope.facets.tags.len(), 1);
    assert_eq!(
        envelope.facets.tags["hairstyle"],
        vec![
            FacetCount {
                value: "fade".to_string(),
                count: 1
            },
            FacetCount {
                value: "mohawk".to_string(),
                count: 1
            },
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn a_video_contributes_to_every_brand_bucket_it_carries(pool: PgPool) {
    seed_catalog(&pool).await;

    let envelope = search(&pool, SearchRequest::default()).await;

    // 3 videos but 4 brand contributions: video3 carries both brands.
    assert_eq!(
        envelope.facets.brands,
        vec![
            FacetCount {
                value: "Andis".to_string(),
                count: 2
            },
            FacetCount {
                value: "Wahl".to_string(),
                count: 2
            },
        ]
    );
}

// ---------------------------------------------------------------------------
// Determinism and envelope shape
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn identical_requests_yield_identical_envelopes(pool: PgPool) {
    seed_catalog(&pool).await;

    let request = || SearchRequest {
        search: Some("tutorial".to_string()),
        brands: vec!["Wahl".to_string(), "Andis".to_string()],
        page_size: Some(2),
        ..Default::default()
    };

    let first = serde_json::to_value(search(&pool, request()).await).unwrap();
    let second = serde_json::to_value(search(&pool, request()).await).unwrap();
    assert_eq!(first, second);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn envelope_projects_clipper_details_and_echoes_input(pool: PgPool) {
    seed_catalog(&pool).await;

    let envelope = search(
        &pool,
        SearchRequest {
            tags: tags(&[("hairstyle", &["fade"])]),
            ..Default::default()
        },
    )
    .await;

    let video = &envelope.videos[0];
    assert_eq!(video.video_id, "yt-1");
    assert_eq!(video.tags["hairstyle"], "fade");
    assert_eq!(video.clippers.len(), 1);
    assert_eq!(video.clippers[0].clipper.brand, "Andis");
    assert_eq!(video.clippers[0].clipper.model, "Master");

    assert_eq!(envelope.input.tags["hairstyle"], vec!["fade".to_string()]);
}

// ---------------------------------------------------------------------------
// Aggregate refresh
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn association_changes_are_visible_after_write(pool: PgPool) {
    let (v1, _, _) = seed_catalog(&pool).await;

    // Re-point video1 at Wahl instead of Andis.
    let wahl = ClipperRepo::list(&pool, 1, 100, Some("Wahl"))
        .await
        .unwrap()
        .0
        .into_iter()
        .find(|c| c.brand == "Wahl")
        .unwrap();

    VideoRepo::update(
        &pool,
        v1,
        &video_input(
            "yt-1",
            "Skin FADE tutorial",
            "ChannelOne",
            &[("hairstyle", "fade")],
            &[wahl.id],
        ),
    )
    .await
    .unwrap();

    let envelope = search(
        &pool,
        SearchRequest {
            brands: vec!["Andis".to_string()],
            ..Default::default()
        },
    )
    .await;

    // Only video3 still carries Andis.
    assert_eq!(envelope.pagination.total, 1);
}
