#![allow(clippy::unwrap_used)]
// Catalog fetch flows against a wiremock metadata API.

use std::sync::Arc;
use std::time::Duration;

use marquee_api::Credentials;
use marquee_core::{
    AppContext, CatalogCategory, CatalogRequest, ContextConfig, CoreError, FetchOutcome,
    MemoryStorage, MovieId,
};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AppContext) {
    let server = MockServer::start().await;
    let config = ContextConfig::new(
        Url::parse(&format!("{}/3/", server.uri())).unwrap(),
        Some(Credentials::ApiKey(SecretString::from("test-key"))),
    );
    let ctx = AppContext::new(config, Arc::new(MemoryStorage::new())).unwrap();
    (server, ctx)
}

fn page(movies: &[(i64, &str)]) -> serde_json::Value {
    let results: Vec<_> = movies
        .iter()
        .map(|(id, title)| json!({ "id": id, "title": title, "vote_average": 7.1 }))
        .collect();
    json!({ "page": 1, "results": results, "total_pages": 1, "total_results": movies.len() })
}

fn titles(ctx: &AppContext, category: CatalogCategory) -> Vec<String> {
    ctx.catalog()
        .items(category)
        .into_iter()
        .map(|m| m.title)
        .collect()
}

// ── Successful loads ────────────────────────────────────────────────

#[tokio::test]
async fn test_load_popular_applies_converted_results() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "id": 1, "title": "Alien" },
                { "id": null, "title": "No id" },
                { "id": 2, "title": "" },
                { "id": 3, "title": "Aliens" }
            ]
        })))
        .mount(&server)
        .await;

    let service = ctx.catalog_service().unwrap();
    let scope = ctx.fetch_scope();
    let outcome = service
        .load(&scope, CatalogRequest::Popular { page: 1 })
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Applied);
    assert_eq!(titles(&ctx, CatalogCategory::Popular), vec!["Alien", "Aliens"]);
    let snap = ctx.catalog().snapshot();
    assert!(!snap.loading);
    assert_eq!(snap.error, None);
}

#[tokio::test]
async fn test_load_curated_fills_every_row() {
    let (server, ctx) = setup().await;

    for (endpoint, title) in [
        ("/3/movie/now_playing", "Now"),
        ("/3/movie/popular", "Pop"),
        ("/3/movie/top_rated", "Top"),
        ("/3/movie/upcoming", "Soon"),
        ("/3/trending/movie/day", "Hot"),
    ] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&[(1, title)])))
            .mount(&server)
            .await;
    }

    let service = ctx.catalog_service().unwrap();
    let scope = ctx.fetch_scope();
    let results = service.load_curated(&scope, 1).await;

    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|(_, r)| matches!(r, Ok(FetchOutcome::Applied))));
    assert_eq!(titles(&ctx, CatalogCategory::Upcoming), vec!["Soon"]);
    assert_eq!(titles(&ctx, CatalogCategory::Trending), vec!["Hot"]);
    assert!(!ctx.catalog().snapshot().loading);
}

#[tokio::test]
async fn test_load_detail_sets_detail_record() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/603"))
        .and(query_param("append_to_response", "videos,credits,similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 603,
            "title": "The Matrix",
            "overview": "Red pill or blue pill.",
            "runtime": 136,
            "genres": [{ "id": 28, "name": "Action" }],
            "videos": { "results": [{ "key": "abc", "name": "Official Trailer", "site": "YouTube", "type": "Trailer" }] }
        })))
        .mount(&server)
        .await;

    let service = ctx.catalog_service().unwrap();
    let scope = ctx.fetch_scope();
    let outcome = service
        .load_detail(&scope, MovieId::new(603).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Applied);
    let detail = ctx.catalog().detail().unwrap();
    assert_eq!(detail.summary.title, "The Matrix");
    assert_eq!(detail.trailer.as_ref().unwrap().key, "abc");
    assert_eq!(titles(&ctx, CatalogCategory::Detail), vec!["The Matrix"]);
}

// ── Failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_failure_records_error_and_keeps_other_results() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[(1, "Kept")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/movie/top_rated"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status_code": 11, "status_message": "Internal error."
        })))
        .mount(&server)
        .await;

    let service = ctx.catalog_service().unwrap();
    let scope = ctx.fetch_scope();
    service
        .load(&scope, CatalogRequest::Popular { page: 1 })
        .await
        .unwrap();
    let err = service
        .load(&scope, CatalogRequest::TopRated { page: 1 })
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    let snap = ctx.catalog().snapshot();
    assert_eq!(snap.error.as_deref(), Some("Failed to load movies. Please try again"));
    assert!(!snap.loading);
    assert_eq!(titles(&ctx, CatalogCategory::Popular), vec!["Kept"]);
}

#[tokio::test]
async fn test_failure_keeps_loading_while_other_fetch_in_flight() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(&[(1, "Slow")]))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/movie/top_rated"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status_code": 11, "status_message": "Internal error."
        })))
        .mount(&server)
        .await;

    let service = ctx.catalog_service().unwrap();
    let scope = ctx.fetch_scope();

    let (slow, failed_snapshot) = tokio::join!(
        service.load(&scope, CatalogRequest::Popular { page: 1 }),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let err = service
                .load(&scope, CatalogRequest::TopRated { page: 1 })
                .await;
            assert!(err.is_err());
            ctx.catalog().snapshot()
        }
    );

    assert!(failed_snapshot.loading);
    assert!(failed_snapshot.error.is_some());

    assert_eq!(slow.unwrap(), FetchOutcome::Applied);
    let snap = ctx.catalog().snapshot();
    assert!(!snap.loading);
    assert_eq!(titles(&ctx, CatalogCategory::Popular), vec!["Slow"]);
}

#[tokio::test]
async fn test_missing_detail_is_not_found() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status_code": 34, "status_message": "The resource you requested could not be found."
        })))
        .mount(&server)
        .await;

    let service = ctx.catalog_service().unwrap();
    let scope = ctx.fetch_scope();
    let err = service
        .load_detail(&scope, MovieId::new(42).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::NotFound { .. }));
    assert_eq!(ctx.catalog().detail(), None);
}

// ── Cancellation and staleness ──────────────────────────────────────

#[tokio::test]
async fn test_cancelled_scope_drops_late_result() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/upcoming"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(&[(1, "Too late")]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let service = ctx.catalog_service().unwrap();
    let scope = ctx.fetch_scope();

    let (outcome, ()) = tokio::join!(
        service.load(&scope, CatalogRequest::Upcoming { page: 1 }),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            scope.cancel();
        }
    );

    assert_eq!(outcome.unwrap(), FetchOutcome::Cancelled);
    assert!(ctx.catalog().items(CatalogCategory::Upcoming).is_empty());
    assert!(!ctx.catalog().snapshot().loading);
}

#[tokio::test]
async fn test_newer_search_supersedes_older() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(&[(1, "Slow result")]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[(2, "Fast result")])))
        .mount(&server)
        .await;

    let service = ctx.catalog_service().unwrap();
    let scope = ctx.fetch_scope();

    let (slow, fast) = tokio::join!(service.search(&scope, "slow"), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        service.search(&scope, "fast").await
    });

    assert_eq!(fast.unwrap(), FetchOutcome::Applied);
    assert_eq!(slow.unwrap(), FetchOutcome::Superseded);
    assert_eq!(titles(&ctx, CatalogCategory::Search), vec!["Fast result"]);
    assert!(!ctx.catalog().snapshot().loading);
}

#[tokio::test]
async fn test_blank_search_clears_without_network() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[(1, "Hit")])))
        .expect(1)
        .mount(&server)
        .await;

    let service = ctx.catalog_service().unwrap();
    let scope = ctx.fetch_scope();
    service.search(&scope, "hit").await.unwrap();
    assert_eq!(titles(&ctx, CatalogCategory::Search), vec!["Hit"]);

    let outcome = service.search(&scope, "   ").await.unwrap();
    assert_eq!(outcome, FetchOutcome::Applied);
    assert!(ctx.catalog().snapshot().entry(CatalogCategory::Search).is_none());
}

#[tokio::test]
async fn test_dispose_cancels_in_flight_fetches() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/now_playing"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(&[(1, "Never shown")]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let service = ctx.catalog_service().unwrap();
    let scope = ctx.fetch_scope();

    let (outcome, ()) = tokio::join!(
        service.load(&scope, CatalogRequest::NowPlaying { page: 1 }),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            ctx.dispose().await;
        }
    );

    assert_eq!(outcome.unwrap(), FetchOutcome::Cancelled);
    assert!(ctx.catalog().items(CatalogCategory::NowPlaying).is_empty());
    assert!(matches!(ctx.catalog_service(), Err(CoreError::Disposed)));
}

#[tokio::test]
async fn test_genres_are_mapped() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/genre/movie/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "genres": [{ "id": 18, "name": "Drama" }]
        })))
        .mount(&server)
        .await;

    let genres = ctx.catalog_service().unwrap().genres().await.unwrap();
    assert_eq!(genres.len(), 1);
    assert_eq!(genres[0].name, "Drama");
}
