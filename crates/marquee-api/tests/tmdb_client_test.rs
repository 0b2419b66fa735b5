#![allow(clippy::unwrap_used)]
// Integration tests for `TmdbClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use marquee_api::{
    Credentials, DiscoverFilters, Error, TmdbClient, TransportConfig, TrendingWindow,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, TmdbClient) {
    let server = MockServer::start().await;
    let client = TmdbClient::new(
        &format!("{}/3", server.uri()),
        Credentials::ApiKey(SecretString::from("test-key")),
        &TransportConfig::default(),
        None,
    )
    .unwrap();
    (server, client)
}

fn movie_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "overview": "An overview",
        "poster_path": "/poster.jpg",
        "backdrop_path": null,
        "release_date": "1999-03-31",
        "vote_average": 8.2,
        "genre_ids": [28, 878]
    })
}

fn page_json(results: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "page": 1,
        "results": results,
        "total_pages": 1,
        "total_results": 1
    })
}

// ── List endpoints ──────────────────────────────────────────────────

#[tokio::test]
async fn test_popular_sends_key_language_and_page() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("language", "en-US"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![movie_json(
            603,
            "The Matrix",
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.popular(2).await.unwrap();
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].id, Some(603));
    assert_eq!(page.results[0].title.as_deref(), Some("The Matrix"));
    assert_eq!(page.results[0].backdrop_path, None);
}

#[tokio::test]
async fn test_trending_uses_window_segment() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/trending/movie/week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.trending(TrendingWindow::Week).await.unwrap();
    assert!(page.results.is_empty());
}

#[tokio::test]
async fn test_page_tolerates_missing_fields() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/upcoming"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "results": [{ "id": 1 }, {}] })),
        )
        .mount(&server)
        .await;

    let page = client.upcoming(1).await.unwrap();
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[1].id, None);
    assert_eq!(page.total_pages, 0);
}

// ── Details ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_movie_details_appends_sub_resources() {
    let (server, client) = setup().await;

    let mut body = movie_json(603, "The Matrix");
    body["runtime"] = json!(136);
    body["genres"] = json!([{ "id": 28, "name": "Action" }]);
    body["videos"] = json!({
        "results": [{ "key": "vKQi3bBA1y8", "name": "Trailer", "site": "YouTube", "type": "Trailer" }]
    });
    body["credits"] = json!({ "cast": [{ "id": 6384, "name": "Keanu Reeves", "character": "Neo", "order": 0 }] });
    body["similar"] = page_json(vec![movie_json(604, "The Matrix Reloaded")]);

    Mock::given(method("GET"))
        .and(path("/3/movie/603"))
        .and(query_param("append_to_response", "videos,credits,similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let details = client.movie_details(603).await.unwrap();
    assert_eq!(details.movie.id, Some(603));
    assert_eq!(details.runtime, Some(136));
    assert_eq!(details.genres[0].name, "Action");
    assert_eq!(details.videos.unwrap().results[0].video_type, "Trailer");
    assert_eq!(details.credits.unwrap().cast[0].name, "Keanu Reeves");
    assert_eq!(details.similar.unwrap().results.len(), 1);
}

// ── Search / discover ───────────────────────────────────────────────

#[tokio::test]
async fn test_search_passes_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "blade runner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![movie_json(
            78,
            "Blade Runner",
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.search_movies("blade runner", 1).await.unwrap();
    assert_eq!(page.results[0].id, Some(78));
}

#[tokio::test]
async fn test_movies_by_genre_sorts_by_popularity() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/discover/movie"))
        .and(query_param("with_genres", "28"))
        .and(query_param("sort_by", "popularity.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![])))
        .expect(1)
        .mount(&server)
        .await;

    client.movies_by_genre(28, 1).await.unwrap();
}

#[tokio::test]
async fn test_discover_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/discover/movie"))
        .and(query_param("primary_release_year", "1999"))
        .and(query_param("vote_average.gte", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let filters = DiscoverFilters {
        year: Some(1999),
        min_rating: Some(7.0),
        ..DiscoverFilters::default()
    };
    client.discover(&filters).await.unwrap();
}

#[tokio::test]
async fn test_movie_genres() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/genre/movie/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "genres": [{ "id": 28, "name": "Action" }, { "id": 35, "name": "Comedy" }]
        })))
        .mount(&server)
        .await;

    let list = client.movie_genres().await.unwrap();
    assert_eq!(list.genres.len(), 2);
    assert_eq!(list.genres[1].name, "Comedy");
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_sent_as_header() {
    let server = MockServer::start().await;
    let client = TmdbClient::new(
        &server.uri(),
        Credentials::BearerToken(SecretString::from("tok")),
        &TransportConfig::default(),
        Some("fr-FR"),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/movie/top_rated"))
        .and(header("authorization", "Bearer tok"))
        .and(query_param("language", "fr-FR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![])))
        .expect(1)
        .mount(&server)
        .await;

    client.top_rated(1).await.unwrap();
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_invalid_credentials() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/now_playing"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_code": 7,
            "status_message": "Invalid API key: You must be granted a valid key."
        })))
        .mount(&server)
        .await;

    let result = client.now_playing(1).await;
    assert!(
        matches!(result, Err(Error::InvalidCredentials)),
        "expected InvalidCredentials, got: {result:?}"
    );
}

#[tokio::test]
async fn test_missing_movie_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/999999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        })))
        .mount(&server)
        .await;

    let err = client.movie_details(999_999).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .mount(&server)
        .await;

    let err = client.popular(1).await.unwrap_err();
    assert!(matches!(err, Error::RateLimited { retry_after_secs: 12 }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_server_error_parses_status_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "status_code": 43,
            "status_message": "Service offline."
        })))
        .mount(&server)
        .await;

    match client.popular(1).await.unwrap_err() {
        Error::Api {
            status,
            status_code,
            message,
        } => {
            assert_eq!(status, 503);
            assert_eq!(status_code, Some(43));
            assert_eq!(message, "Service offline.");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.popular(1).await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
