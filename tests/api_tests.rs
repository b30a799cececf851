use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use anime_sources_api::{
    error::ProviderError,
    middleware::cors_layer,
    models::{KodikLinksResponse, KodikSearchResponse, LinksRequest, TranslationType},
    routes::{create_router, AppState},
    services::{providers::VideoProvider, sources::ResolverSettings},
};

const FRONTEND_ORIGIN: &str = "https://mkseven2.github.io";

/// Upstream stand-in that replays canned JSON and counts calls
#[derive(Default)]
struct FakeProvider {
    search_body: Option<Value>,
    links_body: Option<Value>,
    fail_with: Option<fn() -> ProviderError>,
    calls: AtomicUsize,
    last_translation_type: std::sync::Mutex<Option<TranslationType>>,
}

impl FakeProvider {
    fn with_search(body: Value) -> Self {
        Self {
            search_body: Some(body),
            ..Default::default()
        }
    }

    fn with_links(body: Value) -> Self {
        Self {
            links_body: Some(body),
            ..Default::default()
        }
    }

    fn failing(error: fn() -> ProviderError) -> Self {
        Self {
            fail_with: Some(error),
            ..Default::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl VideoProvider for FakeProvider {
    async fn search(&self, _title: &str, _limit: usize) -> Result<KodikSearchResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.fail_with {
            return Err(error());
        }
        Ok(serde_json::from_value(self.search_body.clone().unwrap_or(json!({})))?)
    }

    async fn get_links(&self, request: &LinksRequest) -> Result<KodikLinksResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_translation_type.lock().unwrap() = Some(request.translation_type);
        if let Some(error) = self.fail_with {
            return Err(error());
        }
        Ok(serde_json::from_value(self.links_body.clone().unwrap_or(json!({})))?)
    }

    async fn find_title(&self, _id: &str) -> Result<Option<String>, ProviderError> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn create_test_server(provider: Arc<FakeProvider>) -> TestServer {
    let state = AppState::new(provider, 20, ResolverSettings::default());
    let cors = cors_layer(&[FRONTEND_ORIGIN.to_string()]).unwrap();
    let app = create_router(state, cors);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(Arc::new(FakeProvider::default()));
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({"status": "healthy"}));
}

#[tokio::test]
async fn test_search_scenario() {
    let provider = Arc::new(FakeProvider::with_search(json!({
        "total": 1,
        "results": [{
            "id": "42",
            "title": "Naruto",
            "material_data": {"poster_url": "p.jpg", "year": 2002}
        }]
    })));
    let server = create_test_server(provider.clone());

    let response = server.get("/search").add_query_param("title", "Naruto").await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "results": [{"id": "42", "title": "Naruto", "posterUrl": "p.jpg", "year": 2002}]
    }));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_search_fallbacks() {
    let provider = Arc::new(FakeProvider::with_search(json!({
        "results": [
            {"id": "1", "material_data": {"title": "Material Title"}},
            {"id": "2", "title": "", "material_data": null}
        ]
    })));
    let server = create_test_server(provider);

    let response = server.get("/search").add_query_param("title", "x").await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "results": [
            {"id": "1", "title": "Material Title", "posterUrl": "", "year": "N/A"},
            {"id": "2", "title": "Unknown Title", "posterUrl": "", "year": "N/A"}
        ]
    }));
}

#[tokio::test]
async fn test_search_without_title_is_rejected_before_upstream() {
    let provider = Arc::new(FakeProvider::default());
    let server = create_test_server(provider.clone());

    for path in ["/search", "/search?title="] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"error": "Missing 'title' query parameter"}));
    }

    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_search_upstream_failure() {
    let provider = Arc::new(FakeProvider::failing(|| {
        ProviderError::Api("invalid token".to_string())
    }));
    let server = create_test_server(provider);

    let response = server.get("/search").add_query_param("title", "Naruto").await;

    assert!(response.status_code().is_server_error());
    response.assert_json(&json!({
        "error": "Failed to search anime: upstream reported an error: invalid token"
    }));
}

#[tokio::test]
async fn test_search_item_without_id_fails_request() {
    let provider = Arc::new(FakeProvider::with_search(json!({
        "results": [{"title": "No id"}]
    })));
    let server = create_test_server(provider);

    let response = server.get("/search").add_query_param("title", "x").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to search anime: "));
}

#[tokio::test]
async fn test_sources_scenario() {
    let provider = Arc::new(FakeProvider::with_links(json!({
        "links": {"1": {"2": "//cdn/e2", "1": "//cdn/e1"}}
    })));
    let server = create_test_server(provider.clone());

    let response = server.get("/anime/42/sources").await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "title": "Anime Title for 42",
        "episodes": [
            {"number": "1", "link": "https://cdn/e1"},
            {"number": "2", "link": "https://cdn/e2"}
        ]
    }));
    assert_eq!(
        *provider.last_translation_type.lock().unwrap(),
        Some(TranslationType::Voice)
    );
}

#[tokio::test]
async fn test_sources_drop_unusable_links_and_pick_lowest_translation() {
    let provider = Arc::new(FakeProvider::with_links(json!({
        "links": {
            "1131": {"1": "//other/e1"},
            "610": {"10": "https://cdn/e10", "9": "//cdn/e9", "8": "ftp://cdn/e8"}
        }
    })));
    let server = create_test_server(provider);

    let response = server.get("/anime/42/sources").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["episodes"],
        json!([
            {"number": "9", "link": "https://cdn/e9"},
            {"number": "10", "link": "https://cdn/e10"}
        ])
    );
}

#[tokio::test]
async fn test_sources_explicit_translation() {
    let provider = Arc::new(FakeProvider::with_links(json!({
        "links": {"1": {"1": "//a/e1"}, "2": {"1": "//b/e1"}}
    })));
    let server = create_test_server(provider.clone());

    let response = server
        .get("/anime/42/sources")
        .add_query_param("translation_id", "2")
        .add_query_param("translation_type", "subtitles")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["episodes"][0]["link"], "https://b/e1");
    assert_eq!(
        *provider.last_translation_type.lock().unwrap(),
        Some(TranslationType::Subtitles)
    );

    let response = server
        .get("/anime/42/sources")
        .add_query_param("translation_id", "3")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sources_invalid_translation_type() {
    let provider = Arc::new(FakeProvider::default());
    let server = create_test_server(provider.clone());

    let response = server
        .get("/anime/42/sources")
        .add_query_param("translation_type", "dub")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_sources_without_links_is_not_found() {
    let provider = Arc::new(FakeProvider::with_links(json!({"total": 0})));
    let server = create_test_server(provider);

    let response = server.get("/anime/42/sources").await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({"error": "No sources found for this anime ID"}));
}

#[tokio::test]
async fn test_sources_blank_id_is_rejected() {
    let provider = Arc::new(FakeProvider::default());
    let server = create_test_server(provider.clone());

    let response = server.get("/anime/%20/sources").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "Missing anime ID"}));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_sources_malformed_episode_map() {
    let provider = Arc::new(FakeProvider::with_links(json!({
        "links": {"5": "not a map"}
    })));
    let server = create_test_server(provider);

    let response = server.get("/anime/42/sources").await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    response.assert_json(&json!({"error": "Malformed episode map for translation 5"}));
}

#[tokio::test]
async fn test_sources_upstream_timeout() {
    let provider = Arc::new(FakeProvider::failing(|| ProviderError::Timeout));
    let server = create_test_server(provider);

    let response = server.get("/anime/42/sources").await;

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    response.assert_json(&json!({
        "error": "Failed to get anime sources: upstream request timed out"
    }));
}

#[tokio::test]
async fn test_request_id_echoed() {
    let server = create_test_server(Arc::new(FakeProvider::default()));

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-abc-1"),
        )
        .await;

    assert_eq!(response.header("x-request-id"), "trace-abc-1");

    let response = server.get("/health").await;
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_cors_allow_list() {
    let server = create_test_server(Arc::new(FakeProvider::default()));

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static(FRONTEND_ORIGIN),
        )
        .await;
    assert_eq!(
        response.header("access-control-allow-origin"),
        FRONTEND_ORIGIN
    );

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("https://evil.example"),
        )
        .await;
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn test_cors_preflight_for_sources() {
    let provider = Arc::new(FakeProvider::default());
    let server = create_test_server(provider.clone());

    let response = server
        .method(Method::OPTIONS, "/anime/42/sources")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static(FRONTEND_ORIGIN),
        )
        .add_header(
            HeaderName::from_static("access-control-request-method"),
            HeaderValue::from_static("GET"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("access-control-allow-origin"),
        FRONTEND_ORIGIN
    );
    let allowed_methods = response.header("access-control-allow-methods");
    assert!(allowed_methods.to_str().unwrap().contains("GET"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_unknown_path_is_json_not_found() {
    let server = create_test_server(Arc::new(FakeProvider::default()));

    let response = server.get("/anime/42").await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({"error": "Not found"}));
}

#[tokio::test]
async fn test_wrong_method_is_json_method_not_allowed() {
    let provider = Arc::new(FakeProvider::default());
    let server = create_test_server(provider.clone());

    let response = server.post("/search").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    response.assert_json(&json!({"error": "Method not allowed"}));
    assert_eq!(provider.calls(), 0);
}
