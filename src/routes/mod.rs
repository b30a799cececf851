use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::AppError,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{providers::VideoProvider, sources::ResolverSettings},
};

pub mod search;
pub mod sources;

/// Shared application state
///
/// The provider is the single long-lived upstream handle; everything else a
/// request touches is local to that request.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn VideoProvider>,
    pub search_limit: usize,
    pub resolver: ResolverSettings,
}

impl AppState {
    pub fn new(provider: Arc<dyn VideoProvider>, search_limit: usize, resolver: ResolverSettings) -> Self {
        Self {
            provider,
            search_limit,
            resolver,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health_check).fallback(method_not_allowed))
        .route("/search", get(search::search).fallback(method_not_allowed))
        .route(
            "/anime/:anime_id/sources",
            get(sources::get_sources).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .with_state(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(cors),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
