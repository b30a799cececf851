use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::SearchResponse,
    routes::AppState,
    services::search,
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    title: Option<String>,
}

/// Handler for title search endpoint
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResponse>> {
    let results = search::search_anime(
        state.provider.as_ref(),
        params.title.as_deref(),
        state.search_limit,
    )
    .await
    .inspect_err(|e| {
        if !e.status_code().is_server_error() {
            return;
        }
        tracing::error!(
            request_id = %request_id,
            query = params.title.as_deref().unwrap_or_default(),
            provider = state.provider.name(),
            error = %e,
            "Search failed"
        );
    })?;

    Ok(Json(SearchResponse { results }))
}
