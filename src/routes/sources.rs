use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{SourceResult, TranslationType},
    routes::AppState,
    services::sources::{self, SourcesQuery},
};

#[derive(Debug, Deserialize)]
pub struct SourcesParams {
    translation_type: Option<String>,
    translation_id: Option<String>,
}

impl TryFrom<SourcesParams> for SourcesQuery {
    type Error = AppError;

    fn try_from(params: SourcesParams) -> Result<Self, Self::Error> {
        let translation_type = params
            .translation_type
            .filter(|t| !t.trim().is_empty())
            .map(|t| t.parse::<TranslationType>())
            .transpose()
            .map_err(AppError::InvalidInput)?;

        Ok(SourcesQuery {
            translation_type,
            translation_id: params.translation_id.filter(|id| !id.trim().is_empty()),
        })
    }
}

/// Handler for the episode sources endpoint
pub async fn get_sources(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(anime_id): Path<String>,
    Query(params): Query<SourcesParams>,
) -> AppResult<Json<SourceResult>> {
    let query = SourcesQuery::try_from(params)?;

    tracing::info!(
        request_id = %request_id,
        anime_id = %anime_id,
        "Fetching episode sources"
    );

    let result = sources::resolve_sources(
        state.provider.as_ref(),
        &state.resolver,
        &anime_id,
        query,
    )
    .await
    .inspect_err(|e| {
        if !e.status_code().is_server_error() {
            return;
        }
        tracing::error!(
            request_id = %request_id,
            anime_id = %anime_id,
            provider = state.provider.name(),
            error = %e,
            "Getting episode sources failed"
        );
    })?;

    Ok(Json(result))
}
