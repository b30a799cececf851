use crate::{
    error::{AppError, AppResult},
    models::{KodikItem, SearchResultItem, Year},
    services::providers::VideoProvider,
};

const UNKNOWN_TITLE: &str = "Unknown Title";

/// Reduces an upstream search hit to the record the frontend renders.
///
/// Title falls back from the item itself to its material data, then to a
/// placeholder; empty strings count as missing.
pub fn to_search_item(item: KodikItem) -> SearchResultItem {
    let material = item.material_data.unwrap_or_default();

    let title = item
        .title
        .filter(|t| !t.is_empty())
        .or_else(|| material.title.filter(|t| !t.is_empty()))
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    SearchResultItem {
        id: item.id,
        title,
        poster_url: material.poster_url.unwrap_or_default(),
        year: material.year.unwrap_or_else(Year::unknown),
    }
}

/// Searches upstream by title and reshapes the hits, preserving upstream order.
///
/// A missing or blank title is rejected before any upstream call.
pub async fn search_anime(
    provider: &dyn VideoProvider,
    title: Option<&str>,
    limit: usize,
) -> AppResult<Vec<SearchResultItem>> {
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::MissingParameter("Missing 'title' query parameter".to_string()))?;

    let response = provider
        .search(title, limit)
        .await
        .map_err(AppError::Search)?;

    Ok(response
        .results
        .unwrap_or_default()
        .into_iter()
        .take(limit)
        .map(to_search_item)
        .collect())
}
