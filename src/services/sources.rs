use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{EpisodeEntry, LabelKey, LinksRequest, SourceResult, TranslationType},
    services::providers::VideoProvider,
};

/// Resolver behavior fixed at startup
#[derive(Debug, Clone, Default)]
pub struct ResolverSettings {
    pub default_translation_type: TranslationType,
    /// Translation ids tried in order before falling back to the lowest id
    pub preferred_translations: Vec<String>,
    pub resolve_titles: bool,
}

/// Per-request overrides supplied by the client
#[derive(Debug, Clone, Default)]
pub struct SourcesQuery {
    pub translation_type: Option<TranslationType>,
    pub translation_id: Option<String>,
}

/// Turns an upstream link into an absolute URL, or rejects it.
///
/// Protocol-relative links become `https:`; other `http*` links pass through.
pub fn normalize_link(raw: &str) -> Option<String> {
    if raw.starts_with("//") {
        Some(format!("https:{}", raw))
    } else if raw.starts_with("http") {
        Some(raw.to_string())
    } else {
        None
    }
}

/// Picks the translation whose episodes are served.
///
/// An explicitly requested id wins, then the first preferred id present, then
/// the lowest id (numeric ids by value, before any non-numeric id).
pub fn select_translation<'a>(
    links: &'a BTreeMap<String, Value>,
    requested: Option<&str>,
    preferred: &[String],
) -> Option<(&'a str, &'a Value)> {
    if let Some(id) = requested {
        return links.get_key_value(id).map(|(k, v)| (k.as_str(), v));
    }

    preferred
        .iter()
        .find_map(|id| links.get_key_value(id.as_str()))
        .or_else(|| links.iter().min_by_key(|(id, _)| LabelKey::parse(id)))
        .map(|(k, v)| (k.as_str(), v))
}

/// Builds the ordered episode list for one translation's episode map.
///
/// Entries whose link is not a usable URL string are dropped. Non-numeric
/// labels are kept and sorted after the numeric ones.
pub fn collect_episodes(translation_id: &str, episodes: &Value) -> AppResult<Vec<EpisodeEntry>> {
    let episodes = episodes.as_object().ok_or_else(|| {
        AppError::Conversion(format!(
            "Malformed episode map for translation {}",
            translation_id
        ))
    })?;

    let mut entries: Vec<(LabelKey, EpisodeEntry)> = episodes
        .iter()
        .filter_map(|(label, raw)| {
            let link = raw.as_str().and_then(normalize_link)?;
            Some((
                LabelKey::parse(label),
                EpisodeEntry {
                    number: label.clone(),
                    link,
                },
            ))
        })
        .collect();

    let non_numeric = entries.iter().filter(|(key, _)| !key.is_numeric()).count();
    if non_numeric > 0 {
        tracing::warn!(
            translation_id = %translation_id,
            non_numeric,
            "Episode labels are not all numeric, ordering them lexically after numbered episodes"
        );
    }

    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    Ok(entries.into_iter().map(|(_, entry)| entry).collect())
}

pub fn placeholder_title(anime_id: &str) -> String {
    format!("Anime Title for {}", anime_id)
}

/// Resolves the playable episodes of one content identifier.
pub async fn resolve_sources(
    provider: &dyn VideoProvider,
    settings: &ResolverSettings,
    anime_id: &str,
    query: SourcesQuery,
) -> AppResult<SourceResult> {
    let anime_id = anime_id.trim();
    if anime_id.is_empty() {
        return Err(AppError::MissingParameter("Missing anime ID".to_string()));
    }

    let request = LinksRequest {
        id: anime_id.to_string(),
        translation_type: query
            .translation_type
            .unwrap_or(settings.default_translation_type),
    };

    let response = provider
        .get_links(&request)
        .await
        .map_err(AppError::Sources)?;

    let links = match response.links {
        Some(links) if !links.is_empty() => links,
        _ => {
            return Err(AppError::NotFound(
                "No sources found for this anime ID".to_string(),
            ))
        }
    };

    let requested = query.translation_id.as_deref().map(str::trim);
    let (translation_id, episodes) =
        select_translation(&links, requested, &settings.preferred_translations).ok_or_else(
            || {
                AppError::NotFound(format!(
                    "No sources found for translation {}",
                    requested.unwrap_or_default()
                ))
            },
        )?;

    let episodes = collect_episodes(translation_id, episodes)?;

    tracing::debug!(
        anime_id = %anime_id,
        translation_id = %translation_id,
        episodes = episodes.len(),
        "Episode sources resolved"
    );

    let title = if settings.resolve_titles {
        lookup_title(provider, anime_id).await
    } else {
        placeholder_title(anime_id)
    };

    Ok(SourceResult { title, episodes })
}

/// Best-effort title lookup; any failure degrades to the placeholder.
async fn lookup_title(provider: &dyn VideoProvider, anime_id: &str) -> String {
    match provider.find_title(anime_id).await {
        Ok(Some(title)) if !title.is_empty() => title,
        Ok(_) => placeholder_title(anime_id),
        Err(e) => {
            tracing::warn!(
                anime_id = %anime_id,
                error = %e,
                "Title lookup failed, using placeholder"
            );
            placeholder_title(anime_id)
        }
    }
}
