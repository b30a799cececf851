/// Kodik API provider
///
/// API Flow:
/// 1. Search: /search?title=... → items with `material_data` (poster, year)
/// 2. Links: /links?id=... → translation id → episode label → raw link
///
/// The token travels as the `token` query parameter on every request.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    error::ProviderError,
    models::{KodikLinksResponse, KodikSearchResponse, LinksRequest},
    services::providers::VideoProvider,
};

const PROVIDER_NAME: &str = "kodik";
const ERROR_BODY_LIMIT: usize = 256;

#[derive(Clone)]
pub struct KodikProvider {
    http_client: HttpClient,
    api_token: String,
    api_url: String,
}

impl KodikProvider {
    /// Creates a provider whose every request is bounded by `timeout`
    pub fn new(api_token: String, api_url: String, timeout: Duration) -> Result<Self, ProviderError> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_token,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    /// Issues a GET against `path` and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let response = self
            .http_client
            .get(self.endpoint(path))
            .query(&[("token", self.api_token.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(
                error = %e,
                path = path,
                response = %truncate(&body, ERROR_BODY_LIMIT),
                "Failed to deserialize Kodik response"
            );
            ProviderError::from(e)
        })
    }
}

fn truncate(body: &str, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[async_trait::async_trait]
impl VideoProvider for KodikProvider {
    async fn search(
        &self,
        title: &str,
        limit: usize,
    ) -> Result<KodikSearchResponse, ProviderError> {
        let mut response: KodikSearchResponse = self
            .get_json(
                "search",
                &[
                    ("title", title.to_string()),
                    ("limit", limit.to_string()),
                    ("with_material_data", "true".to_string()),
                ],
            )
            .await?;

        if let Some(message) = response.error.take() {
            return Err(ProviderError::Api(message));
        }

        tracing::info!(
            query = %title,
            results = response.results.as_ref().map_or(0, Vec::len),
            provider = PROVIDER_NAME,
            "Title search completed"
        );

        Ok(response)
    }

    async fn get_links(
        &self,
        request: &LinksRequest,
    ) -> Result<KodikLinksResponse, ProviderError> {
        let mut response: KodikLinksResponse = self
            .get_json(
                "links",
                &[
                    ("id", request.id.clone()),
                    ("translation_type", request.translation_type.as_str().to_string()),
                    ("episode_sorting", "asc".to_string()),
                ],
            )
            .await?;

        if let Some(message) = response.error.take() {
            return Err(ProviderError::Api(message));
        }

        tracing::info!(
            anime_id = %request.id,
            translations = response.links.as_ref().map_or(0, |links| links.len()),
            provider = PROVIDER_NAME,
            "Links fetched"
        );

        Ok(response)
    }

    async fn find_title(&self, id: &str) -> Result<Option<String>, ProviderError> {
        let response: KodikSearchResponse = self
            .get_json(
                "search",
                &[
                    ("id", id.to_string()),
                    ("limit", "1".to_string()),
                    ("with_material_data", "true".to_string()),
                ],
            )
            .await?;

        if let Some(message) = response.error {
            return Err(ProviderError::Api(message));
        }

        let title = response
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|item| {
                item.title
                    .filter(|t| !t.is_empty())
                    .or_else(|| item.material_data.and_then(|m| m.title))
            });

        Ok(title)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
