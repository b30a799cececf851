/// Upstream video API abstraction
///
/// Handlers never talk to the upstream directly: they receive an
/// `Arc<dyn VideoProvider>` through application state, which keeps the HTTP
/// layer testable with fakes and mocks.
use crate::{
    error::ProviderError,
    models::{KodikLinksResponse, KodikSearchResponse, LinksRequest},
};

pub mod kodik;

pub use kodik::KodikProvider;

/// Trait for upstream video-aggregation providers
///
/// Implementations return the upstream payloads as parsed; reshaping them into
/// the frontend contract happens in the search and source services.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VideoProvider: Send + Sync {
    /// Search by free-text title, asking for at most `limit` items with extended metadata
    async fn search(&self, title: &str, limit: usize)
        -> Result<KodikSearchResponse, ProviderError>;

    /// Fetch per-translation episode links for one content identifier
    async fn get_links(&self, request: &LinksRequest)
        -> Result<KodikLinksResponse, ProviderError>;

    /// Look up the display title of a content identifier
    ///
    /// Returns `Ok(None)` when upstream knows no item with that id.
    async fn find_title(&self, id: &str) -> Result<Option<String>, ProviderError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
