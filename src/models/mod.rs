use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod kodik;
pub mod label;

pub use kodik::{KodikItem, KodikLinksResponse, KodikSearchResponse, MaterialData};
pub use label::LabelKey;

/// Opaque upstream identifier, passed through in whatever JSON shape upstream uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Text(String),
    Number(i64),
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::Text(id) => write!(f, "{}", id),
            ItemId::Number(id) => write!(f, "{}", id),
        }
    }
}

/// Release year as reported upstream, or a display placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Number(i64),
    Text(String),
}

impl Year {
    pub fn unknown() -> Self {
        Year::Text("N/A".to_string())
    }
}

/// Audio/subtitle variant requested from upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationType {
    #[default]
    Voice,
    Subtitles,
}

impl TranslationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationType::Voice => "voice",
            TranslationType::Subtitles => "subtitles",
        }
    }
}

impl std::str::FromStr for TranslationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "voice" => Ok(TranslationType::Voice),
            "subtitles" => Ok(TranslationType::Subtitles),
            other => Err(format!("Invalid translation_type '{}'", other)),
        }
    }
}

/// One search hit as returned to the frontend
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub id: ItemId,
    pub title: String,
    pub poster_url: String,
    pub year: Year,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
}

/// A playable episode. `number` keeps the upstream label verbatim.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EpisodeEntry {
    pub number: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceResult {
    pub title: String,
    pub episodes: Vec<EpisodeEntry>,
}

/// Parameters for an upstream links lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinksRequest {
    pub id: String,
    pub translation_type: TranslationType,
}
