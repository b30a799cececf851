// ============================================================================
// Kodik API Types
// ============================================================================
//
// Upstream shapes are an external contract we do not control. Only the item id
// is structurally required; every other field is parsed leniently so a single
// malformed value falls back to a default instead of failing the response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

use super::{ItemId, Year};

/// Deserializes an optional field, treating a value of the wrong shape as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Response of `GET /search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KodikSearchResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub total: Option<u64>,
    /// Strict: an item without an id fails the whole response
    #[serde(default)]
    pub results: Option<Vec<KodikItem>>,
    /// Set instead of `results` when upstream rejects the request
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<String>,
}

/// A single search hit
#[derive(Debug, Clone, Deserialize)]
pub struct KodikItem {
    pub id: ItemId,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub material_data: Option<MaterialData>,
}

/// Extended metadata attached when `with_material_data=true`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialData {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub poster_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub year: Option<Year>,
}

/// Response of `GET /links`: translation id -> episode label -> raw link.
///
/// Episode maps are kept as raw JSON; their shape is validated when a
/// translation is selected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KodikLinksResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub links: Option<BTreeMap<String, Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<String>,
}

impl KodikLinksResponse {
    /// True when upstream returned no usable links section
    pub fn is_empty(&self) -> bool {
        self.links.as_ref().map_or(true, BTreeMap::is_empty)
    }
}
