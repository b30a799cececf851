use std::time::Duration;

use serde::Deserialize;

use crate::models::TranslationType;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Kodik API token, sent with every upstream request
    pub kodik_api_token: String,

    /// Kodik API base URL
    #[serde(default = "default_kodik_api_url")]
    pub kodik_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the API from a browser (comma separated)
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,

    /// Upper bound for a single upstream call, in seconds
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Maximum number of search results requested from upstream
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Translation mode used when the client does not pick one
    #[serde(default)]
    pub default_translation_type: TranslationType,

    /// Translation ids tried in order before falling back to the lowest id
    #[serde(default)]
    pub preferred_translations: Vec<String>,

    /// Look up the real title of an item when resolving its sources
    #[serde(default)]
    pub resolve_titles: bool,
}

fn default_kodik_api_url() -> String {
    "https://kodikapi.com".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

fn default_search_limit() -> usize {
    20
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.kodik_api_token.trim().is_empty() {
            anyhow::bail!("KODIK_API_TOKEN must not be empty");
        }
        if self.upstream_timeout_secs == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
        }
        if self.search_limit == 0 {
            anyhow::bail!("SEARCH_LIMIT must be greater than zero");
        }
        Ok(())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, envy::Error> {
        envy::from_iter(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn test_defaults_applied() {
        let config = load(&[("KODIK_API_TOKEN", "secret")]).unwrap();

        assert_eq!(config.kodik_api_url, "https://kodikapi.com");
        assert_eq!(config.port, 5001);
        assert_eq!(config.search_limit, 20);
        assert_eq!(config.upstream_timeout(), Duration::from_secs(10));
        assert_eq!(config.default_translation_type, TranslationType::Voice);
        assert!(config.cors_allowed_origins.is_empty());
        assert!(config.preferred_translations.is_empty());
        assert!(!config.resolve_titles);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_comma_separated_lists() {
        let config = load(&[
            ("KODIK_API_TOKEN", "secret"),
            (
                "CORS_ALLOWED_ORIGINS",
                "https://mkseven2.github.io,http://127.0.0.1:5500",
            ),
            ("PREFERRED_TRANSLATIONS", "610,1131"),
            ("DEFAULT_TRANSLATION_TYPE", "subtitles"),
        ])
        .unwrap();

        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://mkseven2.github.io", "http://127.0.0.1:5500"]
        );
        assert_eq!(config.preferred_translations, vec!["610", "1131"]);
        assert_eq!(
            config.default_translation_type,
            TranslationType::Subtitles
        );
    }

    #[test]
    fn test_token_is_required() {
        assert!(load(&[("PORT", "8080")]).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = load(&[
            ("KODIK_API_TOKEN", "secret"),
            ("UPSTREAM_TIMEOUT_SECS", "0"),
        ])
        .unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        let config = load(&[
            ("KODIK_API_TOKEN", "secret"),
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
