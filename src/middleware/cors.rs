use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Builds a CORS layer that only admits the configured origins.
///
/// Wildcards are rejected; an empty list admits no cross-origin callers.
pub fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::with_capacity(allowed_origins.len());

    for origin in allowed_origins.iter().map(|o| o.trim()).filter(|o| !o.is_empty()) {
        if origin == "*" {
            anyhow::bail!("Wildcard CORS origin is not allowed, list origins explicitly");
        }
        let value = HeaderValue::from_str(origin)
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))?;
        origins.push(value);
    }

    if origins.is_empty() {
        tracing::warn!("No CORS origins configured, browser clients on other origins will be refused");
    }

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS]))
}
