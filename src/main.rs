use std::sync::Arc;

use anime_sources_api::{
    config::Config,
    middleware::cors_layer,
    routes::{create_router, AppState},
    services::{providers::KodikProvider, sources::ResolverSettings},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anime_sources_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let provider = KodikProvider::new(
        config.kodik_api_token.clone(),
        config.kodik_api_url.clone(),
        config.upstream_timeout(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to build upstream client: {}", e))?;

    let state = AppState::new(
        Arc::new(provider),
        config.search_limit,
        ResolverSettings {
            default_translation_type: config.default_translation_type,
            preferred_translations: config.preferred_translations.clone(),
            resolve_titles: config.resolve_titles,
        },
    );

    let app = create_router(state, cors_layer(&config.cors_allowed_origins)?);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        address = %address,
        upstream = %config.kodik_api_url,
        timeout_secs = config.upstream_timeout_secs,
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
