//! # authgate-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the authentication gateway.
//! Fails fast if the signing secret is absent; binds to a configurable
//! port (default 8080).

use authgate_api::config::AppConfig;
use authgate_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment. A missing or empty signing
    // secret is fatal: the process must not come up issuing unsigned junk.
    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration failed: {e}");
        e
    })?;
    let port = config.port;

    let state = AppState::from_config(config).map_err(|e| {
        tracing::error!("Startup failed: {e}");
        e
    })?;

    let app = authgate_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("authgate API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
