// API Server Binary Entry Point
//
// Purpose: Load the emissions catalog and serve the eco-score API
// Usage: cargo run --bin api_server

use anyhow::Context;
use eco_cart_scorer::{create_router, AppState, ServerConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "eco_cart_scorer=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = ServerConfig::from_env().context("Invalid configuration")?;

    tracing::info!("Configuration:");
    tracing::info!("  DATA_PATH: {}", config.data_path.display());
    tracing::info!("  PORT: {}", config.port);
    tracing::info!("  GEMINI_MODEL: {}", config.generation.model);
    tracing::info!("  GENERATION_DELAY_MS: {}", config.generation.delay.as_millis());
    tracing::info!("  REQUEST_TIMEOUT_SECS: {}", config.request_timeout.as_secs());

    // Initialize application state (loads and scores the dataset)
    let state = AppState::from_config(&config)?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
