//! Bukubesar API server.
//!
//! Main entry point for the bookkeeping backend.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bukubesar_api::{AppState, create_router};
use bukubesar_db::connect;
use bukubesar_shared::{AppConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Also reads `.env`.
    let config = AppConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bukubesar=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let jwt_service = JwtService::new(&config.jwt);
    info!(expires_hours = config.jwt.expires_hours, "JWT service configured");

    let app = create_router(AppState::new(db, jwt_service));

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
