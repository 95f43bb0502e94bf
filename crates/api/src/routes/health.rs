//! Liveness endpoint.
//!
//! Always answers 200 while the process is up. A failed database ping only
//! degrades the reported status.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    /// `up` or `unavailable`.
    pub database: &'static str,
    /// Crate version of the running server.
    pub version: &'static str,
}

/// GET `/health`
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, database) = match state.db.ping().await {
        Ok(()) => ("healthy", "up"),
        Err(e) => {
            warn!(error = %e, "Database ping failed");
            ("degraded", "unavailable")
        }
    };

    Json(HealthResponse {
        status,
        database,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates the health routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
