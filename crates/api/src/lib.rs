//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST routes under `/api/v1`
//! - Bearer-token authentication middleware
//! - Mapping from domain errors to JSON error responses

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use bukubesar_shared::JwtService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    /// Wraps a connection pool and a token service.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
