//! Shared types, errors, and configuration for Bukubesar.
//!
//! This crate provides common types used across all other crates:
//! - Monetary amount formatting
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
