//! Application-wide error types.
//!
//! Every failure that reaches a caller is folded into one of these categories
//! before it is rendered as `{ "error": <code>, "message": <text> }`.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, invalid, or expired credentials.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Malformed or insufficient input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown account, journal, or user.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate key or a state transition that is no longer allowed.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage failure. The message is for logs, never for clients.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Anything else that is our fault.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Persistence(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the machine-readable code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Persistence(_) => "persistence_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Returns the message that is safe to show to a client.
    ///
    /// Server-side failures are replaced with a generic message so storage
    /// details never leak.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Unauthorized(msg)
            | Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Persistence(_) | Self::Internal(_) => {
                "An internal error occurred".to_string()
            }
        }
    }

    /// Returns true for errors caused by the server rather than the caller.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Internal(_))
    }
}
