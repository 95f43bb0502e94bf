//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bukubesar_core::auth::UserRole;
use bukubesar_shared::{AppError, Claims, JwtError};
use tracing::debug;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Validates the bearer token and stores its claims in the request
/// extensions for [`AuthUser`] to pick up.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError::new(
            "missing_token",
            AppError::Unauthorized("Authorization header with Bearer token is required".into()),
        )
        .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            let (code, message) = match e {
                JwtError::Expired => ("token_expired", "Token has expired"),
                _ => ("invalid_token", "Invalid or malformed token"),
            };
            ApiError::new(code, AppError::Unauthorized(message.into())).into_response()
        }
    }
}

/// Extractor for the authenticated caller.
///
/// Only usable on routes behind [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.0.user_id()
    }

    /// Returns the user's role, falling back to `user` for unknown values.
    #[must_use]
    pub fn role(&self) -> UserRole {
        self.0.role.parse().unwrap_or_default()
    }

    /// Returns the inner claims.
    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".into()).into())
    }
}
