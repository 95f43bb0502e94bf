//! Authentication routes for registration, login, and the current user.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use bukubesar_core::auth::{MIN_PASSWORD_LEN, UserRole, hash_password, verify_password};
use bukubesar_db::{UserRepository, entities::users, repositories::CreateUserInput};
use bukubesar_shared::AppError;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Auth routes that need a bearer token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Registration request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Unique login name.
    #[validate(length(min = 3, max = 100, message = "must be 3 to 100 characters"))]
    pub user_name: String,
    /// Unique email address.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Plain-text password.
    #[validate(length(min = MIN_PASSWORD_LEN, message = "must be at least 6 characters"))]
    pub password: String,
    /// Defaults to `user`.
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Registered email address.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Plain-text password.
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Public view of a user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// User ID.
    pub user_id: Uuid,
    /// Username.
    pub user_name: String,
    /// Email address.
    pub email: String,
    /// Access role.
    pub role: UserRole,
}

impl From<users::Model> for UserInfo {
    fn from(user: users::Model) -> Self {
        Self {
            user_id: user.id,
            user_name: user.user_name,
            email: user.email,
            role: user.role.into(),
        }
    }
}

/// Successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed bearer token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    /// The signed-in user.
    pub user: UserInfo,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST `/auth/register`
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let password_hash = hash_password(&payload.password)?;

    let user_repo = UserRepository::new((*state.db).clone());
    let user = user_repo
        .create(CreateUserInput {
            user_name: payload.user_name.trim().to_string(),
            email: payload.email.trim().to_lowercase(),
            password_hash,
            role: payload.role.unwrap_or_default(),
        })
        .await?;

    info!(user_id = %user.id, user_name = %user.user_name, "New user registered");

    Ok((StatusCode::CREATED, Json(UserInfo::from(user))))
}

/// POST `/auth/login`
///
/// An unknown email and a wrong password produce the same response.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user_repo = UserRepository::new((*state.db).clone());
    let email = payload.email.trim().to_lowercase();

    let Some(user) = user_repo.find_by_email(&email).await? else {
        info!(email = %email, "Login attempt for non-existent user");
        return Err(invalid_credentials());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(invalid_credentials());
    }

    let role = UserRole::from(user.role);
    let access_token = state.jwt_service.generate_access_token(
        user.id,
        &user.user_name,
        &user.email,
        role.as_str(),
    )?;

    info!(user_id = %user.id, "User logged in successfully");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.jwt_service.expires_in_secs(),
        user: user.into(),
    }))
}

/// GET `/auth/me`
async fn me(auth: AuthUser) -> Json<UserInfo> {
    let claims = auth.claims();
    Json(UserInfo {
        user_id: auth.user_id(),
        user_name: claims.username.clone(),
        email: claims.email.clone(),
        role: auth.role(),
    })
}

fn invalid_credentials() -> ApiError {
    ApiError::new(
        "invalid_credentials",
        AppError::Unauthorized("Invalid email or password".into()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::Fake;
    use fake::faker::internet::en::{Password, SafeEmail, Username};

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            user_name: format!("{}_x", Username().fake::<String>()),
            email: SafeEmail().fake(),
            password: Password(8..20).fake(),
            role: None,
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut req = valid_request();
        req.password = "12345".into();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_short_username_and_bad_email_rejected() {
        let mut req = valid_request();
        req.user_name = "ab".into();
        req.email = "not-an-email".into();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("user_name"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_role_parses_lowercase() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"userName":"budi","email":"budi@example.com","password":"secret1","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(req.role, Some(UserRole::Admin));
    }
}
