//! Authentication types for JWT access tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Login name.
    pub username: String,
    /// User email.
    pub email: String,
    /// User role (`admin` or `user`).
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        username: &str,
        email: &str,
        role: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user_id,
            username: username.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}
