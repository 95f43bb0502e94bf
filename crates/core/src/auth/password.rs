//! Argon2id password hashing.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use bukubesar_shared::AppError;
use thiserror::Error;

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LEN: u64 = 6;

/// Password hashing failures.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Argon2 could not produce a hash.
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// Argon2 failed while checking a hash.
    #[error("failed to verify password: {0}")]
    Verify(String),

    /// Stored value is not a PHC string.
    #[error("stored password hash is malformed")]
    MalformedHash,
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Hashes a password into a PHC string with a fresh random salt.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if Argon2 rejects the input.
///
/// # Example
///
/// ```
/// use bukubesar_core::auth::hash_password;
///
/// let hash = hash_password("rahasia123").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Checks a password against a stored PHC string.
///
/// A mismatch is `Ok(false)`, not an error.
///
/// # Errors
///
/// Returns `PasswordError::MalformedHash` when `stored` cannot be parsed.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|_| PasswordError::MalformedHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("admin123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("admin123", &hash).unwrap());
        assert!(!verify_password("admin124", &hash).unwrap());
    }

    #[test]
    fn test_salt_differs_per_hash() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            verify_password("secret", "plaintext"),
            Err(PasswordError::MalformedHash)
        ));
    }

    #[test]
    fn test_maps_to_internal_error() {
        let app: AppError = PasswordError::MalformedHash.into();
        assert_eq!(app.status_code(), 500);
    }
}
