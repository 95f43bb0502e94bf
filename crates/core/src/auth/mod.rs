//! Credentials and roles.

mod password;

pub use password::{MIN_PASSWORD_LEN, PasswordError, hash_password, verify_password};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role carried in the access token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator.
    Admin,
    /// Regular bookkeeper.
    #[default]
    User,
}

impl UserRole {
    /// Returns the lowercase role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin", UserRole::Admin)]
    #[case("USER", UserRole::User)]
    #[case(" user ", UserRole::User)]
    fn test_parse_role(#[case] input: &str, #[case] expected: UserRole) {
        assert_eq!(input.parse::<UserRole>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("owner".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_default_role_is_user() {
        assert_eq!(UserRole::default(), UserRole::User);
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }
}
