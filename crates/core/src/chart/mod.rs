//! Chart of accounts rules.
//!
//! Accounts are keyed by their code. A parent link forms a single-parent
//! tree, and listings expand it one level only.

pub mod error;
pub mod hierarchy;

pub use error::ChartError;
pub use hierarchy::group_children;

/// Longest account code the chart accepts.
pub const MAX_CODE_LEN: u64 = 20;

/// Longest account name the chart accepts.
pub const MAX_NAME_LEN: u64 = 200;

fn char_len(s: &str) -> u64 {
    u64::try_from(s.chars().count()).unwrap_or(u64::MAX)
}

/// Validates and trims an account code.
pub fn normalize_code(code: &str) -> Result<String, ChartError> {
    let code = code.trim();
    if code.is_empty() || char_len(code) > MAX_CODE_LEN {
        return Err(ChartError::InvalidCode(code.to_string()));
    }
    if code.chars().any(char::is_whitespace) {
        return Err(ChartError::InvalidCode(code.to_string()));
    }
    Ok(code.to_string())
}

/// Validates and trims an account name. Blank names are rejected.
pub fn normalize_name(name: &str) -> Result<String, ChartError> {
    let name = name.trim();
    if name.is_empty() || char_len(name) > MAX_NAME_LEN {
        return Err(ChartError::InvalidName(name.to_string()));
    }
    Ok(name.to_string())
}

/// Checks a parent link for an account.
///
/// `parent_exists` is only consulted when a parent is set and differs from
/// the account's own code.
pub fn validate_parent<F>(code: &str, parent_code: Option<&str>, parent_exists: F) -> Result<(), ChartError>
where
    F: FnOnce(&str) -> bool,
{
    let Some(parent) = parent_code else {
        return Ok(());
    };
    if parent == code {
        return Err(ChartError::SelfParent(code.to_string()));
    }
    if !parent_exists(parent) {
        return Err(ChartError::ParentNotFound(parent.to_string()));
    }
    Ok(())
}
