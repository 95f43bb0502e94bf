//! Chart of accounts error types.

use bukubesar_shared::AppError;
use thiserror::Error;

/// Errors raised by chart-of-accounts rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    /// Code is empty, too long, or contains whitespace.
    #[error("Invalid account code '{0}'")]
    InvalidCode(String),

    /// Name is blank or too long.
    #[error("Invalid account name '{0}'")]
    InvalidName(String),

    /// Account names itself as parent.
    #[error("Account {0} cannot be its own parent")]
    SelfParent(String),

    /// Parent code does not resolve to an account.
    #[error("Parent account not found: {0}")]
    ParentNotFound(String),
}

impl From<ChartError> for AppError {
    fn from(err: ChartError) -> Self {
        Self::Validation(err.to_string())
    }
}
