//! Report error types.

use bukubesar_shared::AppError;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            ReportError::InvalidDateRange { .. } => Self::Validation(err.to_string()),
        }
    }
}
