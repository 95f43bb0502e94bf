//! Ledger error types for journal validation and state errors.

use bukubesar_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::JournalStatus;

/// Errors that can occur during journal validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Journal must have at least 2 detail lines.
    #[error("Journal entry must have at least 2 detail lines, got {0}")]
    InsufficientLines(usize),

    /// Debits and credits differ.
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// A line has a negative amount.
    #[error("Line {line}: amounts cannot be negative")]
    NegativeAmount {
        /// 1-based line number.
        line: usize,
    },

    /// A line carries neither a debit nor a credit.
    #[error("Line {line}: either debit or credit must be greater than zero")]
    ZeroAmount {
        /// 1-based line number.
        line: usize,
    },

    /// A line carries both a debit and a credit.
    #[error("Line {line}: a line must specify either debit or credit, not both")]
    BothSides {
        /// 1-based line number.
        line: usize,
    },

    /// A line has more than two fractional digits.
    #[error("Line {line}: amounts can have at most 2 decimal places")]
    TooPrecise {
        /// 1-based line number.
        line: usize,
    },

    /// A line amount does not fit the stored precision.
    #[error("Line {line}: amounts must be less than 1000000000000000000")]
    AmountTooLarge {
        /// 1-based line number.
        line: usize,
    },

    /// Summing the lines overflowed.
    #[error("Journal totals are too large")]
    TotalOverflow,

    /// A line has no account code.
    #[error("Line {line}: account code is required")]
    MissingAccountCode {
        /// 1-based line number.
        line: usize,
    },

    // ========== Account Errors ==========
    /// Referenced account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    // ========== State Errors ==========
    /// Entry is not in a state that allows posting.
    #[error("Journal not found or already posted")]
    NotPostable(Option<JournalStatus>),

    /// Entry is not in a state that allows deletion.
    #[error("Journal not found or cannot be deleted (only draft journals can be deleted)")]
    NotDeletable(Option<JournalStatus>),
}

impl LedgerError {
    /// Returns the snake_case error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines(_) => "insufficient_lines",
            Self::Unbalanced { .. } => "unbalanced_journal",
            Self::NegativeAmount { .. } => "negative_amount",
            Self::ZeroAmount { .. } => "zero_amount",
            Self::BothSides { .. } => "invalid_line_side",
            Self::TooPrecise { .. } => "invalid_amount_precision",
            Self::AmountTooLarge { .. } => "amount_too_large",
            Self::TotalOverflow => "total_overflow",
            Self::MissingAccountCode { .. } => "missing_account_code",
            Self::AccountNotFound(_) => "account_not_found",
            Self::NotPostable(_) => "not_postable",
            Self::NotDeletable(_) => "not_deletable",
        }
    }

    /// Returns true for errors detected before touching storage.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        !matches!(self, Self::NotPostable(_) | Self::NotDeletable(_))
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        if err.is_validation() {
            Self::Validation(err.to_string())
        } else {
            Self::Conflict(err.to_string())
        }
    }
}
