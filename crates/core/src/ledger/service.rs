//! Journal service for entry validation and state transitions.
//!
//! Pure business logic: storage hands in what it looked up (account
//! existence, current status) and gets back a decision.

use super::error::LedgerError;
use super::types::{CreateJournalInput, JournalStatus, PreparedJournal};
use super::validation::validate_lines;

/// Journal service for validation and the draft/posted state machine.
pub struct JournalService;

impl JournalService {
    /// Validates a journal's lines before any storage is touched.
    ///
    /// Steps:
    /// 1. At least two lines, each with exactly one positive side
    /// 2. Amounts fit the stored precision
    /// 3. Debits equal credits (exact decimal comparison)
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` describing the first rule that failed.
    pub fn validate(input: &CreateJournalInput) -> Result<PreparedJournal, LedgerError> {
        let (lines, totals) = validate_lines(&input.lines)?;

        Ok(PreparedJournal {
            date: input.date,
            description: input.description.trim().to_string(),
            lines,
            totals,
        })
    }

    /// Checks that every line of `prepared` names an existing account.
    ///
    /// `account_exists` returns true if a non-deleted account has the code.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` for the first unknown code.
    pub fn check_accounts<A>(prepared: &PreparedJournal, account_exists: A) -> Result<(), LedgerError>
    where
        A: Fn(&str) -> bool,
    {
        match prepared.lines.iter().find(|l| !account_exists(&l.coa_code)) {
            Some(missing) => Err(LedgerError::AccountNotFound(missing.coa_code.clone())),
            None => Ok(()),
        }
    }

    /// Checks that an entry may be posted.
    ///
    /// `current` is `None` when the entry does not exist or was deleted.
    pub fn ensure_can_post(current: Option<JournalStatus>) -> Result<(), LedgerError> {
        match current {
            Some(status) if status.can_post() => Ok(()),
            other => Err(LedgerError::NotPostable(other)),
        }
    }

    /// Checks that an entry may be soft-deleted.
    ///
    /// `current` is `None` when the entry does not exist or was deleted.
    pub fn ensure_can_delete(current: Option<JournalStatus>) -> Result<(), LedgerError> {
        match current {
            Some(status) if status.can_delete() => Ok(()),
            other => Err(LedgerError::NotDeletable(other)),
        }
    }
}
