//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Account types and their normal balance
//! - Balance polarity and running balances
//! - Journal line validation (count, sides, balance)
//! - Journal reference generation
//! - The draft/posted state machine

pub mod balance;
pub mod error;
pub mod reference;
pub mod service;
pub mod types;
pub mod validation;

pub use balance::{NormalBalance, RunningBalance, running_balances};
pub use error::LedgerError;
pub use reference::new_reference;
pub use service::JournalService;
pub use types::{
    AccountType, CreateJournalInput, JournalLineInput, JournalStatus, JournalTotals,
    PreparedJournal, ValidatedLine,
};
