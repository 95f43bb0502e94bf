//! Financial report assembly.
//!
//! Pure composition over balances fetched by the storage layer:
//! - Account Ledger with running balance
//! - Trial Balance
//! - Profit & Loss
//! - Balance Sheet

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::{NET_PROFIT_CODE, NET_PROFIT_NAME, ReportService};
pub use types::*;
