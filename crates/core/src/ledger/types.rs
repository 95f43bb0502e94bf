//! Ledger domain types for journal creation and validation.
//!
//! This module defines the types used for creating and validating journal
//! entries in the double-entry bookkeeping system.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::NormalBalance;

/// Chart-of-accounts classification.
///
/// The type fixes which side increases the account's balance:
/// - Asset/Expense are debit-normal
/// - Liability/Equity/Revenue are credit-normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Every account type, in balance-sheet then income-statement order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Returns the side that increases this account's balance.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns the lowercase name used on the wire and in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown account type '{other}'")),
        }
    }
}

/// Journal entry status.
///
/// `Draft -> Posted` is the only transition. Posted entries are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Entry can still be posted or deleted.
    Draft,
    /// Entry is part of the books and can no longer change.
    Posted,
}

impl JournalStatus {
    /// Returns true if the entry may move to `Posted`.
    #[must_use]
    pub const fn can_post(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry may be soft-deleted.
    #[must_use]
    pub const fn can_delete(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns the lowercase name used on the wire and in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
        }
    }
}

impl fmt::Display for JournalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requested detail line of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// Chart-of-accounts code the line posts to.
    pub coa_code: String,
    /// Debit amount (non-negative).
    pub debit: Decimal,
    /// Credit amount (non-negative).
    pub credit: Decimal,
    /// Optional line memo.
    pub description: Option<String>,
}

impl JournalLineInput {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(coa_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            coa_code: coa_code.into(),
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(coa_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            coa_code: coa_code.into(),
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    /// Sets the line memo.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Input for creating a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateJournalInput {
    /// Transaction date.
    pub date: NaiveDate,
    /// Header description.
    pub description: String,
    /// Detail lines, in the order they should be stored.
    pub lines: Vec<JournalLineInput>,
}

/// A detail line that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLine {
    /// 1-based position within the entry.
    pub line_no: i32,
    /// Trimmed account code.
    pub coa_code: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line memo (empty when none was given).
    pub description: String,
}

/// Debit and credit totals of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Sum of all debit amounts.
    pub total_debit: Decimal,
    /// Sum of all credit amounts.
    pub total_credit: Decimal,
}

impl JournalTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub const fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
        }
    }

    /// Exact decimal comparison, no tolerance.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit
    }

    /// Adds one line's amounts, or `None` if either sum overflows.
    #[must_use]
    pub fn checked_add(self, debit: Decimal, credit: Decimal) -> Option<Self> {
        Some(Self {
            total_debit: self.total_debit.checked_add(debit)?,
            total_credit: self.total_credit.checked_add(credit)?,
        })
    }
}

/// A journal entry that passed validation, ready for the write path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedJournal {
    /// Transaction date.
    pub date: NaiveDate,
    /// Header description.
    pub description: String,
    /// Validated lines in insertion order.
    pub lines: Vec<ValidatedLine>,
    /// Totals (always balanced).
    pub totals: JournalTotals,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(AccountType::Asset, NormalBalance::Debit)]
    #[case(AccountType::Expense, NormalBalance::Debit)]
    #[case(AccountType::Liability, NormalBalance::Credit)]
    #[case(AccountType::Equity, NormalBalance::Credit)]
    #[case(AccountType::Revenue, NormalBalance::Credit)]
    fn test_normal_balance(#[case] account_type: AccountType, #[case] expected: NormalBalance) {
        assert_eq!(account_type.normal_balance(), expected);
    }

    #[test]
    fn test_account_type_parse_roundtrip() {
        for t in AccountType::ALL {
            assert_eq!(t.as_str().parse::<AccountType>().unwrap(), t);
        }
        assert_eq!(" Asset ".parse::<AccountType>().unwrap(), AccountType::Asset);
        assert!("cash".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_account_type_serde_lowercase() {
        let json = serde_json::to_string(&AccountType::Liability).unwrap();
        assert_eq!(json, "\"liability\"");
    }

    #[rstest]
    #[case(JournalStatus::Draft, true, true)]
    #[case(JournalStatus::Posted, false, false)]
    fn test_status_rules(
        #[case] status: JournalStatus,
        #[case] can_post: bool,
        #[case] can_delete: bool,
    ) {
        assert_eq!(status.can_post(), can_post);
        assert_eq!(status.can_delete(), can_delete);
    }

    #[test]
    fn test_totals_accumulate() {
        let totals = JournalTotals::default()
            .checked_add(dec!(1000), Decimal::ZERO)
            .and_then(|t| t.checked_add(Decimal::ZERO, dec!(1000)))
            .unwrap();
        assert_eq!(totals, JournalTotals::new(dec!(1000), dec!(1000)));
        assert!(totals.is_balanced());
    }

    #[test]
    fn test_totals_overflow_is_none() {
        let near_max = JournalTotals::new(Decimal::MAX, Decimal::ZERO);
        assert_eq!(near_max.checked_add(Decimal::ONE, Decimal::ZERO), None);
        assert_eq!(
            JournalTotals::new(Decimal::ZERO, Decimal::MAX).checked_add(Decimal::ZERO, Decimal::ONE),
            None
        );
    }
}
