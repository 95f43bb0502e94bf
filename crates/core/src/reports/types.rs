//! Report data types.
//!
//! Amounts serialize as two-digit decimal strings, field names as camelCase.

use bukubesar_shared::types::money;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReportError;
use crate::ledger::AccountType;

/// Optional date window, both ends inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    /// First day included, unbounded when absent.
    pub start_date: Option<NaiveDate>,
    /// Last day included, unbounded when absent.
    pub end_date: Option<NaiveDate>,
}

impl ReportPeriod {
    /// Creates a period from optional bounds.
    #[must_use]
    pub const fn new(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Everything up to and including `end_date`.
    #[must_use]
    pub const fn until(end_date: Option<NaiveDate>) -> Self {
        Self::new(None, end_date)
    }

    /// Rejects a start date after the end date.
    pub fn validate(&self) -> Result<(), ReportError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => {
                Err(ReportError::InvalidDateRange { start, end })
            }
            _ => Ok(()),
        }
    }
}

/// Period debit and credit sums for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Sum of posted debits.
    pub total_debit: Decimal,
    /// Sum of posted credits.
    pub total_credit: Decimal,
}

impl AccountBalance {
    /// Net balance under the account type's polarity.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.account_type
            .normal_balance()
            .signed_delta(self.total_debit, self.total_credit)
    }
}

/// Header data of the account a ledger is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAccount {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
}

/// A posted detail line as read for the ledger, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerMovement {
    /// Entry date.
    pub date: NaiveDate,
    /// Entry reference.
    pub reference: String,
    /// Line memo.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// One ledger row with its running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRow {
    /// Entry date.
    pub date: NaiveDate,
    /// Entry reference.
    pub reference: String,
    /// Line memo.
    pub description: String,
    /// Debit amount.
    #[serde(with = "money")]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(with = "money")]
    pub credit: Decimal,
    /// Running balance after this row.
    #[serde(with = "money")]
    pub balance: Decimal,
}

/// General ledger for a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReport {
    /// Account code.
    pub coa_code: String,
    /// Account name.
    pub coa_name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Period the ledger covers.
    #[serde(flatten)]
    pub period: ReportPeriod,
    /// Balance before the period start.
    #[serde(with = "money")]
    pub opening_balance: Decimal,
    /// Rows in chronological order.
    pub transactions: Vec<LedgerRow>,
    /// Balance at the period end.
    #[serde(with = "money")]
    pub closing_balance: Decimal,
}

/// Trial balance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceRow {
    /// Account code.
    pub coa_code: String,
    /// Account name.
    pub coa_name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Debit amount.
    #[serde(with = "money")]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(with = "money")]
    pub credit: Decimal,
    /// Signed balance by the account's normal side.
    #[serde(with = "money")]
    pub balance: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceReport {
    /// Period the sums cover.
    #[serde(flatten)]
    pub period: ReportPeriod,
    /// One row per active account, ordered by code.
    pub rows: Vec<TrialBalanceRow>,
    /// Sum of all debit columns.
    #[serde(with = "money")]
    pub total_debit: Decimal,
    /// Sum of all credit columns.
    #[serde(with = "money")]
    pub total_credit: Decimal,
    /// Exact decimal equality of the two totals.
    pub is_balanced: bool,
}

/// An account line inside a statement section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLine {
    /// Account code.
    pub coa_code: String,
    /// Account name.
    pub coa_name: String,
    /// Net amount by the account's normal side.
    #[serde(with = "money")]
    pub balance: Decimal,
}

impl From<&AccountBalance> for ReportLine {
    fn from(account: &AccountBalance) -> Self {
        Self {
            coa_code: account.code.clone(),
            coa_name: account.name.clone(),
            balance: account.net(),
        }
    }
}

/// Profit and loss statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitLossReport {
    /// Period the statement covers.
    #[serde(flatten)]
    pub period: ReportPeriod,
    /// Revenue accounts with a non-zero net.
    pub revenues: Vec<ReportLine>,
    /// Sum of revenue nets.
    #[serde(with = "money")]
    pub total_revenue: Decimal,
    /// Expense accounts with a non-zero net.
    pub expenses: Vec<ReportLine>,
    /// Sum of expense nets.
    #[serde(with = "money")]
    pub total_expense: Decimal,
    /// Total revenue minus total expense.
    #[serde(with = "money")]
    pub net_profit: Decimal,
}

/// Balance sheet as of a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetReport {
    /// Last day included, or everything when absent.
    pub as_of: Option<NaiveDate>,
    /// Asset accounts with a non-zero net.
    pub assets: Vec<ReportLine>,
    /// Sum of asset nets.
    #[serde(with = "money")]
    pub total_asset: Decimal,
    /// Liability accounts with a non-zero net.
    pub liabilities: Vec<ReportLine>,
    /// Sum of liability nets.
    #[serde(with = "money")]
    pub total_liability: Decimal,
    /// Equity accounts followed by the current period net profit line.
    pub equities: Vec<ReportLine>,
    /// Sum of equity lines, net profit included.
    #[serde(with = "money")]
    pub total_equity: Decimal,
    /// Total liability plus total equity.
    #[serde(with = "money")]
    pub total_liability_and_equity: Decimal,
    /// Assets equal liabilities plus equity, exactly.
    pub is_balanced: bool,
}
