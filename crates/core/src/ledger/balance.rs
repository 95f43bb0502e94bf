//! Account balance calculations.
//!
//! One polarity rule drives every balance in the system: opening balances,
//! running ledger balances, and period aggregates.
//!
//! - Debit-normal (Asset, Expense): `balance += debit - credit`
//! - Credit-normal (Liability, Equity, Revenue): `balance += credit - debit`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The side that increases an account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

impl NormalBalance {
    /// Signed effect of a debit/credit pair on the balance.
    #[must_use]
    pub fn signed_delta(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Running balance at one position in an account ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Balance before this movement.
    pub previous_balance: Decimal,
    /// Balance after this movement.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Starts a chain at the opening balance.
    #[must_use]
    pub const fn opening(balance: Decimal) -> Self {
        Self {
            previous_balance: balance,
            current_balance: balance,
        }
    }

    /// Applies one movement.
    ///
    /// `current[N] = current[N-1] + delta` and `previous[N] = current[N-1]`.
    #[must_use]
    pub fn next(self, delta: Decimal) -> Self {
        Self {
            previous_balance: self.current_balance,
            current_balance: self.current_balance + delta,
        }
    }
}

/// Computes the balance after each movement, in order.
///
/// Movements are `(debit, credit)` pairs. The caller is responsible for
/// passing them in chronological order; reordering changes the result.
#[must_use]
pub fn running_balances<I>(normal: NormalBalance, opening: Decimal, movements: I) -> Vec<Decimal>
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    let mut state = RunningBalance::opening(opening);
    movements
        .into_iter()
        .map(|(debit, credit)| {
            state = state.next(normal.signed_delta(debit, credit));
            state.current_balance
        })
        .collect()
}
