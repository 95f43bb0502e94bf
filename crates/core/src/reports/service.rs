//! Report generation service.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{
    AccountBalance, BalanceSheetReport, LedgerAccount, LedgerMovement, LedgerReport, LedgerRow,
    ProfitLossReport, ReportLine, ReportPeriod, TrialBalanceReport, TrialBalanceRow,
};
use crate::ledger::{AccountType, JournalTotals, running_balances};

/// Code of the synthetic equity line carrying the period's net profit.
pub const NET_PROFIT_CODE: &str = "-";

/// Name of the synthetic equity line carrying the period's net profit.
pub const NET_PROFIT_NAME: &str = "Current Period Net Profit";

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Opening balance from the posted sums before the period start.
    #[must_use]
    pub fn opening_balance(account_type: AccountType, before_start: JournalTotals) -> Decimal {
        account_type
            .normal_balance()
            .signed_delta(before_start.total_debit, before_start.total_credit)
    }

    /// Builds an account ledger.
    ///
    /// `movements` must already be in chronological order. The closing
    /// balance is the last row's balance, or the opening balance when the
    /// period has no activity.
    #[must_use]
    pub fn build_ledger(
        account: LedgerAccount,
        period: ReportPeriod,
        before_start: JournalTotals,
        movements: Vec<LedgerMovement>,
    ) -> LedgerReport {
        let normal = account.account_type.normal_balance();
        let opening_balance = Self::opening_balance(account.account_type, before_start);

        let balances = running_balances(
            normal,
            opening_balance,
            movements.iter().map(|m| (m.debit, m.credit)),
        );
        let closing_balance = balances.last().copied().unwrap_or(opening_balance);

        let transactions: Vec<LedgerRow> = movements
            .into_iter()
            .zip(balances)
            .map(|(m, balance)| LedgerRow {
                date: m.date,
                reference: m.reference,
                description: m.description,
                debit: m.debit,
                credit: m.credit,
                balance,
            })
            .collect();

        LedgerReport {
            coa_code: account.code,
            coa_name: account.name,
            account_type: account.account_type,
            period,
            opening_balance,
            transactions,
            closing_balance,
        }
    }

    /// Generates a trial balance report from account balances.
    ///
    /// Every account is listed, including those without activity.
    #[must_use]
    pub fn trial_balance(period: ReportPeriod, accounts: Vec<AccountBalance>) -> TrialBalanceReport {
        let total_debit: Decimal = accounts.iter().map(|a| a.total_debit).sum();
        let total_credit: Decimal = accounts.iter().map(|a| a.total_credit).sum();

        let rows = accounts
            .into_iter()
            .map(|a| TrialBalanceRow {
                balance: a.net(),
                coa_code: a.code,
                coa_name: a.name,
                account_type: a.account_type,
                debit: a.total_debit,
                credit: a.total_credit,
            })
            .collect();

        TrialBalanceReport {
            period,
            rows,
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Generates a profit and loss statement from account balances.
    #[must_use]
    pub fn profit_loss(period: ReportPeriod, accounts: &[AccountBalance]) -> ProfitLossReport {
        let (revenues, total_revenue) = Self::section(accounts, AccountType::Revenue);
        let (expenses, total_expense) = Self::section(accounts, AccountType::Expense);

        ProfitLossReport {
            period,
            revenues,
            total_revenue,
            expenses,
            total_expense,
            net_profit: total_revenue - total_expense,
        }
    }

    /// Generates a balance sheet from balances accumulated up to `as_of`.
    ///
    /// The net profit of the same window is appended to equity, even when
    /// it is zero.
    #[must_use]
    pub fn balance_sheet(
        as_of: Option<NaiveDate>,
        accounts: &[AccountBalance],
    ) -> BalanceSheetReport {
        let (assets, total_asset) = Self::section(accounts, AccountType::Asset);
        let (liabilities, total_liability) = Self::section(accounts, AccountType::Liability);
        let (mut equities, equity_accounts) = Self::section(accounts, AccountType::Equity);

        let net_profit = Self::profit_loss(ReportPeriod::until(as_of), accounts).net_profit;
        equities.push(ReportLine {
            coa_code: NET_PROFIT_CODE.to_string(),
            coa_name: NET_PROFIT_NAME.to_string(),
            balance: net_profit,
        });

        let total_equity = equity_accounts + net_profit;
        let total_liability_and_equity = total_liability + total_equity;

        BalanceSheetReport {
            as_of,
            assets,
            total_asset,
            liabilities,
            total_liability,
            equities,
            total_equity,
            total_liability_and_equity,
            is_balanced: total_asset == total_liability_and_equity,
        }
    }

    /// Non-zero lines of one account type, with their total.
    fn section(accounts: &[AccountBalance], account_type: AccountType) -> (Vec<ReportLine>, Decimal) {
        let lines: Vec<ReportLine> = accounts
            .iter()
            .filter(|a| a.account_type == account_type)
            .map(ReportLine::from)
            .filter(|line| !line.balance.is_zero())
            .collect();
        let total = lines.iter().map(|l| l.balance).sum();
        (lines, total)
    }
}
