//! Property-based and example tests for report assembly.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::{NET_PROFIT_CODE, NET_PROFIT_NAME, ReportService};
use super::types::{AccountBalance, LedgerAccount, LedgerMovement, ReportPeriod};
use crate::ledger::{AccountType, JournalTotals};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn balance(code: &str, account_type: AccountType, debit: Decimal, credit: Decimal) -> AccountBalance {
    AccountBalance {
        code: code.to_string(),
        name: format!("Account {code}"),
        account_type,
        total_debit: debit,
        total_credit: credit,
    }
}

fn cash() -> LedgerAccount {
    LedgerAccount {
        code: "1-1001".to_string(),
        name: "Cash".to_string(),
        account_type: AccountType::Asset,
    }
}

fn movement(day: u32, debit: Decimal, credit: Decimal) -> LedgerMovement {
    LedgerMovement {
        date: date(2026, 1, day),
        reference: format!("JRN-202601{day:02}-AB12"),
        description: String::new(),
        debit,
        credit,
    }
}

// ============================================================================
// Strategies
// ============================================================================

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn account_type_strategy() -> impl Strategy<Value = AccountType> {
    prop::sample::select(AccountType::ALL.to_vec())
}

/// A posted journal as `(account index, amount)` pairs split into debits and credits.
fn balanced_journal(accounts: usize) -> impl Strategy<Value = Vec<(usize, Decimal, Decimal)>> {
    (0..accounts, 0..accounts, (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2)))
        .prop_map(|(dr, cr, amount)| vec![(dr, amount, Decimal::ZERO), (cr, Decimal::ZERO, amount)])
}

/// Account balances produced by posting only balanced journals.
fn balanced_books() -> impl Strategy<Value = Vec<AccountBalance>> {
    prop::collection::vec(account_type_strategy(), 1..12).prop_flat_map(|types| {
        let n = types.len();
        (Just(types), prop::collection::vec(balanced_journal(n), 0..25))
    })
    .prop_map(|(types, journals)| {
        let mut books: Vec<AccountBalance> = types
            .into_iter()
            .enumerate()
            .map(|(i, t)| balance(&format!("{i:04}"), t, Decimal::ZERO, Decimal::ZERO))
            .collect();
        for (idx, debit, credit) in journals.into_iter().flatten() {
            books[idx].total_debit += debit;
            books[idx].total_credit += credit;
        }
        books
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Trial balance totals are the column sums and `is_balanced` is their exact equality.
    #[test]
    fn prop_trial_balance_totals(
        rows in prop::collection::vec((account_type_strategy(), amount_strategy(), amount_strategy()), 0..20)
    ) {
        let accounts: Vec<AccountBalance> = rows
            .iter()
            .enumerate()
            .map(|(i, (t, d, c))| balance(&format!("{i:04}"), *t, *d, *c))
            .collect();
        let expected_debit: Decimal = rows.iter().map(|r| r.1).sum();
        let expected_credit: Decimal = rows.iter().map(|r| r.2).sum();

        let report = ReportService::trial_balance(ReportPeriod::default(), accounts);

        prop_assert_eq!(report.rows.len(), rows.len());
        prop_assert_eq!(report.total_debit, expected_debit);
        prop_assert_eq!(report.total_credit, expected_credit);
        prop_assert_eq!(report.is_balanced, expected_debit == expected_credit);
    }

    /// Books built from balanced journals always produce a balanced trial balance.
    #[test]
    fn prop_balanced_books_trial_balance(books in balanced_books()) {
        let report = ReportService::trial_balance(ReportPeriod::default(), books);
        prop_assert!(report.is_balanced);
    }

    /// Assets equal liabilities plus equity once net profit is injected.
    #[test]
    fn prop_balance_sheet_identity(books in balanced_books()) {
        let sheet = ReportService::balance_sheet(None, &books);

        prop_assert!(sheet.is_balanced);
        prop_assert_eq!(sheet.total_asset, sheet.total_liability + sheet.total_equity);
        prop_assert_eq!(sheet.total_liability_and_equity, sheet.total_liability + sheet.total_equity);
    }

    /// Net profit is revenue minus expense and listed rows exclude zero nets.
    #[test]
    fn prop_profit_loss_net(books in balanced_books()) {
        let report = ReportService::profit_loss(ReportPeriod::default(), &books);

        prop_assert_eq!(report.net_profit, report.total_revenue - report.total_expense);
        prop_assert!(report.revenues.iter().all(|l| !l.balance.is_zero()));
        prop_assert!(report.expenses.iter().all(|l| !l.balance.is_zero()));
        let revenue_sum: Decimal = report.revenues.iter().map(|l| l.balance).sum();
        prop_assert_eq!(revenue_sum, report.total_revenue);
    }

    /// The net profit line is always the last equity line and matches P&L.
    #[test]
    fn prop_net_profit_line_matches_profit_loss(books in balanced_books()) {
        let sheet = ReportService::balance_sheet(None, &books);
        let pl = ReportService::profit_loss(ReportPeriod::default(), &books);

        let last = sheet.equities.last().unwrap();
        prop_assert_eq!(last.coa_code.as_str(), NET_PROFIT_CODE);
        prop_assert_eq!(last.balance, pl.net_profit);
    }

    /// Closing balance equals opening plus the signed sum of movements.
    #[test]
    fn prop_ledger_closing_balance(
        opening_debit in amount_strategy(),
        opening_credit in amount_strategy(),
        amounts in prop::collection::vec((amount_strategy(), amount_strategy()), 0..20),
    ) {
        let movements: Vec<LedgerMovement> = amounts
            .iter()
            .map(|(d, c)| movement(15, *d, *c))
            .collect();
        let report = ReportService::build_ledger(
            cash(),
            ReportPeriod::default(),
            JournalTotals::new(opening_debit, opening_credit),
            movements,
        );

        let expected = opening_debit - opening_credit
            + amounts.iter().map(|(d, c)| d - c).sum::<Decimal>();
        prop_assert_eq!(report.opening_balance, opening_debit - opening_credit);
        prop_assert_eq!(report.closing_balance, expected);
        if let Some(last) = report.transactions.last() {
            prop_assert_eq!(last.balance, report.closing_balance);
        }
    }

    /// Building the same ledger twice yields identical output.
    #[test]
    fn prop_ledger_idempotent(
        amounts in prop::collection::vec((amount_strategy(), amount_strategy()), 0..10),
    ) {
        let build = || {
            ReportService::build_ledger(
                cash(),
                ReportPeriod::default(),
                JournalTotals::default(),
                amounts.iter().map(|(d, c)| movement(3, *d, *c)).collect(),
            )
        };
        prop_assert_eq!(build(), build());
    }

    /// Each row's balance is the previous row's plus its signed movement.
    #[test]
    fn prop_ledger_rows_link(
        credit_normal in any::<bool>(),
        opening_credit in amount_strategy(),
        amounts in prop::collection::vec((amount_strategy(), amount_strategy()), 1..20),
    ) {
        let mut account = cash();
        if credit_normal {
            account.account_type = AccountType::Revenue;
        }
        let normal = account.account_type.normal_balance();
        let report = ReportService::build_ledger(
            account,
            ReportPeriod::default(),
            JournalTotals::new(Decimal::ZERO, opening_credit),
            amounts.iter().map(|(d, c)| movement(7, *d, *c)).collect(),
        );

        let mut previous = report.opening_balance;
        for row in &report.transactions {
            prop_assert_eq!(row.balance, previous + normal.signed_delta(row.debit, row.credit));
            previous = row.balance;
        }
        prop_assert_eq!(report.closing_balance, previous);
    }
}

// ============================================================================
// Examples
// ============================================================================

#[test]
fn test_capital_injection_scenario() {
    let ledger = ReportService::build_ledger(
        cash(),
        ReportPeriod::default(),
        JournalTotals::default(),
        vec![movement(5, dec!(5000000), Decimal::ZERO)],
    );
    assert_eq!(ledger.opening_balance, Decimal::ZERO);
    assert_eq!(ledger.transactions.len(), 1);
    assert_eq!(ledger.transactions[0].balance, dec!(5000000));
    assert_eq!(ledger.closing_balance, dec!(5000000));

    let trial = ReportService::trial_balance(
        ReportPeriod::default(),
        vec![
            balance("1-1001", AccountType::Asset, dec!(5000000), Decimal::ZERO),
            balance("3-1000", AccountType::Equity, Decimal::ZERO, dec!(5000000)),
        ],
    );
    assert_eq!(trial.total_debit, dec!(5000000));
    assert_eq!(trial.total_credit, dec!(5000000));
    assert!(trial.is_balanced);
}

#[test]
fn test_empty_ledger_closes_at_opening() {
    let ledger = ReportService::build_ledger(
        cash(),
        ReportPeriod::new(Some(date(2026, 2, 1)), None),
        JournalTotals::new(dec!(700), dec!(200)),
        Vec::new(),
    );
    assert!(ledger.transactions.is_empty());
    assert_eq!(ledger.opening_balance, dec!(500));
    assert_eq!(ledger.closing_balance, dec!(500));
}

#[test]
fn test_credit_normal_opening_balance() {
    assert_eq!(
        ReportService::opening_balance(AccountType::Revenue, JournalTotals::new(dec!(50), dec!(300))),
        dec!(250)
    );
}

#[test]
fn test_profit_loss_example() {
    let accounts = vec![
        balance("1-1001", AccountType::Asset, dec!(1200), dec!(400)),
        balance("4-1001", AccountType::Revenue, Decimal::ZERO, dec!(1200)),
        balance("4-1002", AccountType::Revenue, Decimal::ZERO, Decimal::ZERO),
        balance("6-1001", AccountType::Expense, dec!(400), Decimal::ZERO),
    ];
    let report = ReportService::profit_loss(ReportPeriod::default(), &accounts);

    assert_eq!(report.revenues.len(), 1);
    assert_eq!(report.total_revenue, dec!(1200));
    assert_eq!(report.total_expense, dec!(400));
    assert_eq!(report.net_profit, dec!(800));
}

#[test]
fn test_balance_sheet_includes_zero_net_profit_line() {
    let accounts = vec![
        balance("1-1001", AccountType::Asset, dec!(5000000), Decimal::ZERO),
        balance("3-1000", AccountType::Equity, Decimal::ZERO, dec!(5000000)),
    ];
    let sheet = ReportService::balance_sheet(Some(date(2026, 12, 31)), &accounts);

    assert_eq!(sheet.equities.len(), 2);
    let line = &sheet.equities[1];
    assert_eq!(line.coa_code, NET_PROFIT_CODE);
    assert_eq!(line.coa_name, NET_PROFIT_NAME);
    assert_eq!(line.balance, Decimal::ZERO);
    assert_eq!(sheet.total_equity, dec!(5000000));
    assert!(sheet.is_balanced);
}

#[test]
fn test_balance_sheet_unbalanced_books() {
    let accounts = vec![balance("1-1001", AccountType::Asset, dec!(10), Decimal::ZERO)];
    let sheet = ReportService::balance_sheet(None, &accounts);
    assert!(!sheet.is_balanced);
}

#[test]
fn test_period_validation() {
    assert!(ReportPeriod::default().validate().is_ok());
    assert!(ReportPeriod::new(Some(date(2026, 1, 1)), Some(date(2026, 1, 1))).validate().is_ok());
    assert!(
        ReportPeriod::new(Some(date(2026, 2, 1)), Some(date(2026, 1, 1)))
            .validate()
            .is_err()
    );
}

#[test]
fn test_report_json_shape() {
    let ledger = ReportService::build_ledger(
        cash(),
        ReportPeriod::new(None, Some(date(2026, 1, 31))),
        JournalTotals::default(),
        vec![movement(5, dec!(5000000), Decimal::ZERO)],
    );
    let json = serde_json::to_value(&ledger).unwrap();

    assert_eq!(json["coaCode"], "1-1001");
    assert_eq!(json["accountType"], "asset");
    assert_eq!(json["startDate"], serde_json::Value::Null);
    assert_eq!(json["endDate"], "2026-01-31");
    assert_eq!(json["openingBalance"], "0.00");
    assert_eq!(json["transactions"][0]["balance"], "5000000.00");
    assert_eq!(json["closingBalance"], "5000000.00");
}
