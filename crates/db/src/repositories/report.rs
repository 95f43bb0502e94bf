//! Report repository for balance aggregation queries.
//!
//! Every query reads posted, non-deleted journals only. Amounts are summed
//! in the database and returned as raw debit/credit totals; polarity is
//! applied by `bukubesar_core::reports::ReportService`.

use bukubesar_core::ledger::JournalTotals;
use bukubesar_core::reports::{
    AccountBalance, LedgerAccount, LedgerMovement, ReportError as CoreReportError, ReportPeriod,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbBackend, DbErr, EntityTrait, FromQueryResult,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Statement,
};

use crate::entities::{
    chart_of_accounts, journal_entries, journal_entry_details,
    sea_orm_active_enums::{AccountType, JournalStatus},
};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Report parameters rejected.
    #[error(transparent)]
    Report(#[from] CoreReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Per-account sums over active accounts. Accounts without activity in the
/// window still appear, with zero sums.
const ACCOUNT_BALANCES_SQL: &str = r"
SELECT coa.code,
       coa.name,
       CAST(coa.account_type AS TEXT) AS account_type,
       COALESCE(SUM(d.debit), 0)  AS total_debit,
       COALESCE(SUM(d.credit), 0) AS total_credit
FROM chart_of_accounts coa
LEFT JOIN (
    SELECT jd.coa_code, jd.debit, jd.credit
    FROM journal_entry_details jd
    JOIN journal_entries je ON je.id = jd.journal_entry_id
    WHERE je.status = 'posted'
      AND je.deleted_at IS NULL
      AND jd.deleted_at IS NULL
      AND ($1::date IS NULL OR je.date >= $1::date)
      AND ($2::date IS NULL OR je.date <= $2::date)
) d ON d.coa_code = coa.code
WHERE coa.is_active = TRUE
  AND coa.deleted_at IS NULL
GROUP BY coa.code, coa.name, coa.account_type
ORDER BY coa.code
";

#[derive(Debug, FromQueryResult)]
struct BalanceRow {
    code: String,
    name: String,
    account_type: AccountType,
    total_debit: Decimal,
    total_credit: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct SumRow {
    total_debit: Option<Decimal>,
    total_credit: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct MovementRow {
    date: NaiveDate,
    reference: String,
    description: String,
    debit: Decimal,
    credit: Decimal,
}

/// Report repository for aggregation queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Looks up the account a ledger is requested for. Inactive accounts
    /// are included.
    ///
    /// # Errors
    ///
    /// Returns `CoreReportError::AccountNotFound` if the code does not
    /// resolve to a non-deleted account.
    pub async fn ledger_account(&self, code: &str) -> Result<LedgerAccount, ReportError> {
        let account = chart_of_accounts::Entity::find_by_id(code.to_string())
            .filter(chart_of_accounts::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreReportError::AccountNotFound(code.to_string()))?;

        Ok(LedgerAccount {
            code: account.code,
            name: account.name,
            account_type: account.account_type.into(),
        })
    }

    /// Sums posted activity strictly before `start`.
    ///
    /// Without a start date there is nothing before the window and the
    /// result is zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn opening_totals(
        &self,
        code: &str,
        start: Option<NaiveDate>,
    ) -> Result<JournalTotals, ReportError> {
        let Some(start) = start else {
            return Ok(JournalTotals::default());
        };

        let row = journal_entry_details::Entity::find()
            .select_only()
            .column_as(journal_entry_details::Column::Debit.sum(), "total_debit")
            .column_as(journal_entry_details::Column::Credit.sum(), "total_credit")
            .join(
                JoinType::InnerJoin,
                journal_entry_details::Relation::JournalEntries.def(),
            )
            .filter(posted_details())
            .filter(journal_entry_details::Column::CoaCode.eq(code))
            .filter(journal_entries::Column::Date.lt(start))
            .into_model::<SumRow>()
            .one(&self.db)
            .await?;

        Ok(row.map_or_else(JournalTotals::default, |r| {
            JournalTotals::new(
                r.total_debit.unwrap_or_default(),
                r.total_credit.unwrap_or_default(),
            )
        }))
    }

    /// Posted detail lines of one account inside the window, in
    /// chronological order (date, entry creation, line number).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn ledger_movements(
        &self,
        code: &str,
        period: ReportPeriod,
    ) -> Result<Vec<LedgerMovement>, ReportError> {
        let mut query = journal_entry_details::Entity::find()
            .select_only()
            .column(journal_entries::Column::Date)
            .column(journal_entries::Column::Reference)
            .column(journal_entry_details::Column::Description)
            .column(journal_entry_details::Column::Debit)
            .column(journal_entry_details::Column::Credit)
            .join(
                JoinType::InnerJoin,
                journal_entry_details::Relation::JournalEntries.def(),
            )
            .filter(posted_details())
            .filter(journal_entry_details::Column::CoaCode.eq(code));

        if let Some(start) = period.start_date {
            query = query.filter(journal_entries::Column::Date.gte(start));
        }
        if let Some(end) = period.end_date {
            query = query.filter(journal_entries::Column::Date.lte(end));
        }

        let rows = query
            .order_by_asc(journal_entries::Column::Date)
            .order_by_asc(journal_entries::Column::CreatedAt)
            .order_by_asc(journal_entry_details::Column::LineNo)
            .into_model::<MovementRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| LedgerMovement {
                date: r.date,
                reference: r.reference,
                description: r.description,
                debit: r.debit,
                credit: r.credit,
            })
            .collect())
    }

    /// Debit and credit sums per active account over the window, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn account_balances(
        &self,
        period: ReportPeriod,
    ) -> Result<Vec<AccountBalance>, ReportError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            ACCOUNT_BALANCES_SQL,
            [period.start_date.into(), period.end_date.into()],
        );

        let rows = BalanceRow::find_by_statement(stmt).all(&self.db).await?;

        Ok(rows
            .into_iter()
            .map(|r| AccountBalance {
                code: r.code,
                name: r.name,
                account_type: r.account_type.into(),
                total_debit: r.total_debit,
                total_credit: r.total_credit,
            })
            .collect())
    }
}

/// Details of posted, non-deleted entries that are not deleted themselves.
fn posted_details() -> Condition {
    Condition::all()
        .add(journal_entries::Column::Status.eq(JournalStatus::Posted))
        .add(journal_entries::Column::DeletedAt.is_null())
        .add(journal_entry_details::Column::DeletedAt.is_null())
}
