//! Journal repository for journal entry database operations.
//!
//! Creation runs inside one explicit transaction: account lookup, header
//! insert, detail inserts and the read-back either all commit or all roll
//! back. Posting and deletion are conditional updates guarded on
//! `status = 'draft' AND deleted_at IS NULL`.

use std::collections::HashSet;

use bukubesar_core::ledger::{
    CreateJournalInput, JournalService, JournalStatus as CoreJournalStatus, JournalTotals,
    LedgerError, PreparedJournal, new_reference,
};
use bukubesar_shared::types::{PageRequest, PageResponse};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, SqlErr, TransactionTrait,
    sea_query::{Expr, IntoCondition},
};
use uuid::Uuid;

use super::ilike;
use crate::entities::{
    chart_of_accounts, journal_entries, journal_entry_details,
    sea_orm_active_enums::JournalStatus,
};

/// Header inserts tried before giving up on a free reference.
const REFERENCE_ATTEMPTS: usize = 5;

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Journal not found.
    #[error("Journal not found: {0}")]
    NotFound(Uuid),

    /// Validation or state rule violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Every drawn reference was already taken.
    #[error("Journal reference already in use: {0}")]
    ReferenceTaken(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A detail line joined with its account name.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct JournalDetailLine {
    /// Detail row ID.
    pub id: Uuid,
    /// Owning journal entry.
    pub journal_entry_id: Uuid,
    /// 1-based position within the entry.
    pub line_no: i32,
    /// Account code.
    pub coa_code: String,
    /// Account name.
    pub coa_name: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line memo.
    pub description: String,
}

/// A journal entry with its detail lines in insertion order.
#[derive(Debug, Clone)]
pub struct JournalDetailed {
    /// Header row.
    pub entry: journal_entries::Model,
    /// Detail lines in `line_no` order.
    pub details: Vec<JournalDetailLine>,
    /// Debit and credit totals.
    pub totals: JournalTotals,
}

/// A journal entry row for listings, with its totals.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct JournalSummary {
    /// Journal ID.
    pub id: Uuid,
    /// Transaction date.
    pub date: NaiveDate,
    /// Generated reference, e.g. `JRN-20260301-AB12`.
    pub reference: String,
    /// Header description.
    pub description: String,
    /// Current status.
    pub status: JournalStatus,
    /// User who created the entry.
    pub created_by: Uuid,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and stores a new draft journal entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The lines break a double-entry rule (`LedgerError`)
    /// - A line references an unknown or deleted account
    /// - Any database statement fails; nothing is committed in that case
    pub async fn create_journal(
        &self,
        input: CreateJournalInput,
        created_by: Uuid,
    ) -> Result<JournalDetailed, JournalError> {
        let prepared = JournalService::validate(&input)?;

        let txn = self.db.begin().await?;
        let codes: Vec<String> = prepared.lines.iter().map(|l| l.coa_code.clone()).collect();
        let known = existing_account_codes(&txn, codes).await?;
        JournalService::check_accounts(&prepared, |code| known.contains(code))?;

        let entry = Self::create_in_txn(&txn, &prepared, created_by).await?;
        let detailed = load_detailed(&txn, entry.id)
            .await?
            .ok_or(JournalError::NotFound(entry.id))?;

        txn.commit().await?;

        tracing::info!(
            journal_id = %detailed.entry.id,
            reference = %detailed.entry.reference,
            lines = detailed.details.len(),
            "Journal created"
        );
        Ok(detailed)
    }

    /// Inserts the header and every detail row of a prepared journal.
    ///
    /// The caller owns `txn` and decides whether to commit.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails, or `JournalError::ReferenceTaken`
    /// if no free reference was drawn.
    pub async fn create_in_txn(
        txn: &DatabaseTransaction,
        prepared: &PreparedJournal,
        created_by: Uuid,
    ) -> Result<journal_entries::Model, JournalError> {
        Self::create_in_txn_with(txn, prepared, created_by, new_reference).await
    }

    /// Like [`Self::create_in_txn`], drawing references from `next_reference`.
    ///
    /// Each header insert runs under a savepoint, so a taken reference is
    /// retried with a fresh draw without aborting `txn`.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails, or `JournalError::ReferenceTaken`
    /// after `REFERENCE_ATTEMPTS` collisions.
    pub async fn create_in_txn_with<F>(
        txn: &DatabaseTransaction,
        prepared: &PreparedJournal,
        created_by: Uuid,
        mut next_reference: F,
    ) -> Result<journal_entries::Model, JournalError>
    where
        F: FnMut(NaiveDate) -> String + Send,
    {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let entry = insert_header(txn, prepared, created_by, now, &mut next_reference).await?;

        for line in &prepared.lines {
            journal_entry_details::ActiveModel {
                id: Set(Uuid::now_v7()),
                journal_entry_id: Set(entry.id),
                line_no: Set(line.line_no),
                coa_code: Set(line.coa_code.clone()),
                debit: Set(line.debit),
                credit: Set(line.credit),
                description: Set(line.description.clone()),
                created_at: Set(now),
                deleted_at: Set(None),
            }
            .insert(txn)
            .await?;
        }

        Ok(entry)
    }

    /// Gets a non-deleted journal with its details.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::NotFound` if the journal does not exist or was deleted.
    pub async fn get_journal(&self, id: Uuid) -> Result<JournalDetailed, JournalError> {
        load_detailed(&self.db, id)
            .await?
            .ok_or(JournalError::NotFound(id))
    }

    /// Lists journals newest first, optionally filtered by reference or description.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_journals(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<JournalSummary>, JournalError> {
        let mut condition = Condition::all().add(journal_entries::Column::DeletedAt.is_null());
        if let Some(pattern) = page.like_pattern() {
            condition = condition.add(
                Condition::any()
                    .add(ilike((journal_entries::Entity, journal_entries::Column::Reference), &pattern))
                    .add(ilike((journal_entries::Entity, journal_entries::Column::Description), &pattern)),
            );
        }

        let total = journal_entries::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await?;

        let data = journal_entries::Entity::find()
            .select_only()
            .columns([
                journal_entries::Column::Id,
                journal_entries::Column::Date,
                journal_entries::Column::Reference,
                journal_entries::Column::Description,
                journal_entries::Column::Status,
                journal_entries::Column::CreatedBy,
                journal_entries::Column::CreatedAt,
            ])
            .column_as(
                Expr::cust("COALESCE(SUM(journal_entry_details.debit), 0)"),
                "total_debit",
            )
            .column_as(
                Expr::cust("COALESCE(SUM(journal_entry_details.credit), 0)"),
                "total_credit",
            )
            .join(
                JoinType::LeftJoin,
                journal_entries::Relation::JournalEntryDetails
                    .def()
                    .on_condition(|_, details| {
                        Expr::col((details, journal_entry_details::Column::DeletedAt))
                            .is_null()
                            .into_condition()
                    }),
            )
            .filter(condition)
            .group_by(journal_entries::Column::Id)
            .order_by_desc(journal_entries::Column::Date)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .into_model::<JournalSummary>()
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Moves a draft journal to posted.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotPostable` if the journal is missing, deleted
    /// or already posted.
    pub async fn post_journal(&self, id: Uuid) -> Result<(), JournalError> {
        let current = self.current_status(id).await?;
        JournalService::ensure_can_post(current)?;

        let now: DateTime<FixedOffset> = Utc::now().into();
        let changed = self
            .update_draft(
                id,
                journal_entries::ActiveModel {
                    status: Set(JournalStatus::Posted),
                    updated_at: Set(now),
                    ..Default::default()
                },
            )
            .await?;

        // Another request won the race between the check and the update.
        if !changed {
            return Err(LedgerError::NotPostable(self.current_status(id).await?).into());
        }

        tracing::info!(journal_id = %id, "Journal posted");
        Ok(())
    }

    /// Soft-deletes a draft journal. Details are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotDeletable` if the journal is missing, already
    /// deleted or posted.
    pub async fn delete_journal(&self, id: Uuid) -> Result<(), JournalError> {
        let current = self.current_status(id).await?;
        JournalService::ensure_can_delete(current)?;

        let now: DateTime<FixedOffset> = Utc::now().into();
        let changed = self
            .update_draft(
                id,
                journal_entries::ActiveModel {
                    deleted_at: Set(Some(now)),
                    updated_at: Set(now),
                    ..Default::default()
                },
            )
            .await?;

        if !changed {
            return Err(LedgerError::NotDeletable(self.current_status(id).await?).into());
        }

        tracing::info!(journal_id = %id, "Journal deleted");
        Ok(())
    }

    /// Status of a non-deleted journal, `None` if there is none.
    async fn current_status(&self, id: Uuid) -> Result<Option<CoreJournalStatus>, DbErr> {
        let entry = journal_entries::Entity::find_by_id(id)
            .filter(journal_entries::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;
        Ok(entry.map(|e| e.status.into()))
    }

    /// Applies `changes` only while the journal is still an undeleted draft.
    async fn update_draft(
        &self,
        id: Uuid,
        changes: journal_entries::ActiveModel,
    ) -> Result<bool, DbErr> {
        let result = journal_entries::Entity::update_many()
            .set(changes)
            .filter(journal_entries::Column::Id.eq(id))
            .filter(journal_entries::Column::Status.eq(JournalStatus::Draft))
            .filter(journal_entries::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

async fn existing_account_codes<C: ConnectionTrait>(
    conn: &C,
    codes: Vec<String>,
) -> Result<HashSet<String>, DbErr> {
    if codes.is_empty() {
        return Ok(HashSet::new());
    }
    let found: Vec<String> = chart_of_accounts::Entity::find()
        .select_only()
        .column(chart_of_accounts::Column::Code)
        .filter(chart_of_accounts::Column::Code.is_in(codes))
        .filter(chart_of_accounts::Column::DeletedAt.is_null())
        .into_tuple()
        .all(conn)
        .await?;
    Ok(found.into_iter().collect())
}

async fn insert_header<F>(
    txn: &DatabaseTransaction,
    prepared: &PreparedJournal,
    created_by: Uuid,
    now: DateTime<FixedOffset>,
    next_reference: &mut F,
) -> Result<journal_entries::Model, JournalError>
where
    F: FnMut(NaiveDate) -> String + Send,
{
    let mut reference = String::new();
    for _ in 0..REFERENCE_ATTEMPTS {
        reference = next_reference(now.date_naive());

        let savepoint = txn.begin().await?;
        let inserted = journal_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            date: Set(prepared.date),
            reference: Set(reference.clone()),
            description: Set(prepared.description.clone()),
            status: Set(JournalStatus::Draft),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&savepoint)
        .await;

        match inserted {
            Ok(entry) => {
                savepoint.commit().await?;
                return Ok(entry);
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                savepoint.rollback().await?;
                tracing::debug!(reference = %reference, "Journal reference taken, drawing again");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(JournalError::ReferenceTaken(reference))
}

async fn load_detailed<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<JournalDetailed>, DbErr> {
    let Some(entry) = journal_entries::Entity::find_by_id(id)
        .filter(journal_entries::Column::DeletedAt.is_null())
        .one(conn)
        .await?
    else {
        return Ok(None);
    };

    let details: Vec<JournalDetailLine> = journal_entry_details::Entity::find()
        .select_only()
        .columns([
            journal_entry_details::Column::Id,
            journal_entry_details::Column::JournalEntryId,
            journal_entry_details::Column::LineNo,
            journal_entry_details::Column::CoaCode,
            journal_entry_details::Column::Debit,
            journal_entry_details::Column::Credit,
            journal_entry_details::Column::Description,
        ])
        .column_as(chart_of_accounts::Column::Name, "coa_name")
        .join(
            JoinType::InnerJoin,
            journal_entry_details::Relation::ChartOfAccounts.def(),
        )
        .filter(journal_entry_details::Column::JournalEntryId.eq(id))
        .filter(journal_entry_details::Column::DeletedAt.is_null())
        .order_by_asc(journal_entry_details::Column::LineNo)
        .into_model::<JournalDetailLine>()
        .all(conn)
        .await?;

    let totals = details.iter().fold(JournalTotals::default(), |acc, d| {
        JournalTotals::new(acc.total_debit + d.debit, acc.total_credit + d.credit)
    });

    Ok(Some(JournalDetailed {
        entry,
        details,
        totals,
    }))
}
