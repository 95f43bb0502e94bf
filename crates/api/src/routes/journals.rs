//! Journal entry routes.
//!
//! Entries are created as drafts, then either posted (terminal) or
//! soft-deleted. Only posted entries reach the reports.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use bukubesar_core::chart::MAX_CODE_LEN;
use bukubesar_core::ledger::{CreateJournalInput, JournalLineInput, JournalStatus};
use bukubesar_db::{
    JournalRepository,
    repositories::{JournalDetailLine, JournalDetailed, JournalSummary},
};
use bukubesar_shared::types::{PageRequest, PageResponse, money};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the journal routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal", get(list_journals).post(create_journal))
        .route("/journal/{id}", get(get_journal).delete(delete_journal))
        .route("/journal/{id}/post", put(post_journal))
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// One requested detail line.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JournalDetailRequest {
    /// Account code the line posts to.
    #[validate(length(min = 1, max = MAX_CODE_LEN, message = "must be 1 to 20 characters"))]
    pub coa_code: String,
    /// Accepts a JSON number or a decimal string.
    #[serde(default, with = "money")]
    pub debit: Decimal,
    /// Credit amount, same formats as `debit`.
    #[serde(default, with = "money")]
    pub credit: Decimal,
    /// Optional line memo.
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for creating a journal entry.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJournalRequest {
    /// Transaction date, defaults to today (UTC).
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Header description.
    #[serde(default)]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: String,
    /// Detail lines, at least two.
    #[validate(nested)]
    pub details: Vec<JournalDetailRequest>,
}

impl CreateJournalRequest {
    fn into_input(self, today: NaiveDate) -> CreateJournalInput {
        CreateJournalInput {
            date: self.date.unwrap_or(today),
            description: self.description,
            lines: self
                .details
                .into_iter()
                .map(|d| JournalLineInput {
                    coa_code: d.coa_code,
                    debit: d.debit,
                    credit: d.credit,
                    description: d.description,
                })
                .collect(),
        }
    }
}

/// A detail line in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalDetailResponse {
    /// Detail row ID.
    pub id: Uuid,
    /// 1-based position within the entry.
    pub line_no: i32,
    /// Account code.
    pub coa_code: String,
    /// Account name.
    pub coa_name: String,
    /// Debit amount.
    #[serde(with = "money")]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(with = "money")]
    pub credit: Decimal,
    /// Line memo.
    pub description: String,
}

impl From<JournalDetailLine> for JournalDetailResponse {
    fn from(line: JournalDetailLine) -> Self {
        Self {
            id: line.id,
            line_no: line.line_no,
            coa_code: line.coa_code,
            coa_name: line.coa_name,
            debit: line.debit,
            credit: line.credit,
            description: line.description,
        }
    }
}

/// A journal entry with its details.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalResponse {
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
    #[serde(with = "money")]
    pub total_debit: Decimal,
    /// Sum of credits.
    #[serde(with = "money")]
    pub total_credit: Decimal,
    /// Detail lines in insertion order.
    pub details: Vec<JournalDetailResponse>,
}

impl From<JournalDetailed> for JournalResponse {
    fn from(journal: JournalDetailed) -> Self {
        let entry = journal.entry;
        Self {
            id: entry.id,
            date: entry.date,
            reference: entry.reference,
            description: entry.description,
            status: entry.status.into(),
            created_by: entry.created_by,
            created_at: entry.created_at,
            total_debit: journal.totals.total_debit,
            total_credit: journal.totals.total_credit,
            details: journal.details.into_iter().map(Into::into).collect(),
        }
    }
}

/// A journal entry in listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalListItem {
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
    #[serde(with = "money")]
    pub total_debit: Decimal,
    /// Sum of credits.
    #[serde(with = "money")]
    pub total_credit: Decimal,
}

impl From<JournalSummary> for JournalListItem {
    fn from(row: JournalSummary) -> Self {
        Self {
            id: row.id,
            date: row.date,
            reference: row.reference,
            description: row.description,
            status: row.status.into(),
            created_by: row.created_by,
            created_at: row.created_at,
            total_debit: row.total_debit,
            total_credit: row.total_credit,
        }
    }
}

/// Result of a status change.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Journal ID.
    pub id: Uuid,
    /// Status after the change.
    pub status: JournalStatus,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET `/journal` - Newest first, searchable by reference or description.
async fn list_journals(
    State(state): State<AppState>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<PageResponse<JournalListItem>>, ApiError> {
    let Query(page) = query?;
    let page = page.normalized();

    let journal_repo = JournalRepository::new((*state.db).clone());
    let journals = journal_repo.list_journals(&page).await?;

    Ok(Json(journals.map(JournalListItem::from)))
}

/// GET `/journal/{id}`
async fn get_journal(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<JournalResponse>, ApiError> {
    let Path(id) = id?;

    let journal_repo = JournalRepository::new((*state.db).clone());
    let journal = journal_repo.get_journal(id).await?;

    Ok(Json(journal.into()))
}

/// POST `/journal` - Creates a draft entry.
async fn create_journal(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateJournalRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let input = payload.into_input(Utc::now().date_naive());

    let journal_repo = JournalRepository::new((*state.db).clone());
    let journal = journal_repo.create_journal(input, auth.user_id()).await?;

    Ok((StatusCode::CREATED, Json(JournalResponse::from(journal))))
}

/// PUT `/journal/{id}/post` - Draft to posted.
async fn post_journal(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Path(id) = id?;

    let journal_repo = JournalRepository::new((*state.db).clone());
    journal_repo.post_journal(id).await?;

    info!(journal_id = %id, user_id = %auth.user_id(), "Journal post requested");

    Ok(Json(StatusResponse {
        id,
        status: JournalStatus::Posted,
    }))
}

/// DELETE `/journal/{id}` - Soft-deletes a draft.
async fn delete_journal(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;

    let journal_repo = JournalRepository::new((*state.db).clone());
    journal_repo.delete_journal(id).await?;

    info!(journal_id = %id, user_id = %auth.user_id(), "Journal deleted");

    Ok(StatusCode::NO_CONTENT)
}
