//! Financial report routes.
//!
//! Reports only read posted, non-deleted journal entries.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use bukubesar_core::reports::{
    BalanceSheetReport, LedgerReport, ProfitLossReport, ReportPeriod, ReportService,
    TrialBalanceReport,
};
use bukubesar_db::ReportRepository;
use bukubesar_shared::AppError;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;
use validator::Validate;

use crate::{AppState, error::ApiError};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/report/ledger", get(get_ledger))
        .route("/report/trial-balance", get(get_trial_balance))
        .route("/report/profit-loss", get(get_profit_loss))
        .route("/report/balance-sheet", get(get_balance_sheet))
}

// ============================================================================
// Query parameters
// ============================================================================

/// Query parameters for an account ledger.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LedgerQuery {
    /// Account code (required).
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub coa_code: String,
    /// First day included, unbounded when absent.
    pub start_date: Option<NaiveDate>,
    /// Last day included, unbounded when absent.
    pub end_date: Option<NaiveDate>,
}

/// Optional date window (`YYYY-MM-DD`, both ends inclusive).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    /// First day included, unbounded when absent.
    pub start_date: Option<NaiveDate>,
    /// Last day included, unbounded when absent.
    pub end_date: Option<NaiveDate>,
}

impl PeriodQuery {
    fn period(&self) -> Result<ReportPeriod, ApiError> {
        let period = ReportPeriod::new(self.start_date, self.end_date);
        period.validate().map_err(AppError::from)?;
        Ok(period)
    }
}

/// Balance sheet cut-off date.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetQuery {
    /// Last day included, unbounded when absent.
    pub end_date: Option<NaiveDate>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET `/report/ledger`
async fn get_ledger(
    State(state): State<AppState>,
    query: Result<Query<LedgerQuery>, QueryRejection>,
) -> Result<Json<LedgerReport>, ApiError> {
    let Query(query) = query?;
    query.validate()?;

    let code = query.coa_code.trim();
    let period = PeriodQuery {
        start_date: query.start_date,
        end_date: query.end_date,
    }
    .period()?;

    let report_repo = ReportRepository::new((*state.db).clone());
    let account = report_repo.ledger_account(code).await?;
    let before_start = report_repo.opening_totals(code, period.start_date).await?;
    let movements = report_repo.ledger_movements(code, period).await?;

    debug!(coa_code = %code, rows = movements.len(), "Building ledger");

    Ok(Json(ReportService::build_ledger(
        account,
        period,
        before_start,
        movements,
    )))
}

/// GET `/report/trial-balance`
async fn get_trial_balance(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<TrialBalanceReport>, ApiError> {
    let Query(query) = query?;
    let period = query.period()?;

    let report_repo = ReportRepository::new((*state.db).clone());
    let balances = report_repo.account_balances(period).await?;

    Ok(Json(ReportService::trial_balance(period, balances)))
}

/// GET `/report/profit-loss`
async fn get_profit_loss(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<ProfitLossReport>, ApiError> {
    let Query(query) = query?;
    let period = query.period()?;

    let report_repo = ReportRepository::new((*state.db).clone());
    let balances = report_repo.account_balances(period).await?;

    Ok(Json(ReportService::profit_loss(period, &balances)))
}

/// GET `/report/balance-sheet` - Cumulative from the first entry up to `endDate`.
async fn get_balance_sheet(
    State(state): State<AppState>,
    query: Result<Query<BalanceSheetQuery>, QueryRejection>,
) -> Result<Json<BalanceSheetReport>, ApiError> {
    let Query(query) = query?;

    let report_repo = ReportRepository::new((*state.db).clone());
    let balances = report_repo
        .account_balances(ReportPeriod::until(query.end_date))
        .await?;

    Ok(Json(ReportService::balance_sheet(query.end_date, &balances)))
}
