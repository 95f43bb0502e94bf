//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use bukubesar_core::chart::{MAX_CODE_LEN, MAX_NAME_LEN};
use bukubesar_core::ledger::AccountType;
use bukubesar_db::{
    AccountRepository,
    entities::chart_of_accounts,
    repositories::{AccountWithChildren, CreateAccountInput, UpdateAccountInput},
};
use bukubesar_shared::types::{PageRequest, PageResponse};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/coa", get(list_accounts).post(create_account))
        .route("/coa/with-children", get(list_with_children))
        .route(
            "/coa/{code}",
            get(get_account).put(update_account).delete(delete_account),
        )
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Request body for creating an account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// Unique account code, e.g. `1-1001`.
    #[validate(length(min = 1, max = MAX_CODE_LEN, message = "must be 1 to 20 characters"))]
    pub code: String,
    /// Display name.
    #[validate(length(min = 1, max = MAX_NAME_LEN, message = "must be 1 to 200 characters"))]
    pub name: String,
    /// Account type: asset, liability, equity, revenue, expense.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Parent account code.
    pub parent_code: Option<String>,
    /// Defaults to true.
    pub is_active: Option<bool>,
}

/// Request body for updating an account. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    /// New display name.
    #[validate(length(min = 1, max = MAX_NAME_LEN, message = "must be 1 to 200 characters"))]
    pub name: Option<String>,
    /// New account type.
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    /// An empty string detaches the account from its parent.
    pub parent_code: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl From<UpdateAccountRequest> for UpdateAccountInput {
    fn from(req: UpdateAccountRequest) -> Self {
        Self {
            name: req.name,
            account_type: req.account_type,
            parent_code: req
                .parent_code
                .map(|p| Some(p.trim().to_string()).filter(|p| !p.is_empty())),
            is_active: req.is_active,
        }
    }
}

/// Response for an account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    /// Account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Parent account code, if any.
    pub parent_code: Option<String>,
    /// Whether the account is active.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
    /// Last update time.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<chart_of_accounts::Model> for AccountResponse {
    fn from(account: chart_of_accounts::Model) -> Self {
        Self {
            code: account.code,
            name: account.name,
            account_type: account.account_type.into(),
            parent_code: account.parent_code,
            is_active: account.is_active,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// A root account with its direct children.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTreeResponse {
    /// Account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Direct active children, ordered by code.
    pub children: Vec<AccountResponse>,
}

impl From<AccountWithChildren> for AccountTreeResponse {
    fn from(node: AccountWithChildren) -> Self {
        Self {
            code: node.account.code,
            name: node.account.name,
            account_type: node.account.account_type.into(),
            children: node.children.into_iter().map(AccountResponse::from).collect(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET `/coa` - Paginated accounts, searchable by name or code.
async fn list_accounts(
    State(state): State<AppState>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<PageResponse<AccountResponse>>, ApiError> {
    let Query(page) = query?;
    let page = page.normalized();

    let account_repo = AccountRepository::new((*state.db).clone());
    let accounts = account_repo.list_accounts(&page).await?;

    Ok(Json(accounts.map(AccountResponse::from)))
}

/// GET `/coa/with-children` - Active root accounts with their active children.
async fn list_with_children(
    State(state): State<AppState>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<PageResponse<AccountTreeResponse>>, ApiError> {
    let Query(page) = query?;
    let page = page.normalized();

    let account_repo = AccountRepository::new((*state.db).clone());
    let roots = account_repo.list_with_children(&page).await?;

    Ok(Json(roots.map(AccountTreeResponse::from)))
}

/// GET `/coa/{code}`
async fn get_account(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account_repo = AccountRepository::new((*state.db).clone());
    let account = account_repo.get_account(&code).await?;
    Ok(Json(account.into()))
}

/// POST `/coa`
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let account_repo = AccountRepository::new((*state.db).clone());
    let account = account_repo
        .create_account(CreateAccountInput {
            code: payload.code,
            name: payload.name,
            account_type: payload.account_type,
            parent_code: payload
                .parent_code
                .filter(|p| !p.trim().is_empty()),
            is_active: payload.is_active.unwrap_or(true),
        })
        .await?;

    info!(
        user_id = %auth.user_id(),
        code = %account.code,
        "Account created"
    );

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// PUT `/coa/{code}`
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(code): Path<String>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let account_repo = AccountRepository::new((*state.db).clone());
    let patch = UpdateAccountInput::from(payload);
    if patch.is_empty() {
        return Ok(Json(account_repo.get_account(&code).await?.into()));
    }
    let account = account_repo.update_account(&code, patch).await?;

    info!(user_id = %auth.user_id(), code = %account.code, "Account updated");

    Ok(Json(account.into()))
}

/// DELETE `/coa/{code}` - Soft delete.
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(code): Path<String>,
) -> Result<StatusCode, ApiError> {
    let account_repo = AccountRepository::new((*state.db).clone());
    account_repo.delete_account(&code).await?;

    info!(user_id = %auth.user_id(), code = %code, "Account deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_uses_type_key() {
        let req: CreateAccountRequest = serde_json::from_str(
            r#"{"code":"1-1001","name":"Cash","type":"asset","parentCode":"1-1000"}"#,
        )
        .unwrap();
        assert_eq!(req.account_type, AccountType::Asset);
        assert_eq!(req.parent_code.as_deref(), Some("1-1000"));
        assert_eq!(req.is_active, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_long_code() {
        let req = CreateAccountRequest {
            code: "1".repeat(21),
            name: "Cash".into(),
            account_type: AccountType::Asset,
            parent_code: None,
            is_active: None,
        };
        assert!(req.validate().unwrap_err().field_errors().contains_key("code"));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = serde_json::from_str::<CreateAccountRequest>(
            r#"{"code":"1-1001","name":"Cash","type":"cash"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_parent_handling() {
        let keep: UpdateAccountInput = UpdateAccountRequest::default().into();
        assert_eq!(keep.parent_code, None);
        assert!(keep.is_empty());

        let clear: UpdateAccountInput = UpdateAccountRequest {
            parent_code: Some("  ".into()),
            ..Default::default()
        }
        .into();
        assert_eq!(clear.parent_code, Some(None));

        let set: UpdateAccountInput = UpdateAccountRequest {
            parent_code: Some("1-1000".into()),
            ..Default::default()
        }
        .into();
        assert_eq!(set.parent_code, Some(Some("1-1000".to_string())));
    }
}
