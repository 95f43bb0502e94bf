//! Account repository for chart of accounts database operations.

use bukubesar_core::chart::{self, ChartError, group_children};
use bukubesar_core::ledger::AccountType;
use bukubesar_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

use super::ilike;
use crate::entities::chart_of_accounts;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account code already exists.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(String),

    /// Code or parent rules violated.
    #[error(transparent)]
    Invalid(#[from] ChartError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Parent account code, if any.
    pub parent_code: Option<String>,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New display name.
    pub name: Option<String>,
    /// New account type.
    pub account_type: Option<AccountType>,
    /// `Some(None)` detaches the account from its parent.
    pub parent_code: Option<Option<String>>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl UpdateAccountInput {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.account_type.is_none()
            && self.parent_code.is_none()
            && self.is_active.is_none()
    }
}

/// A root account with its direct active children.
#[derive(Debug, Clone)]
pub struct AccountWithChildren {
    /// The root account.
    pub account: chart_of_accounts::Model,
    /// Direct active children, ordered by code.
    pub children: Vec<chart_of_accounts::Model>,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The code or name is malformed, or the code is already taken (deleted accounts keep their code)
    /// - The parent is the account itself or does not exist
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<chart_of_accounts::Model, AccountError> {
        let code = chart::normalize_code(&input.code)?;
        let name = chart::normalize_name(&input.name)?;

        let existing = chart_of_accounts::Entity::find_by_id(code.clone())
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(AccountError::DuplicateCode(code));
        }

        let parent_code = input.parent_code.map(|p| p.trim().to_string());
        self.check_parent(&code, parent_code.as_deref()).await?;

        let now = chrono::Utc::now().into();
        let account = chart_of_accounts::ActiveModel {
            code: Set(code.clone()),
            name: Set(name),
            account_type: Set(input.account_type.into()),
            parent_code: Set(parent_code),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        account.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AccountError::DuplicateCode(code),
            _ => AccountError::Database(e),
        })
    }

    /// Finds a non-deleted account by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<chart_of_accounts::Model>, AccountError> {
        let account = chart_of_accounts::Entity::find_by_id(code.to_string())
            .filter(chart_of_accounts::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;
        Ok(account)
    }

    /// Gets a non-deleted account by code.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if no such account exists.
    pub async fn get_account(&self, code: &str) -> Result<chart_of_accounts::Model, AccountError> {
        self.find_by_code(code)
            .await?
            .ok_or_else(|| AccountError::NotFound(code.to_string()))
    }

    /// Lists active accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active_accounts(&self) -> Result<Vec<chart_of_accounts::Model>, AccountError> {
        let accounts = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::DeletedAt.is_null())
            .filter(chart_of_accounts::Column::IsActive.eq(true))
            .order_by_asc(chart_of_accounts::Column::Code)
            .all(&self.db)
            .await?;
        Ok(accounts)
    }

    /// Lists accounts page by page, optionally filtered by name or code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<chart_of_accounts::Model>, AccountError> {
        let mut query = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::DeletedAt.is_null());

        if let Some(pattern) = page.like_pattern() {
            query = query.filter(
                Condition::any()
                    .add(ilike((chart_of_accounts::Entity, chart_of_accounts::Column::Name), &pattern))
                    .add(ilike((chart_of_accounts::Entity, chart_of_accounts::Column::Code), &pattern)),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_asc(chart_of_accounts::Column::Code)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Lists active root accounts, each with its active direct children.
    ///
    /// Roots are ordered by creation time, children by code. The search term
    /// matches the root's name or type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_with_children(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<AccountWithChildren>, AccountError> {
        let mut roots_query = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::DeletedAt.is_null())
            .filter(chart_of_accounts::Column::IsActive.eq(true))
            .filter(chart_of_accounts::Column::ParentCode.is_null());

        if let Some(pattern) = page.like_pattern() {
            roots_query = roots_query.filter(
                Condition::any()
                    .add(ilike((chart_of_accounts::Entity, chart_of_accounts::Column::Name), &pattern))
                    .add(type_matches(page.search.as_deref().unwrap_or_default())),
            );
        }

        let total = roots_query.clone().count(&self.db).await?;
        let roots = roots_query
            .order_by_asc(chart_of_accounts::Column::CreatedAt)
            .order_by_asc(chart_of_accounts::Column::Code)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let root_codes: Vec<String> = roots.iter().map(|r| r.code.clone()).collect();
        let children = if root_codes.is_empty() {
            Vec::new()
        } else {
            chart_of_accounts::Entity::find()
                .filter(chart_of_accounts::Column::DeletedAt.is_null())
                .filter(chart_of_accounts::Column::IsActive.eq(true))
                .filter(chart_of_accounts::Column::ParentCode.is_in(root_codes))
                .order_by_asc(chart_of_accounts::Column::Code)
                .all(&self.db)
                .await?
        };

        let data = group_children(roots, children, |r| r.code.as_str(), |c| c.parent_code.as_deref())
            .into_iter()
            .map(|(account, children)| AccountWithChildren { account, children })
            .collect();

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The account does not exist
    /// - The new parent is the account itself or does not exist
    pub async fn update_account(
        &self,
        code: &str,
        input: UpdateAccountInput,
    ) -> Result<chart_of_accounts::Model, AccountError> {
        let name = input.name.as_deref().map(chart::normalize_name).transpose()?;
        let account = self.get_account(code).await?;

        let parent_code = input
            .parent_code
            .map(|p| p.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()));
        if let Some(Some(parent)) = &parent_code {
            self.check_parent(&account.code, Some(parent)).await?;
        }

        let mut active: chart_of_accounts::ActiveModel = account.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type.into());
        }
        if let Some(parent_code) = parent_code {
            active.parent_code = Set(parent_code);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Soft-deletes an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if the account does not exist or was
    /// already deleted.
    pub async fn delete_account(&self, code: &str) -> Result<(), AccountError> {
        let now = chrono::Utc::now();
        let result = chart_of_accounts::Entity::update_many()
            .set(chart_of_accounts::ActiveModel {
                deleted_at: Set(Some(now.into())),
                updated_at: Set(now.into()),
                ..Default::default()
            })
            .filter(chart_of_accounts::Column::Code.eq(code))
            .filter(chart_of_accounts::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AccountError::NotFound(code.to_string()));
        }
        Ok(())
    }

    async fn check_parent(&self, code: &str, parent_code: Option<&str>) -> Result<(), AccountError> {
        let parent_exists = match parent_code {
            Some(parent) if parent != code => self.find_by_code(parent).await?.is_some(),
            _ => false,
        };
        chart::validate_parent(code, parent_code, |_| parent_exists)?;
        Ok(())
    }
}

/// Matches the raw search term against the account type name.
fn type_matches(search: &str) -> Condition {
    let needle = search.to_ascii_lowercase();
    let types: Vec<crate::entities::sea_orm_active_enums::AccountType> = AccountType::ALL
        .into_iter()
        .filter(|t| t.as_str().contains(needle.as_str()))
        .map(Into::into)
        .collect();

    if types.is_empty() {
        // No type can match; keep the condition well-formed.
        Condition::all().add(chart_of_accounts::Column::Code.is_null())
    } else {
        Condition::all().add(chart_of_accounts::Column::AccountType.is_in(types))
    }
}
