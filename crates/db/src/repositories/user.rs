//! User repository for database operations.

use bukubesar_core::auth::UserRole;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    Set, SqlErr,
};
use uuid::Uuid;

use crate::entities::users;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email or user name already registered.
    #[error("Email or username already registered")]
    AlreadyExists,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Username.
    pub user_name: String,
    /// Email address.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Access role.
    pub role: UserRole,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id)
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns `UserError::AlreadyExists` if the email or user name is taken,
    /// including by a deleted user.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        let taken = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Email.eq(input.email.as_str()))
                    .add(users::Column::UserName.eq(input.user_name.as_str())),
            )
            .one(&self.db)
            .await?;
        if taken.is_some() {
            return Err(UserError::AlreadyExists);
        }

        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_name: Set(input.user_name),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            role: Set(input.role.into()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        user.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => UserError::AlreadyExists,
            _ => UserError::Database(e),
        })
    }
}
