//! Shared fixtures: a throwaway Postgres container with migrations applied.

#![allow(dead_code)]

use bukubesar_core::auth::UserRole;
use bukubesar_core::ledger::AccountType;
use bukubesar_db::migration::{Migrator, MigratorTrait};
use bukubesar_db::{AccountRepository, UserRepository};
use bukubesar_db::repositories::{CreateAccountInput, CreateUserInput};
use sea_orm::{Database, DatabaseConnection};
use testcontainers_modules::postgres::Postgres;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use uuid::Uuid;

/// A migrated database. The container stops when this is dropped.
pub struct TestDb {
    pub db: DatabaseConnection,
    _container: ContainerAsync<Postgres>,
}

pub async fn setup() -> TestDb {
    let container = Postgres::default()
        .start()
        .await
        .expect("Failed to start postgres container");
    let host = container.get_host().await.expect("container host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("container port");

    let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");
    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");

    TestDb {
        db,
        _container: container,
    }
}

/// Creates a user to own journals.
pub async fn create_user(db: &DatabaseConnection) -> Uuid {
    let suffix = Uuid::new_v4().simple().to_string();
    UserRepository::new(db.clone())
        .create(CreateUserInput {
            user_name: format!("tester-{}", &suffix[..8]),
            email: format!("tester-{suffix}@example.com"),
            password_hash: "$argon2id$test_hash".to_string(),
            role: UserRole::User,
        })
        .await
        .expect("Failed to create user")
        .id
}

/// Creates a root account.
pub async fn create_account(db: &DatabaseConnection, code: &str, name: &str, account_type: AccountType) {
    create_child_account(db, code, name, account_type, None).await;
}

pub async fn create_child_account(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
    account_type: AccountType,
    parent: Option<&str>,
) {
    AccountRepository::new(db.clone())
        .create_account(CreateAccountInput {
            code: code.to_string(),
            name: name.to_string(),
            account_type,
            parent_code: parent.map(str::to_string),
            is_active: true,
        })
        .await
        .expect("Failed to create account");
}

/// Cash, capital, sales and rent accounts.
pub async fn seed_chart(db: &DatabaseConnection) {
    create_account(db, "1-1001", "Cash", AccountType::Asset).await;
    create_account(db, "3-1000", "Owner Capital", AccountType::Equity).await;
    create_account(db, "4-1001", "Sales", AccountType::Revenue).await;
    create_account(db, "6-1001", "Rent Expense", AccountType::Expense).await;
}
