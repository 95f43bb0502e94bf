//! Demo data seeder for Bukubesar development.
//!
//! Seeds an admin user, a small chart of accounts, and one posted opening
//! journal. Every step is skipped when its data already exists, so the
//! seeder can be run repeatedly.
//!
//! Usage: cargo run --bin seeder
//!
//! The admin login defaults to `admin@bukubesar.local` / `admin123` and can
//! be overridden with `SEED_ADMIN_EMAIL` and `SEED_ADMIN_PASSWORD`.

use anyhow::Context;
use bukubesar_core::auth::{UserRole, hash_password};
use bukubesar_core::ledger::{AccountType, CreateJournalInput, JournalLineInput};
use bukubesar_db::{
    AccountRepository, JournalRepository, UserRepository, connect,
    repositories::{AccountError, CreateAccountInput, CreateUserInput},
};
use bukubesar_shared::{AppConfig, types::PageRequest};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// One chart-of-accounts row to seed.
struct SeedAccount {
    code: &'static str,
    name: &'static str,
    account_type: AccountType,
    parent_code: Option<&'static str>,
}

const fn account(
    code: &'static str,
    name: &'static str,
    account_type: AccountType,
    parent_code: Option<&'static str>,
) -> SeedAccount {
    SeedAccount {
        code,
        name,
        account_type,
        parent_code,
    }
}

/// Parents come before their children.
const CHART: [SeedAccount; 15] = [
    account("1-1000", "Current Assets", AccountType::Asset, None),
    account("1-1001", "Cash", AccountType::Asset, Some("1-1000")),
    account("1-1002", "Bank", AccountType::Asset, Some("1-1000")),
    account("1-1100", "Accounts Receivable", AccountType::Asset, Some("1-1000")),
    account("2-1000", "Current Liabilities", AccountType::Liability, None),
    account("2-1001", "Accounts Payable", AccountType::Liability, Some("2-1000")),
    account("3-1000", "Owner Capital", AccountType::Equity, None),
    account("3-2000", "Retained Earnings", AccountType::Equity, None),
    account("4-1000", "Revenue", AccountType::Revenue, None),
    account("4-1001", "Sales", AccountType::Revenue, Some("4-1000")),
    account("4-1002", "Service Revenue", AccountType::Revenue, Some("4-1000")),
    account("6-1000", "Operating Expenses", AccountType::Expense, None),
    account("6-1001", "Rent Expense", AccountType::Expense, Some("6-1000")),
    account("6-1002", "Salaries Expense", AccountType::Expense, Some("6-1000")),
    account("6-1003", "Utilities Expense", AccountType::Expense, Some("6-1000")),
];

const DEFAULT_ADMIN_EMAIL: &str = "admin@bukubesar.local";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding admin user...");
    let admin_id = seed_admin(&db).await?;

    println!("Seeding chart of accounts...");
    seed_chart(&db).await?;

    println!("Seeding opening journal...");
    seed_opening_journal(&db, admin_id).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Creates the admin user unless the email is already registered.
async fn seed_admin(db: &DatabaseConnection) -> anyhow::Result<Uuid> {
    let email = std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.into());
    let password =
        std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.into());

    let user_repo = UserRepository::new(db.clone());
    if let Some(existing) = user_repo.find_by_email(&email).await? {
        println!("  Admin {email} already exists, skipping...");
        return Ok(existing.id);
    }

    let user = user_repo
        .create(CreateUserInput {
            user_name: "admin".to_string(),
            email: email.clone(),
            password_hash: hash_password(&password)?,
            role: UserRole::Admin,
        })
        .await?;

    println!("  Created admin user: {email}");
    Ok(user.id)
}

/// Creates every account in [`CHART`] whose code is still free.
async fn seed_chart(db: &DatabaseConnection) -> anyhow::Result<()> {
    let account_repo = AccountRepository::new(db.clone());

    let mut created = 0;
    for seed in &CHART {
        let result = account_repo
            .create_account(CreateAccountInput {
                code: seed.code.to_string(),
                name: seed.name.to_string(),
                account_type: seed.account_type,
                parent_code: seed.parent_code.map(str::to_string),
                is_active: true,
            })
            .await;

        match result {
            Ok(_) => created += 1,
            // Deleted accounts keep their code, so this also covers tombstones.
            Err(AccountError::DuplicateCode(_)) => {}
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create account {}", seed.code));
            }
        }
    }

    println!("  Created {created} of {} accounts", CHART.len());
    Ok(())
}

/// Posts the owner's capital injection on an empty journal.
async fn seed_opening_journal(db: &DatabaseConnection, created_by: Uuid) -> anyhow::Result<()> {
    let journal_repo = JournalRepository::new(db.clone());

    let existing = journal_repo.list_journals(&PageRequest::default()).await?;
    if existing.meta.total > 0 {
        println!("  Journals already exist, skipping...");
        return Ok(());
    }

    let capital = Decimal::new(5_000_000, 0);
    let journal = journal_repo
        .create_journal(
            CreateJournalInput {
                date: Utc::now().date_naive(),
                description: "Owner capital injection".to_string(),
                lines: vec![
                    JournalLineInput::debit("1-1001", capital),
                    JournalLineInput::credit("3-1000", capital),
                ],
            },
            created_by,
        )
        .await?;
    journal_repo.post_journal(journal.entry.id).await?;

    println!("  Posted {}", journal.entry.reference);
    Ok(())
}
