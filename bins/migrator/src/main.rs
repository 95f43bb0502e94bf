//! Database migration runner for Bukubesar.
//!
//! Reads the connection string from `DATABASE_URL` (or `-u <url>`).
//!
//! Usage:
//!   migrator up      - Run all pending migrations
//!   migrator down    - Rollback last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations

use bukubesar_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The CLI sets up its own tracing.
    cli::run_cli(Migrator).await;
}
