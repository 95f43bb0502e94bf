//! Initial database migration: enums, users and the chart of accounts.

use sea_orm_migration::prelude::*;

/// Registers this schema step with the migrator.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: IDENTITY
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(CHART_OF_ACCOUNTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM ('asset', 'liability', 'equity', 'revenue', 'expense');
CREATE TYPE journal_status AS ENUM ('draft', 'posted');
CREATE TYPE user_role AS ENUM ('admin', 'user');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id              UUID PRIMARY KEY,
    user_name       VARCHAR(100) NOT NULL UNIQUE,
    email           VARCHAR(255) NOT NULL UNIQUE,
    password_hash   VARCHAR(255) NOT NULL,
    role            user_role NOT NULL DEFAULT 'user',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    deleted_at      TIMESTAMPTZ
);
";

const CHART_OF_ACCOUNTS_SQL: &str = r"
CREATE TABLE chart_of_accounts (
    code            VARCHAR(20) PRIMARY KEY,
    name            VARCHAR(200) NOT NULL,
    account_type    account_type NOT NULL,
    parent_code     VARCHAR(20) REFERENCES chart_of_accounts(code),
    is_active       BOOLEAN NOT NULL DEFAULT TRUE,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    deleted_at      TIMESTAMPTZ,

    CONSTRAINT chk_coa_not_own_parent CHECK (parent_code IS NULL OR parent_code <> code)
);

CREATE INDEX idx_coa_parent ON chart_of_accounts(parent_code) WHERE deleted_at IS NULL;
CREATE INDEX idx_coa_active ON chart_of_accounts(is_active) WHERE deleted_at IS NULL;
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS chart_of_accounts;
DROP TABLE IF EXISTS users;
DROP TYPE IF EXISTS user_role;
DROP TYPE IF EXISTS journal_status;
DROP TYPE IF EXISTS account_type;
";
