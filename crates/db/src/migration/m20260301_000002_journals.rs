//! Journal headers and detail lines.
//!
//! Details reference both their entry and an account. Soft-deleting an entry
//! leaves its details in place; reads filter through the header.

use sea_orm_migration::prelude::*;

/// Registers this schema step with the migrator.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRY_DETAILS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "DROP TABLE IF EXISTS journal_entry_details; DROP TABLE IF EXISTS journal_entries;",
            )
            .await?;
        Ok(())
    }
}

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id              UUID PRIMARY KEY,
    date            DATE NOT NULL,
    reference       VARCHAR(50) NOT NULL UNIQUE,
    description     TEXT NOT NULL DEFAULT '',
    status          journal_status NOT NULL DEFAULT 'draft',
    created_by      UUID NOT NULL REFERENCES users(id),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    deleted_at      TIMESTAMPTZ
);

CREATE INDEX idx_journal_entries_date ON journal_entries(date, created_at) WHERE deleted_at IS NULL;
CREATE INDEX idx_journal_entries_status ON journal_entries(status) WHERE deleted_at IS NULL;
";

const JOURNAL_ENTRY_DETAILS_SQL: &str = r"
CREATE TABLE journal_entry_details (
    id                  UUID PRIMARY KEY,
    journal_entry_id    UUID NOT NULL REFERENCES journal_entries(id),
    line_no             INTEGER NOT NULL,
    coa_code            VARCHAR(20) NOT NULL REFERENCES chart_of_accounts(code),
    debit               NUMERIC(20, 2) NOT NULL DEFAULT 0,
    credit              NUMERIC(20, 2) NOT NULL DEFAULT 0,
    description         TEXT NOT NULL DEFAULT '',
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    deleted_at          TIMESTAMPTZ,

    CONSTRAINT uq_detail_line UNIQUE (journal_entry_id, line_no),
    CONSTRAINT chk_detail_non_negative CHECK (debit >= 0 AND credit >= 0),
    CONSTRAINT chk_detail_one_side CHECK ((debit > 0 AND credit = 0) OR (credit > 0 AND debit = 0))
);

CREATE INDEX idx_details_entry ON journal_entry_details(journal_entry_id);
CREATE INDEX idx_details_coa ON journal_entry_details(coa_code) WHERE deleted_at IS NULL;
";
