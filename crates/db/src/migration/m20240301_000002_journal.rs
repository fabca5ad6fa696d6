//! Journal schema.
//!
//! Only posted entries are stored. Entry numbers are unique per company.
//! Amounts are unconstrained `NUMERIC` so any scale the engine balances is
//! stored exactly.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS journal_lines CASCADE;
             DROP TABLE IF EXISTS journal_entries CASCADE;
             DROP TYPE IF EXISTS journal_status;",
        )
        .await?;
        Ok(())
    }
}

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TYPE journal_status AS ENUM ('preliminary', 'posted');

CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL,
    ledger_id UUID,
    year INTEGER NOT NULL,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    entry_number BIGINT NOT NULL CHECK (entry_number > 0),
    description TEXT NOT NULL,
    currency VARCHAR(3) NOT NULL DEFAULT 'CLP',
    total_debit NUMERIC NOT NULL,
    total_credit NUMERIC NOT NULL,
    status journal_status NOT NULL DEFAULT 'posted',
    posted_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_journal_entry_number UNIQUE (company_id, entry_number),
    CONSTRAINT chk_journal_balanced CHECK (total_debit = total_credit)
);

CREATE INDEX idx_journal_entries_period ON journal_entries(company_id, year, month);
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY,
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    line_number INTEGER NOT NULL,
    account_code VARCHAR(20) NOT NULL,
    account_name VARCHAR(120) NOT NULL,
    description TEXT,
    debit_amount NUMERIC NOT NULL DEFAULT 0 CHECK (debit_amount >= 0),
    credit_amount NUMERIC NOT NULL DEFAULT 0 CHECK (credit_amount >= 0),
    CONSTRAINT chk_journal_line_one_side CHECK ((debit_amount = 0) <> (credit_amount = 0)),
    CONSTRAINT uq_journal_line_number UNIQUE (journal_entry_id, line_number)
);
";
