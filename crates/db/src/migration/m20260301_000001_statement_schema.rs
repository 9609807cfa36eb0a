//! Statement of account schema.
//!
//! Creates the ledger tables the statement reads from, plus the indexes that
//! back the prior-lines aggregate and the canonical listing order.

use sea_orm_migration::prelude::*;

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
        // PART 2: CHART OF ACCOUNTS & PARTIES
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(PARTIES_SQL).await?;

        // ============================================================
        // PART 3: FISCAL YEARS & PERIODS
        // ============================================================
        db.execute_unprepared(FISCAL_YEARS_SQL).await?;
        db.execute_unprepared(PERIODS_SQL).await?;

        // ============================================================
        // PART 4: MOVES & LINES
        // ============================================================
        db.execute_unprepared(MOVES_SQL).await?;
        db.execute_unprepared(MOVE_LINES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE account_kind AS ENUM (
    'receivable',
    'payable',
    'revenue',
    'expense',
    'stock',
    'other',
    'view'
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(50),
    name VARCHAR(255) NOT NULL,
    kind account_kind NOT NULL
);

CREATE INDEX idx_accounts_code ON accounts(code);
";

const PARTIES_SQL: &str = r"
CREATE TABLE parties (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    account_receivable_id UUID REFERENCES accounts(id),
    account_payable_id UUID REFERENCES accounts(id)
);
";

const FISCAL_YEARS_SQL: &str = r"
CREATE TABLE fiscal_years (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    CONSTRAINT chk_fiscal_year_dates CHECK (start_date <= end_date)
);

CREATE INDEX idx_fiscal_years_dates ON fiscal_years(start_date, end_date);
";

const PERIODS_SQL: &str = r"
CREATE TABLE periods (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    fiscal_year_id UUID NOT NULL REFERENCES fiscal_years(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    CONSTRAINT chk_period_dates CHECK (start_date <= end_date)
);

CREATE INDEX idx_periods_fiscal_year ON periods(fiscal_year_id);
";

// Move numbers compare byte-wise ("C" collation) so SQL ordering matches
// the in-process comparison.
const MOVES_SQL: &str = r#"
CREATE TABLE moves (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    period_id UUID NOT NULL REFERENCES periods(id),
    date DATE NOT NULL,
    number VARCHAR(100) COLLATE "C" NOT NULL DEFAULT '/'
);

CREATE INDEX idx_moves_period ON moves(period_id);
CREATE INDEX idx_moves_statement_order ON moves(date, number, id);
"#;

const MOVE_LINES_SQL: &str = r"
CREATE TABLE move_lines (
    id BIGSERIAL PRIMARY KEY,
    move_id UUID NOT NULL REFERENCES moves(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    party_id UUID REFERENCES parties(id),
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    CONSTRAINT chk_amounts_non_negative CHECK (debit >= 0 AND credit >= 0)
);

CREATE INDEX idx_move_lines_move ON move_lines(move_id);
CREATE INDEX idx_move_lines_account_party ON move_lines(account_id, party_id, id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS move_lines;
DROP TABLE IF EXISTS moves;
DROP TABLE IF EXISTS periods;
DROP TABLE IF EXISTS fiscal_years;
DROP TABLE IF EXISTS parties;
DROP TABLE IF EXISTS accounts;
DROP TYPE IF EXISTS account_kind;
";
