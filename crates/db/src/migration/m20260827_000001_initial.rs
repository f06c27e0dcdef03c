//! Initial schema: accounts, ledger heads, transactions, cheques, monthly
//! snapshots, closure logs, and the donor/booklet reference tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS period_closure_logs, monthly_snapshots, cheques, \
             transaction_items, transactions, ledger_heads, accounts, donors, booklets CASCADE; \
             DROP TYPE IF EXISTS head_type, tx_type, cash_type, tx_status, cheque_status, \
             closure_action;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
CREATE TYPE head_type AS ENUM ('credit', 'debit');
CREATE TYPE tx_type AS ENUM ('credit', 'debit');
CREATE TYPE cash_type AS ENUM ('cash', 'bank', 'upi', 'card', 'netbank', 'cheque', 'multiple');
CREATE TYPE tx_status AS ENUM ('completed', 'pending', 'cancelled');
CREATE TYPE cheque_status AS ENUM ('pending', 'cleared', 'cancelled');
CREATE TYPE closure_action AS ENUM ('CLOSE_PERIOD', 'REOPEN_PERIOD', 'FORCE_CLOSE_PERIOD');

CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    last_closed_date DATE,
    open_month INTEGER CHECK (open_month BETWEEN 1 AND 12),
    open_year INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- The open period is tracked as a whole: both fields or neither
    CONSTRAINT chk_open_period CHECK ((open_month IS NULL) = (open_year IS NULL))
);

CREATE TABLE donors (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE booklets (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE ledger_heads (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    head_type head_type NOT NULL,
    cash_balance NUMERIC(14, 2) NOT NULL DEFAULT 0,
    bank_balance NUMERIC(14, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_ledger_heads_name UNIQUE (account_id, name)
);

CREATE INDEX idx_ledger_heads_account ON ledger_heads(account_id);

CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    ledger_head_id UUID NOT NULL REFERENCES ledger_heads(id),
    tx_type tx_type NOT NULL,
    cash_type cash_type NOT NULL,
    amount NUMERIC(14, 2) NOT NULL CHECK (amount > 0),
    tx_date DATE NOT NULL,
    status tx_status NOT NULL,
    donor_id UUID REFERENCES donors(id),
    booklet_id UUID REFERENCES booklets(id),
    admin_override BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_transactions_account_date ON transactions(account_id, tx_date);
CREATE INDEX idx_transactions_status ON transactions(status);

CREATE TABLE transaction_items (
    id UUID PRIMARY KEY,
    transaction_id UUID NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    ledger_head_id UUID NOT NULL REFERENCES ledger_heads(id),
    amount NUMERIC(14, 2) NOT NULL,
    cash_amount NUMERIC(14, 2) NOT NULL,
    bank_amount NUMERIC(14, 2) NOT NULL,
    -- Channel components always reconcile with the signed amount
    CONSTRAINT chk_item_split CHECK (cash_amount + bank_amount = amount)
);

CREATE INDEX idx_transaction_items_tx ON transaction_items(transaction_id);
CREATE INDEX idx_transaction_items_head ON transaction_items(ledger_head_id);

CREATE TABLE cheques (
    id UUID PRIMARY KEY,
    transaction_id UUID NOT NULL UNIQUE REFERENCES transactions(id) ON DELETE CASCADE,
    cheque_number VARCHAR(64) NOT NULL,
    bank_name VARCHAR(255) NOT NULL,
    issue_date DATE NOT NULL,
    due_date DATE NOT NULL,
    status cheque_status NOT NULL,
    clearing_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_cheques_status ON cheques(status);

CREATE TABLE monthly_snapshots (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    ledger_head_id UUID NOT NULL REFERENCES ledger_heads(id) ON DELETE CASCADE,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    year INTEGER NOT NULL,
    opening_balance NUMERIC(14, 2) NOT NULL,
    receipts NUMERIC(14, 2) NOT NULL,
    payments NUMERIC(14, 2) NOT NULL,
    closing_balance NUMERIC(14, 2) NOT NULL,
    cash_in_hand NUMERIC(14, 2) NOT NULL,
    cash_in_bank NUMERIC(14, 2) NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_snapshot_month UNIQUE (ledger_head_id, year, month),
    CONSTRAINT chk_snapshot_closing
        CHECK (closing_balance = opening_balance + receipts - payments),
    CONSTRAINT chk_snapshot_channels
        CHECK (cash_in_hand + cash_in_bank = closing_balance)
);

CREATE INDEX idx_snapshots_account_period ON monthly_snapshots(account_id, year, month);

CREATE TABLE period_closure_logs (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    action closure_action NOT NULL,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    year INTEGER NOT NULL,
    actor_id UUID NOT NULL,
    details TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_closure_logs_account ON period_closure_logs(account_id, created_at DESC);
";
