//! PostgreSQL schema for the ledger engine
//!
//! Three tables: accounts, transactions, audit log, plus the identity
//! lookup the resolver reads. All DDL is idempotent.

use sqlx::PgPool;

use crate::error::LedgerError;

const CREATE_IDENTITIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS identities_tb (
    identity_id BIGSERIAL PRIMARY KEY,
    email       TEXT NOT NULL UNIQUE,
    is_active   BOOLEAN NOT NULL DEFAULT TRUE,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts_tb (
    account_id        BIGSERIAL PRIMARY KEY,
    owner_identity    BIGINT NOT NULL,
    balance_primary   NUMERIC(20, 2) NOT NULL DEFAULT 0 CHECK (balance_primary >= 0),
    balance_secondary NUMERIC(20, 2) NOT NULL DEFAULT 0 CHECK (balance_secondary >= 0),
    is_active         BOOLEAN NOT NULL DEFAULT TRUE,
    created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at        TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_ACCOUNTS_OWNER_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS accounts_owner_idx ON accounts_tb (owner_identity)
"#;

const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions_tb (
    tx_id           TEXT PRIMARY KEY,
    from_account    BIGINT,
    to_account      BIGINT,
    kind            SMALLINT NOT NULL,
    currency        SMALLINT NOT NULL,
    amount          NUMERIC(20, 2) NOT NULL CHECK (amount > 0),
    memo            TEXT NOT NULL DEFAULT '',
    status          SMALLINT NOT NULL,
    idempotency_key TEXT UNIQUE,
    error_message   TEXT,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_TRANSACTIONS_ACCOUNT_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS transactions_account_idx
    ON transactions_tb (from_account, to_account, created_at DESC)
"#;

const CREATE_AUDIT_LOG_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS audit_log_tb (
    entry_id      BIGSERIAL PRIMARY KEY,
    action        TEXT NOT NULL,
    actor         BIGINT NOT NULL,
    detail        JSONB NOT NULL DEFAULT '{}',
    success       BOOLEAN NOT NULL,
    error_message TEXT,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Create all ledger tables if they do not exist
pub async fn init_schema(pool: &PgPool) -> Result<(), LedgerError> {
    tracing::info!("Initializing ledger schema...");

    for ddl in [
        CREATE_IDENTITIES_TABLE,
        CREATE_ACCOUNTS_TABLE,
        CREATE_ACCOUNTS_OWNER_INDEX,
        CREATE_TRANSACTIONS_TABLE,
        CREATE_TRANSACTIONS_ACCOUNT_INDEX,
        CREATE_AUDIT_LOG_TABLE,
    ] {
        sqlx::query(ddl).execute(pool).await?;
    }

    tracing::info!("Ledger schema ready");
    Ok(())
}
