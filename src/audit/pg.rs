//! PostgreSQL-backed AuditLog

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::AuditLogEntry;
use super::store::AuditLog;
use crate::error::LedgerError;

pub struct PgAuditLog {
    pool: PgPool,
}

impl PgAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for PgAuditLog {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), LedgerError> {
        sqlx::query(
            r#"
            INSERT INTO audit_log_tb (action, actor, detail, success, error_message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.action.as_str())
        .bind(entry.actor)
        .bind(&entry.detail)
        .bind(entry.success)
        .bind(&entry.error_message)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Audit log insert failed");
            LedgerError::AuditWriteFailed
        })?;

        Ok(())
    }
}
