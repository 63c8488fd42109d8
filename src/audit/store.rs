//! AuditLog trait - append-only compliance trail

use async_trait::async_trait;

use super::models::AuditLogEntry;
use crate::error::LedgerError;

/// Append-only sink for audit entries
///
/// The engine only ever writes; reporting tooling reads out of band.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), LedgerError>;
}
