//! Best-effort audit writer
//!
//! Wraps an `AuditLog` so the transfer engine can record every decision
//! point without ever depending on the write succeeding. A failed append
//! is logged and swallowed; `AuditWriteFailed` never reaches a caller.

use std::sync::Arc;

use super::models::{AuditAction, AuditLogEntry};
use super::store::AuditLog;
use crate::core_types::IdentityId;

#[derive(Clone)]
pub struct Auditor {
    log: Arc<dyn AuditLog>,
}

impl Auditor {
    pub fn new(log: Arc<dyn AuditLog>) -> Self {
        Self { log }
    }

    /// Append an entry, swallowing any failure
    pub async fn record(&self, entry: AuditLogEntry) {
        if let Err(e) = self.log.append(&entry).await {
            tracing::warn!(
                action = %entry.action,
                actor = entry.actor,
                error = %e,
                "Audit write failed (operation unaffected)"
            );
        }
    }

    pub async fn record_success(
        &self,
        actor: IdentityId,
        action: AuditAction,
        detail: serde_json::Value,
    ) {
        self.record(AuditLogEntry::success(actor, action, detail))
            .await;
    }

    pub async fn record_failure(
        &self,
        actor: IdentityId,
        action: AuditAction,
        detail: serde_json::Value,
        error_message: &str,
    ) {
        self.record(AuditLogEntry::failure(actor, action, detail, error_message))
            .await;
    }
}
