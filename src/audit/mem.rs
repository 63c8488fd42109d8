//! In-memory AuditLog

use std::sync::Mutex;

use async_trait::async_trait;

use super::models::{AuditAction, AuditLogEntry};
use super::store::AuditLog;
use crate::error::LedgerError;

#[derive(Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditLogEntry>>,
    fail_appends: Mutex<bool>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every append fail (test hook for the best-effort rule)
    pub fn set_fail_appends(&self, fail: bool) {
        *self.fail_appends.lock().unwrap() = fail;
    }

    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count_action(&self, action: AuditAction) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.action == action)
            .count()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), LedgerError> {
        if *self.fail_appends.lock().unwrap() {
            return Err(LedgerError::AuditWriteFailed);
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_count() {
        let log = MemoryAuditLog::new();
        log.append(&AuditLogEntry::success(
            1,
            AuditAction::AccountAccess,
            serde_json::Value::Null,
        ))
        .await
        .unwrap();

        assert_eq!(log.count_action(AuditAction::AccountAccess), 1);
        assert_eq!(log.count_action(AuditAction::TransferAttempt), 0);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let log = MemoryAuditLog::new();
        log.set_fail_appends(true);

        let result = log
            .append(&AuditLogEntry::success(
                1,
                AuditAction::AccountAccess,
                serde_json::Value::Null,
            ))
            .await;
        assert!(matches!(result, Err(LedgerError::AuditWriteFailed)));
        assert!(log.entries().is_empty());
    }
}
