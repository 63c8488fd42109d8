//! Audit trail types
//!
//! The audit log is the compliance shadow of the financial ledger: one
//! entry per meaningful step, success or failure, never mutated or
//! deleted. It carries no enforced references so that writing it can
//! never fail the primary operation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core_types::IdentityId;

/// What a ledger action attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    TransferAttempt,
    TransferSuccess,
    TransferFailed,
    Deposit,
    Withdrawal,
    Compensation,
    AccountAccess,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::TransferAttempt => "transfer_attempt",
            AuditAction::TransferSuccess => "transfer_success",
            AuditAction::TransferFailed => "transfer_failed",
            AuditAction::Deposit => "deposit",
            AuditAction::Withdrawal => "withdrawal",
            AuditAction::Compensation => "compensation",
            AuditAction::AccountAccess => "account_access",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One appended audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub action: AuditAction,
    /// The identity on whose behalf the engine acted (explicit parameter,
    /// never ambient state)
    pub actor: IdentityId,
    /// Action-specific payload; may reference a transaction id, no FK
    pub detail: serde_json::Value,
    pub success: bool,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn success(actor: IdentityId, action: AuditAction, detail: serde_json::Value) -> Self {
        Self {
            action,
            actor,
            detail,
            success: true,
            error_message: None,
            created_at: Utc::now(),
        }
    }

    pub fn failure(
        actor: IdentityId,
        action: AuditAction,
        detail: serde_json::Value,
        error_message: &str,
    ) -> Self {
        Self {
            action,
            actor,
            detail,
            success: false,
            error_message: Some(error_message.to_string()),
            created_at: Utc::now(),
        }
    }
}
