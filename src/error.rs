//! Ledger Error Types
//!
//! Every failure the engine can produce, as a typed error.
//! Error codes are stable strings for caller-facing mapping
//! (localized messages live in the consuming UI, not here).

use thiserror::Error;

/// Ledger error taxonomy
///
/// Variants never carry internal identifiers in their Display output;
/// callers surface a message per `code()`, not the raw detail.
#[derive(Error, Debug, Clone)]
pub enum LedgerError {
    // === Resolution Errors ===
    #[error("No identity matches the given email")]
    IdentityNotFound,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Account is inactive")]
    AccountInactive,

    // === Validation Errors ===
    #[error("Source and destination account cannot be the same")]
    SelfTransferRejected,

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Amount precision exceeds currency limit")]
    PrecisionOverflow,

    #[error("Insufficient balance")]
    InsufficientBalance,

    // === Settlement Errors ===
    #[error("Failed to record transaction")]
    TransactionRecordingFailed,

    #[error("Failed to debit source account")]
    DebitFailed,

    #[error("Failed to credit destination account")]
    CreditFailed,

    #[error("Invalid transaction state transition")]
    InvalidTransactionState,

    // === Audit Errors ===
    // Never propagated out of the engine: the Auditor logs and swallows it.
    #[error("Failed to write audit log entry")]
    AuditWriteFailed,

    // === System Errors ===
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal system error: {0}")]
    SystemError(String),
}

impl LedgerError {
    /// Get the stable error code for caller-facing responses
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::IdentityNotFound => "IDENTITY_NOT_FOUND",
            LedgerError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            LedgerError::AccountInactive => "ACCOUNT_INACTIVE",
            LedgerError::SelfTransferRejected => "SELF_TRANSFER_REJECTED",
            LedgerError::InvalidAmount => "INVALID_AMOUNT",
            LedgerError::PrecisionOverflow => "PRECISION_OVERFLOW",
            LedgerError::InsufficientBalance => "INSUFFICIENT_BALANCE",
            LedgerError::TransactionRecordingFailed => "TRANSACTION_RECORDING_FAILED",
            LedgerError::DebitFailed => "DEBIT_FAILED",
            LedgerError::CreditFailed => "CREDIT_FAILED",
            LedgerError::InvalidTransactionState => "INVALID_TRANSACTION_STATE",
            LedgerError::AuditWriteFailed => "AUDIT_WRITE_FAILED",
            LedgerError::DatabaseError(_) => "DATABASE_ERROR",
            LedgerError::SystemError(_) => "SYSTEM_ERROR",
        }
    }

    /// Whether a failed transfer attempt with this error left a ledger row behind
    ///
    /// Errors raised before the recording step never touch the ledger.
    pub fn pre_recording(&self) -> bool {
        matches!(
            self,
            LedgerError::IdentityNotFound
                | LedgerError::AccountNotFound
                | LedgerError::AccountInactive
                | LedgerError::SelfTransferRejected
                | LedgerError::InvalidAmount
                | LedgerError::PrecisionOverflow
        )
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::DatabaseError(e.to_string())
    }
}

impl From<anyhow::Error> for LedgerError {
    fn from(e: anyhow::Error) -> Self {
        LedgerError::SystemError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::SelfTransferRejected.code(),
            "SELF_TRANSFER_REJECTED"
        );
        assert_eq!(
            LedgerError::InsufficientBalance.code(),
            "INSUFFICIENT_BALANCE"
        );
        assert_eq!(LedgerError::IdentityNotFound.code(), "IDENTITY_NOT_FOUND");
    }

    #[test]
    fn test_pre_recording_classification() {
        assert!(LedgerError::IdentityNotFound.pre_recording());
        assert!(LedgerError::SelfTransferRejected.pre_recording());
        assert!(!LedgerError::DebitFailed.pre_recording());
        assert!(!LedgerError::CreditFailed.pre_recording());
    }

    #[test]
    fn test_display_leaks_no_identifiers() {
        let err = LedgerError::AccountNotFound;
        assert_eq!(err.to_string(), "Account not found");
    }
}
