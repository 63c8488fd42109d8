//! Transfer Engine
//!
//! Orchestrates identity resolution, balance validation, transaction
//! recording, and balance mutation for every value movement, with a
//! best-effort audit entry at each decision point.
//!
//! Correctness under concurrency comes from one place only: the atomic
//! conditional update inside `AccountStore::adjust_balance`. The engine
//! takes no locks and assumes no call ordering between concurrent
//! transfers; of two debits racing on one account, the store guard lets
//! at most one overdraw-adjacent update through.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::json;
use tracing::{debug, error, info, warn};

use super::phase::TransferPhase;
use super::types::TransferRequest;
use crate::account::AccountStore;
use crate::audit::{AuditAction, AuditLog, Auditor};
use crate::core_types::{AccountId, IdentityId};
use crate::error::LedgerError;
use crate::identity::{AccountRef, IdentityResolver};
use crate::ledger::{
    NewTransaction, Recorded, Transaction, TransactionFilter, TransactionLedger,
    TransactionStatus, TxId,
};
use crate::money::{Currency, validate_amount};

/// Retry budget for the compensating re-credit after a failed credit leg
const COMPENSATION_ATTEMPTS: u32 = 3;
const COMPENSATION_RETRY_DELAY: Duration = Duration::from_millis(50);

/// The account/transfer engine
///
/// The only mutation entry points the platform exposes over the ledger.
/// Every operation takes the acting identity explicitly; the engine never
/// reads ambient session state.
pub struct TransferEngine {
    accounts: Arc<dyn AccountStore>,
    ledger: Arc<dyn TransactionLedger>,
    resolver: IdentityResolver,
    auditor: Auditor,
}

impl TransferEngine {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        ledger: Arc<dyn TransactionLedger>,
        audit_log: Arc<dyn AuditLog>,
    ) -> Self {
        let resolver = IdentityResolver::new(accounts.clone());
        Self {
            accounts,
            ledger,
            resolver,
            auditor: Auditor::new(audit_log),
        }
    }

    /// Execute a value transfer between two accounts
    ///
    /// Phases: Validating -> Recording -> Settling -> Completed/Failed.
    /// On return the recorded transaction, if any, is terminal, never
    /// left pending. The audit trail gets one entry for the attempt and
    /// one for the outcome regardless of which phase failed.
    pub async fn transfer(&self, req: TransferRequest) -> Result<Transaction, LedgerError> {
        let detail = json!({
            "from_account": req.from_account,
            "to": req.to.to_string(),
            "currency": req.currency.as_str(),
            "amount": req.amount.to_string(),
            "memo": req.memo,
        });

        self.auditor
            .record_success(req.actor, AuditAction::TransferAttempt, detail.clone())
            .await;

        match self.execute_transfer(&req).await {
            Ok(tx) => {
                let mut outcome = detail;
                outcome["tx_id"] = json!(tx.tx_id.to_string());
                // A replayed idempotency key hands back the recorded
                // transaction as it stands; audit the outcome it reached,
                // not a fresh success.
                match tx.status {
                    TransactionStatus::Failed => {
                        let reason = tx.error_message.clone().unwrap_or_default();
                        outcome["phase"] = json!(TransferPhase::Failed.as_str());
                        self.auditor
                            .record_failure(
                                req.actor,
                                AuditAction::TransferFailed,
                                outcome,
                                &reason,
                            )
                            .await;
                    }
                    TransactionStatus::Pending => {
                        // Replay racing the original request, which still
                        // owns settlement and will write the terminal
                        // outcome.
                        outcome["phase"] = json!(TransferPhase::Recording.as_str());
                        self.auditor
                            .record_success(req.actor, AuditAction::TransferSuccess, outcome)
                            .await;
                    }
                    TransactionStatus::Completed => {
                        info!(tx_id = %tx.tx_id, "Transfer completed");
                        outcome["phase"] = json!(TransferPhase::Completed.as_str());
                        self.auditor
                            .record_success(req.actor, AuditAction::TransferSuccess, outcome)
                            .await;
                    }
                }
                Ok(tx)
            }
            Err((phase, err)) => {
                debug!(phase = %phase, error = %err, "Transfer failed");
                let mut outcome = detail;
                outcome["phase"] = json!(phase.as_str());
                self.auditor
                    .record_failure(
                        req.actor,
                        AuditAction::TransferFailed,
                        outcome,
                        &err.to_string(),
                    )
                    .await;
                Err(err)
            }
        }
    }

    /// The transfer state machine proper
    ///
    /// Errors carry the phase they occurred in so the audit outcome can
    /// say how far the attempt got.
    async fn execute_transfer(
        &self,
        req: &TransferRequest,
    ) -> Result<Transaction, (TransferPhase, LedgerError)> {
        // === Validating ===
        let phase = TransferPhase::Validating;

        validate_amount(req.amount, req.currency).map_err(|e| (phase, e))?;

        // Resolve destination first so transfer(A, A) is rejected as a
        // self-transfer even when A is inactive.
        let destination = self
            .resolver
            .lookup(&req.to)
            .await
            .map_err(|e| (phase, e))?;

        if destination.account_id == req.from_account {
            return Err((phase, LedgerError::SelfTransferRejected));
        }

        if !destination.is_active {
            return Err((phase, LedgerError::AccountInactive));
        }

        // Source must exist and be active. Balance is NOT checked here:
        // the atomic guard in the debit below is the only authority, and
        // an insufficient balance leaves a failed ledger row behind for
        // reconciliation rather than vanishing without trace.
        self.resolver
            .resolve(&AccountRef::Id(req.from_account))
            .await
            .map_err(|e| (phase, e))?;

        // === Recording ===
        let phase = TransferPhase::Recording;

        // record() detects an idempotency-key replay atomically with the
        // insert. A replayed transaction already belongs to the original
        // request, which owns settlement; touching balances here would
        // move value twice.
        let tx = match self
            .ledger
            .record(NewTransaction::transfer(
                req.from_account,
                destination.account_id,
                req.currency,
                req.amount,
                req.memo.clone(),
                req.idempotency_key.clone(),
            ))
            .await
        {
            Ok(Recorded::Inserted(tx)) => tx,
            Ok(Recorded::Replayed(tx)) => {
                info!(
                    tx_id = %tx.tx_id,
                    "Idempotency key replay, returning recorded transaction"
                );
                return Ok(tx);
            }
            Err(e) => {
                warn!(error = %e, "Transaction recording failed, no balances touched");
                return Err((phase, LedgerError::TransactionRecordingFailed));
            }
        };

        // === Settling ===
        let phase = TransferPhase::Settling;

        // Debit source through the atomic guard.
        if let Err(e) = self
            .accounts
            .adjust_balance(req.from_account, req.currency, -req.amount)
            .await
        {
            let err = match e {
                // Guard tripped: a concurrent spend got there first.
                LedgerError::InsufficientBalance => LedgerError::InsufficientBalance,
                other => {
                    warn!(tx_id = %tx.tx_id, error = %other, "Debit failed");
                    LedgerError::DebitFailed
                }
            };
            self.mark_failed(tx.tx_id, &err).await;
            return Err((phase, err));
        }

        // Credit destination. The source is already debited: a failure
        // here must be compensated or value is destroyed.
        if let Err(e) = self
            .accounts
            .adjust_balance(destination.account_id, req.currency, req.amount)
            .await
        {
            warn!(tx_id = %tx.tx_id, error = %e, "Credit failed, compensating source");
            self.compensate(req.actor, req.from_account, req.currency, req.amount, tx.tx_id)
                .await;
            self.mark_failed(tx.tx_id, &LedgerError::CreditFailed).await;
            return Err((phase, LedgerError::CreditFailed));
        }

        // === Completed ===
        // Settlement is done. A failure past this point is a status or
        // readback write, not a settlement failure; the terminal phase in
        // the audit outcome is what tells reconciliation apart "money
        // moved, status write failed" from a failed settlement.
        let phase = TransferPhase::Completed;

        self.ledger
            .update_status(tx.tx_id, TransactionStatus::Completed, None)
            .await
            .map_err(|e| {
                error!(tx_id = %tx.tx_id, error = %e, "Completed transfer left pending status");
                (phase, e)
            })?;

        self.ledger
            .get(tx.tx_id)
            .await
            .map_err(|e| (phase, e))?
            .ok_or((phase, LedgerError::SystemError("Recorded transaction vanished".to_string())))
    }

    /// Credit a deposit into an account (system-originated, no source leg)
    pub async fn deposit(
        &self,
        actor: IdentityId,
        to_account: AccountId,
        currency: Currency,
        amount: Decimal,
        memo: &str,
    ) -> Result<Transaction, LedgerError> {
        let detail = json!({
            "to_account": to_account,
            "currency": currency.as_str(),
            "amount": amount.to_string(),
        });

        let result = self
            .execute_system_leg(to_account, currency, amount, memo, true)
            .await;

        match &result {
            Ok(tx) => {
                let mut d = detail;
                d["tx_id"] = json!(tx.tx_id.to_string());
                self.auditor
                    .record_success(actor, AuditAction::Deposit, d)
                    .await;
            }
            Err(e) => {
                self.auditor
                    .record_failure(actor, AuditAction::Deposit, detail, &e.to_string())
                    .await;
            }
        }

        result
    }

    /// Withdraw value from an account (no destination leg)
    ///
    /// The debit goes through the same atomic guard as a transfer, so a
    /// concurrent spend can legitimately turn this into
    /// `InsufficientBalance`.
    pub async fn withdraw(
        &self,
        actor: IdentityId,
        from_account: AccountId,
        currency: Currency,
        amount: Decimal,
        memo: &str,
    ) -> Result<Transaction, LedgerError> {
        let detail = json!({
            "from_account": from_account,
            "currency": currency.as_str(),
            "amount": amount.to_string(),
        });

        let result = self
            .execute_system_leg(from_account, currency, amount, memo, false)
            .await;

        match &result {
            Ok(tx) => {
                let mut d = detail;
                d["tx_id"] = json!(tx.tx_id.to_string());
                self.auditor
                    .record_success(actor, AuditAction::Withdrawal, d)
                    .await;
            }
            Err(e) => {
                self.auditor
                    .record_failure(actor, AuditAction::Withdrawal, detail, &e.to_string())
                    .await;
            }
        }

        result
    }

    /// Shared deposit/withdraw path: one account leg, the other is the
    /// system
    async fn execute_system_leg(
        &self,
        account_id: AccountId,
        currency: Currency,
        amount: Decimal,
        memo: &str,
        credit: bool,
    ) -> Result<Transaction, LedgerError> {
        validate_amount(amount, currency)?;

        self.resolver.resolve(&AccountRef::Id(account_id)).await?;

        let new_tx = if credit {
            NewTransaction::deposit(account_id, currency, amount, memo)
        } else {
            NewTransaction::withdrawal(account_id, currency, amount, memo)
        };

        // System legs carry no idempotency key, so a replay cannot occur;
        // if one ever does, it must not settle twice either.
        let tx = match self.ledger.record(new_tx).await {
            Ok(Recorded::Inserted(tx)) => tx,
            Ok(Recorded::Replayed(tx)) => return Ok(tx),
            Err(_) => return Err(LedgerError::TransactionRecordingFailed),
        };

        let delta = if credit { amount } else { -amount };
        if let Err(e) = self.accounts.adjust_balance(account_id, currency, delta).await {
            let err = match e {
                LedgerError::InsufficientBalance if !credit => LedgerError::InsufficientBalance,
                other => {
                    warn!(tx_id = %tx.tx_id, error = %other, "Balance adjustment failed");
                    if credit {
                        LedgerError::CreditFailed
                    } else {
                        LedgerError::DebitFailed
                    }
                }
            };
            self.mark_failed(tx.tx_id, &err).await;
            return Err(err);
        }

        self.ledger
            .update_status(tx.tx_id, TransactionStatus::Completed, None)
            .await?;

        self.ledger
            .get(tx.tx_id)
            .await?
            .ok_or(LedgerError::SystemError("Recorded transaction vanished".to_string()))
    }

    /// The account belonging to an identity, if one is provisioned
    ///
    /// `Ok(None)` means "feature unavailable" for that identity, not an
    /// error.
    pub async fn account_for_identity(
        &self,
        identity: IdentityId,
    ) -> Result<Option<crate::account::Account>, LedgerError> {
        let account = self.accounts.get_by_owner(identity).await?;

        self.auditor
            .record_success(
                identity,
                AuditAction::AccountAccess,
                json!({ "provisioned": account.is_some() }),
            )
            .await;

        Ok(account)
    }

    /// Reverse-chronological transaction history for an account
    pub async fn history(
        &self,
        account_id: AccountId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, LedgerError> {
        self.ledger.history(account_id, filter).await
    }

    /// Re-credit the source after a failed credit leg
    ///
    /// Retried because the alternative is destroyed value. The credit
    /// delta is positive so the store guard cannot reject it; only
    /// infrastructure failures can, and those are worth waiting out.
    async fn compensate(
        &self,
        actor: IdentityId,
        account_id: AccountId,
        currency: Currency,
        amount: Decimal,
        tx_id: TxId,
    ) {
        let detail = json!({
            "account": account_id,
            "currency": currency.as_str(),
            "amount": amount.to_string(),
            "tx_id": tx_id.to_string(),
        });

        for attempt in 1..=COMPENSATION_ATTEMPTS {
            match self
                .accounts
                .adjust_balance(account_id, currency, amount)
                .await
            {
                Ok(()) => {
                    info!(tx_id = %tx_id, attempt, "Compensating re-credit applied");
                    self.auditor
                        .record_success(actor, AuditAction::Compensation, detail)
                        .await;
                    return;
                }
                Err(e) if attempt < COMPENSATION_ATTEMPTS => {
                    warn!(tx_id = %tx_id, attempt, error = %e, "Compensation attempt failed, retrying");
                    tokio::time::sleep(COMPENSATION_RETRY_DELAY).await;
                }
                Err(e) => {
                    // Value is stranded; reconciliation tooling picks this
                    // up from the audit trail and the failed transaction.
                    error!(
                        tx_id = %tx_id,
                        error = %e,
                        "Compensating re-credit exhausted retries, source not refunded"
                    );
                    self.auditor
                        .record_failure(actor, AuditAction::Compensation, detail, &e.to_string())
                        .await;
                    return;
                }
            }
        }
    }

    /// Move a recorded transaction to failed, keeping the call infallible
    ///
    /// A transaction must never stay pending after the transfer call
    /// returns; if even the status CAS fails there is nothing left to do
    /// but log it.
    async fn mark_failed(&self, tx_id: TxId, err: &LedgerError) {
        if let Err(e) = self
            .ledger
            .update_status(tx_id, TransactionStatus::Failed, Some(&err.to_string()))
            .await
        {
            error!(tx_id = %tx_id, error = %e, "Failed to mark transaction failed");
        }
    }
}
