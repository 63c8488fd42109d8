//! TransactionLedger trait - append-only financial history

use async_trait::async_trait;

use super::models::{
    NewTransaction, Recorded, Transaction, TransactionFilter, TransactionStatus, TxId,
};
use crate::core_types::AccountId;
use crate::error::LedgerError;

/// Append-only record of value movements
///
/// Rows are written once; only the status field transitions afterwards,
/// and only away from pending. Financial fields never change.
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    /// Insert a pending entry, returning it with generated id and timestamp
    ///
    /// Idempotent on `idempotency_key`: a replay yields
    /// `Recorded::Replayed` with the previously recorded transaction
    /// instead of inserting a new one. The key check and the insert MUST be
    /// one atomic step; of any number of concurrent calls sharing a key,
    /// exactly one observes `Recorded::Inserted`.
    async fn record(&self, new_tx: NewTransaction) -> Result<Recorded, LedgerError>;

    /// Fetch a transaction by id
    async fn get(&self, tx_id: TxId) -> Result<Option<Transaction>, LedgerError>;

    /// Fetch by caller-supplied idempotency key
    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<Transaction>, LedgerError>;

    /// CAS status transition from pending to a terminal status
    ///
    /// Fails with `InvalidTransactionState` if the target status is not
    /// terminal or the row is no longer pending.
    async fn update_status(
        &self,
        tx_id: TxId,
        status: TransactionStatus,
        error_message: Option<&str>,
    ) -> Result<(), LedgerError>;

    /// Reverse-chronological listing of entries touching an account
    async fn history(
        &self,
        account_id: AccountId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, LedgerError>;
}
