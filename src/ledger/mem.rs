//! In-memory TransactionLedger
//!
//! Single-mutex vector: inserts and status CAS share one critical section,
//! mirroring the row-level guarantees of the PostgreSQL backend.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::models::{
    NewTransaction, Recorded, Transaction, TransactionFilter, TransactionStatus, TxId,
};
use super::store::TransactionLedger;
use crate::core_types::AccountId;
use crate::error::LedgerError;

#[derive(Default)]
pub struct MemoryTransactionLedger {
    entries: Mutex<Vec<Transaction>>,
    /// When set, the next record() call fails (test hook)
    fail_next_record: Mutex<bool>,
    /// When set, the next update_status() call fails (test hook)
    fail_next_update_status: Mutex<bool>,
}

impl MemoryTransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next record() call fail (test hook)
    pub fn set_fail_next_record(&self, fail: bool) {
        *self.fail_next_record.lock().unwrap() = fail;
    }

    /// Make the next update_status() call fail (test hook)
    pub fn set_fail_next_update_status(&self, fail: bool) {
        *self.fail_next_update_status.lock().unwrap() = fail;
    }

    /// Number of ledger entries (any status)
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TransactionLedger for MemoryTransactionLedger {
    async fn record(&self, new_tx: NewTransaction) -> Result<Recorded, LedgerError> {
        {
            let mut fail = self.fail_next_record.lock().unwrap();
            if *fail {
                *fail = false;
                return Err(LedgerError::TransactionRecordingFailed);
            }
        }

        // The entries mutex makes the key scan and the push one critical
        // section, same dedup atomicity as the unique index in Postgres.
        let mut entries = self.entries.lock().unwrap();

        if let Some(ref key) = new_tx.idempotency_key
            && let Some(existing) = entries
                .iter()
                .find(|tx| tx.idempotency_key.as_deref() == Some(key))
        {
            return Ok(Recorded::Replayed(existing.clone()));
        }

        let tx = Transaction {
            tx_id: TxId::new(),
            from_account: new_tx.from_account,
            to_account: new_tx.to_account,
            kind: new_tx.kind,
            currency: new_tx.currency,
            amount: new_tx.amount,
            memo: new_tx.memo,
            status: TransactionStatus::Pending,
            idempotency_key: new_tx.idempotency_key,
            error_message: None,
            created_at: Utc::now(),
        };

        entries.push(tx.clone());
        Ok(Recorded::Inserted(tx))
    }

    async fn get(&self, tx_id: TxId) -> Result<Option<Transaction>, LedgerError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|tx| tx.tx_id == tx_id)
            .cloned())
    }

    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<Transaction>, LedgerError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|tx| tx.idempotency_key.as_deref() == Some(key))
            .cloned())
    }

    async fn update_status(
        &self,
        tx_id: TxId,
        status: TransactionStatus,
        error_message: Option<&str>,
    ) -> Result<(), LedgerError> {
        if !status.is_terminal() {
            return Err(LedgerError::InvalidTransactionState);
        }

        {
            let mut fail = self.fail_next_update_status.lock().unwrap();
            if *fail {
                *fail = false;
                return Err(LedgerError::DatabaseError(
                    "injected update_status failure".to_string(),
                ));
            }
        }

        let mut entries = self.entries.lock().unwrap();
        let tx = entries
            .iter_mut()
            .find(|tx| tx.tx_id == tx_id)
            .ok_or(LedgerError::InvalidTransactionState)?;

        if tx.status != TransactionStatus::Pending {
            return Err(LedgerError::InvalidTransactionState);
        }

        tx.status = status;
        tx.error_message = error_message.map(|s| s.to_string());
        Ok(())
    }

    async fn history(
        &self,
        account_id: AccountId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let entries = self.entries.lock().unwrap();
        let mut matching: Vec<Transaction> = entries
            .iter()
            .filter(|tx| tx.touches(account_id) && filter.matches(tx))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.tx_id.to_string().cmp(&a.tx_id.to_string()))
        });
        matching.truncate(filter.effective_limit());
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::models::TransactionKind;
    use crate::money::Currency;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_record_returns_pending_entry() {
        let ledger = MemoryTransactionLedger::new();
        let tx = ledger
            .record(NewTransaction::transfer(
                1,
                2,
                Currency::Primary,
                dec("40.00"),
                "memo",
                None,
            ))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.from_account, Some(1));
        assert_eq!(tx.to_account, Some(2));
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn test_idempotent_record() {
        let ledger = MemoryTransactionLedger::new();
        let new_tx = NewTransaction::transfer(
            1,
            2,
            Currency::Primary,
            dec("40.00"),
            "memo",
            Some("key-1".to_string()),
        );

        let first = ledger.record(new_tx.clone()).await.unwrap();
        assert!(!first.is_replay());

        let second = ledger.record(new_tx).await.unwrap();
        assert!(second.is_replay());

        assert_eq!(first.into_inner().tx_id, second.into_inner().tx_id);
        assert_eq!(ledger.len(), 1);
    }

    /// Any number of racing record() calls sharing one idempotency key:
    /// exactly one observes the insert, the rest see a replay of the same
    /// row.
    #[tokio::test]
    async fn test_concurrent_same_key_inserts_once() {
        use std::sync::Arc;

        let ledger = Arc::new(MemoryTransactionLedger::new());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .record(NewTransaction::transfer(
                        1,
                        2,
                        Currency::Primary,
                        dec("40.00"),
                        "retry storm",
                        Some("timeout-retry".to_string()),
                    ))
                    .await
                    .unwrap()
            }));
        }

        let mut inserts = 0;
        let mut tx_ids = Vec::new();
        for handle in handles {
            let recorded = handle.await.unwrap();
            if !recorded.is_replay() {
                inserts += 1;
            }
            tx_ids.push(recorded.into_inner().tx_id);
        }

        assert_eq!(inserts, 1);
        assert!(tx_ids.windows(2).all(|p| p[0] == p[1]));
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let ledger = MemoryTransactionLedger::new();
        let tx = ledger
            .record(NewTransaction::deposit(
                1,
                Currency::Primary,
                dec("10.00"),
                "seed",
            ))
            .await
            .unwrap()
            .into_inner();

        // pending -> pending is illegal
        let result = ledger
            .update_status(tx.tx_id, TransactionStatus::Pending, None)
            .await;
        assert!(matches!(result, Err(LedgerError::InvalidTransactionState)));

        ledger
            .update_status(tx.tx_id, TransactionStatus::Completed, None)
            .await
            .unwrap();

        // completed -> failed is illegal
        let result = ledger
            .update_status(tx.tx_id, TransactionStatus::Failed, Some("late"))
            .await;
        assert!(matches!(result, Err(LedgerError::InvalidTransactionState)));
    }

    #[tokio::test]
    async fn test_history_reverse_chronological_and_filtered() {
        let ledger = MemoryTransactionLedger::new();

        for i in 1..=3 {
            ledger
                .record(NewTransaction::transfer(
                    1,
                    2,
                    Currency::Primary,
                    Decimal::from(i),
                    format!("tx {}", i),
                    None,
                ))
                .await
                .unwrap();
        }
        ledger
            .record(NewTransaction::deposit(
                1,
                Currency::Secondary,
                dec("5.00"),
                "bonus",
            ))
            .await
            .unwrap();

        let all = ledger
            .history(1, &TransactionFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 4);
        for pair in all.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }

        let transfers_only = ledger
            .history(
                1,
                &TransactionFilter {
                    kind: Some(TransactionKind::Transfer),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(transfers_only.len(), 3);

        let secondary_only = ledger
            .history(
                1,
                &TransactionFilter {
                    currency: Some(Currency::Secondary),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(secondary_only.len(), 1);
        assert_eq!(secondary_only[0].kind, TransactionKind::Deposit);

        // Account 3 never appears
        let other = ledger
            .history(3, &TransactionFilter::default())
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_history_limit() {
        let ledger = MemoryTransactionLedger::new();
        for i in 0..5 {
            ledger
                .record(NewTransaction::deposit(
                    1,
                    Currency::Primary,
                    Decimal::from(i + 1),
                    "seed",
                ))
                .await
                .unwrap();
        }

        let page = ledger
            .history(
                1,
                &TransactionFilter {
                    limit: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
    }
}
