//! In-memory AccountStore
//!
//! Backs the runnable test suite and embedding without PostgreSQL. The
//! balance mutation holds the account's map entry for the whole
//! check-and-write, giving the same conditional-update atomicity as the
//! guarded SQL UPDATE.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, DashSet};
use rust_decimal::Decimal;

use super::models::{Account, Identity};
use super::store::AccountStore;
use crate::core_types::{AccountId, IdentityId};
use crate::error::LedgerError;
use crate::money::Currency;

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: DashMap<AccountId, Account>,
    identities: DashMap<String, Identity>,
    next_account_id: AtomicI64,
    /// Accounts whose balance adjustments fail with a database error
    /// (test hook for debit/credit failure paths)
    fail_adjust_on: DashSet<AccountId>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            identities: DashMap::new(),
            next_account_id: AtomicI64::new(1),
            fail_adjust_on: DashSet::new(),
        }
    }

    /// Provision an account, returning its id
    pub fn insert_account(
        &self,
        owner: IdentityId,
        balance_primary: Decimal,
        balance_secondary: Decimal,
        is_active: bool,
    ) -> AccountId {
        let account_id = self.next_account_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        self.accounts.insert(
            account_id,
            Account {
                account_id,
                owner_identity: owner,
                balance_primary,
                balance_secondary,
                is_active,
                created_at: now,
                updated_at: now,
            },
        );
        account_id
    }

    /// Provision an identity resolvable by email
    pub fn insert_identity(&self, identity_id: IdentityId, email: &str, is_active: bool) {
        self.identities.insert(
            email.to_string(),
            Identity {
                identity_id,
                email: email.to_string(),
                is_active,
            },
        );
    }

    /// Make all balance adjustments on `account_id` fail (test hook)
    pub fn set_fail_adjust(&self, account_id: AccountId, fail: bool) {
        if fail {
            self.fail_adjust_on.insert(account_id);
        } else {
            self.fail_adjust_on.remove(&account_id);
        }
    }

    /// Sum of all account balances in one currency (conservation checks)
    pub fn total_balance(&self, currency: Currency) -> Decimal {
        self.accounts
            .iter()
            .map(|entry| entry.value().balance(currency))
            .sum()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn get(&self, account_id: AccountId) -> Result<Option<Account>, LedgerError> {
        Ok(self.accounts.get(&account_id).map(|a| a.clone()))
    }

    async fn get_by_owner(&self, owner: IdentityId) -> Result<Option<Account>, LedgerError> {
        Ok(self
            .accounts
            .iter()
            .find(|entry| entry.value().owner_identity == owner)
            .map(|entry| entry.value().clone()))
    }

    async fn find_identity_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Identity>, LedgerError> {
        Ok(self.identities.get(email).map(|i| i.clone()))
    }

    async fn adjust_balance(
        &self,
        account_id: AccountId,
        currency: Currency,
        delta: Decimal,
    ) -> Result<(), LedgerError> {
        if self.fail_adjust_on.contains(&account_id) {
            return Err(LedgerError::DatabaseError(
                "injected adjust_balance failure".to_string(),
            ));
        }

        // get_mut holds the shard lock: the guard check and the write are
        // one critical section, matching the SQL conditional update.
        let mut entry = match self.accounts.get_mut(&account_id) {
            Some(e) => e,
            None => return Err(LedgerError::AccountNotFound),
        };

        let balance = match currency {
            Currency::Primary => &mut entry.balance_primary,
            Currency::Secondary => &mut entry.balance_secondary,
        };

        let next = *balance + delta;
        if next < Decimal::ZERO {
            return Err(LedgerError::InsufficientBalance);
        }

        *balance = next;
        entry.updated_at = Utc::now();
        Ok(())
    }
}
