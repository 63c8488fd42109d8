//! Identity resolution
//!
//! Maps an external reference (email or raw account id) to a ledger
//! account, enforcing existence and activation. Pure read; no side effects.

use std::fmt;
use std::sync::Arc;

use crate::account::{Account, AccountStore};
use crate::core_types::AccountId;
use crate::error::LedgerError;

/// External reference to a transfer party
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRef {
    /// Resolve through the identity table (end-user entry point)
    Email(String),
    /// Direct account id (administratively-gated entry point)
    Id(AccountId),
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRef::Email(email) => write!(f, "email:{}", email),
            AccountRef::Id(id) => write!(f, "account:{}", id),
        }
    }
}

pub struct IdentityResolver {
    accounts: Arc<dyn AccountStore>,
}

impl IdentityResolver {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Resolve a reference to an active account
    ///
    /// Email path: `IdentityNotFound` when no active identity matches, then
    /// `AccountNotFound` when the identity has no ledger account, then
    /// `AccountInactive`. The raw-id path skips the identity lookup and
    /// fails with `AccountNotFound` directly.
    pub async fn resolve(&self, reference: &AccountRef) -> Result<Account, LedgerError> {
        let account = self.lookup(reference).await?;

        if !account.is_active {
            return Err(LedgerError::AccountInactive);
        }

        Ok(account)
    }

    /// Resolve a reference without the activation check
    ///
    /// The transfer protocol uses this to order its own validations (a
    /// self-transfer is rejected as such even when the account is
    /// inactive); everything else should call [`resolve`](Self::resolve).
    pub async fn lookup(&self, reference: &AccountRef) -> Result<Account, LedgerError> {
        let account = match reference {
            AccountRef::Email(email) => {
                let identity = self
                    .accounts
                    .find_identity_by_email(email)
                    .await?
                    .filter(|i| i.is_active)
                    .ok_or(LedgerError::IdentityNotFound)?;

                self.accounts
                    .get_by_owner(identity.identity_id)
                    .await?
                    .ok_or(LedgerError::AccountNotFound)?
            }
            AccountRef::Id(account_id) => self
                .accounts
                .get(*account_id)
                .await?
                .ok_or(LedgerError::AccountNotFound)?,
        };

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MemoryAccountStore;
    use rust_decimal::Decimal;

    fn store_with_account(active: bool) -> (Arc<MemoryAccountStore>, AccountId) {
        let store = Arc::new(MemoryAccountStore::new());
        store.insert_identity(10, "owner@wallet.test", true);
        let id = store.insert_account(10, Decimal::new(10000, 2), Decimal::ZERO, active);
        (store, id)
    }

    #[tokio::test]
    async fn test_resolve_by_email() {
        let (store, id) = store_with_account(true);
        let resolver = IdentityResolver::new(store);

        let account = resolver
            .resolve(&AccountRef::Email("owner@wallet.test".to_string()))
            .await
            .unwrap();
        assert_eq!(account.account_id, id);
    }

    #[tokio::test]
    async fn test_resolve_unknown_email() {
        let (store, _) = store_with_account(true);
        let resolver = IdentityResolver::new(store);

        let result = resolver
            .resolve(&AccountRef::Email("unknown@nowhere.test".to_string()))
            .await;
        assert!(matches!(result, Err(LedgerError::IdentityNotFound)));
    }

    #[tokio::test]
    async fn test_resolve_identity_without_account() {
        let store = Arc::new(MemoryAccountStore::new());
        store.insert_identity(77, "orphan@wallet.test", true);
        let resolver = IdentityResolver::new(store);

        let result = resolver
            .resolve(&AccountRef::Email("orphan@wallet.test".to_string()))
            .await;
        assert!(matches!(result, Err(LedgerError::AccountNotFound)));
    }

    #[tokio::test]
    async fn test_resolve_inactive_account() {
        let (store, id) = store_with_account(false);
        let resolver = IdentityResolver::new(store);

        let result = resolver
            .resolve(&AccountRef::Email("owner@wallet.test".to_string()))
            .await;
        assert!(matches!(result, Err(LedgerError::AccountInactive)));

        let result = resolver.resolve(&AccountRef::Id(id)).await;
        assert!(matches!(result, Err(LedgerError::AccountInactive)));
    }

    #[tokio::test]
    async fn test_resolve_by_id_skips_identity_lookup() {
        let (store, id) = store_with_account(true);
        let resolver = IdentityResolver::new(store);

        let account = resolver.resolve(&AccountRef::Id(id)).await.unwrap();
        assert_eq!(account.account_id, id);

        let result = resolver.resolve(&AccountRef::Id(9999)).await;
        assert!(matches!(result, Err(LedgerError::AccountNotFound)));
    }
}
