//! AccountStore trait - the seam between the engine and account persistence

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::models::{Account, Identity};
use crate::core_types::{AccountId, IdentityId};
use crate::error::LedgerError;
use crate::money::Currency;

/// CRUD over account records plus the one balance mutation primitive
///
/// No component other than an `AccountStore` implementation is allowed to
/// write a balance field. Implementations carry no audit responsibility;
/// the caller logs.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch an account by id
    async fn get(&self, account_id: AccountId) -> Result<Option<Account>, LedgerError>;

    /// Fetch the account owned by an identity
    async fn get_by_owner(&self, owner: IdentityId) -> Result<Option<Account>, LedgerError>;

    /// Look up an identity by email (pure read, used by the resolver)
    async fn find_identity_by_email(&self, email: &str)
    -> Result<Option<Identity>, LedgerError>;

    /// Current balances `(primary, secondary)` for an account
    async fn get_balance(
        &self,
        account_id: AccountId,
    ) -> Result<(Decimal, Decimal), LedgerError> {
        let account = self
            .get(account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound)?;
        Ok((account.balance_primary, account.balance_secondary))
    }

    /// Apply a signed delta to one currency's balance
    ///
    /// MUST be an atomic conditional update:
    /// `balance = balance + delta WHERE balance + delta >= 0`, one
    /// indivisible step. Never a read-then-write pair. If the guard rejects
    /// the update, fails with `InsufficientBalance` for a negative delta on
    /// an existing account, `AccountNotFound` otherwise.
    async fn adjust_balance(
        &self,
        account_id: AccountId,
        currency: Currency,
        delta: Decimal,
    ) -> Result<(), LedgerError>;
}
