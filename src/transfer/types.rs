//! Transfer request types

use rust_decimal::Decimal;

use crate::core_types::{AccountId, IdentityId};
use crate::identity::AccountRef;
use crate::money::Currency;

/// A value-movement request handed to the engine
///
/// The acting identity is part of the request: the engine never derives it
/// from ambient state.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Identity on whose behalf the transfer runs
    pub actor: IdentityId,
    /// Source account
    pub from_account: AccountId,
    /// Destination reference (email for end users, raw id for admin flows)
    pub to: AccountRef,
    pub currency: Currency,
    pub amount: Decimal,
    pub memo: String,
    /// Caller-supplied replay guard; retries with the same key return the
    /// originally recorded transaction instead of moving value twice
    pub idempotency_key: Option<String>,
}

impl TransferRequest {
    /// Transfer to a recipient resolved by email (end-user entry point)
    pub fn to_email(
        actor: IdentityId,
        from_account: AccountId,
        recipient: impl Into<String>,
        currency: Currency,
        amount: Decimal,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            actor,
            from_account,
            to: AccountRef::Email(recipient.into()),
            currency,
            amount,
            memo: memo.into(),
            idempotency_key: None,
        }
    }

    /// Transfer to a raw account id (administratively-gated entry point)
    pub fn to_account(
        actor: IdentityId,
        from_account: AccountId,
        to_account: AccountId,
        currency: Currency,
        amount: Decimal,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            actor,
            from_account,
            to: AccountRef::Id(to_account),
            currency,
            amount,
            memo: memo.into(),
            idempotency_key: None,
        }
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}
