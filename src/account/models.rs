//! Data models for ledger accounts and owning identities

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core_types::{AccountId, IdentityId};
use crate::money::Currency;

/// A ledger-bearing account owned by one identity
///
/// Both balances are non-negative at all times; the only mutation path is
/// `AccountStore::adjust_balance`. Accounts with ledger history are
/// soft-deactivated (`is_active = false`), never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: AccountId,
    pub owner_identity: IdentityId,
    pub balance_primary: Decimal,
    pub balance_secondary: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Balance in the given currency
    pub fn balance(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Primary => self.balance_primary,
            Currency::Secondary => self.balance_secondary,
        }
    }
}

/// An external identity, resolvable by email
///
/// Provisioning lives outside the engine; the resolver only reads this.
#[derive(Debug, Clone)]
pub struct Identity {
    pub identity_id: IdentityId,
    pub email: String,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_by_currency() {
        let account = Account {
            account_id: 1,
            owner_identity: 10,
            balance_primary: Decimal::new(10000, 2),  // 100.00
            balance_secondary: Decimal::new(2500, 2), // 25.00
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(account.balance(Currency::Primary), Decimal::new(10000, 2));
        assert_eq!(account.balance(Currency::Secondary), Decimal::new(2500, 2));
    }
}
