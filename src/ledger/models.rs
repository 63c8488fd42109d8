//! Transaction types for the financial ledger

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core_types::AccountId;
use crate::money::Currency;

/// Transaction ID - ULID-based unique identifier
///
/// ULIDs are monotonic and sortable, and need no coordination between
/// writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxId(ulid::Ulid);

impl TxId {
    /// Generate a new unique TxId
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TxId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

/// What kind of value movement a transaction records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum TransactionKind {
    /// System-originated credit (no source leg)
    Deposit = 1,
    /// Credit to the system (no destination leg)
    Withdrawal = 2,
    /// Account-to-account movement, both legs populated
    Transfer = 3,
}

impl TransactionKind {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(TransactionKind::Deposit),
            2 => Some(TransactionKind::Withdrawal),
            3 => Some(TransactionKind::Transfer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction lifecycle status
///
/// Only pending -> completed and pending -> failed are legal transitions.
/// A completed transaction is immutable; corrections are new reversing
/// transactions, never edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum TransactionStatus {
    Pending = 0,
    Completed = 1,
    Failed = -1,
}

impl TransactionStatus {
    /// Check if this is a terminal status (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Completed | TransactionStatus::Failed
        )
    }

    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(TransactionStatus::Pending),
            1 => Some(TransactionStatus::Completed),
            -1 => Some(TransactionStatus::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable record of one value movement
///
/// Account references are weak: the ledger tolerates either account being
/// deactivated after the fact.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub tx_id: TxId,
    pub from_account: Option<AccountId>,
    pub to_account: Option<AccountId>,
    pub kind: TransactionKind,
    pub currency: Currency,
    pub amount: Decimal,
    pub memo: String,
    pub status: TransactionStatus,
    /// Caller-supplied replay guard; unique when present
    pub idempotency_key: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Whether this transaction touches the given account on either leg
    pub fn touches(&self, account_id: AccountId) -> bool {
        self.from_account == Some(account_id) || self.to_account == Some(account_id)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tx[{}] {} {} {} status={}",
            self.tx_id, self.kind, self.amount, self.currency, self.status
        )
    }
}

/// Input for recording a new ledger entry
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub from_account: Option<AccountId>,
    pub to_account: Option<AccountId>,
    pub kind: TransactionKind,
    pub currency: Currency,
    pub amount: Decimal,
    pub memo: String,
    pub idempotency_key: Option<String>,
}

impl NewTransaction {
    pub fn transfer(
        from: AccountId,
        to: AccountId,
        currency: Currency,
        amount: Decimal,
        memo: impl Into<String>,
        idempotency_key: Option<String>,
    ) -> Self {
        Self {
            from_account: Some(from),
            to_account: Some(to),
            kind: TransactionKind::Transfer,
            currency,
            amount,
            memo: memo.into(),
            idempotency_key,
        }
    }

    pub fn deposit(
        to: AccountId,
        currency: Currency,
        amount: Decimal,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            from_account: None,
            to_account: Some(to),
            kind: TransactionKind::Deposit,
            currency,
            amount,
            memo: memo.into(),
            idempotency_key: None,
        }
    }

    pub fn withdrawal(
        from: AccountId,
        currency: Currency,
        amount: Decimal,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            from_account: Some(from),
            to_account: None,
            kind: TransactionKind::Withdrawal,
            currency,
            amount,
            memo: memo.into(),
            idempotency_key: None,
        }
    }
}

/// Outcome of `TransactionLedger::record`
///
/// Replay detection happens inside `record` itself, atomically with the
/// insert, so two concurrent retries carrying the same idempotency key can
/// never both observe "fresh". Only an `Inserted` transaction may be
/// settled; a `Replayed` one is already owned by the original request.
#[derive(Debug, Clone)]
pub enum Recorded {
    /// A new pending row was written; the caller owns settlement
    Inserted(Transaction),
    /// The idempotency key was already recorded
    Replayed(Transaction),
}

impl Recorded {
    pub fn into_inner(self) -> Transaction {
        match self {
            Recorded::Inserted(tx) | Recorded::Replayed(tx) => tx,
        }
    }

    pub fn is_replay(&self) -> bool {
        matches!(self, Recorded::Replayed(_))
    }
}

/// Filters for ledger history queries
///
/// All predicates are pure checks over stored fields. `limit` plus the
/// `before` cursor make listings finite and restartable.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub kind: Option<TransactionKind>,
    pub currency: Option<Currency>,
    /// Only entries created strictly before this instant (page cursor)
    pub before: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub const DEFAULT_LIMIT: usize = 50;

    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }

    /// Whether a transaction passes the date/kind/currency predicates
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(from) = self.from_date
            && tx.created_at < from
        {
            return false;
        }
        if let Some(to) = self.to_date
            && tx.created_at > to
        {
            return false;
        }
        if let Some(before) = self.before
            && tx.created_at >= before
        {
            return false;
        }
        if let Some(kind) = self.kind
            && tx.kind != kind
        {
            return false;
        }
        if let Some(currency) = self.currency
            && tx.currency != currency
        {
            return false;
        }
        true
    }
}
