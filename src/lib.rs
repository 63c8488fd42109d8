//! wallet_ledger - Closed-Loop Internal Wallet Ledger
//!
//! The account/transfer engine behind the platform wallet: accounts
//! holding two currencies, an append-only transaction ledger, and a
//! transfer protocol that moves value between accounts without ever
//! creating, destroying, or negating it, with an audit trail shadowing
//! every attempt.
//!
//! # Modules
//!
//! - [`core_types`] - Core type definitions (AccountId, IdentityId)
//! - [`money`] - Currency enum and amount validation
//! - [`error`] - The ledger error taxonomy
//! - [`account`] - Account records and the AccountStore seam
//! - [`identity`] - Email/account-id resolution
//! - [`ledger`] - Append-only transaction history
//! - [`audit`] - Write-only compliance trail
//! - [`transfer`] - The transfer protocol state machine
//! - [`config`] / [`logging`] / [`db`] / [`schema`] - Runtime plumbing
//!
//! # Wiring
//!
//! ```ignore
//! let db = Database::connect(&postgres_url).await?;
//! schema::init_schema(db.pool()).await?;
//!
//! let engine = TransferEngine::new(
//!     Arc::new(PgAccountStore::new(db.pool().clone())),
//!     Arc::new(PgTransactionLedger::new(db.pool().clone())),
//!     Arc::new(PgAuditLog::new(db.pool().clone())),
//! );
//!
//! let tx = engine.transfer(TransferRequest::to_email(
//!     actor, from_account, "friend@example.com",
//!     Currency::Primary, amount, "memo",
//! )).await?;
//! ```

// Core types - must be first!
pub mod core_types;

// Runtime plumbing
pub mod config;
pub mod db;
pub mod logging;
pub mod schema;

// Ledger engine
pub mod account;
pub mod audit;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod money;
pub mod transfer;

// Convenient re-exports at crate root
pub use account::{Account, AccountStore, MemoryAccountStore, PgAccountStore};
pub use audit::{AuditAction, AuditLog, AuditLogEntry, Auditor, MemoryAuditLog, PgAuditLog};
pub use config::AppConfig;
pub use core_types::{AccountId, IdentityId};
pub use db::Database;
pub use error::LedgerError;
pub use identity::{AccountRef, IdentityResolver};
pub use ledger::{
    MemoryTransactionLedger, NewTransaction, PgTransactionLedger, Recorded, Transaction,
    TransactionFilter, TransactionKind, TransactionLedger, TransactionStatus, TxId,
};
pub use money::Currency;
pub use transfer::{TransferEngine, TransferPhase, TransferRequest};
