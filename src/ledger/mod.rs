//! Financial ledger module
//!
//! The append-only transaction history: types, the `TransactionLedger`
//! seam, and its PostgreSQL and in-memory backends.

pub mod mem;
pub mod models;
pub mod pg;
pub mod store;

pub use mem::MemoryTransactionLedger;
pub use models::{
    NewTransaction, Recorded, Transaction, TransactionFilter, TransactionKind, TransactionStatus,
    TxId,
};
pub use pg::PgTransactionLedger;
pub use store::TransactionLedger;
