//! Account management module
//!
//! Account records, the owning-identity lookup, and the `AccountStore`
//! seam with PostgreSQL and in-memory backends.

pub mod mem;
pub mod models;
pub mod pg;
pub mod store;

pub use mem::MemoryAccountStore;
pub use models::{Account, Identity};
pub use pg::PgAccountStore;
pub use store::AccountStore;
