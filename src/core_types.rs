//! Core types used throughout the engine
//!
//! Fundamental type aliases shared by all modules. They provide semantic
//! meaning and enable future type evolution.

/// Account ID - primary key of a ledger account.
///
/// Globally unique, immutable after assignment (BIGSERIAL in PostgreSQL).
pub type AccountId = i64;

/// Identity ID - the platform identity that owns an account.
///
/// One account per identity in the current design; the model does not
/// enforce it, provisioning does.
pub type IdentityId = i64;
