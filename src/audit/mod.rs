//! Audit trail module
//!
//! Write-only compliance log shadowing every ledger action, plus the
//! best-effort `Auditor` the engine records through.

pub mod auditor;
pub mod mem;
pub mod models;
pub mod pg;
pub mod store;

pub use auditor::Auditor;
pub use mem::MemoryAuditLog;
pub use models::{AuditAction, AuditLogEntry};
pub use pg::PgAuditLog;
pub use store::AuditLog;
