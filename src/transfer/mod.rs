//! Transfer protocol module
//!
//! The orchestration core: validation, recording, settlement, and
//! compensation for every value movement, audited at each decision point.

pub mod engine;
pub mod phase;
pub mod types;


pub use engine::TransferEngine;
pub use phase::TransferPhase;
pub use types::TransferRequest;
