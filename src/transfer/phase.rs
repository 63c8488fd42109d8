//! Transfer protocol phases
//!
//! A transfer walks Validating -> Recording -> Settling and ends in
//! Completed or Failed. The phase is carried in audit detail so a failed
//! attempt shows exactly how far it got.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum TransferPhase {
    /// Resolving parties and validating the request; nothing written yet
    Validating = 0,

    /// Writing the pending ledger entry
    Recording = 10,

    /// Moving balances; a failure here may require compensation
    Settling = 20,

    /// Terminal: transaction completed, balances moved
    Completed = 30,

    /// Terminal: transaction failed, no net balance change
    Failed = -10,
}

impl TransferPhase {
    /// Check if this is a terminal phase
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferPhase::Completed | TransferPhase::Failed)
    }

    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(TransferPhase::Validating),
            10 => Some(TransferPhase::Recording),
            20 => Some(TransferPhase::Settling),
            30 => Some(TransferPhase::Completed),
            -10 => Some(TransferPhase::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferPhase::Validating => "VALIDATING",
            TransferPhase::Recording => "RECORDING",
            TransferPhase::Settling => "SETTLING",
            TransferPhase::Completed => "COMPLETED",
            TransferPhase::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_phases() {
        assert!(TransferPhase::Completed.is_terminal());
        assert!(TransferPhase::Failed.is_terminal());
        assert!(!TransferPhase::Validating.is_terminal());
        assert!(!TransferPhase::Recording.is_terminal());
        assert!(!TransferPhase::Settling.is_terminal());
    }

    #[test]
    fn test_phase_id_roundtrip() {
        let phases = [
            TransferPhase::Validating,
            TransferPhase::Recording,
            TransferPhase::Settling,
            TransferPhase::Completed,
            TransferPhase::Failed,
        ];

        for phase in phases {
            assert_eq!(TransferPhase::from_id(phase.id()), Some(phase));
        }
        assert!(TransferPhase::from_id(999).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(TransferPhase::Validating.to_string(), "VALIDATING");
        assert_eq!(TransferPhase::Completed.to_string(), "COMPLETED");
    }
}
