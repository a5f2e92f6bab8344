//! Upgrade bookkeeping errors.
//!
//! Both enums describe broken apply/remove symmetry, which is a defect in the
//! caller or the core rather than bad input.

use crate::error::{ErrorSeverity, GameError};
use crate::state::UpgradeId;
use crate::stats::AttributeKind;

/// Errors raised by [`UpgradeLedger`](super::UpgradeLedger).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LedgerError {
    /// An upgrade was removed more times than it was acquired.
    #[error("{upgrade} removed while not active")]
    Underflow { upgrade: UpgradeId },
}

impl GameError for LedgerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            LedgerError::Underflow { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            LedgerError::Underflow { .. } => "LEDGER_UNDERFLOW",
        }
    }
}

/// Errors raised while applying or reversing a modifier.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierError {
    /// Reversing the modifier would leave a negative ceiling.
    #[error("reversing {kind} leaves max at {max}")]
    NegativeMax { kind: AttributeKind, max: i32 },
}

impl GameError for ModifierError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ModifierError::NegativeMax { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ModifierError::NegativeMax { .. } => "MODIFIER_NEGATIVE_MAX",
        }
    }
}
