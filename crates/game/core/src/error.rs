//! Common error infrastructure for skirmish-core.
//!
//! This module provides the shared severity classification used by every
//! error type in the crate, plus [`CoreError`], the umbrella error returned by
//! the public [`crate::engine::GameEngine`] operations.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each subsystem has its own error enum with specific variants
//! - **Severity Classification**: Errors are categorized for handling strategies
//! - **Defects vs. Data**: Broken apply/remove symmetry is `Fatal`; dangling
//!   catalog references are `Validation` and surface at link time

use crate::env::CatalogError;
use crate::state::StateError;
use crate::upgrade::{LedgerError, ModifierError};

/// Severity level of an error, used for categorization and handling strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: Temporary conditions that may succeed on retry
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Invariant violations; the simulation must not continue the tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative input.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown unit handle, upgrade missing from the catalog
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - a core invariant was violated.
    ///
    /// Examples: ledger count would go negative, max would go negative on reversal
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a defect in the caller or the core.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all skirmish-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors surfaced by the public core operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Modifier(#[from] ModifierError),
}

impl GameError for CoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::State(e) => e.severity(),
            CoreError::Catalog(e) => e.severity(),
            CoreError::Ledger(e) => e.severity(),
            CoreError::Modifier(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CoreError::State(e) => e.error_code(),
            CoreError::Catalog(e) => e.error_code(),
            CoreError::Ledger(e) => e.error_code(),
            CoreError::Modifier(e) => e.error_code(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{UnitId, UpgradeId};

    #[test]
    fn ledger_underflow_is_fatal() {
        let err = CoreError::from(LedgerError::Underflow {
            upgrade: UpgradeId(3),
        });
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert!(err.severity().is_internal());
        assert_eq!(err.error_code(), "LEDGER_UNDERFLOW");
    }

    #[test]
    fn unknown_unit_is_validation() {
        let err = CoreError::from(StateError::UnitNotFound(UnitId(9)));
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert!(!err.severity().is_recoverable());
    }
}
