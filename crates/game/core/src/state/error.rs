//! State management errors.
//!
//! Errors related to unit and faction lookups and container capacity.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{FactionId, UnitId, UnitTypeId};

/// Errors that occur during game state operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    /// No live unit has this handle.
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    /// No faction has this index.
    #[error("{0} not found")]
    FactionNotFound(FactionId),

    /// The faction holds no template for the unit type.
    #[error("{unit_type} not granted to {faction}")]
    UnitTypeNotGranted {
        faction: FactionId,
        unit_type: UnitTypeId,
    },

    /// Container has no free slot.
    #[error("container {container} is full (max: {max})")]
    ContainerFull {
        container: UnitId,
        /// Maximum capacity.
        max: usize,
    },

    /// Unit is already inside a container.
    #[error("unit {unit} is already inside {container}")]
    AlreadyContained { unit: UnitId, container: UnitId },

    /// Unit is not inside any container.
    #[error("unit {0} is not inside a container")]
    NotContained(UnitId),
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        use StateError::*;
        match self {
            UnitNotFound(_) | FactionNotFound(_) | UnitTypeNotGranted { .. } => {
                ErrorSeverity::Validation
            }

            // Capacity and containment errors are validation errors
            ContainerFull { .. } | AlreadyContained { .. } | NotContained(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use StateError::*;
        match self {
            UnitNotFound(_) => "STATE_UNIT_NOT_FOUND",
            FactionNotFound(_) => "STATE_FACTION_NOT_FOUND",
            UnitTypeNotGranted { .. } => "STATE_UNIT_TYPE_NOT_GRANTED",
            ContainerFull { .. } => "STATE_CONTAINER_FULL",
            AlreadyContained { .. } => "STATE_ALREADY_CONTAINED",
            NotContained(_) => "STATE_NOT_CONTAINED",
        }
    }
}
