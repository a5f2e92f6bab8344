use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::config::GameConfig;
use crate::env::WeaponClass;
use crate::stats::{AttributeKind, AttributeVector};
use crate::upgrade::UpgradeLedger;
use crate::vision::SightFootprint;

use super::{FactionId, Position, Tick, UnitId, UnitTypeId};

bitflags! {
    /// Lifecycle flags of a live unit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitStatus: u8 {
        const DESTROYED          = 1 << 0;
        const UNDER_CONSTRUCTION = 1 << 1;
        const BURNING            = 1 << 2;
        /// Off the map (inside a container or withdrawn by the embedder).
        const REMOVED            = 1 << 3;
    }
}

/// Current order of a unit. The order logic itself lives outside the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitOrder {
    #[default]
    Still,
    Move {
        to: Position,
    },
    Attack {
        target: UnitId,
    },
    Cast {
        interruptible: bool,
    },
    Repair {
        target: UnitId,
    },
    Die,
}

/// A live unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitState {
    pub id: UnitId,
    pub unit_type: UnitTypeId,
    pub owner: FactionId,
    pub position: Position,
    pub attributes: AttributeVector,
    pub upgrades: UpgradeLedger,
    pub order: UnitOrder,
    pub status: UnitStatus,
    /// Ticks left before the unit may drop its current retaliation target.
    pub threshold: u32,
    pub last_attacked: Option<Tick>,
    /// Last time hitting a computer-owned unit made its owner call for help.
    pub help_requested: Option<Tick>,
    pub weapon_class: Option<WeaponClass>,
    pub container: Option<UnitId>,
    pub contents: ArrayVec<UnitId, { GameConfig::MAX_CONTENTS }>,
    /// Footprint currently marked in the visibility index.
    pub sight: Option<SightFootprint>,
}

impl UnitState {
    pub fn new(
        id: UnitId,
        unit_type: UnitTypeId,
        owner: FactionId,
        position: Position,
        attributes: AttributeVector,
    ) -> Self {
        Self {
            id,
            unit_type,
            owner,
            position,
            attributes,
            upgrades: UpgradeLedger::new(),
            order: UnitOrder::Still,
            status: UnitStatus::empty(),
            threshold: 0,
            last_attacked: None,
            help_requested: None,
            weapon_class: None,
            container: None,
            contents: ArrayVec::new(),
            sight: None,
        }
    }

    pub fn hp(&self) -> i32 {
        self.attributes.value(AttributeKind::HitPoints)
    }

    pub fn hp_max(&self) -> i32 {
        self.attributes.max(AttributeKind::HitPoints)
    }

    pub fn is_dying(&self) -> bool {
        self.order == UnitOrder::Die
    }

    pub fn is_destroyed(&self) -> bool {
        self.status.contains(UnitStatus::DESTROYED)
    }

    pub fn is_idle(&self) -> bool {
        self.order == UnitOrder::Still
    }

    pub fn is_under_construction(&self) -> bool {
        self.status.contains(UnitStatus::UNDER_CONSTRUCTION)
    }

    /// True when the unit occupies tiles and contributes vision.
    pub fn is_on_map(&self) -> bool {
        self.container.is_none()
            && !self
                .status
                .intersects(UnitStatus::REMOVED | UnitStatus::DESTROYED)
    }

    pub fn is_terrified(&self) -> bool {
        self.attributes.value(AttributeKind::Terror) > 0
    }
}
