//! Placement and availability rules for new units.
//!
//! A restriction is a tree: `And`/`Or` own their children, `Not` wraps one,
//! and the leaves query the faction and the units around the build site.

use crate::economy::completed_count;
use crate::state::{FactionId, GameState, Position, UnitTypeId, UpgradeId};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BuildRestriction {
    /// Every child holds. Empty is true.
    And(Vec<BuildRestriction>),
    /// At least one child holds. Empty is false.
    Or(Vec<BuildRestriction>),
    Not(Box<BuildRestriction>),
    /// The faction has researched the upgrade.
    HasUpgrade(UpgradeId),
    /// The faction owns at least `min_count` completed units of the type.
    HasUnitType { unit_type: UnitTypeId, min_count: i32 },
    /// A unit of the type owned by the faction lies within `[min, max]` tiles
    /// of the site.
    Distance {
        unit_type: UnitTypeId,
        min: i32,
        max: i32,
    },
    /// The site is occupied by a unit of the type, whoever owns it.
    OnTop(UnitTypeId),
}

impl BuildRestriction {
    pub fn has_unit_type(unit_type: UnitTypeId) -> Self {
        Self::HasUnitType {
            unit_type,
            min_count: 1,
        }
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    pub fn evaluate(&self, state: &GameState, faction: FactionId, position: Position) -> bool {
        match self {
            Self::And(children) => children
                .iter()
                .all(|child| child.evaluate(state, faction, position)),
            Self::Or(children) => children
                .iter()
                .any(|child| child.evaluate(state, faction, position)),
            Self::Not(inner) => !inner.evaluate(state, faction, position),
            Self::HasUpgrade(upgrade) => state
                .faction(faction)
                .is_ok_and(|f| f.has_researched(*upgrade)),
            Self::HasUnitType {
                unit_type,
                min_count,
            } => completed_count(state, faction, *unit_type) >= *min_count,
            Self::Distance {
                unit_type,
                min,
                max,
            } => state.units().any(|unit| {
                let distance = unit.position.distance_to(position);
                unit.owner == faction
                    && unit.unit_type == *unit_type
                    && unit.is_on_map()
                    && (*min..=*max).contains(&distance)
            }),
            Self::OnTop(unit_type) => state.units().any(|unit| {
                unit.unit_type == *unit_type && unit.is_on_map() && unit.position == position
            }),
        }
    }
}
