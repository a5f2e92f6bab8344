//! Vision synchronization.
//!
//! A unit's footprint in the external [`VisibilityIndex`] depends on its sight
//! range, the day/night bonus and (for transports that let passengers shoot)
//! the attack range of its contents. Whenever any of these changes the old
//! footprint is unmarked and a fresh one marked, so the index never holds a
//! stale or doubled contribution.

use tracing::trace;

use crate::env::{Catalog, UnitTypeFlags};
use crate::state::{FactionId, GameState, Position, StateError, TimeOfDay, UnitId, UnitState};
use crate::stats::AttributeKind;

/// What a unit contributes to its owner's visibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SightFootprint {
    pub owner: FactionId,
    pub position: Position,
    pub sight: i32,
    pub attack_range: i32,
}

/// External per-faction visibility store.
///
/// Every `mark` is eventually matched by exactly one `unmark` with the same
/// footprint.
pub trait VisibilityIndex {
    fn mark(&mut self, footprint: &SightFootprint);
    fn unmark(&mut self, footprint: &SightFootprint);
}

/// No visibility tracking.
impl VisibilityIndex for () {
    fn mark(&mut self, _footprint: &SightFootprint) {}
    fn unmark(&mut self, _footprint: &SightFootprint) {}
}

/// Sight range plus the current day/night bonus, never below one tile.
pub fn effective_sight(unit: &UnitState, time_of_day: TimeOfDay) -> i32 {
    let bonus = match time_of_day {
        TimeOfDay::Day => AttributeKind::DaySightRangeBonus,
        TimeOfDay::Night => AttributeKind::NightSightRangeBonus,
    };
    let attributes = &unit.attributes;
    (attributes.value(AttributeKind::SightRange) + attributes.value(bonus)).max(1)
}

/// Attack range capped at effective sight.
///
/// Transports flagged to let passengers shoot use the longest range among
/// their own and their contents'.
pub fn effective_attack_range(state: &GameState, catalog: &Catalog, unit: &UnitState) -> i32 {
    let mut range = unit.attributes.value(AttributeKind::AttackRange);
    let fires_from_inside = catalog
        .unit_type(unit.unit_type)
        .is_ok_and(|t| t.has(UnitTypeFlags::ATTACK_FROM_TRANSPORTER));
    if fires_from_inside {
        range = unit
            .contents
            .iter()
            .filter_map(|&id| state.unit(id))
            .map(|passenger| passenger.attributes.value(AttributeKind::AttackRange))
            .fold(range, i32::max);
    }
    range.min(effective_sight(unit, state.time_of_day))
}

/// Re-marks one unit's footprint from its current attributes.
///
/// Units off the map (contained, removed, destroyed) end with no footprint.
pub fn resync(
    state: &mut GameState,
    catalog: &Catalog,
    vision: &mut dyn VisibilityIndex,
    unit: UnitId,
) -> Result<(), StateError> {
    let footprint = {
        let current = state.require_unit(unit)?;
        current.is_on_map().then(|| SightFootprint {
            owner: current.owner,
            position: current.position,
            sight: effective_sight(current, state.time_of_day),
            attack_range: effective_attack_range(state, catalog, current),
        })
    };

    let current = state.require_unit_mut(unit)?;
    if current.sight == footprint {
        return Ok(());
    }
    if let Some(old) = current.sight.take() {
        vision.unmark(&old);
    }
    if let Some(new) = footprint {
        vision.mark(&new);
        current.sight = Some(new);
    }
    trace!(unit = %unit, footprint = ?footprint, "vision resynced");
    Ok(())
}

/// Resyncs every unit, used when the day/night phase flips.
pub fn resync_all(
    state: &mut GameState,
    catalog: &Catalog,
    vision: &mut dyn VisibilityIndex,
) -> Result<(), StateError> {
    for unit in state.unit_ids_where(|_| true) {
        resync(state, catalog, vision, unit)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::UnitType;
    use crate::state::{FactionKind, MapDimensions, UnitTypeId};
    use crate::stats::AttributeVector;

    #[derive(Default)]
    struct Recorder {
        marked: Vec<SightFootprint>,
        unmarked: Vec<SightFootprint>,
    }

    impl VisibilityIndex for Recorder {
        fn mark(&mut self, footprint: &SightFootprint) {
            self.marked.push(*footprint);
        }
        fn unmark(&mut self, footprint: &SightFootprint) {
            self.unmarked.push(*footprint);
        }
    }

    fn setup(attributes: AttributeVector) -> (GameState, Catalog, UnitId) {
        let mut state = GameState::new(MapDimensions::new(16, 16), GameConfig::default(), 1);
        let owner = state.add_faction(FactionKind::Person);
        let mut catalog = Catalog::new();
        catalog
            .add_unit_type(UnitType::builder(UnitTypeId(0), "scout").build())
            .unwrap();
        let id = state.next_unit_id();
        state.insert_unit(UnitState::new(
            id,
            UnitTypeId(0),
            owner,
            Position::new(3, 3),
            attributes,
        ));
        (state, catalog, id)
    }

    #[test]
    fn sight_is_floored_at_one() {
        let (state, _, id) = setup(
            AttributeVector::new()
                .with_value(AttributeKind::SightRange, 2)
                .with_value(AttributeKind::NightSightRangeBonus, -5),
        );
        let unit = state.unit(id).unwrap();
        assert_eq!(effective_sight(unit, TimeOfDay::Day), 2);
        assert_eq!(effective_sight(unit, TimeOfDay::Night), 1);
    }

    #[test]
    fn attack_range_never_exceeds_sight() {
        let (state, catalog, id) = setup(
            AttributeVector::new()
                .with_value(AttributeKind::SightRange, 4)
                .with_value(AttributeKind::AttackRange, 7),
        );
        let unit = state.unit(id).unwrap();
        assert_eq!(effective_attack_range(&state, &catalog, unit), 4);
    }

    #[test]
    fn resync_unmarks_before_marking() {
        let (mut state, catalog, id) =
            setup(AttributeVector::new().with_value(AttributeKind::SightRange, 4));
        let mut vision = Recorder::default();

        resync(&mut state, &catalog, &mut vision, id).unwrap();
        state
            .unit_mut(id)
            .unwrap()
            .attributes
            .set_value(AttributeKind::SightRange, 6);
        resync(&mut state, &catalog, &mut vision, id).unwrap();

        assert_eq!(vision.marked.len(), 2);
        assert_eq!(vision.unmarked, vec![vision.marked[0]]);
        assert_eq!(vision.marked[1].sight, 6);
    }

    #[test]
    fn unchanged_footprint_is_left_alone() {
        let (mut state, catalog, id) =
            setup(AttributeVector::new().with_value(AttributeKind::SightRange, 4));
        let mut vision = Recorder::default();
        resync(&mut state, &catalog, &mut vision, id).unwrap();
        resync(&mut state, &catalog, &mut vision, id).unwrap();
        assert_eq!(vision.marked.len(), 1);
        assert!(vision.unmarked.is_empty());
    }
}
