//! Authoritative game state representation.
//!
//! This module owns the replicated data: factions, the unit arena, the clock
//! and the synchronized random source. Units are addressed by stable
//! [`UnitId`] handles; relations between units (container, target) are plain
//! id lookups. Runtime layers query this state but mutate it exclusively
//! through [`crate::engine::GameEngine`].
mod error;
pub mod types;

pub use error::StateError;
pub use types::{
    FactionId, FactionKind, FactionState, HelpCry, MapDimensions, Position, Tick, TimeOfDay,
    UnitId, UnitOrder, UnitState, UnitStatus, UnitTypeId, UpgradeId,
};

use crate::config::GameConfig;
use crate::env::SyncRng;

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub tick: Tick,
    pub time_of_day: TimeOfDay,
    pub map: MapDimensions,
    /// Single synchronized random source. Every outcome-influencing draw goes here.
    pub rng: SyncRng,
    pub config: GameConfig,
    pub factions: Vec<FactionState>,
    /// Unit arena indexed by `UnitId`. Slots are never reused.
    units: Vec<Option<UnitState>>,
}

impl GameState {
    pub fn new(map: MapDimensions, config: GameConfig, seed: u64) -> Self {
        Self {
            tick: Tick::ZERO,
            time_of_day: TimeOfDay::Day,
            map,
            rng: SyncRng::new(seed),
            config,
            factions: Vec::new(),
            units: Vec::new(),
        }
    }

    /// Adds a faction and returns its index.
    pub fn add_faction(&mut self, kind: FactionKind) -> FactionId {
        let id = FactionId(self.factions.len() as u8);
        self.factions.push(FactionState::new(
            id,
            kind,
            self.config.default_income,
            self.config.default_trade_cost,
        ));
        id
    }

    /// Makes two factions enemies of each other.
    pub fn declare_war(&mut self, a: FactionId, b: FactionId) -> Result<(), StateError> {
        self.faction_mut(a)?.allies.remove(&b);
        self.faction_mut(b)?.allies.remove(&a);
        self.faction_mut(a)?.enemies.insert(b);
        self.faction_mut(b)?.enemies.insert(a);
        Ok(())
    }

    /// Makes two factions allies of each other.
    pub fn declare_alliance(&mut self, a: FactionId, b: FactionId) -> Result<(), StateError> {
        self.faction_mut(a)?.enemies.remove(&b);
        self.faction_mut(b)?.enemies.remove(&a);
        self.faction_mut(a)?.allies.insert(b);
        self.faction_mut(b)?.allies.insert(a);
        Ok(())
    }

    pub fn faction(&self, id: FactionId) -> Result<&FactionState, StateError> {
        self.factions
            .get(usize::from(id.0))
            .ok_or(StateError::FactionNotFound(id))
    }

    pub fn faction_mut(&mut self, id: FactionId) -> Result<&mut FactionState, StateError> {
        self.factions
            .get_mut(usize::from(id.0))
            .ok_or(StateError::FactionNotFound(id))
    }

    /// `a` treats `b` as an enemy.
    pub fn is_enemy(&self, a: FactionId, b: FactionId) -> bool {
        a != b
            && self
                .faction(a)
                .map(|faction| faction.enemies.contains(&b))
                .unwrap_or(false)
    }

    /// Both factions treat each other as enemies.
    pub fn are_hostile(&self, a: FactionId, b: FactionId) -> bool {
        self.is_enemy(a, b) && self.is_enemy(b, a)
    }

    /// Same faction, or `a` lists `b` as an ally.
    pub fn are_allied(&self, a: FactionId, b: FactionId) -> bool {
        a == b
            || self
                .faction(a)
                .map(|faction| faction.allies.contains(&b))
                .unwrap_or(false)
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitState> {
        self.units.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitState> {
        self.units.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    pub fn require_unit(&self, id: UnitId) -> Result<&UnitState, StateError> {
        self.unit(id).ok_or(StateError::UnitNotFound(id))
    }

    pub fn require_unit_mut(&mut self, id: UnitId) -> Result<&mut UnitState, StateError> {
        self.unit_mut(id).ok_or(StateError::UnitNotFound(id))
    }

    /// Live units in ascending id order.
    pub fn units(&self) -> impl Iterator<Item = &UnitState> {
        self.units.iter().filter_map(Option::as_ref)
    }

    /// Ids of live units matching `filter`, in ascending order.
    pub fn unit_ids_where(&self, filter: impl Fn(&UnitState) -> bool) -> Vec<UnitId> {
        self.units()
            .filter(|unit| filter(unit))
            .map(|unit| unit.id)
            .collect()
    }

    /// Reserves the next handle.
    pub(crate) fn next_unit_id(&self) -> UnitId {
        UnitId(self.units.len() as u32)
    }

    pub(crate) fn insert_unit(&mut self, unit: UnitState) -> UnitId {
        let id = unit.id;
        let index = id.0 as usize;
        if index >= self.units.len() {
            self.units.resize_with(index + 1, || None);
        }
        self.units[index] = Some(unit);
        id
    }

    pub(crate) fn take_unit(&mut self, id: UnitId) -> Option<UnitState> {
        self.units.get_mut(id.0 as usize).and_then(Option::take)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::AttributeVector;

    fn state() -> GameState {
        GameState::new(MapDimensions::new(32, 32), GameConfig::default(), 7)
    }

    #[test]
    fn hostility_must_be_mutual() {
        let mut state = state();
        let a = state.add_faction(FactionKind::Person);
        let b = state.add_faction(FactionKind::Computer);
        state.faction_mut(a).unwrap().enemies.insert(b);

        assert!(state.is_enemy(a, b));
        assert!(!state.are_hostile(a, b));

        state.declare_war(a, b).unwrap();
        assert!(state.are_hostile(a, b));
        assert!(!state.are_hostile(a, a));
    }

    #[test]
    fn alliance_clears_enmity() {
        let mut state = state();
        let a = state.add_faction(FactionKind::Person);
        let b = state.add_faction(FactionKind::Person);
        state.declare_war(a, b).unwrap();
        state.declare_alliance(a, b).unwrap();

        assert!(state.are_allied(a, b));
        assert!(!state.is_enemy(b, a));
    }

    #[test]
    fn arena_handles_are_stable() {
        let mut state = state();
        let owner = state.add_faction(FactionKind::Person);
        let first = state.next_unit_id();
        state.insert_unit(UnitState::new(
            first,
            UnitTypeId(0),
            owner,
            Position::ORIGIN,
            AttributeVector::new(),
        ));
        let second = state.next_unit_id();
        state.insert_unit(UnitState::new(
            second,
            UnitTypeId(0),
            owner,
            Position::ORIGIN,
            AttributeVector::new(),
        ));

        assert!(state.take_unit(first).is_some());
        assert!(state.unit(first).is_none());
        assert_eq!(state.require_unit(second).unwrap().id, second);
        assert_eq!(state.next_unit_id(), UnitId(2));
        assert_eq!(
            state.require_unit(first),
            Err(StateError::UnitNotFound(first))
        );
    }
}
