use crate::state::{FactionId, Position, UnitId};

/// Notifications emitted by the combat pipeline for UI, audio and AI layers.
///
/// The core never waits on these; implementations record or forward them.
pub trait CombatObserver {
    /// "Under attack" cry for the owner of `target`.
    fn under_attack(&mut self, _owner: FactionId, _target: UnitId, _position: Position) {}

    /// Computer-controlled owner should send help.
    fn request_reinforcements(&mut self, _owner: FactionId, _target: UnitId, _attacker: UnitId) {}

    /// Wounded unit should drink a healing item from its inventory.
    fn use_healing_item(&mut self, _unit: UnitId) {}

    /// Damaged structure caught fire.
    fn burning_started(&mut self, _unit: UnitId) {}

    fn unit_killed(&mut self, _victim: UnitId, _destroyer: Option<UnitId>) {}

    fn ownership_changed(&mut self, _unit: UnitId, _from: FactionId, _to: FactionId) {}
}

impl CombatObserver for () {}
