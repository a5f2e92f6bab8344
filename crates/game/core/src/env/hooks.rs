//! Scripting call sites invoked by the combat pipeline.
//!
//! The hook mechanism itself lives outside the core. Implementations may
//! mutate the state they are handed (heal the target, kill it, move it);
//! the pipeline re-validates the target after every call and stops quietly
//! when the hit no longer applies.

use crate::state::{GameState, UnitId};

/// Script callbacks fired while resolving a hit.
pub trait ScriptHooks {
    /// Target was hit. Fires before raiding and lethality.
    fn on_hit(
        &mut self,
        _state: &mut GameState,
        _attacker: Option<UnitId>,
        _target: UnitId,
        _damage: i32,
    ) {
    }

    /// Attacker's projectile or blow landed. Fires after [`ScriptHooks::on_hit`].
    fn on_impact(
        &mut self,
        _state: &mut GameState,
        _attacker: Option<UnitId>,
        _target: UnitId,
        _damage: i32,
    ) {
    }

    /// Target is about to switch to the dying order.
    fn on_death(&mut self, _state: &mut GameState, _target: UnitId, _destroyer: Option<UnitId>) {}
}

/// No scripting attached.
impl ScriptHooks for () {}
