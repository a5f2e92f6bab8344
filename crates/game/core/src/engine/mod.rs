//! Public entry points of the simulation core.
//!
//! The [`GameEngine`] borrows the replicated [`GameState`] and routes every
//! mutation through the modules that own it. Callers hand in an [`Env`] per
//! call: the static catalog plus the collaborators the core reports to
//! (visibility index, script hooks, combat observer).

use tracing::trace;

use crate::combat::{self, HitEffect, HitOutcome};
use crate::economy;
use crate::env::{Env, WeaponClass};
use crate::error::CoreResult;
use crate::lifecycle;
use crate::state::{
    FactionId, GameState, Position, TimeOfDay, UnitId, UnitStatus, UnitTypeId, UpgradeId,
};
use crate::stats::{AttributeKind, AttributeVariant};
use crate::upgrade::{self, ModifierTarget, UpgradeModifier};
use crate::vision;

/// Deterministic driver over one [`GameState`].
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    // ------------------------------------------------------------------
    // Modifiers and upgrades
    // ------------------------------------------------------------------

    /// Applies one modifier to a template (and its live units) or to a unit.
    pub fn apply_modifier(
        &mut self,
        env: &mut Env<'_>,
        target: ModifierTarget,
        modifier: &UpgradeModifier,
    ) -> CoreResult<()> {
        upgrade::apply_modifier(self.state, env, target, modifier)
    }

    /// Exact inverse of [`GameEngine::apply_modifier`].
    pub fn remove_modifier(
        &mut self,
        env: &mut Env<'_>,
        target: ModifierTarget,
        modifier: &UpgradeModifier,
    ) -> CoreResult<()> {
        upgrade::remove_modifier(self.state, env, target, modifier)
    }

    /// Grants an individual upgrade to a unit. Returns the new count.
    pub fn acquire_upgrade(
        &mut self,
        env: &mut Env<'_>,
        unit: UnitId,
        upgrade: UpgradeId,
    ) -> CoreResult<u32> {
        upgrade::acquire_upgrade(self.state, env, unit, upgrade)
    }

    /// Takes one instance of an individual upgrade away. Returns the count
    /// left; effects are reversed only when it reaches zero.
    pub fn lose_upgrade(
        &mut self,
        env: &mut Env<'_>,
        unit: UnitId,
        upgrade: UpgradeId,
    ) -> CoreResult<u32> {
        upgrade::lose_upgrade(self.state, env, unit, upgrade)
    }

    pub fn individual_upgrade_count(&self, unit: UnitId, upgrade: UpgradeId) -> CoreResult<u32> {
        Ok(self.state.require_unit(unit)?.upgrades.count(upgrade))
    }

    pub fn research_upgrade(
        &mut self,
        env: &mut Env<'_>,
        faction: FactionId,
        upgrade: UpgradeId,
    ) -> CoreResult<()> {
        upgrade::research_upgrade(self.state, env, faction, upgrade)
    }

    pub fn revoke_upgrade(
        &mut self,
        env: &mut Env<'_>,
        faction: FactionId,
        upgrade: UpgradeId,
    ) -> CoreResult<()> {
        upgrade::revoke_upgrade(self.state, env, faction, upgrade)
    }

    /// Switches the unit's weapon and swaps the abilities tied to it.
    pub fn equip_weapon_class(
        &mut self,
        env: &mut Env<'_>,
        unit: UnitId,
        weapon: Option<WeaponClass>,
    ) -> CoreResult<()> {
        upgrade::equip_weapon_class(self.state, env, unit, weapon)
    }

    // ------------------------------------------------------------------
    // Combat
    // ------------------------------------------------------------------

    /// Rolls the damage `attacker` deals to `target` with the synchronized RNG.
    pub fn calculate_damage(&mut self, attacker: UnitId, target: UnitId) -> CoreResult<i32> {
        let attacker = self.state.require_unit(attacker)?.attributes.clone();
        let target = self.state.require_unit(target)?.attributes.clone();
        Ok(combat::calculate_damage(
            &attacker,
            &target,
            &mut self.state.rng,
        ))
    }

    pub fn resolve_hit(
        &mut self,
        env: &mut Env<'_>,
        attacker: Option<UnitId>,
        target: UnitId,
        damage: i32,
        effect: HitEffect,
    ) -> CoreResult<HitOutcome> {
        combat::resolve_hit(self.state, env, attacker, target, damage, effect)
    }

    /// Attribute reading with derived adjustments: the value of sight and
    /// attack range reflect time of day, cargo and the sight cap.
    pub fn get_effective_attribute(
        &self,
        env: &Env<'_>,
        unit: UnitId,
        kind: AttributeKind,
        variant: AttributeVariant,
    ) -> CoreResult<i32> {
        let current = self.state.require_unit(unit)?;
        let value = match (kind, variant) {
            (AttributeKind::SightRange, AttributeVariant::Value) => {
                vision::effective_sight(current, self.state.time_of_day)
            }
            (AttributeKind::AttackRange, AttributeVariant::Value) => {
                vision::effective_attack_range(self.state, env.catalog, current)
            }
            _ => current.attributes.variant(kind, variant),
        };
        Ok(value)
    }

    // ------------------------------------------------------------------
    // Unit lifecycle
    // ------------------------------------------------------------------

    pub fn grant_unit_type(
        &mut self,
        env: &mut Env<'_>,
        faction: FactionId,
        unit_type: UnitTypeId,
    ) -> CoreResult<()> {
        lifecycle::grant_unit_type(self.state, env, faction, unit_type)
    }

    pub fn spawn_unit(
        &mut self,
        env: &mut Env<'_>,
        owner: FactionId,
        unit_type: UnitTypeId,
        position: Position,
        status: UnitStatus,
    ) -> CoreResult<UnitId> {
        lifecycle::spawn_unit(self.state, env, owner, unit_type, position, status)
    }

    /// Clears the construction flag and credits what the unit provides.
    pub fn complete_construction(&mut self, env: &mut Env<'_>, unit: UnitId) -> CoreResult<()> {
        lifecycle::complete_construction(self.state, env, unit)
    }

    /// Removes a unit from the arena; typically called once its dying order
    /// has played out.
    pub fn release_unit(&mut self, env: &mut Env<'_>, unit: UnitId) -> CoreResult<()> {
        lifecycle::release_unit(self.state, env, unit).map(|_| ())
    }

    pub fn board(&mut self, env: &mut Env<'_>, unit: UnitId, container: UnitId) -> CoreResult<()> {
        lifecycle::board(self.state, env, unit, container)
    }

    pub fn unboard(&mut self, env: &mut Env<'_>, unit: UnitId) -> CoreResult<()> {
        lifecycle::unboard(self.state, env, unit)
    }

    pub fn change_owner(
        &mut self,
        env: &mut Env<'_>,
        unit: UnitId,
        to: FactionId,
    ) -> CoreResult<()> {
        lifecycle::change_owner(self.state, env, unit, to)
    }

    /// Re-marks the unit's vision footprint after an external move.
    pub fn resync(&mut self, env: &mut Env<'_>, unit: UnitId) -> CoreResult<()> {
        vision::resync(self.state, env.catalog, &mut *env.vision, unit)?;
        Ok(())
    }

    pub fn can_afford(&self, faction: FactionId, unit_type: UnitTypeId) -> CoreResult<bool> {
        Ok(economy::can_afford(self.state, faction, unit_type)?)
    }

    // ------------------------------------------------------------------
    // Clock
    // ------------------------------------------------------------------

    /// Advances one cycle: retaliation thresholds decay every cycle and
    /// attributes regenerate once per simulated second.
    pub fn advance_tick(&mut self, env: &mut Env<'_>) -> CoreResult<()> {
        self.state.tick = self.state.tick + 1;
        let regenerate = self.state.config.is_second_boundary(self.state.tick);

        let mut regenerated = Vec::new();
        for id in self.state.unit_ids_where(|_| true) {
            let unit = self.state.require_unit_mut(id)?;
            unit.threshold = unit.threshold.saturating_sub(1);
            let alive = !unit.is_dying() && !unit.is_destroyed();
            if regenerate && alive {
                let before = unit.attributes.clone();
                if unit.attributes.regenerate() {
                    regenerated.push((id, before));
                }
            }
        }
        for (id, before) in regenerated {
            upgrade::propagate(self.state, env, id, &before)?;
        }
        trace!(tick = %self.state.tick, regenerate, "tick advanced");
        Ok(())
    }

    /// Switches day and night and re-marks every footprint.
    pub fn set_time_of_day(&mut self, env: &mut Env<'_>, time_of_day: TimeOfDay) -> CoreResult<()> {
        if self.state.time_of_day == time_of_day {
            return Ok(());
        }
        self.state.time_of_day = time_of_day;
        vision::resync_all(self.state, env.catalog, &mut *env.vision)?;
        Ok(())
    }
}
