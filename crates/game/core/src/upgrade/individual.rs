//! Upgrades held by a single unit: learned abilities, item bonuses, promotions.
//!
//! The unit's [`UpgradeLedger`](super::UpgradeLedger) decides how often
//! effects are applied. With [`UpgradeStacking::Single`] effects follow the
//! 0 -> 1 and 1 -> 0 transitions only; with [`UpgradeStacking::Cumulative`]
//! every acquisition applies them once more. Abilities restricted to weapon
//! classes keep their ledger count while the unit wields another weapon, but
//! their effects stay off until a matching weapon is equipped.

use tracing::debug;

use crate::env::{Env, WeaponClass};
use crate::error::CoreResult;
use crate::state::{GameState, UnitId, UpgradeId};

use super::{
    LedgerError, ModifierTarget, Upgrade, UpgradeStacking, apply_modifier, remove_modifier,
};

fn applications(upgrade: &Upgrade, count: u32) -> u32 {
    match upgrade.stacking {
        UpgradeStacking::Single => u32::from(count > 0),
        UpgradeStacking::Cumulative => count,
    }
}

fn apply_all(
    state: &mut GameState,
    env: &mut Env<'_>,
    unit: UnitId,
    upgrade: &Upgrade,
) -> CoreResult<()> {
    for modifier in &upgrade.modifiers {
        apply_modifier(state, env, ModifierTarget::Instance(unit), modifier)?;
    }
    Ok(())
}

fn remove_all(
    state: &mut GameState,
    env: &mut Env<'_>,
    unit: UnitId,
    upgrade: &Upgrade,
) -> CoreResult<()> {
    for modifier in upgrade.modifiers.iter().rev() {
        remove_modifier(state, env, ModifierTarget::Instance(unit), modifier)?;
    }
    Ok(())
}

/// Adds one activation of an upgrade to a unit. Returns the new count.
///
/// Upgrades the new one supersedes are stripped completely first.
pub(crate) fn acquire_upgrade(
    state: &mut GameState,
    env: &mut Env<'_>,
    unit: UnitId,
    upgrade_id: UpgradeId,
) -> CoreResult<u32> {
    let catalog = env.catalog;
    let upgrade = catalog.upgrade(upgrade_id)?;
    state.require_unit(unit)?;

    for superseded in upgrade.superseded() {
        while state.require_unit(unit)?.upgrades.is_active(superseded) {
            lose_upgrade(state, env, unit, superseded)?;
        }
    }

    let current = state.require_unit_mut(unit)?;
    let before = applications(upgrade, current.upgrades.count(upgrade_id));
    let count = current.upgrades.increment(upgrade_id);
    let after = applications(upgrade, count);
    let enabled = upgrade.is_enabled_for(current.weapon_class);

    if enabled && after > before {
        apply_all(state, env, unit, upgrade)?;
    }
    debug!(unit = %unit, upgrade = %upgrade_id, count, enabled, "upgrade acquired");
    Ok(count)
}

/// Removes one activation of an upgrade from a unit. Returns the new count.
///
/// Effects are reversed before the ledger is touched, so a failed reversal
/// leaves the count unchanged.
pub(crate) fn lose_upgrade(
    state: &mut GameState,
    env: &mut Env<'_>,
    unit: UnitId,
    upgrade_id: UpgradeId,
) -> CoreResult<u32> {
    let catalog = env.catalog;
    let upgrade = catalog.upgrade(upgrade_id)?;
    let current = state.require_unit(unit)?;
    let count = current.upgrades.count(upgrade_id);
    if count == 0 {
        return Err(LedgerError::Underflow {
            upgrade: upgrade_id,
        }
        .into());
    }
    let before = applications(upgrade, count);
    let after = applications(upgrade, count - 1);
    let enabled = upgrade.is_enabled_for(current.weapon_class);

    if enabled && after < before {
        remove_all(state, env, unit, upgrade)?;
    }
    let remaining = state.require_unit_mut(unit)?.upgrades.decrement(upgrade_id)?;
    debug!(unit = %unit, upgrade = %upgrade_id, remaining, "upgrade lost");
    Ok(remaining)
}

/// Switches the wielded weapon class, toggling weapon-restricted abilities.
pub(crate) fn equip_weapon_class(
    state: &mut GameState,
    env: &mut Env<'_>,
    unit: UnitId,
    weapon: Option<WeaponClass>,
) -> CoreResult<()> {
    let catalog = env.catalog;
    let current = state.require_unit(unit)?;
    let previous = current.weapon_class;
    if previous == weapon {
        return Ok(());
    }

    let mut disable = Vec::new();
    let mut enable = Vec::new();
    for (upgrade_id, count) in current.upgrades.active() {
        let upgrade = catalog.upgrade(upgrade_id)?;
        if !upgrade.ability {
            continue;
        }
        let was = upgrade.is_enabled_for(previous);
        let now = upgrade.is_enabled_for(weapon);
        let times = applications(upgrade, count);
        if was && !now {
            disable.push((upgrade, times));
        } else if !was && now {
            enable.push((upgrade, times));
        }
    }

    for (upgrade, times) in disable {
        for _ in 0..times {
            remove_all(state, env, unit, upgrade)?;
        }
    }
    state.require_unit_mut(unit)?.weapon_class = weapon;
    for (upgrade, times) in enable {
        for _ in 0..times {
            apply_all(state, env, unit, upgrade)?;
        }
    }
    debug!(unit = %unit, ?previous, ?weapon, "weapon class equipped");
    Ok(())
}
