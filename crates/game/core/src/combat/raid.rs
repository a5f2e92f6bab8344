use tracing::debug;

use crate::env::Env;
use crate::error::CoreResult;
use crate::state::{GameState, UnitId};
use crate::stats::{AttributeKind, Resources};

/// Moves resources from the target's owner to a raiding attacker's owner.
///
/// Structures are raided, mobile units are mugged. Each resource transfers
/// `cost * min(damage - shield_damage, hp) * raid / hp_max / 100`, limited
/// by what the victim's faction has stored.
pub(crate) fn raid(
    state: &mut GameState,
    env: &Env<'_>,
    attacker: Option<UnitId>,
    target: UnitId,
    damage: i32,
    shield_damage: i32,
) -> CoreResult<Resources> {
    let Some(raider) = attacker.and_then(|id| state.unit(id)) else {
        return Ok(Resources::ZERO);
    };
    let victim = state.require_unit(target)?;
    if !state.is_enemy(raider.owner, victim.owner) {
        return Ok(Resources::ZERO);
    }

    let victim_type = env.catalog.unit_type(victim.unit_type)?;
    let kind = if victim_type.is_building() {
        AttributeKind::Raiding
    } else {
        AttributeKind::Mugging
    };
    let rate = i64::from(raider.attributes.value(kind));
    let hp_max = i64::from(victim.hp_max());
    if rate <= 0 || hp_max <= 0 {
        return Ok(Resources::ZERO);
    }

    let effective = i64::from((damage - shield_damage).min(victim.hp()).max(0));
    let costs = state
        .faction(victim.owner)?
        .template(victim.unit_type)
        .map(|stats| stats.costs)
        .unwrap_or(victim_type.costs);
    let (thief, robbed) = (raider.owner, victim.owner);

    let stored = state.faction(robbed)?.stored;
    let mut taken = Resources::ZERO;
    for (resource, cost) in costs.iter() {
        let amount = i64::from(cost) * effective * rate / hp_max / 100;
        let amount = (amount.clamp(0, i64::from(i32::MAX)) as i32).min(stored[resource].max(0));
        taken[resource] = amount;
    }
    if taken.is_zero() {
        return Ok(taken);
    }

    state.faction_mut(robbed)?.stored.add_scaled(&taken, -1);
    state.faction_mut(thief)?.stored.add_scaled(&taken, 1);
    debug!(raider = ?attacker, target = %target, ?taken, "resources raided");
    Ok(taken)
}

