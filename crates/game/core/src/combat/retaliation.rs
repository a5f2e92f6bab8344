//! How a damaged unit reacts: change sides, run away, or fight back.

use std::collections::BTreeSet;

use tracing::debug;

use crate::env::{Catalog, Env, UnitTypeFlags};
use crate::error::CoreResult;
use crate::lifecycle::change_owner;
use crate::state::{GameState, Position, UnitId, UnitOrder, UnitState};
use crate::stats::AttributeKind;
use crate::vision::effective_attack_range;

use super::Reaction;

// Target selection weights. Lower cost wins.
const PRIORITY_FACTOR: i64 = 0x0008_0000;
const HEALTH_FACTOR: i64 = 1;
const DISTANCE_FACTOR: i64 = 0x0001_0000;
const INRANGE_FACTOR: i64 = 0x0000_8000;
const INRANGE_BONUS: i64 = 0x0100_0000;
const CANATTACK_BONUS: i64 = 0x0010_0000;

fn has_flag(catalog: &Catalog, unit: &UnitState, flag: UnitTypeFlags) -> bool {
    catalog
        .unit_type(unit.unit_type)
        .is_ok_and(|t| t.has(flag))
}

/// Can attack, is not a coward and is not terrified.
pub fn is_aggressive(catalog: &Catalog, unit: &UnitState) -> bool {
    has_flag(catalog, unit, UnitTypeFlags::CAN_ATTACK)
        && !has_flag(catalog, unit, UnitTypeFlags::COWARD)
        && !unit.is_terrified()
}

fn can_move(catalog: &Catalog, unit: &UnitState) -> bool {
    unit.attributes.value(AttributeKind::Speed) > 0
        && !has_flag(catalog, unit, UnitTypeFlags::BUILDING)
}

/// A cornered coward fights back against other cowards or nearly dead foes.
fn is_desperate(catalog: &Catalog, target: &UnitState, attacker: &UnitState) -> bool {
    has_flag(catalog, target, UnitTypeFlags::CAN_ATTACK)
        && has_flag(catalog, target, UnitTypeFlags::COWARD)
        && (has_flag(catalog, attacker, UnitTypeFlags::COWARD) || attacker.hp() <= 3)
        && !target.is_terrified()
}

/// How unattractive `candidate` is as a target for `unit`.
pub fn threat_cost(
    state: &GameState,
    catalog: &Catalog,
    unit: &UnitState,
    candidate: &UnitState,
) -> i64 {
    let distance = i64::from(unit.position.distance_to(candidate.position));
    let range = i64::from(effective_attack_range(state, catalog, unit));
    let min_range = catalog
        .unit_type(unit.unit_type)
        .map(|t| i64::from(t.min_attack_range))
        .unwrap_or(0);

    let mut cost = 0i64;
    cost -= i64::from(candidate.attributes.value(AttributeKind::Priority)) * PRIORITY_FACTOR;
    let health = i64::from(candidate.hp()) * 100 / i64::from(candidate.hp_max().max(1));
    cost += health * HEALTH_FACTOR;
    if distance <= range && distance >= min_range {
        cost += distance * INRANGE_FACTOR;
        cost -= INRANGE_BONUS;
    } else {
        cost += distance * DISTANCE_FACTOR;
    }

    let threatens = match (
        catalog.unit_type(candidate.unit_type),
        catalog.unit_type(unit.unit_type),
    ) {
        (Ok(their), Ok(ours)) => their.has(UnitTypeFlags::CAN_ATTACK) && their.can_target(ours),
        _ => false,
    };
    if threatens {
        cost -= CANATTACK_BONUS;
    }
    cost
}

/// Hands a nearly destroyed structure to a repair-capable enemy attacker.
pub(crate) fn try_capture(
    state: &mut GameState,
    env: &mut Env<'_>,
    attacker: Option<UnitId>,
    target: UnitId,
    damage: i32,
) -> CoreResult<Option<UnitId>> {
    if !state.config.building_capture {
        return Ok(None);
    }
    let Some(captor) = attacker.and_then(|id| state.unit(id)) else {
        return Ok(None);
    };
    let victim = state.require_unit(target)?;
    let catalog = env.catalog;
    let capturable = has_flag(catalog, victim, UnitTypeFlags::BUILDING)
        && victim.hp() <= damage.saturating_mul(3)
        && state.is_enemy(captor.owner, victim.owner)
        && has_flag(catalog, captor, UnitTypeFlags::CAN_REPAIR);
    if !capturable {
        return Ok(None);
    }
    let (captor_id, new_owner) = (captor.id, captor.owner);

    change_owner(state, env, target, new_owner)?;
    state.require_unit_mut(captor_id)?.order = UnitOrder::Still;
    debug!(target = %target, captor = %captor_id, "structure captured");
    Ok(Some(captor_id))
}

/// Flee from or strike back at the attacker.
pub(crate) fn react(
    state: &mut GameState,
    env: &mut Env<'_>,
    attacker: Option<UnitId>,
    target: UnitId,
) -> CoreResult<Reaction> {
    let catalog = env.catalog;
    let Some(aggressor) = attacker.and_then(|id| state.unit(id)) else {
        return Ok(Reaction::None);
    };
    let victim = state.require_unit(target)?;
    if victim.is_dying() {
        return Ok(Reaction::None);
    }

    let desperate = is_desperate(catalog, victim, aggressor);
    let aggressive = is_aggressive(catalog, victim);
    let wants_to_flee = !aggressive
        || victim.is_terrified()
        || has_flag(catalog, aggressor, UnitTypeFlags::INDESTRUCTIBLE);
    let able_to_flee =
        can_move(catalog, victim) && victim.is_idle() && victim.contents.is_empty();

    if wants_to_flee && able_to_flee && !desperate {
        let from = aggressor.position;
        return run_away(state, target, from);
    }
    if (aggressive || desperate) && can_move(catalog, victim) {
        let aggressor = aggressor.id;
        return retaliate(state, catalog, aggressor, target);
    }
    Ok(Reaction::None)
}

fn run_away(state: &mut GameState, target: UnitId, from: Position) -> CoreResult<Reaction> {
    let position = state.require_unit(target)?.position;
    let (dx, dy) = (position.x - from.x, position.y - from.y);
    let d = (dx * dx + dy * dy).isqrt().max(1);
    let flee = state.config.flee_distance;

    let jitter_x = (state.rng.next_u32() & 3) as i32;
    let jitter_y = (state.rng.next_u32() & 3) as i32;
    let to = state.map.clamp(Position::new(
        position.x + dx * flee / d + jitter_x,
        position.y + dy * flee / d + jitter_y,
    ));

    state.require_unit_mut(target)?.order = UnitOrder::Move { to };
    debug!(target = %target, ?to, "fleeing");
    Ok(Reaction::Fled { to })
}

fn retaliate(
    state: &mut GameState,
    catalog: &Catalog,
    attacker: UnitId,
    target: UnitId,
) -> CoreResult<Reaction> {
    let unit = state.require_unit(target)?;
    let busy = matches!(
        unit.order,
        UnitOrder::Cast {
            interruptible: false
        }
    );
    if busy || unit.threshold > 0 {
        return Ok(Reaction::None);
    }
    let Ok(own_type) = catalog.unit_type(unit.unit_type) else {
        return Ok(Reaction::None);
    };

    let targetable = |candidate: &UnitState| {
        candidate.id != unit.id
            && candidate.is_on_map()
            && !candidate.is_dying()
            && state.is_enemy(unit.owner, candidate.owner)
            && catalog
                .unit_type(candidate.unit_type)
                .is_ok_and(|t| own_type.can_target(t))
    };

    let mut candidates = BTreeSet::new();
    let shooter = state.require_unit(attacker)?;
    let origin = match shooter.container.and_then(|id| state.unit(id)) {
        Some(container) => container,
        None => shooter,
    };
    if targetable(origin) {
        candidates.insert(origin.id);
    }
    let reaction_range = unit.attributes.value(AttributeKind::ReactionRange);
    for other in state.units() {
        if other.position.distance_to(unit.position) <= reaction_range && targetable(other) {
            candidates.insert(other.id);
        }
    }

    let mut best_cost = i64::MAX;
    let mut best = Vec::new();
    for id in candidates {
        let Some(candidate) = state.unit(id) else {
            continue;
        };
        let cost = threat_cost(state, catalog, unit, candidate);
        if cost < best_cost {
            best_cost = cost;
            best.clear();
        }
        if cost == best_cost {
            best.push(id);
        }
    }
    let chosen = match best.len() {
        0 => return Ok(Reaction::None),
        1 => best[0],
        n => best[state.rng.below(n as i32) as usize],
    };
    let threshold = match state.unit(chosen) {
        Some(enemy) if is_aggressive(catalog, enemy) => state.config.retaliation_threshold,
        _ => 0,
    };

    let unit = state.require_unit_mut(target)?;
    unit.order = UnitOrder::Attack { target: chosen };
    unit.threshold = threshold;
    debug!(target = %target, chosen = %chosen, threshold, "retaliating");
    Ok(Reaction::Retaliated { target: chosen })
}
