//! Death bookkeeping: destroyer attribution, score, kills and experience.

use tracing::debug;

use crate::config::ExperienceSource;
use crate::env::{Catalog, Env, UnitTypeFlags};
use crate::error::CoreResult;
use crate::state::{GameState, UnitId, UnitOrder, UnitState};
use crate::stats::AttributeKind;

fn is_active(unit: &UnitState) -> bool {
    unit.is_on_map() && !unit.is_dying()
}

/// Nearest unit hostile to the victim's owner, used when damage has no
/// attacker (traps, spells, burning). Ties go to the lowest id.
pub(crate) fn find_destroyer(state: &GameState, victim: UnitId) -> Option<UnitId> {
    let victim = state.unit(victim)?;
    let radius = state.config.destroyer_search_radius;
    state
        .units()
        .filter(|u| u.id != victim.id && is_active(u))
        .filter(|u| state.are_hostile(u.owner, victim.owner))
        .map(|u| (u.position.distance_to(victim.position), u.id))
        .filter(|&(distance, _)| distance <= radius)
        .min()
        .map(|(_, id)| id)
}

/// Splits `amount` experience evenly between `earner` and the allied,
/// non-structure units around it. Returns the per-unit share.
pub(crate) fn share_experience(
    state: &mut GameState,
    catalog: &Catalog,
    earner: UnitId,
    exclude: Option<UnitId>,
    amount: i32,
) -> CoreResult<i32> {
    let unit = state.require_unit(earner)?;
    let (owner, origin) = (unit.owner, unit.position);
    let radius = state.config.experience_share_radius;
    let mut recipients = vec![earner];
    for unit in state.units() {
        if unit.id == earner || Some(unit.id) == exclude || !is_active(unit) {
            continue;
        }
        if !state.are_allied(owner, unit.owner) || unit.position.distance_to(origin) > radius {
            continue;
        }
        if !catalog
            .unit_type(unit.unit_type)
            .is_ok_and(|t| t.is_building())
        {
            recipients.push(unit.id);
        }
    }

    let share = amount / recipients.len() as i32;
    if share > 0 {
        for &unit in &recipients {
            state
                .require_unit_mut(unit)?
                .attributes
                .add_value_and_max(AttributeKind::Experience, share);
        }
    }
    Ok(share)
}

/// Credits the destroyer's faction and shares experience around it.
pub(crate) fn award_kill(
    state: &mut GameState,
    env: &Env<'_>,
    destroyer: UnitId,
    victim: UnitId,
) -> CoreResult<()> {
    let killed = state.require_unit(victim)?;
    let victim_type = env.catalog.unit_type(killed.unit_type)?;
    let points = killed.attributes.value(AttributeKind::Points);
    let experience = match state.config.experience_source {
        ExperienceSource::Points => points,
        ExperienceSource::HitPoints => killed.hp_max(),
    };
    let victim_type_id = killed.unit_type;
    let owner = state.require_unit(destroyer)?.owner;

    {
        let faction = state.faction_mut(owner)?;
        faction.score += points;
        faction.record_kill(victim_type_id, victim_type.is_building());
    }
    state
        .require_unit_mut(destroyer)?
        .attributes
        .add_value_and_max(AttributeKind::Kills, 1);

    let share = share_experience(state, env.catalog, destroyer, Some(victim), experience)?;
    debug!(destroyer = %destroyer, victim = %victim, points, share, "kill awarded");
    Ok(())
}

/// Runs the death sequence for `target` and, unless its container keeps its
/// cargo, for everything inside it.
pub(crate) fn kill(
    state: &mut GameState,
    env: &mut Env<'_>,
    attacker: Option<UnitId>,
    target: UnitId,
) -> CoreResult<Option<UnitId>> {
    let destroyer = attacker
        .filter(|&id| state.unit(id).is_some())
        .or_else(|| find_destroyer(state, target));

    let mut pending = vec![target];
    while let Some(victim) = pending.pop() {
        // Scripts may already have released a passenger.
        let Some(unit) = state.unit(victim) else {
            continue;
        };
        let (owner, unit_type, contents) = (unit.owner, unit.unit_type, unit.contents.clone());
        let definition = env.catalog.unit_type(unit_type)?;

        if let Some(destroyer) = destroyer {
            let credited = !definition.has(UnitTypeFlags::ITEM);
            let destroyer_owner = state.require_unit(destroyer)?.owner;
            if credited && state.are_hostile(destroyer_owner, owner) {
                award_kill(state, env, destroyer, victim)?;
            }
        }

        if !definition.has(UnitTypeFlags::SAVE_CARGO) {
            pending.extend(contents.iter().rev().copied());
        }

        env.hooks.on_death(state, victim, destroyer);
        if let Some(unit) = state.unit_mut(victim) {
            unit.order = UnitOrder::Die;
            unit.threshold = 0;
            unit.attributes.set_value(AttributeKind::HitPoints, 0);
        }
        env.observer.unit_killed(victim, destroyer);
        debug!(victim = %victim, destroyer = ?destroyer, "unit killed");
    }
    Ok(destroyer)
}
