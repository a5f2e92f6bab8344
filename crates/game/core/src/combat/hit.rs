//! The hit pipeline.

use tracing::{debug, trace};

use crate::env::{Catalog, Env, UnitTypeFlags};
use crate::error::CoreResult;
use crate::state::{FactionKind, GameState, UnitId, UnitState, UnitStatus};
use crate::stats::AttributeKind;

use super::damage::{is_lethal, shield_damage};
use super::death::{kill, share_experience};
use super::notify::notify;
use super::raid::raid;
use super::retaliation::{react, try_capture};
use super::{HitEffect, HitIgnored, HitOutcome, HitPhase, HitReport, Reaction};

fn ignored_reason(catalog: &Catalog, unit: &UnitState) -> Option<HitIgnored> {
    if unit.is_dying() {
        return Some(HitIgnored::TargetDying);
    }
    let indestructible = catalog
        .unit_type(unit.unit_type)
        .is_ok_and(|t| t.has(UnitTypeFlags::INDESTRUCTIBLE));
    if unit.attributes.value(AttributeKind::UnholyArmor) > 0 || indestructible {
        return Some(HitIgnored::TargetInvulnerable);
    }
    if unit.is_destroyed() {
        return Some(HitIgnored::TargetDestroyed);
    }
    None
}

/// Scripts may heal, kill or release the target; re-check before going on.
fn revalidate(state: &GameState, catalog: &Catalog, target: UnitId) -> Option<HitIgnored> {
    match state.unit(target) {
        Some(unit) => ignored_reason(catalog, unit),
        None => Some(HitIgnored::TargetReleased),
    }
}

/// Resolves one damaging event against `target`.
///
/// `attacker` is `None` for environmental damage. Returns an error only when
/// `target` does not exist when the hit starts or an internal invariant
/// breaks along the way.
pub(crate) fn resolve_hit(
    state: &mut GameState,
    env: &mut Env<'_>,
    attacker: Option<UnitId>,
    target: UnitId,
    damage: i32,
    effect: HitEffect,
) -> CoreResult<HitOutcome> {
    let catalog = env.catalog;
    let attacker = attacker.filter(|&id| state.unit(id).is_some());
    let mut report = HitReport::default();
    let mut piercing = effect.shield_piercing;
    let mut phase = HitPhase::Validate;

    loop {
        trace!(target = %target, %phase, "hit phase");
        phase = match phase {
            HitPhase::Validate => {
                if damage <= 0 {
                    return Ok(HitOutcome::Ignored(HitIgnored::ZeroDamage));
                }
                let unit = state.require_unit(target)?;
                if let Some(reason) = ignored_reason(catalog, unit) {
                    return Ok(HitOutcome::Ignored(reason));
                }
                HitPhase::Notify
            }
            HitPhase::Notify => {
                notify(state, env, attacker, target)?;
                HitPhase::ScriptHooks
            }
            HitPhase::ScriptHooks => {
                env.hooks.on_hit(state, attacker, target, damage);
                if let Some(reason) = revalidate(state, catalog, target) {
                    return Ok(HitOutcome::Ignored(reason));
                }
                env.hooks.on_impact(state, attacker, target, damage);
                if let Some(reason) = revalidate(state, catalog, target) {
                    return Ok(HitOutcome::Ignored(reason));
                }
                HitPhase::Raid
            }
            HitPhase::Raid => {
                piercing = piercing
                    || attacker
                        .and_then(|id| state.unit(id))
                        .and_then(|unit| catalog.unit_type(unit.unit_type).ok())
                        .is_some_and(|t| t.has(UnitTypeFlags::SHIELD_PIERCING));
                let unit = state.require_unit(target)?;
                report.shield_damage = shield_damage(
                    unit.attributes.value(AttributeKind::Shield),
                    unit.attributes.value(AttributeKind::ShieldPermeability),
                    damage,
                    piercing,
                );
                report.hp_damage = damage - report.shield_damage;
                report.raided = raid(state, env, attacker, target, damage, report.shield_damage)?;
                HitPhase::Lethality
            }
            HitPhase::Lethality => {
                let unit = state.require_unit(target)?;
                if is_lethal(unit.hp(), damage, report.shield_damage, piercing) {
                    HitPhase::Death
                } else {
                    HitPhase::Damage
                }
            }
            HitPhase::Death => {
                report.killed = true;
                report.destroyer = kill(state, env, attacker, target)?;
                return Ok(HitOutcome::Resolved(report));
            }
            HitPhase::Damage => {
                report.ignited = take_damage(state, env, attacker, target, damage, &report)?;
                HitPhase::PostEffects
            }
            HitPhase::PostEffects => {
                report.captured_by = try_capture(state, env, attacker, target, damage)?;
                report.reaction = match report.captured_by {
                    Some(_) => Reaction::None,
                    None => react(state, env, attacker, target)?,
                };
                debug!(
                    target = %target,
                    attacker = ?attacker,
                    damage,
                    shield = report.shield_damage,
                    "hit resolved"
                );
                return Ok(HitOutcome::Resolved(report));
            }
        };
    }
}

/// Applies non-lethal damage and its side effects. Returns true when the
/// target started burning.
fn take_damage(
    state: &mut GameState,
    env: &mut Env<'_>,
    attacker: Option<UnitId>,
    target: UnitId,
    damage: i32,
    report: &HitReport,
) -> CoreResult<bool> {
    let catalog = env.catalog;
    let unit = state.require_unit_mut(target)?;
    for (kind, amount) in [
        (AttributeKind::Shield, report.shield_damage),
        (AttributeKind::HitPoints, report.hp_damage),
    ] {
        unit.attributes
            .update(kind, |a| a.value = a.value.saturating_sub(amount).max(0));
    }
    let (owner, unit_type) = (unit.owner, unit.unit_type);

    if let Some(attacker) = attacker {
        if state.config.experience_per_damage {
            let attacker_owner = state.require_unit(attacker)?.owner;
            let unaligned = state.faction(owner)?.kind == FactionKind::Neutral;
            if unaligned || state.are_hostile(attacker_owner, owner) {
                share_experience(state, catalog, attacker, Some(target), damage)?;
            }
        }
    }

    let definition = catalog.unit_type(unit_type)?;
    let unit = state.require_unit(target)?;
    let (hp, hp_max) = (i64::from(unit.hp()), i64::from(unit.hp_max()));

    let healing = i64::from(state.config.healing_threshold_percent);
    if definition.has(UnitTypeFlags::HAS_INVENTORY) && hp * 100 < hp_max * healing {
        env.observer.use_healing_item(target);
    }

    let burning = i64::from(state.config.burning_threshold_percent);
    let ignites = definition.is_building()
        && definition.size > 1
        && !unit.is_under_construction()
        && !unit.status.contains(UnitStatus::BURNING)
        && hp * 100 <= hp_max * burning;
    if ignites {
        state.require_unit_mut(target)?.status.insert(UnitStatus::BURNING);
        env.observer.burning_started(target);
        debug!(target = %target, hp, "structure burning");
    }
    Ok(ignites)
}
