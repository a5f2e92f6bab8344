//! Modifier application and reversal.
//!
//! [`shift_vector`] is the pure attribute arithmetic. [`apply_modifier`] and
//! [`remove_modifier`] run it against a faction template or a live unit and
//! then push the consequences outward: faction supply, demand, storage and
//! income counters, trade cost, and the visibility index.
//!
//! Removal computes the whole reversed vector before committing, so a
//! reversal that would leave a negative ceiling fails without side effects.

use tracing::debug;

use crate::economy::{completed_count, recompute_incomes, recompute_trade_cost, unit_count};
use crate::env::{Env, UnitType};
use crate::error::CoreResult;
use crate::lifecycle::convert_unit;
use crate::state::{FactionId, GameState, StateError, UnitId, UnitTypeId};
use crate::stats::percent::{scale, unscale};
use crate::stats::{Attribute, AttributeKind, AttributeVector};
use crate::vision::resync;

use super::{AttributeModifier, ModifierError, UpgradeModifier};

/// What a modifier is applied to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModifierTarget {
    /// The faction's template for a unit type, and with it every existing unit
    /// of that type the faction owns.
    Template {
        faction: FactionId,
        unit_type: UnitTypeId,
    },
    /// One live unit.
    Instance(UnitId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Apply,
    Remove,
}

impl Direction {
    fn sign(self) -> i32 {
        match self {
            Direction::Apply => 1,
            Direction::Remove => -1,
        }
    }
}

/// Parameters of the experience-per-level curve.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LevelCurve {
    pub default_level: i32,
    pub step: i32,
}

impl LevelCurve {
    pub fn of(unit_type: &UnitType, state: &GameState) -> Self {
        Self {
            default_level: unit_type.default_level(),
            step: state.config.experience_step,
        }
    }

    /// Experience needed for the next level; grows triangularly.
    pub fn required(&self, level: i32) -> i32 {
        let n = i64::from((level - self.default_level).max(0)) + 1;
        let required = i64::from(self.step) * n * (n + 1) / 2;
        required.min(i64::from(i32::MAX)) as i32
    }

    pub fn refresh(&self, vector: &mut AttributeVector) {
        let required = self.required(vector.value(AttributeKind::Level));
        vector.update(AttributeKind::XpRequired, |a| {
            a.max = required;
            a.value = required;
        });
    }
}

fn skips_value(m: &AttributeModifier, delta: i32) -> bool {
    m.kind.is_mana_like() && delta > 0
}

fn apply_attribute(mut attribute: Attribute, m: &AttributeModifier) -> Attribute {
    if m.is_percent() {
        if !skips_value(m, m.percent) {
            attribute.value = scale(attribute.value, m.percent);
        }
        attribute.max = scale(attribute.max, m.percent);
    } else {
        if !skips_value(m, m.value) {
            attribute.value = attribute.value.saturating_add(m.value);
        }
        attribute.max = attribute.max.saturating_add(m.max);
    }
    attribute.increase = attribute.increase.saturating_add(m.increase);
    attribute.enabled = true;
    attribute.clamp();
    attribute
}

fn remove_attribute(
    mut attribute: Attribute,
    m: &AttributeModifier,
) -> Result<Attribute, ModifierError> {
    if m.is_percent() {
        attribute.max = unscale(attribute.max, m.percent);
        if !skips_value(m, m.percent) {
            attribute.value = unscale(attribute.value, m.percent);
        }
    } else {
        attribute.max = attribute.max.saturating_sub(m.max);
        if !skips_value(m, m.value) {
            attribute.value = attribute.value.saturating_sub(m.value);
        }
    }
    if attribute.max < 0 {
        return Err(ModifierError::NegativeMax {
            kind: m.kind,
            max: attribute.max,
        });
    }
    attribute.increase = attribute.increase.saturating_sub(m.increase);
    attribute.clamp();
    Ok(attribute)
}

/// Side bonus granted by knowledge attributes, as a function of the change.
fn knowledge_bonus(vector: &mut AttributeVector, kind: AttributeKind, old: i32, new: i32) {
    match kind {
        AttributeKind::KnowledgeMagic => {
            let delta = new.div_euclid(5) - old.div_euclid(5);
            if delta != 0 {
                vector.update(AttributeKind::Mana, |a| a.max += delta);
            }
        }
        AttributeKind::KnowledgeMining => {
            let delta = new.div_euclid(25) - old.div_euclid(25);
            if delta != 0 {
                for bonus in AttributeKind::GATHERING_BONUSES {
                    vector.update(bonus, |a| {
                        a.value += delta;
                        a.max += delta;
                    });
                }
            }
        }
        _ => {}
    }
}

/// Applies or reverses a list of attribute modifiers on one vector.
///
/// Reversal walks the list backwards. Nothing is written unless every step
/// succeeds.
pub(crate) fn shift_vector(
    vector: &mut AttributeVector,
    modifiers: &[AttributeModifier],
    direction: Direction,
    curve: LevelCurve,
) -> Result<(), ModifierError> {
    let ordered: Vec<&AttributeModifier> = match direction {
        Direction::Apply => modifiers.iter().collect(),
        Direction::Remove => modifiers.iter().rev().collect(),
    };

    let mut next = vector.clone();
    let mut level_touched = false;
    for m in ordered {
        let before = *next.get(m.kind);
        let after = match direction {
            Direction::Apply => apply_attribute(before, m),
            Direction::Remove => remove_attribute(before, m)?,
        };
        next.replace(m.kind, after);
        knowledge_bonus(&mut next, m.kind, before.value, after.value);
        level_touched |= m.kind.affects_level_curve();
    }
    if level_touched {
        curve.refresh(&mut next);
    }
    *vector = next;
    Ok(())
}

pub(crate) fn apply_modifier(
    state: &mut GameState,
    env: &mut Env<'_>,
    target: ModifierTarget,
    modifier: &UpgradeModifier,
) -> CoreResult<()> {
    run(state, env, target, modifier, Direction::Apply)
}

pub(crate) fn remove_modifier(
    state: &mut GameState,
    env: &mut Env<'_>,
    target: ModifierTarget,
    modifier: &UpgradeModifier,
) -> CoreResult<()> {
    run(state, env, target, modifier, Direction::Remove)
}

fn run(
    state: &mut GameState,
    env: &mut Env<'_>,
    target: ModifierTarget,
    modifier: &UpgradeModifier,
    direction: Direction,
) -> CoreResult<()> {
    match target {
        ModifierTarget::Template { faction, unit_type } => {
            template(state, env, faction, unit_type, modifier, direction)
        }
        ModifierTarget::Instance(unit) => {
            let unit_type = state.require_unit(unit)?.unit_type;
            if !modifier.applies_to.applies_to(unit_type) {
                return Ok(());
            }
            instance(state, env, unit, modifier, direction)?;
            if direction == Direction::Apply {
                if let Some(to) = modifier.convert_to {
                    convert_unit(state, env, unit, to)?;
                }
            }
            Ok(())
        }
    }
}

fn template(
    state: &mut GameState,
    env: &mut Env<'_>,
    faction: FactionId,
    unit_type: UnitTypeId,
    modifier: &UpgradeModifier,
    direction: Direction,
) -> CoreResult<()> {
    if !modifier.applies_to.applies_to(unit_type) {
        return Ok(());
    }
    let curve = LevelCurve::of(env.catalog.unit_type(unit_type)?, state);
    let sign = direction.sign();

    {
        let stats = state
            .faction_mut(faction)?
            .stats
            .get_mut(&unit_type)
            .ok_or(StateError::UnitTypeNotGranted { faction, unit_type })?;
        shift_vector(&mut stats.attributes, &modifier.attributes, direction, curve)?;
        stats.costs.add_scaled(&modifier.costs, sign);
        stats.storing.add_scaled(&modifier.storing, sign);
        stats.improve_income.add_scaled(&modifier.improve_income, sign);
        stats.demand += modifier.demand * sign;
    }

    let completed = completed_count(state, faction, unit_type);
    let population = unit_count(state, faction, unit_type);
    {
        let counters = state.faction_mut(faction)?;
        counters
            .storage_limits
            .add_scaled(&modifier.storing, sign * completed);
        counters.demand += modifier.demand * sign * population;
    }
    if !modifier.improve_income.is_zero() {
        recompute_incomes(state, faction)?;
    }
    debug!(
        faction = %faction,
        unit_type = %unit_type,
        ?direction,
        population,
        "template modifier"
    );

    let instances = state.unit_ids_where(|u| {
        u.owner == faction && u.unit_type == unit_type && !u.is_destroyed()
    });
    for &unit in &instances {
        instance(state, env, unit, modifier, direction)?;
    }
    if let (Direction::Apply, Some(to)) = (direction, modifier.convert_to) {
        for unit in instances {
            convert_unit(state, env, unit, to)?;
        }
    }
    Ok(())
}

fn instance(
    state: &mut GameState,
    env: &mut Env<'_>,
    unit: UnitId,
    modifier: &UpgradeModifier,
    direction: Direction,
) -> CoreResult<()> {
    if modifier.attributes.is_empty() {
        return Ok(());
    }
    let current = state.require_unit(unit)?;
    let curve = LevelCurve::of(env.catalog.unit_type(current.unit_type)?, state);
    let before = current.attributes.clone();

    let target = state.require_unit_mut(unit)?;
    shift_vector(&mut target.attributes, &modifier.attributes, direction, curve)?;
    propagate(state, env, unit, &before)
}

/// Pushes an attribute change of one live unit out to its faction and the
/// visibility index.
pub(crate) fn propagate(
    state: &mut GameState,
    env: &mut Env<'_>,
    unit: UnitId,
    before: &AttributeVector,
) -> CoreResult<()> {
    let current = state.require_unit(unit)?;
    let after = &current.attributes;
    let owner = current.owner;
    let container = current.container;
    let supply_delta = if current.is_under_construction() {
        0
    } else {
        after.value(AttributeKind::Supply) - before.value(AttributeKind::Supply)
    };
    let trade_changed =
        after.value(AttributeKind::TradeCost) != before.value(AttributeKind::TradeCost);
    let vision_changed = [
        AttributeKind::SightRange,
        AttributeKind::DaySightRangeBonus,
        AttributeKind::NightSightRangeBonus,
        AttributeKind::AttackRange,
    ]
    .into_iter()
    .any(|kind| after.get(kind) != before.get(kind));
    let range_changed =
        after.value(AttributeKind::AttackRange) != before.value(AttributeKind::AttackRange);

    if supply_delta != 0 {
        state.faction_mut(owner)?.supply += supply_delta;
    }
    if trade_changed {
        recompute_trade_cost(state, owner)?;
    }
    if vision_changed {
        resync(state, env.catalog, &mut *env.vision, unit)?;
    }
    if let (true, Some(container)) = (range_changed, container) {
        resync(state, env.catalog, &mut *env.vision, container)?;
    }
    Ok(())
}
