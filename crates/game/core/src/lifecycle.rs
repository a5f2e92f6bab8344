//! Unit and template lifecycle.
//!
//! Templates come into existence when a faction is granted a unit type.
//! Units are spawned from templates, may board containers, change type or
//! owner, and are finally released. Every step keeps the faction counters and
//! the visibility index in step with the arena.

use tracing::{debug, warn};

use crate::economy::{recompute_incomes, recompute_trade_cost};
use crate::env::Env;
use crate::error::CoreResult;
use crate::state::{
    FactionId, GameState, Position, StateError, UnitId, UnitState, UnitStatus, UnitTypeId,
};
use crate::stats::{AttributeKind, UnitStats};
use crate::upgrade::{LevelCurve, ModifierTarget, apply_modifier, propagate};
use crate::vision::resync;

/// Creates the faction's template for a unit type.
///
/// Upgrades the faction already researched are replayed onto the fresh
/// template, so late-granted types match types granted at game start.
pub(crate) fn grant_unit_type(
    state: &mut GameState,
    env: &mut Env<'_>,
    faction: FactionId,
    unit_type: UnitTypeId,
) -> CoreResult<()> {
    if state.faction(faction)?.template(unit_type).is_some() {
        return Ok(());
    }
    let catalog = env.catalog;
    let definition = catalog.unit_type(unit_type)?;
    let mut attributes = definition.defaults.clone();
    LevelCurve::of(definition, state).refresh(&mut attributes);
    let stats = UnitStats {
        attributes,
        costs: definition.costs,
        storing: definition.storing,
        improve_income: definition.improve_income,
        demand: definition.demand,
    };
    let researched: Vec<_> = {
        let faction_state = state.faction_mut(faction)?;
        faction_state.stats.insert(unit_type, stats);
        faction_state.researched.iter().copied().collect()
    };

    for upgrade in researched {
        let upgrade = catalog.upgrade(upgrade)?;
        for modifier in &upgrade.modifiers {
            apply_modifier(
                state,
                env,
                ModifierTarget::Template { faction, unit_type },
                modifier,
            )?;
        }
    }
    debug!(faction = %faction, unit_type = %unit_type, "unit type granted");
    Ok(())
}

/// Places a new unit seeded from its owner's template.
pub(crate) fn spawn_unit(
    state: &mut GameState,
    env: &mut Env<'_>,
    owner: FactionId,
    unit_type: UnitTypeId,
    position: Position,
    status: UnitStatus,
) -> CoreResult<UnitId> {
    grant_unit_type(state, env, owner, unit_type)?;
    let definition = env.catalog.unit_type(unit_type)?;
    let template = state
        .faction(owner)?
        .template(unit_type)
        .cloned()
        .ok_or(StateError::UnitTypeNotGranted {
            faction: owner,
            unit_type,
        })?;

    let id = state.next_unit_id();
    let mut unit = UnitState::new(
        id,
        unit_type,
        owner,
        state.map.clamp(position),
        template.attributes.clone(),
    );
    unit.weapon_class = definition.default_weapon;
    unit.status = status;
    let completed = !unit.is_under_construction();
    let supply = unit.attributes.value(AttributeKind::Supply);
    state.insert_unit(unit);

    {
        let faction = state.faction_mut(owner)?;
        faction.demand += template.demand;
        if completed {
            faction.supply += supply;
            faction.storage_limits.add_scaled(&template.storing, 1);
        }
    }
    recompute_incomes(state, owner)?;
    recompute_trade_cost(state, owner)?;
    resync(state, env.catalog, &mut *env.vision, id)?;
    debug!(unit = %id, unit_type = %unit_type, owner = %owner, "unit spawned");
    Ok(id)
}

/// Finishes a unit spawned under construction.
///
/// Supply, storage and income the unit provides are credited to its owner
/// only from this point on. Completing a finished unit is a no-op.
pub(crate) fn complete_construction(
    state: &mut GameState,
    env: &mut Env<'_>,
    unit: UnitId,
) -> CoreResult<()> {
    let (owner, unit_type, supply) = {
        let current = state.require_unit_mut(unit)?;
        if !current.is_under_construction() {
            warn!(unit = %unit, "unit is not under construction");
            return Ok(());
        }
        current.status.remove(UnitStatus::UNDER_CONSTRUCTION);
        (
            current.owner,
            current.unit_type,
            current.attributes.value(AttributeKind::Supply),
        )
    };
    let template = template_of(state, owner, unit_type)?;
    {
        let faction = state.faction_mut(owner)?;
        faction.supply += supply;
        faction.storage_limits.add_scaled(&template.storing, 1);
    }
    recompute_incomes(state, owner)?;
    resync(state, env.catalog, &mut *env.vision, unit)?;
    debug!(unit = %unit, "construction completed");
    Ok(())
}

/// Removes a unit from the arena and from its faction's counters.
///
/// Passengers are unloaded at the container's position first.
pub(crate) fn release_unit(
    state: &mut GameState,
    env: &mut Env<'_>,
    unit: UnitId,
) -> CoreResult<UnitState> {
    let (container, contents) = {
        let current = state.require_unit(unit)?;
        (current.container, current.contents.clone())
    };
    for passenger in contents {
        unboard(state, env, passenger)?;
    }
    if container.is_some() {
        unboard(state, env, unit)?;
    }

    let released = state
        .take_unit(unit)
        .ok_or(StateError::UnitNotFound(unit))?;
    if let Some(footprint) = released.sight {
        env.vision.unmark(&footprint);
    }
    let owner = released.owner;
    let template = state.faction(owner)?.template(released.unit_type).cloned();
    {
        let faction = state.faction_mut(owner)?;
        if let Some(template) = &template {
            faction.demand -= template.demand;
            if !released.is_under_construction() {
                faction
                    .storage_limits
                    .add_scaled(&template.storing, -1);
            }
        }
        if !released.is_under_construction() {
            faction.supply -= released.attributes.value(AttributeKind::Supply);
        }
    }
    recompute_incomes(state, owner)?;
    recompute_trade_cost(state, owner)?;
    debug!(unit = %unit, "unit released");
    Ok(released)
}

/// Puts a unit inside a container.
pub(crate) fn board(
    state: &mut GameState,
    env: &mut Env<'_>,
    unit: UnitId,
    container: UnitId,
) -> CoreResult<()> {
    if let Some(current) = state.require_unit(unit)?.container {
        return Err(StateError::AlreadyContained {
            unit,
            container: current,
        }
        .into());
    }
    let carrier = state.require_unit_mut(container)?;
    if carrier.contents.try_push(unit).is_err() {
        return Err(StateError::ContainerFull {
            container,
            max: carrier.contents.capacity(),
        }
        .into());
    }
    let position = carrier.position;
    let passenger = state.require_unit_mut(unit)?;
    passenger.container = Some(container);
    passenger.position = position;

    resync(state, env.catalog, &mut *env.vision, unit)?;
    resync(state, env.catalog, &mut *env.vision, container)?;
    Ok(())
}

/// Takes a unit out of its container, leaving it on the container's tile.
pub(crate) fn unboard(state: &mut GameState, env: &mut Env<'_>, unit: UnitId) -> CoreResult<()> {
    let container = state
        .require_unit(unit)?
        .container
        .ok_or(StateError::NotContained(unit))?;
    let position = match state.unit_mut(container) {
        Some(carrier) => {
            carrier.contents.retain(|&mut id| id != unit);
            carrier.position
        }
        None => {
            warn!(unit = %unit, container = %container, "container vanished before unboarding");
            state.require_unit(unit)?.position
        }
    };
    let passenger = state.require_unit_mut(unit)?;
    passenger.container = None;
    passenger.position = position;

    resync(state, env.catalog, &mut *env.vision, unit)?;
    if state.unit(container).is_some() {
        resync(state, env.catalog, &mut *env.vision, container)?;
    }
    Ok(())
}

/// Turns a unit into another type, carrying over what it gained on top of
/// its old template. Not reverted when the triggering upgrade is removed.
pub(crate) fn convert_unit(
    state: &mut GameState,
    env: &mut Env<'_>,
    unit: UnitId,
    to: UnitTypeId,
) -> CoreResult<()> {
    let (owner, from) = {
        let current = state.require_unit(unit)?;
        (current.owner, current.unit_type)
    };
    if from == to {
        return Ok(());
    }
    grant_unit_type(state, env, owner, to)?;
    let old = template_of(state, owner, from)?;
    let new = template_of(state, owner, to)?;
    let curve = LevelCurve::of(env.catalog.unit_type(to)?, state);

    let current = state.require_unit_mut(unit)?;
    let before = current.attributes.clone();
    current.attributes.rebase(&old.attributes, &new.attributes);
    curve.refresh(&mut current.attributes);
    current.unit_type = to;
    let completed = !current.is_under_construction();

    {
        let faction = state.faction_mut(owner)?;
        faction.demand += new.demand - old.demand;
        if completed {
            faction.storage_limits.add_scaled(&old.storing, -1);
            faction.storage_limits.add_scaled(&new.storing, 1);
        }
    }
    recompute_incomes(state, owner)?;
    propagate(state, env, unit, &before)?;
    debug!(unit = %unit, from = %from, to = %to, "unit converted");
    Ok(())
}

/// Hands a unit to another faction.
///
/// Counters move with it and its attributes are rebased onto the new owner's
/// template, so the new owner's research applies and the old owner's no
/// longer does.
pub(crate) fn change_owner(
    state: &mut GameState,
    env: &mut Env<'_>,
    unit: UnitId,
    to: FactionId,
) -> CoreResult<()> {
    let (from, unit_type) = {
        let current = state.require_unit(unit)?;
        (current.owner, current.unit_type)
    };
    if from == to {
        return Ok(());
    }
    state.faction(to)?;
    grant_unit_type(state, env, to, unit_type)?;
    let old = template_of(state, from, unit_type)?;
    let new = template_of(state, to, unit_type)?;

    let current = state.require_unit_mut(unit)?;
    let old_supply = current.attributes.value(AttributeKind::Supply);
    current.attributes.rebase(&old.attributes, &new.attributes);
    current.owner = to;
    current.threshold = 0;
    let completed = !current.is_under_construction();
    let new_supply = current.attributes.value(AttributeKind::Supply);

    {
        let previous = state.faction_mut(from)?;
        previous.demand -= old.demand;
        if completed {
            previous.supply -= old_supply;
            previous.storage_limits.add_scaled(&old.storing, -1);
        }
    }
    {
        let next = state.faction_mut(to)?;
        next.demand += new.demand;
        if completed {
            next.supply += new_supply;
            next.storage_limits.add_scaled(&new.storing, 1);
        }
    }
    for faction in [from, to] {
        recompute_incomes(state, faction)?;
        recompute_trade_cost(state, faction)?;
    }
    resync(state, env.catalog, &mut *env.vision, unit)?;
    env.observer.ownership_changed(unit, from, to);
    debug!(unit = %unit, from = %from, to = %to, "ownership changed");
    Ok(())
}

fn template_of(
    state: &GameState,
    faction: FactionId,
    unit_type: UnitTypeId,
) -> Result<UnitStats, StateError> {
    state
        .faction(faction)?
        .template(unit_type)
        .cloned()
        .ok_or(StateError::UnitTypeNotGranted { faction, unit_type })
}
