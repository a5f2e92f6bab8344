//! Faction aggregates derived from the unit population.
//!
//! Supply, demand and storage limits are maintained incrementally by the
//! engine. Incomes and trade cost are maxima/minima over the population and
//! are recomputed whenever an input changes.

use tracing::trace;

use crate::state::{FactionId, GameState, StateError, UnitState, UnitTypeId};
use crate::stats::AttributeKind;

fn counts_toward(unit: &UnitState, owner: FactionId) -> bool {
    unit.owner == owner && !unit.is_destroyed()
}

/// Number of live units of a type owned by a faction.
pub fn unit_count(state: &GameState, owner: FactionId, unit_type: UnitTypeId) -> i32 {
    state
        .units()
        .filter(|u| counts_toward(u, owner) && u.unit_type == unit_type)
        .count() as i32
}

/// Number of completed units of a type owned by a faction.
pub fn completed_count(state: &GameState, owner: FactionId, unit_type: UnitTypeId) -> i32 {
    state
        .units()
        .filter(|u| {
            counts_toward(u, owner) && u.unit_type == unit_type && !u.is_under_construction()
        })
        .count() as i32
}

/// Incomes are the best level offered by any completed unit type the faction
/// owns, never below the configured default.
pub fn recompute_incomes(state: &mut GameState, owner: FactionId) -> Result<(), StateError> {
    let default_income = state.config.default_income;
    let mut incomes = crate::stats::Resources::splat(default_income);
    {
        let faction = state.faction(owner)?;
        for (unit_type, stats) in &faction.stats {
            if completed_count(state, owner, *unit_type) > 0 {
                incomes.max_with(&stats.improve_income);
            }
        }
    }
    let faction = state.faction_mut(owner)?;
    if faction.incomes != incomes {
        trace!(faction = %owner, ?incomes, "incomes recomputed");
        faction.incomes = incomes;
    }
    Ok(())
}

/// Trade cost is the lowest positive value among the faction's units.
pub fn recompute_trade_cost(state: &mut GameState, owner: FactionId) -> Result<(), StateError> {
    let best = state
        .units()
        .filter(|u| counts_toward(u, owner))
        .map(|u| u.attributes.value(AttributeKind::TradeCost))
        .filter(|&cost| cost > 0)
        .min()
        .unwrap_or(state.config.default_trade_cost);
    state.faction_mut(owner)?.trade_cost = best;
    Ok(())
}

/// True when the faction's stored resources cover the template cost.
pub fn can_afford(
    state: &GameState,
    owner: FactionId,
    unit_type: UnitTypeId,
) -> Result<bool, StateError> {
    let faction = state.faction(owner)?;
    let template = faction
        .template(unit_type)
        .ok_or(StateError::UnitTypeNotGranted {
            faction: owner,
            unit_type,
        })?;
    Ok(faction.stored.covers(&template.costs))
}
