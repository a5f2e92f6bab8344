use tracing::trace;

use crate::config::GameConfig;
use crate::env::Env;
use crate::error::CoreResult;
use crate::state::{GameState, HelpCry, UnitId};

/// Stamps the attack time and raises throttled alerts for the target's owner.
///
/// Alerts need a live attacker and at least two quiet seconds since the
/// previous hit on this unit. The "under attack" cry is then muted for two
/// minutes around the spot it was raised; computer owners additionally ask
/// for reinforcements, at most once every two minutes per attacker.
pub(crate) fn notify(
    state: &mut GameState,
    env: &mut Env<'_>,
    attacker: Option<UnitId>,
    target: UnitId,
) -> CoreResult<()> {
    let now = state.tick;
    let cooldown = state.config.seconds(GameConfig::NOTIFY_COOLDOWN_SECONDS);
    let help_window = state.config.seconds(GameConfig::HELP_CRY_SECONDS);
    let ai_window = state.config.seconds(GameConfig::AI_HELP_SECONDS);
    let area = state.config.help_cry_area;

    let victim = state.require_unit_mut(target)?;
    let previous = victim.last_attacked.replace(now);
    let owner = victim.owner;
    let position = victim.position;

    let Some(attacker) = attacker.filter(|&id| state.unit(id).is_some()) else {
        return Ok(());
    };
    if previous.is_some_and(|last| now.since(last) <= cooldown) {
        return Ok(());
    }

    let faction = state.faction_mut(owner)?;
    let muted = faction.help_cry.is_some_and(|cry| {
        now.since(cry.tick) <= help_window && cry.position.distance_to(position) <= area
    });
    if !muted {
        faction.help_cry = Some(HelpCry {
            tick: now,
            position,
        });
        env.observer.under_attack(owner, target, position);
        trace!(target = %target, owner = %owner, "under attack");
    }
    if !faction.is_computer() {
        return Ok(());
    }

    let aggressor = state.require_unit_mut(attacker)?;
    if aggressor
        .help_requested
        .is_none_or(|last| now.since(last) > ai_window)
    {
        aggressor.help_requested = Some(now);
        env.observer.request_reinforcements(owner, target, attacker);
        trace!(target = %target, attacker = %attacker, "reinforcements requested");
    }
    Ok(())
}
