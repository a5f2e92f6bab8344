use tracing::{debug, warn};

use crate::env::Env;
use crate::error::CoreResult;
use crate::state::{FactionId, GameState, UpgradeId};

use super::{ModifierTarget, apply_modifier, remove_modifier};

/// Researches an upgrade for a whole faction.
///
/// Every modifier is applied to each granted template it targets, and through
/// the template to every existing unit of that type. Upgrades it supersedes
/// are revoked first. Researching twice is a no-op.
pub(crate) fn research_upgrade(
    state: &mut GameState,
    env: &mut Env<'_>,
    faction: FactionId,
    upgrade_id: UpgradeId,
) -> CoreResult<()> {
    let catalog = env.catalog;
    let upgrade = catalog.upgrade(upgrade_id)?;
    if state.faction(faction)?.has_researched(upgrade_id) {
        warn!(faction = %faction, upgrade = %upgrade_id, "upgrade already researched");
        return Ok(());
    }

    for superseded in upgrade.superseded() {
        if state.faction(faction)?.has_researched(superseded) {
            revoke_upgrade(state, env, faction, superseded)?;
        }
    }

    let granted: Vec<_> = state.faction(faction)?.stats.keys().copied().collect();
    state.faction_mut(faction)?.researched.insert(upgrade_id);
    for modifier in &upgrade.modifiers {
        for &unit_type in &granted {
            apply_modifier(
                state,
                env,
                ModifierTarget::Template { faction, unit_type },
                modifier,
            )?;
        }
    }
    debug!(faction = %faction, upgrade = %upgrade_id, "upgrade researched");
    Ok(())
}

/// Reverses a faction-level research. Revoking an unknown research is a no-op.
pub(crate) fn revoke_upgrade(
    state: &mut GameState,
    env: &mut Env<'_>,
    faction: FactionId,
    upgrade_id: UpgradeId,
) -> CoreResult<()> {
    let catalog = env.catalog;
    let upgrade = catalog.upgrade(upgrade_id)?;
    if !state.faction(faction)?.has_researched(upgrade_id) {
        warn!(faction = %faction, upgrade = %upgrade_id, "revoking upgrade that was never researched");
        return Ok(());
    }

    let granted: Vec<_> = state.faction(faction)?.stats.keys().copied().collect();
    for modifier in upgrade.modifiers.iter().rev() {
        for &unit_type in &granted {
            remove_modifier(
                state,
                env,
                ModifierTarget::Template { faction, unit_type },
                modifier,
            )?;
        }
    }
    state.faction_mut(faction)?.researched.remove(&upgrade_id);
    debug!(faction = %faction, upgrade = %upgrade_id, "upgrade revoked");
    Ok(())
}
