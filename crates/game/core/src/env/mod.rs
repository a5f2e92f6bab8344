//! Everything the core consumes but does not own.
//!
//! The [`Catalog`] holds static definitions; [`VisibilityIndex`],
//! [`ScriptHooks`] and [`CombatObserver`] are the seams to the outside world.
//! [`Env`] bundles them so every engine call receives one explicit context
//! instead of reaching for globals.
mod catalog;
mod hooks;
mod observer;
mod rng;
mod unit_types;

pub use catalog::{Catalog, CatalogError};
pub use hooks::ScriptHooks;
pub use observer::CombatObserver;
pub use rng::SyncRng;
pub use unit_types::{Domain, DomainSet, UnitType, UnitTypeBuilder, UnitTypeFlags, WeaponClass};

use crate::vision::VisibilityIndex;

/// Aggregates the collaborators required by the engine.
pub struct Env<'a> {
    pub catalog: &'a Catalog,
    pub vision: &'a mut dyn VisibilityIndex,
    pub hooks: &'a mut dyn ScriptHooks,
    pub observer: &'a mut dyn CombatObserver,
}

impl<'a> Env<'a> {
    pub fn new(
        catalog: &'a Catalog,
        vision: &'a mut dyn VisibilityIndex,
        hooks: &'a mut dyn ScriptHooks,
        observer: &'a mut dyn CombatObserver,
    ) -> Self {
        Self {
            catalog,
            vision,
            hooks,
            observer,
        }
    }
}
