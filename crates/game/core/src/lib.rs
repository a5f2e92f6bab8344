//! Deterministic unit rules for a lockstep real-time strategy simulation.
//!
//! `skirmish-core` owns the numeric side of every unit: its attribute
//! vector, the upgrade modifiers layered on top of faction templates and
//! individual units, the vision footprint derived from those numbers, and
//! the resolution of each damaging hit. Every peer runs the same code on the
//! same [`GameState`], so all randomness comes from the replicated
//! [`SyncRng`](env::SyncRng) and every collection that influences an outcome
//! is iterated in a stable order.
//!
//! All mutation flows through [`engine::GameEngine`]; collaborators outside
//! the core (visibility index, scripting, notifications) are reached through
//! the traits bundled in [`env::Env`].
pub mod combat;
pub mod config;
pub mod economy;
pub mod engine;
pub mod env;
pub mod error;
mod lifecycle;
pub mod restriction;
pub mod state;
pub mod stats;
pub mod upgrade;
pub mod vision;

pub use combat::{HitEffect, HitIgnored, HitOutcome, HitPhase, HitReport, Reaction};
pub use config::{ExperienceSource, GameConfig};
pub use engine::GameEngine;
pub use env::{
    Catalog, CatalogError, CombatObserver, Domain, DomainSet, Env, ScriptHooks, SyncRng,
    UnitType, UnitTypeFlags, WeaponClass,
};
pub use error::{CoreError, CoreResult, ErrorSeverity, GameError};
pub use restriction::BuildRestriction;
pub use state::{
    FactionId, FactionKind, FactionState, GameState, MapDimensions, Position, StateError, Tick,
    TimeOfDay, UnitId, UnitOrder, UnitState, UnitStatus, UnitTypeId, UpgradeId,
};
pub use stats::{
    Attribute, AttributeKind, AttributeVariant, AttributeVector, ResourceKind, Resources,
    UnitStats,
};
pub use upgrade::{
    Applicability, AttributeModifier, LedgerError, ModifierError, ModifierTarget, Upgrade,
    UpgradeLedger, UpgradeModifier, UpgradeStacking,
};
pub use vision::{SightFootprint, VisibilityIndex};
