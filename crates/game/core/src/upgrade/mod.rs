//! Upgrades and the modifier application engine.
//!
//! - [`modifier`] defines upgrades and their effect sets
//! - [`UpgradeLedger`] counts per-unit activations
//! - `apply` performs the reversible attribute arithmetic and propagation
//! - `individual` and `research` are the per-unit and per-faction entry points
mod apply;
mod error;
mod individual;
mod ledger;
pub mod modifier;
mod research;

pub use apply::ModifierTarget;
pub use error::{LedgerError, ModifierError};
pub use ledger::UpgradeLedger;
pub use modifier::{
    Applicability, AttributeModifier, Upgrade, UpgradeModifier, UpgradeStacking,
};

pub(crate) use apply::{LevelCurve, apply_modifier, propagate, remove_modifier};
pub(crate) use individual::{acquire_upgrade, equip_weapon_class, lose_upgrade};
pub(crate) use research::{research_upgrade, revoke_upgrade};
