//! Combat resolution.
//!
//! One damaging event runs through a fixed sequence of phases (see
//! [`HitPhase`]). Conditions under which a hit does nothing are reported as
//! [`HitOutcome::Ignored`], never as errors.
//!
//! # Core Functions
//!
//! - `calculate_damage`: rolls the damage of one blow
//! - `shield_damage` / `is_lethal`: shield absorption and the death test
//! - `threat_cost`: target preference used when retaliating

pub mod damage;
mod death;
mod hit;
mod notify;
mod raid;
mod retaliation;

pub use damage::{calculate_damage, is_lethal, shield_damage};
pub use retaliation::{is_aggressive, threat_cost};

pub(crate) use hit::resolve_hit;

use crate::state::{Position, UnitId};
use crate::stats::Resources;

/// Per-event attack properties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitEffect {
    /// Skip shield absorption (in addition to attackers whose type pierces).
    pub shield_piercing: bool,
}

impl HitEffect {
    pub const PIERCING: Self = Self {
        shield_piercing: true,
    };
}

/// Phases of hit resolution, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum HitPhase {
    Validate,
    Notify,
    ScriptHooks,
    Raid,
    Lethality,
    Death,
    Damage,
    PostEffects,
}

/// Why a hit had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HitIgnored {
    ZeroDamage,
    TargetDying,
    TargetInvulnerable,
    TargetDestroyed,
    /// A script hook released the target.
    TargetReleased,
}

/// What the damaged unit did in response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reaction {
    #[default]
    None,
    Fled {
        to: Position,
    },
    Retaliated {
        target: UnitId,
    },
}

/// Summary of a resolved hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitReport {
    pub shield_damage: i32,
    pub hp_damage: i32,
    pub raided: Resources,
    pub killed: bool,
    pub destroyer: Option<UnitId>,
    pub captured_by: Option<UnitId>,
    pub reaction: Reaction,
    /// The target started burning.
    pub ignited: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitOutcome {
    Ignored(HitIgnored),
    Resolved(HitReport),
}

impl HitOutcome {
    pub fn report(&self) -> Option<&HitReport> {
        match self {
            HitOutcome::Ignored(_) => None,
            HitOutcome::Resolved(report) => Some(report),
        }
    }

    pub fn is_kill(&self) -> bool {
        self.report().is_some_and(|report| report.killed)
    }
}
