//! Upgrade definitions.
//!
//! An [`Upgrade`] (researched technology, learned ability or item bonus) owns
//! one or more [`UpgradeModifier`]s. Each modifier states which unit types it
//! touches and what it changes; an upgrade's modifiers always apply together.

use std::collections::BTreeSet;

use crate::env::WeaponClass;
use crate::state::{UnitTypeId, UpgradeId};
use crate::stats::{AttributeKind, Resources};

/// Which unit types a modifier touches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Applicability {
    #[default]
    AnyUnitType,
    UnitTypes(BTreeSet<UnitTypeId>),
}

impl Applicability {
    pub fn only(types: impl IntoIterator<Item = UnitTypeId>) -> Self {
        Self::UnitTypes(types.into_iter().collect())
    }

    pub fn applies_to(&self, unit_type: UnitTypeId) -> bool {
        match self {
            Applicability::AnyUnitType => true,
            Applicability::UnitTypes(types) => types.contains(&unit_type),
        }
    }
}

/// Change to one attribute.
///
/// `value`, `max` and `increase` are additive deltas. A non-zero `percent`
/// scales value and max instead, and the additive value/max deltas are
/// ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeModifier {
    pub kind: AttributeKind,
    pub value: i32,
    pub max: i32,
    pub increase: i32,
    pub percent: i32,
}

impl AttributeModifier {
    pub fn additive(kind: AttributeKind, value: i32, max: i32) -> Self {
        Self {
            kind,
            value,
            max,
            increase: 0,
            percent: 0,
        }
    }

    pub fn percent(kind: AttributeKind, percent: i32) -> Self {
        Self {
            kind,
            value: 0,
            max: 0,
            increase: 0,
            percent,
        }
    }

    pub fn with_increase(mut self, increase: i32) -> Self {
        self.increase = increase;
        self
    }

    pub fn is_percent(&self) -> bool {
        self.percent != 0
    }
}

/// One effect set of an upgrade.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgradeModifier {
    pub applies_to: Applicability,
    pub attributes: Vec<AttributeModifier>,
    /// Template-only economy deltas.
    pub costs: Resources,
    pub storing: Resources,
    pub improve_income: Resources,
    pub demand: i32,
    /// Upgrades this one supersedes.
    pub removes: Vec<UpgradeId>,
    /// Turns affected units into another type on apply.
    pub convert_to: Option<UnitTypeId>,
}

impl UpgradeModifier {
    pub fn new(applies_to: Applicability) -> Self {
        Self {
            applies_to,
            ..Self::default()
        }
    }

    pub fn attribute(mut self, modifier: AttributeModifier) -> Self {
        self.attributes.push(modifier);
        self
    }

    pub fn costs(mut self, costs: Resources) -> Self {
        self.costs = costs;
        self
    }

    pub fn storing(mut self, storing: Resources) -> Self {
        self.storing = storing;
        self
    }

    pub fn improve_income(mut self, income: Resources) -> Self {
        self.improve_income = income;
        self
    }

    pub fn demand(mut self, demand: i32) -> Self {
        self.demand = demand;
        self
    }

    pub fn removes(mut self, upgrade: UpgradeId) -> Self {
        self.removes.push(upgrade);
        self
    }

    pub fn convert_to(mut self, unit_type: UnitTypeId) -> Self {
        self.convert_to = Some(unit_type);
        self
    }

    pub fn touches(&self, kind: AttributeKind) -> bool {
        self.attributes.iter().any(|m| m.kind == kind)
    }
}

/// How repeated acquisitions of an upgrade by one unit combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UpgradeStacking {
    /// Effects apply on the first acquisition and reverse on the last loss.
    #[default]
    Single,
    /// Every acquisition applies the effects once more.
    Cumulative,
}

/// A researched technology, learned ability or item bonus.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Upgrade {
    pub id: UpgradeId,
    pub name: String,
    /// Learned ability; gated by `weapon_classes` when non-empty.
    pub ability: bool,
    pub weapon_classes: BTreeSet<WeaponClass>,
    pub stacking: UpgradeStacking,
    pub modifiers: Vec<UpgradeModifier>,
}

impl Upgrade {
    pub fn new(id: UpgradeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ability: false,
            weapon_classes: BTreeSet::new(),
            stacking: UpgradeStacking::Single,
            modifiers: Vec::new(),
        }
    }

    pub fn ability(mut self, weapon_classes: impl IntoIterator<Item = WeaponClass>) -> Self {
        self.ability = true;
        self.weapon_classes = weapon_classes.into_iter().collect();
        self
    }

    pub fn stacking(mut self, stacking: UpgradeStacking) -> Self {
        self.stacking = stacking;
        self
    }

    pub fn modifier(mut self, modifier: UpgradeModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// True when the effects are live for a wielder of `weapon`.
    ///
    /// Non-abilities and abilities without a weapon restriction always are.
    pub fn is_enabled_for(&self, weapon: Option<WeaponClass>) -> bool {
        if !self.ability || self.weapon_classes.is_empty() {
            return true;
        }
        weapon.is_some_and(|class| self.weapon_classes.contains(&class))
    }

    /// Upgrades invalidated by acquiring this one, deduplicated, in id order.
    pub fn superseded(&self) -> BTreeSet<UpgradeId> {
        self.modifiers
            .iter()
            .flat_map(|modifier| modifier.removes.iter().copied())
            .filter(|&other| other != self.id)
            .collect()
    }
}
