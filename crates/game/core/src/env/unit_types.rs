//! Unit type definitions.
//!
//! A [`UnitType`] is immutable catalog data. Faction templates are seeded from
//! its defaults and evolve through research; the type itself never changes.

use bitflags::bitflags;

use crate::state::UnitTypeId;
use crate::stats::{AttributeKind, AttributeVector, Resources};

bitflags! {
    /// Static behaviour flags of a unit type.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitTypeFlags: u16 {
        const BUILDING                = 1 << 0;
        const CAN_ATTACK              = 1 << 1;
        const COWARD                  = 1 << 2;
        const ITEM                    = 1 << 3;
        const INDESTRUCTIBLE          = 1 << 4;
        const CAN_REPAIR              = 1 << 5;
        const HAS_INVENTORY           = 1 << 6;
        const WALL                    = 1 << 7;
        /// Contents survive the container's death.
        const SAVE_CARGO              = 1 << 8;
        /// Contents may shoot out of this container.
        const ATTACK_FROM_TRANSPORTER = 1 << 9;
        /// Attacks ignore shields.
        const SHIELD_PIERCING         = 1 << 10;
    }
}

bitflags! {
    /// Movement domains a unit type can target.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DomainSet: u8 {
        const LAND  = 1 << 0;
        const NAVAL = 1 << 1;
        const AIR   = 1 << 2;
    }
}

/// Movement domain of a unit type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Domain {
    #[default]
    Land,
    Naval,
    Air,
}

impl Domain {
    pub fn as_set(self) -> DomainSet {
        match self {
            Domain::Land => DomainSet::LAND,
            Domain::Naval => DomainSet::NAVAL,
            Domain::Air => DomainSet::AIR,
        }
    }
}

/// Weapon family a unit wields; gates weapon-specific abilities.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WeaponClass {
    Dagger,
    Sword,
    Axe,
    Mace,
    Spear,
    Bow,
    Crossbow,
    Thrown,
    Staff,
}

/// Static definition of a unit type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitType {
    pub id: UnitTypeId,
    pub name: String,
    pub flags: UnitTypeFlags,
    pub domain: Domain,
    /// Domains this type's attacks can reach.
    pub can_target: DomainSet,
    /// Footprint edge length in tiles.
    pub size: i32,
    pub min_attack_range: i32,
    pub defaults: AttributeVector,
    pub costs: Resources,
    pub storing: Resources,
    pub improve_income: Resources,
    pub demand: i32,
    pub default_weapon: Option<WeaponClass>,
}

impl UnitType {
    pub fn builder(id: UnitTypeId, name: impl Into<String>) -> UnitTypeBuilder {
        UnitTypeBuilder::new(id, name)
    }

    pub fn is_building(&self) -> bool {
        self.flags.contains(UnitTypeFlags::BUILDING)
    }

    pub fn has(&self, flag: UnitTypeFlags) -> bool {
        self.flags.contains(flag)
    }

    /// True when this type's attacks can reach units of `other`.
    pub fn can_target(&self, other: &UnitType) -> bool {
        self.can_target.intersects(other.domain.as_set())
    }

    pub fn default_level(&self) -> i32 {
        self.defaults.value(AttributeKind::Level)
    }
}

/// Builder for [`UnitType`] definitions.
pub struct UnitTypeBuilder {
    unit_type: UnitType,
}

impl UnitTypeBuilder {
    fn new(id: UnitTypeId, name: impl Into<String>) -> Self {
        Self {
            unit_type: UnitType {
                id,
                name: name.into(),
                flags: UnitTypeFlags::empty(),
                domain: Domain::Land,
                can_target: DomainSet::LAND,
                size: 1,
                min_attack_range: 0,
                defaults: AttributeVector::new(),
                costs: Resources::ZERO,
                storing: Resources::ZERO,
                improve_income: Resources::ZERO,
                demand: 0,
                default_weapon: None,
            },
        }
    }

    pub fn flags(mut self, flags: UnitTypeFlags) -> Self {
        self.unit_type.flags |= flags;
        self
    }

    pub fn domain(mut self, domain: Domain) -> Self {
        self.unit_type.domain = domain;
        self
    }

    pub fn can_target(mut self, domains: DomainSet) -> Self {
        self.unit_type.can_target = domains;
        self
    }

    pub fn size(mut self, size: i32) -> Self {
        self.unit_type.size = size;
        self
    }

    pub fn min_attack_range(mut self, range: i32) -> Self {
        self.unit_type.min_attack_range = range;
        self
    }

    /// Sets a bounded attribute default.
    pub fn attribute(mut self, kind: AttributeKind, value: i32, max: i32) -> Self {
        self.unit_type.defaults = self.unit_type.defaults.with(kind, value, max);
        self
    }

    /// Sets an unbounded attribute default.
    pub fn stat(mut self, kind: AttributeKind, value: i32) -> Self {
        self.unit_type.defaults = self.unit_type.defaults.with_value(kind, value);
        self
    }

    pub fn regeneration(mut self, kind: AttributeKind, increase: i32) -> Self {
        self.unit_type.defaults = self.unit_type.defaults.with_increase(kind, increase);
        self
    }

    pub fn costs(mut self, costs: Resources) -> Self {
        self.unit_type.costs = costs;
        self
    }

    pub fn storing(mut self, storing: Resources) -> Self {
        self.unit_type.storing = storing;
        self
    }

    pub fn improve_income(mut self, income: Resources) -> Self {
        self.unit_type.improve_income = income;
        self
    }

    pub fn demand(mut self, demand: i32) -> Self {
        self.unit_type.demand = demand;
        self
    }

    pub fn weapon(mut self, weapon: WeaponClass) -> Self {
        self.unit_type.default_weapon = Some(weapon);
        self
    }

    pub fn build(self) -> UnitType {
        self.unit_type
    }
}
