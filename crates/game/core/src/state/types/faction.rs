use std::collections::{BTreeMap, BTreeSet};

use crate::stats::{Resources, UnitStats};

use super::{FactionId, Position, Tick, UnitTypeId, UpgradeId};

/// Who controls a faction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FactionKind {
    #[default]
    Person,
    Computer,
    Neutral,
}

/// Last "under attack" notification, used to throttle repeats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HelpCry {
    pub tick: Tick,
    pub position: Position,
}

/// Aggregate economy, diplomacy and score of one faction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactionState {
    pub id: FactionId,
    pub kind: FactionKind,
    pub enemies: BTreeSet<FactionId>,
    pub allies: BTreeSet<FactionId>,

    pub stored: Resources,
    pub storage_limits: Resources,
    pub incomes: Resources,
    /// Supply provided by completed units.
    pub supply: i32,
    /// Supply consumed by units.
    pub demand: i32,
    pub trade_cost: i32,

    pub score: i32,
    pub total_kills: u32,
    pub total_razings: u32,
    pub unit_type_kills: BTreeMap<UnitTypeId, u32>,

    /// Upgrades researched at faction level.
    pub researched: BTreeSet<UpgradeId>,
    /// Templates of the unit types this faction may field.
    pub stats: BTreeMap<UnitTypeId, UnitStats>,

    pub help_cry: Option<HelpCry>,
}

impl FactionState {
    pub fn new(id: FactionId, kind: FactionKind, default_income: i32, trade_cost: i32) -> Self {
        Self {
            id,
            kind,
            enemies: BTreeSet::new(),
            allies: BTreeSet::new(),
            stored: Resources::ZERO,
            storage_limits: Resources::ZERO,
            incomes: Resources::splat(default_income),
            supply: 0,
            demand: 0,
            trade_cost,
            score: 0,
            total_kills: 0,
            total_razings: 0,
            unit_type_kills: BTreeMap::new(),
            researched: BTreeSet::new(),
            stats: BTreeMap::new(),
            help_cry: None,
        }
    }

    pub fn is_computer(&self) -> bool {
        self.kind == FactionKind::Computer
    }

    pub fn has_researched(&self, upgrade: UpgradeId) -> bool {
        self.researched.contains(&upgrade)
    }

    pub fn template(&self, unit_type: UnitTypeId) -> Option<&UnitStats> {
        self.stats.get(&unit_type)
    }

    pub fn record_kill(&mut self, victim: UnitTypeId, building: bool) {
        if building {
            self.total_razings += 1;
        } else {
            self.total_kills += 1;
        }
        *self.unit_type_kills.entry(victim).or_insert(0) += 1;
    }
}
