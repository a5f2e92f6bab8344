use crate::state::Tick;

/// Where kill experience comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ExperienceSource {
    /// The victim's fixed point value.
    #[default]
    Points,
    /// The victim's hit point ceiling.
    HitPoints,
}

/// Game configuration constants and tunable parameters.
///
/// Every participant of a session must run with an identical configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Simulation ticks per simulated second.
    pub cycles_per_second: u32,
    /// Kill experience source.
    pub experience_source: ExperienceSource,
    /// Grant the attacker one experience point per point of damage dealt.
    pub experience_per_damage: bool,
    /// Structures nearly destroyed by a repair-capable enemy change sides.
    pub building_capture: bool,
    /// Radius searched for a destroyer when damage has no attacker.
    pub destroyer_search_radius: i32,
    /// Radius within which allies share kill and damage experience.
    pub experience_share_radius: i32,
    /// Half-size of the area within which repeated "under attack" cries are muted.
    pub help_cry_area: i32,
    /// Tiles a fleeing unit runs away from its attacker.
    pub flee_distance: i32,
    /// Ticks a retaliating unit stays on its new aggressive target.
    pub retaliation_threshold: u32,
    /// HP percentage at or below which a unit with an inventory asks for a healing item.
    pub healing_threshold_percent: i32,
    /// HP percentage at or below which a damaged structure starts burning.
    pub burning_threshold_percent: i32,
    /// Experience needed per level step; the requirement grows triangularly.
    pub experience_step: i32,
    /// Base income per resource for every faction.
    pub default_income: i32,
    /// Trade cost when no unit of the faction lowers it.
    pub default_trade_cost: i32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of units a container can carry.
    pub const MAX_CONTENTS: usize = 16;

    // ===== fixed timing rules (in simulated seconds) =====
    pub const NOTIFY_COOLDOWN_SECONDS: u64 = 2;
    pub const HELP_CRY_SECONDS: u64 = 120;
    pub const AI_HELP_SECONDS: u64 = 120;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CYCLES_PER_SECOND: u32 = 30;
    pub const DEFAULT_DESTROYER_SEARCH_RADIUS: i32 = 6;
    pub const DEFAULT_EXPERIENCE_SHARE_RADIUS: i32 = 6;
    pub const DEFAULT_HELP_CRY_AREA: i32 = 14;
    pub const DEFAULT_FLEE_DISTANCE: i32 = 5;
    pub const DEFAULT_RETALIATION_THRESHOLD: u32 = 30;
    pub const DEFAULT_HEALING_THRESHOLD_PERCENT: i32 = 40;
    pub const DEFAULT_BURNING_THRESHOLD_PERCENT: i32 = 75;
    pub const DEFAULT_EXPERIENCE_STEP: i32 = 100;
    pub const DEFAULT_INCOME: i32 = 100;
    pub const DEFAULT_TRADE_COST: i32 = 30;

    pub fn new() -> Self {
        Self {
            cycles_per_second: Self::DEFAULT_CYCLES_PER_SECOND,
            experience_source: ExperienceSource::Points,
            experience_per_damage: false,
            building_capture: false,
            destroyer_search_radius: Self::DEFAULT_DESTROYER_SEARCH_RADIUS,
            experience_share_radius: Self::DEFAULT_EXPERIENCE_SHARE_RADIUS,
            help_cry_area: Self::DEFAULT_HELP_CRY_AREA,
            flee_distance: Self::DEFAULT_FLEE_DISTANCE,
            retaliation_threshold: Self::DEFAULT_RETALIATION_THRESHOLD,
            healing_threshold_percent: Self::DEFAULT_HEALING_THRESHOLD_PERCENT,
            burning_threshold_percent: Self::DEFAULT_BURNING_THRESHOLD_PERCENT,
            experience_step: Self::DEFAULT_EXPERIENCE_STEP,
            default_income: Self::DEFAULT_INCOME,
            default_trade_cost: Self::DEFAULT_TRADE_COST,
        }
    }

    pub fn with_building_capture(mut self, enabled: bool) -> Self {
        self.building_capture = enabled;
        self
    }

    pub fn with_experience_per_damage(mut self, enabled: bool) -> Self {
        self.experience_per_damage = enabled;
        self
    }

    pub fn with_experience_source(mut self, source: ExperienceSource) -> Self {
        self.experience_source = source;
        self
    }

    /// Converts simulated seconds to ticks.
    pub fn seconds(&self, seconds: u64) -> u64 {
        seconds * u64::from(self.cycles_per_second)
    }

    /// Returns true when the tick falls on a simulated-second boundary.
    pub fn is_second_boundary(&self, tick: Tick) -> bool {
        self.cycles_per_second != 0 && tick.0 % u64::from(self.cycles_per_second) == 0
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
