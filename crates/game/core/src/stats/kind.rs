//! Attribute kinds.
//!
//! Every kind maps to a stable small integer (its discriminant), which is the
//! index into an [`AttributeVector`](super::AttributeVector). The order is part
//! of the replicated state layout and must not change between peers.

/// Identifies one numeric capability of a unit.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumCount,
    strum::EnumIter,
    strum::FromRepr,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum AttributeKind {
    HitPoints,
    Mana,
    Shield,
    ShieldPermeability,
    Armor,
    BasicDamage,
    PiercingDamage,
    SightRange,
    DaySightRangeBonus,
    NightSightRangeBonus,
    AttackRange,
    ReactionRange,
    Speed,
    Supply,
    Priority,
    Points,
    Experience,
    Level,
    XpRequired,
    Kills,
    UnholyArmor,
    Terror,
    Raiding,
    Mugging,
    KnowledgeMagic,
    KnowledgeMining,
    CopperGatheringBonus,
    SilverGatheringBonus,
    GoldGatheringBonus,
    TradeCost,
}

impl AttributeKind {
    /// Index into an attribute vector.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Mana-like attributes never auto-fill: positive modifier deltas raise
    /// only the ceiling.
    #[inline]
    pub const fn is_mana_like(self) -> bool {
        matches!(self, Self::Mana)
    }

    /// Changes to these kinds move the unit's vision footprint.
    #[inline]
    pub const fn affects_vision(self) -> bool {
        matches!(
            self,
            Self::SightRange
                | Self::DaySightRangeBonus
                | Self::NightSightRangeBonus
                | Self::AttackRange
        )
    }

    /// Changes to these kinds invalidate the experience requirement.
    #[inline]
    pub const fn affects_level_curve(self) -> bool {
        matches!(self, Self::Experience | Self::Level)
    }

    /// Gathering bonuses raised by mining knowledge.
    pub const GATHERING_BONUSES: [AttributeKind; 3] = [
        Self::CopperGatheringBonus,
        Self::SilverGatheringBonus,
        Self::GoldGatheringBonus,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn indices_are_dense_and_stable() {
        for (i, kind) in AttributeKind::iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(AttributeKind::from_repr(i as u8), Some(kind));
        }
        assert_eq!(AttributeKind::COUNT, 30);
    }

    #[test]
    fn parses_snake_case_names() {
        assert_eq!(
            AttributeKind::from_str("sight_range"),
            Ok(AttributeKind::SightRange)
        );
        assert_eq!(
            AttributeKind::from_str("HIT_POINTS"),
            Ok(AttributeKind::HitPoints)
        );
        assert_eq!(AttributeKind::UnholyArmor.as_ref(), "unholy_armor");
    }
}
