use std::ops::{Index, IndexMut};

use strum::EnumCount;

/// Economic resources tracked per faction.
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
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum ResourceKind {
    Copper,
    Silver,
    Gold,
    Lumber,
    Stone,
}

/// One amount per [`ResourceKind`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resources([i32; ResourceKind::COUNT]);

impl Resources {
    pub const ZERO: Self = Self([0; ResourceKind::COUNT]);

    pub fn splat(amount: i32) -> Self {
        Self([amount; ResourceKind::COUNT])
    }

    pub fn with(mut self, kind: ResourceKind, amount: i32) -> Self {
        self.0[kind as usize] = amount;
        self
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&amount| amount == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, i32)> + '_ {
        use strum::IntoEnumIterator;
        ResourceKind::iter().map(|kind| (kind, self.0[kind as usize]))
    }

    /// Component-wise `self += other * factor`.
    pub fn add_scaled(&mut self, other: &Resources, factor: i32) {
        for (slot, amount) in self.0.iter_mut().zip(other.0.iter()) {
            *slot = slot.saturating_add(amount.saturating_mul(factor));
        }
    }

    /// Component-wise maximum.
    pub fn max_with(&mut self, other: &Resources) {
        for (slot, amount) in self.0.iter_mut().zip(other.0.iter()) {
            *slot = (*slot).max(*amount);
        }
    }

    /// True when every component of `self` covers `cost`.
    pub fn covers(&self, cost: &Resources) -> bool {
        self.0.iter().zip(cost.0.iter()).all(|(have, need)| have >= need)
    }
}

impl Index<ResourceKind> for Resources {
    type Output = i32;

    fn index(&self, kind: ResourceKind) -> &i32 {
        &self.0[kind as usize]
    }
}

impl IndexMut<ResourceKind> for Resources {
    fn index_mut(&mut self, kind: ResourceKind) -> &mut i32 {
        &mut self.0[kind as usize]
    }
}
