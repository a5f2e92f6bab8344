use strum::EnumCount;

use super::{Attribute, AttributeKind, AttributeVariant};

/// Fixed-size table of attributes keyed by [`AttributeKind`].
///
/// Used both as a per-(unit type, faction) template and as a per-unit
/// instance. Every setter re-establishes the range invariant before returning.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeVector([Attribute; AttributeKind::COUNT]);

impl AttributeVector {
    pub fn new() -> Self {
        Self([Attribute::ZERO; AttributeKind::COUNT])
    }

    /// Builder-style helper for unit type defaults.
    pub fn with(mut self, kind: AttributeKind, value: i32, max: i32) -> Self {
        self.0[kind.index()] = Attribute::new(value, max);
        self
    }

    /// Builder-style helper for an unbounded attribute (`max == 0`).
    pub fn with_value(self, kind: AttributeKind, value: i32) -> Self {
        self.with(kind, value, 0)
    }

    pub fn with_increase(mut self, kind: AttributeKind, increase: i32) -> Self {
        self.0[kind.index()].increase = increase;
        self.0[kind.index()].enabled = true;
        self
    }

    #[inline]
    pub fn get(&self, kind: AttributeKind) -> &Attribute {
        &self.0[kind.index()]
    }

    #[inline]
    pub fn value(&self, kind: AttributeKind) -> i32 {
        self.0[kind.index()].value
    }

    #[inline]
    pub fn max(&self, kind: AttributeKind) -> i32 {
        self.0[kind.index()].max
    }

    pub fn variant(&self, kind: AttributeKind, variant: AttributeVariant) -> i32 {
        self.0[kind.index()].variant(variant)
    }

    pub fn set_value(&mut self, kind: AttributeKind, value: i32) {
        self.update(kind, |a| a.value = value);
    }

    pub fn set_max(&mut self, kind: AttributeKind, max: i32) {
        self.update(kind, |a| a.max = max);
    }

    pub fn set_increase(&mut self, kind: AttributeKind, increase: i32) {
        self.update(kind, |a| a.increase = increase);
    }

    pub fn add_value(&mut self, kind: AttributeKind, delta: i32) {
        self.update(kind, |a| a.value = a.value.saturating_add(delta));
    }

    /// Adds to both value and max (score-like counters).
    pub fn add_value_and_max(&mut self, kind: AttributeKind, delta: i32) {
        self.update(kind, |a| {
            a.value = a.value.saturating_add(delta);
            a.max = a.max.saturating_add(delta);
        });
    }

    pub fn clamp(&mut self, kind: AttributeKind) {
        self.0[kind.index()].clamp();
    }

    /// Runs `f` on one attribute and clamps the result.
    pub fn update(&mut self, kind: AttributeKind, f: impl FnOnce(&mut Attribute)) {
        let attribute = &mut self.0[kind.index()];
        f(attribute);
        attribute.enabled = true;
        attribute.clamp();
    }

    /// Overwrites one attribute without clamping. Callers must clamp.
    pub(crate) fn replace(&mut self, kind: AttributeKind, attribute: Attribute) {
        self.0[kind.index()] = attribute;
    }

    /// Moves every attribute by the difference between two templates.
    ///
    /// Used when a unit changes type or owner: whatever the unit gained on
    /// top of the old template carries over to the new one.
    pub(crate) fn rebase(&mut self, from: &AttributeVector, to: &AttributeVector) {
        for ((attribute, old), new) in self.0.iter_mut().zip(from.0.iter()).zip(to.0.iter()) {
            if old == new {
                continue;
            }
            attribute.value = attribute.value.saturating_add(new.value - old.value);
            attribute.max = attribute.max.saturating_add(new.max - old.max);
            attribute.increase = attribute.increase.saturating_add(new.increase - old.increase);
            attribute.enabled |= new.enabled;
            attribute.clamp();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKind, &Attribute)> {
        self.0.iter().enumerate().filter_map(|(i, attribute)| {
            AttributeKind::from_repr(i as u8).map(|kind| (kind, attribute))
        })
    }

    /// Applies one round of `increase` to every enabled attribute.
    ///
    /// Returns true when any value changed.
    pub fn regenerate(&mut self) -> bool {
        let mut changed = false;
        for attribute in self.0.iter_mut() {
            if !attribute.enabled || attribute.increase == 0 {
                continue;
            }
            let before = attribute.value;
            attribute.value = attribute.value.saturating_add(attribute.increase);
            attribute.clamp();
            changed |= attribute.value != before;
        }
        changed
    }

    /// True when every attribute satisfies its range invariant.
    pub fn is_consistent(&self) -> bool {
        self.0.iter().all(Attribute::is_in_range)
    }
}

impl Default for AttributeVector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_clamp_value() {
        let mut vector = AttributeVector::new().with(AttributeKind::HitPoints, 50, 60);
        vector.set_value(AttributeKind::HitPoints, 80);
        assert_eq!(vector.value(AttributeKind::HitPoints), 60);

        vector.set_max(AttributeKind::HitPoints, 40);
        assert_eq!(vector.value(AttributeKind::HitPoints), 40);

        vector.add_value(AttributeKind::HitPoints, -100);
        assert_eq!(vector.value(AttributeKind::HitPoints), 0);
        assert!(vector.is_consistent());
    }

    #[test]
    fn regenerate_only_touches_enabled_increasing_attributes() {
        let mut vector = AttributeVector::new()
            .with(AttributeKind::HitPoints, 10, 12)
            .with_increase(AttributeKind::HitPoints, 5)
            .with(AttributeKind::Mana, 3, 10);

        assert!(vector.regenerate());
        assert_eq!(vector.value(AttributeKind::HitPoints), 12);
        assert_eq!(vector.value(AttributeKind::Mana), 3);

        assert!(!vector.regenerate());
    }

    #[test]
    fn iter_yields_every_kind_in_order() {
        let vector = AttributeVector::new();
        let kinds: Vec<_> = vector.iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds.len(), AttributeKind::COUNT);
        assert_eq!(kinds[0], AttributeKind::HitPoints);
        assert_eq!(kinds[AttributeKind::COUNT - 1], AttributeKind::TradeCost);
    }
}
