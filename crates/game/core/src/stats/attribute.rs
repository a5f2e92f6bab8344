/// Selects one field of an [`Attribute`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttributeVariant {
    Value,
    Max,
    Increase,
}

/// A single numeric capability.
///
/// When `max > 0`, `0 <= value <= max` holds after every mutation that goes
/// through [`AttributeVector`](super::AttributeVector). A zero `max` means the
/// attribute is unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub(crate) value: i32,
    pub(crate) max: i32,
    pub(crate) increase: i32,
    pub(crate) enabled: bool,
}

impl Attribute {
    pub const ZERO: Self = Self {
        value: 0,
        max: 0,
        increase: 0,
        enabled: false,
    };

    /// Creates an enabled attribute; the value is clamped into range.
    pub fn new(value: i32, max: i32) -> Self {
        let mut attribute = Self {
            value,
            max,
            increase: 0,
            enabled: true,
        };
        attribute.clamp();
        attribute
    }

    pub fn with_increase(mut self, increase: i32) -> Self {
        self.increase = increase;
        self
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn increase(&self) -> i32 {
        self.increase
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn variant(&self, variant: AttributeVariant) -> i32 {
        match variant {
            AttributeVariant::Value => self.value,
            AttributeVariant::Max => self.max,
            AttributeVariant::Increase => self.increase,
        }
    }

    /// Floors `max` at zero, then bounds `value` when a ceiling exists.
    pub(crate) fn clamp(&mut self) {
        self.max = self.max.max(0);
        if self.max > 0 {
            self.value = self.value.clamp(0, self.max);
        }
    }

    /// True when the range invariant holds.
    pub fn is_in_range(&self) -> bool {
        self.max >= 0 && (self.max == 0 || (0..=self.max).contains(&self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_value_to_max() {
        let attribute = Attribute::new(120, 100);
        assert_eq!(attribute.value(), 100);
        assert!(attribute.enabled());
    }

    #[test]
    fn zero_max_is_unbounded() {
        let mut attribute = Attribute::new(-5, 0);
        attribute.clamp();
        assert_eq!(attribute.value(), -5);
        assert!(attribute.is_in_range());
    }

    #[test]
    fn negative_max_is_floored() {
        let mut attribute = Attribute {
            value: 4,
            max: -3,
            increase: 0,
            enabled: true,
        };
        attribute.clamp();
        assert_eq!(attribute.max(), 0);
        assert_eq!(attribute.value(), 4);
    }
}
