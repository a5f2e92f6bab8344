//! Unit statistics.
//!
//! - [`AttributeKind`] names each numeric capability and fixes its index
//! - [`Attribute`] holds value, ceiling, regeneration and enabled flag
//! - [`AttributeVector`] is the fixed table used for templates and instances
//! - [`UnitStats`] is the per-(unit type, faction) template, including economy
//! - [`percent`] provides percentage scaling with an exact inverse
mod attribute;
mod kind;
pub mod percent;
mod resources;
mod vector;

pub use attribute::{Attribute, AttributeVariant};
pub use kind::AttributeKind;
pub use resources::{ResourceKind, Resources};
pub use vector::AttributeVector;

/// Template stats of one unit type for one faction.
///
/// Seeded from the unit type defaults when the faction is granted the type,
/// then changed only by upgrade research. New instances copy `attributes`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitStats {
    pub attributes: AttributeVector,
    pub costs: Resources,
    /// Storage capacity each completed unit adds.
    pub storing: Resources,
    /// Income this unit type raises its owner to (per resource maximum).
    pub improve_income: Resources,
    /// Supply consumed per unit.
    pub demand: i32,
}
