mod common;
mod faction;
mod unit;

pub use common::{
    FactionId, MapDimensions, Position, Tick, TimeOfDay, UnitId, UnitTypeId, UpgradeId,
};
pub use faction::{FactionKind, FactionState, HelpCry};
pub use unit::{UnitOrder, UnitState, UnitStatus};
