//! Domain value types

mod conditions;
mod field;
mod nature;
mod element;
mod stats;
mod status;

pub use conditions::{Room, SideCondition, SideConditionState, Terrain, Timed, Weather};
pub use field::{ExpiredCondition, FieldConditions};
pub use nature::Nature;
pub use element::{Matchups, Type};
pub use stats::{Stat, StatBlock, StatStages};
pub use status::{Status, Volatile};
