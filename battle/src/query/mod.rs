//! Type matchup queries used by the damage pipeline and AI heuristics

mod matchup;

pub use matchup::{
    effectiveness, is_immune, is_not_very_effective, is_super_effective, stab_multiplier,
};
