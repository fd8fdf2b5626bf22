//! Errors for invalid construction input

use thiserror::Error;

use crate::state::SlotId;
use crate::types::Stat;

/// Construction-time invariant violations.
///
/// These signal a programming or content-authoring mistake. Expected battle
/// outcomes (immunity, capped stages, empty switch pools) are ordinary return
/// values and never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BattleError {
    #[error("Level {0} is outside 1..=100")]
    InvalidLevel(u8),

    #[error("Base stat {0} is outside 0..=255")]
    InvalidBaseStat(u32),

    #[error("IV {0} is outside 0..=31")]
    InvalidIv(u8),

    #[error("EV {0} is outside 0..=252")]
    InvalidEv(u16),

    #[error("{0} has no stat stage")]
    NoStage(Stat),

    #[error("{species} cannot learn {move_name}")]
    MoveNotLearnable { species: String, move_name: String },

    #[error("{species} cannot have ability {ability}")]
    AbilityNotAllowed { species: String, ability: String },

    #[error("A combatant needs 1 to 4 moves, got {0}")]
    InvalidMoveCount(usize),

    #[error("Party is empty")]
    EmptyParty,

    #[error("Party of {size} exceeds the maximum of {max}")]
    PartyTooLarge { size: usize, max: usize },

    #[error("Every party member has fainted")]
    AllFainted,

    #[error("No slot at {0}")]
    InvalidSlot(SlotId),

    #[error("Invalid rules: {0}")]
    InvalidRules(String),

    #[error("Unknown type: {0}")]
    UnknownType(String),
}
