//! Engine error types

use clash_battle::{BattleError, BattleOutcome, SlotId};
use thiserror::Error;

/// Errors raised by the engine
///
/// Everything here is a caller or content mistake. A move that misses or an
/// action whose user already fainted is an ordinary outcome, not an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error("Invalid decision for {slot}: {reason}")]
    InvalidDecision { slot: SlotId, reason: String },

    #[error("Cannot insert a step at {position} into a pipeline of {len} steps")]
    StepOutOfRange { position: usize, len: usize },

    #[error("Random override {0} is outside 0.0..=1.0")]
    RandomOutOfRange(f64),

    #[error("Battle already ended: {0}")]
    BattleOver(BattleOutcome),
}
