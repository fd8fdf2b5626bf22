//! Battle rules configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FIELD_DURATION, MAX_PARTY_SIZE, MAX_SLOTS_PER_SIDE};
use crate::error::BattleError;

/// Rules shared by both sides of a battle
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BattleRules {
    /// Active slots per side (1 singles, 2 doubles, 3 triples)
    pub slots_per_side: usize,

    /// Largest legal party
    pub max_party_size: usize,

    /// Battle ends in a draw after this many turns
    pub turn_limit: Option<u32>,

    /// Turns weather, terrain and rooms last when started without an explicit duration
    pub field_duration: u8,
}

impl BattleRules {
    pub fn singles() -> Self {
        Self {
            slots_per_side: 1,
            max_party_size: MAX_PARTY_SIZE,
            turn_limit: None,
            field_duration: DEFAULT_FIELD_DURATION,
        }
    }

    pub fn doubles() -> Self {
        Self {
            slots_per_side: 2,
            ..Self::singles()
        }
    }

    pub fn with_turn_limit(mut self, turns: u32) -> Self {
        self.turn_limit = Some(turns);
        self
    }

    /// Reject configurations no battle can be built from
    pub fn validate(&self) -> Result<(), BattleError> {
        if self.slots_per_side == 0 || self.slots_per_side > MAX_SLOTS_PER_SIDE {
            return Err(BattleError::InvalidRules(format!(
                "{} slots per side (expected 1..={MAX_SLOTS_PER_SIDE})",
                self.slots_per_side
            )));
        }
        if self.max_party_size == 0 || self.max_party_size > MAX_PARTY_SIZE {
            return Err(BattleError::InvalidRules(format!(
                "party size {} (expected 1..={MAX_PARTY_SIZE})",
                self.max_party_size
            )));
        }
        if self.field_duration == 0 {
            return Err(BattleError::InvalidRules("zero field duration".to_string()));
        }
        Ok(())
    }
}

impl Default for BattleRules {
    fn default() -> Self {
        Self::singles()
    }
}
