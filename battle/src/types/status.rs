//! Status conditions (volatile and non-volatile)

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::element::Type;

/// Non-volatile status conditions (persist through switching)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    Burn,
    Freeze,
    Paralysis,
    Poison,
    BadPoison, // Toxic
    Sleep,
}

impl Status {
    /// Whether a combatant of the given types can never receive this status
    pub fn is_immune(&self, types: &[Type]) -> bool {
        let has = |t: Type| types.contains(&t);
        match self {
            Status::Burn => has(Type::Fire),
            Status::Freeze => has(Type::Ice),
            Status::Paralysis => has(Type::Electric),
            Status::Poison | Status::BadPoison => has(Type::Poison) || has(Type::Steel),
            Status::Sleep => false,
        }
    }

    /// Whether this status prevents acting outright
    pub fn blocks_action(&self) -> bool {
        matches!(self, Status::Sleep | Status::Freeze)
    }

    /// Short tag used in battle summaries
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Status::Burn => "brn",
            Status::Freeze => "frz",
            Status::Paralysis => "par",
            Status::Poison => "psn",
            Status::BadPoison => "tox",
            Status::Sleep => "slp",
        }
    }

    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Burn => "Burn",
            Status::Freeze => "Freeze",
            Status::Paralysis => "Paralysis",
            Status::Poison => "Poison",
            Status::BadPoison => "Toxic",
            Status::Sleep => "Sleep",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Volatile status conditions (cleared on switching)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Volatile {
    /// Skips the next move this turn
    Flinch,
    /// May hit itself instead of moving
    Confusion,
    /// +2 critical-hit stage
    FocusEnergy,
    /// Blocks incoming moves for the rest of the turn
    Protect,
}

impl Volatile {
    /// Volatiles that only last until the end of the turn they were set
    pub fn expires_at_turn_end(&self) -> bool {
        matches!(self, Volatile::Flinch | Volatile::Protect)
    }

    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Volatile::Flinch => "Flinch",
            Volatile::Confusion => "Confusion",
            Volatile::FocusEnergy => "Focus Energy",
            Volatile::Protect => "Protect",
        }
    }
}

impl std::fmt::Display for Volatile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
