//! Field and side conditions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::element::Type;

/// Weather conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Weather {
    Sun,
    Rain,
    Sand,
    Snow,
}

impl Weather {
    /// Damage multiplier this weather applies to moves of `move_type`
    pub fn type_multiplier(&self, move_type: Type) -> f64 {
        match (self, move_type) {
            (Weather::Sun, Type::Fire) | (Weather::Rain, Type::Water) => 1.5,
            (Weather::Sun, Type::Water) | (Weather::Rain, Type::Fire) => 0.5,
            _ => 1.0,
        }
    }

    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Sun => "Sun",
            Weather::Rain => "Rain",
            Weather::Sand => "Sandstorm",
            Weather::Snow => "Snow",
        }
    }
}

impl std::fmt::Display for Weather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terrain conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Terrain {
    Electric,
    Grassy,
    Misty,
    Psychic,
}

impl Terrain {
    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Terrain::Electric => "Electric Terrain",
            Terrain::Grassy => "Grassy Terrain",
            Terrain::Misty => "Misty Terrain",
            Terrain::Psychic => "Psychic Terrain",
        }
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Room effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Room {
    /// Slower combatants move first within a priority tier
    TrickRoom,
    /// Held items have no effect
    MagicRoom,
    /// Defense and Sp. Def swap for damage
    WonderRoom,
}

impl Room {
    pub fn as_str(&self) -> &'static str {
        match self {
            Room::TrickRoom => "Trick Room",
            Room::MagicRoom => "Magic Room",
            Room::WonderRoom => "Wonder Room",
        }
    }
}

impl std::fmt::Display for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A field effect with the number of turns it has left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timed<T> {
    pub kind: T,
    pub turns_remaining: u8,
}

impl<T: Copy> Timed<T> {
    pub fn new(kind: T, turns: u8) -> Self {
        Self {
            kind,
            turns_remaining: turns,
        }
    }

    /// Count down one turn, returns true when the effect has run out
    pub fn tick(&mut self) -> bool {
        self.turns_remaining = self.turns_remaining.saturating_sub(1);
        self.turns_remaining == 0
    }
}

/// Side conditions (hazards, screens, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SideCondition {
    // Screens
    Reflect,
    LightScreen,

    // Entry hazards
    Spikes,      // Stackable 1-3
    ToxicSpikes, // Stackable 1-2
    StealthRock,

    // Other
    Tailwind,
}

impl SideCondition {
    pub const ALL: [SideCondition; 6] = [
        SideCondition::Reflect,
        SideCondition::LightScreen,
        SideCondition::Spikes,
        SideCondition::ToxicSpikes,
        SideCondition::StealthRock,
        SideCondition::Tailwind,
    ];

    /// Check if this condition is stackable
    pub fn is_stackable(&self) -> bool {
        matches!(self, SideCondition::Spikes | SideCondition::ToxicSpikes)
    }

    /// Get maximum layers for this condition
    pub fn max_layers(&self) -> u8 {
        match self {
            SideCondition::Spikes => 3,
            SideCondition::ToxicSpikes => 2,
            _ => 1,
        }
    }

    /// Check if this is a screen
    pub fn is_screen(&self) -> bool {
        matches!(self, SideCondition::Reflect | SideCondition::LightScreen)
    }

    /// Check if this is an entry hazard
    pub fn is_hazard(&self) -> bool {
        matches!(
            self,
            SideCondition::Spikes | SideCondition::ToxicSpikes | SideCondition::StealthRock
        )
    }

    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            SideCondition::Reflect => "Reflect",
            SideCondition::LightScreen => "Light Screen",
            SideCondition::Spikes => "Spikes",
            SideCondition::ToxicSpikes => "Toxic Spikes",
            SideCondition::StealthRock => "Stealth Rock",
            SideCondition::Tailwind => "Tailwind",
        }
    }
}

impl std::fmt::Display for SideCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State for a side condition
///
/// Hazards stack layers and never expire; screens and tailwind count down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SideConditionState {
    pub layers: u8,
    pub turns_remaining: Option<u8>,
}

impl SideConditionState {
    /// Create a new condition state with 1 layer
    pub fn new(duration: Option<u8>) -> Self {
        Self {
            layers: 1,
            turns_remaining: duration,
        }
    }

    /// Add a layer, returns true if successful
    pub fn add_layer(&mut self, condition: SideCondition) -> bool {
        if self.layers < condition.max_layers() {
            self.layers += 1;
            true
        } else {
            false
        }
    }

    /// Count down one turn, returns true when the condition has run out
    pub fn tick(&mut self) -> bool {
        match self.turns_remaining.as_mut() {
            Some(turns) => {
                *turns = turns.saturating_sub(1);
                *turns == 0
            }
            None => false,
        }
    }
}
