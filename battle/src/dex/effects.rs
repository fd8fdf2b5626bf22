//! Closed effect catalogs for moves, abilities and items
//!
//! Effects are plain tagged variants matched exhaustively wherever they are
//! applied, so a new variant fails to compile until every consumer handles it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{Room, SideCondition, Stat, Status, Terrain, Type, Volatile, Weather};

/// Who a move effect lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EffectTarget {
    User,
    Target,
}

/// Secondary and primary effects of a move
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveEffect {
    /// Change a stat stage; `chance` is a percentage
    StatChange {
        target: EffectTarget,
        stat: Stat,
        stages: i8,
        chance: u8,
    },
    /// Inflict a persistent status on the target
    InflictStatus { status: Status, chance: u8 },
    /// Add a volatile condition (flinch, confusion, protect, focus energy)
    AddVolatile {
        target: EffectTarget,
        volatile: Volatile,
        chance: u8,
    },
    /// User recovers this percentage of the damage dealt
    Drain { percent: u8 },
    /// User loses this percentage of the damage dealt
    Recoil { percent: u8 },
    /// User recovers this percentage of its max HP
    Heal { percent: u8 },
    SetWeather(Weather),
    SetTerrain(Terrain),
    ToggleRoom(Room),
    /// Place a side condition on the user's side or the target's side
    SetSideCondition {
        condition: SideCondition,
        side: EffectTarget,
    },
    /// +1 critical-hit stage for this move
    HighCritRatio,
}

impl MoveEffect {
    /// Percentage chance the effect fires (100 when unconditional)
    pub fn chance(&self) -> u8 {
        match self {
            MoveEffect::StatChange { chance, .. }
            | MoveEffect::InflictStatus { chance, .. }
            | MoveEffect::AddVolatile { chance, .. } => *chance,
            _ => 100,
        }
    }
}

/// Battle events passive effects can listen to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Trigger {
    OnSwitchIn,
    OnSwitchOut,
    OnTurnEnd,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::OnSwitchIn => "switch-in",
            Trigger::OnSwitchOut => "switch-out",
            Trigger::OnTurnEnd => "turn-end",
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Passive effects carried by abilities and held items
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PassiveEffect {
    /// Continuous stat multiplier (Choice Band, Choice Scarf, Assault Vest)
    StatMultiplier { stat: Stat, factor: f64 },
    /// Boost moves of a type while at or below 1/3 HP (Blaze, Torrent)
    LowHpTypeBoost { move_type: Type, factor: f64 },
    /// Boost moves of a type unconditionally (Charcoal, Mystic Water)
    TypeDamageBoost { move_type: Type, factor: f64 },
    /// Boost super-effective moves (Expert Belt)
    SuperEffectiveBoost { factor: f64 },
    /// Scale damage taken from moves of a type (Thick Fat, Heatproof)
    TypeDamageReduction { move_type: Type, factor: f64 },
    /// Scale damage taken from super-effective moves (Filter, Solid Rock)
    SuperEffectiveReduction { factor: f64 },
    /// Lower each foe's stat on entry (Intimidate)
    LowerFoeStatOnEntry { stat: Stat, stages: i8 },
    /// Start weather on entry (Drizzle, Drought)
    WeatherOnEntry(Weather),
    /// Recover 1/`denominator` of max HP at turn end (Leftovers)
    HealAtTurnEnd { denominator: u32 },
    /// Raise a stat at turn end (Speed Boost)
    BoostAtTurnEnd { stat: Stat, stages: i8 },
    /// Cure persistent status when leaving the field (Natural Cure)
    CureStatusOnSwitchOut,
}

impl PassiveEffect {
    /// The trigger this effect listens to, if it is event-driven
    pub fn trigger(&self) -> Option<Trigger> {
        match self {
            PassiveEffect::LowerFoeStatOnEntry { .. } | PassiveEffect::WeatherOnEntry(_) => {
                Some(Trigger::OnSwitchIn)
            }
            PassiveEffect::HealAtTurnEnd { .. } | PassiveEffect::BoostAtTurnEnd { .. } => {
                Some(Trigger::OnTurnEnd)
            }
            PassiveEffect::CureStatusOnSwitchOut => Some(Trigger::OnSwitchOut),
            PassiveEffect::StatMultiplier { .. }
            | PassiveEffect::LowHpTypeBoost { .. }
            | PassiveEffect::TypeDamageBoost { .. }
            | PassiveEffect::SuperEffectiveBoost { .. }
            | PassiveEffect::TypeDamageReduction { .. }
            | PassiveEffect::SuperEffectiveReduction { .. } => None,
        }
    }
}
