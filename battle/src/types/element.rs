//! Elemental types and how they match up

use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::BattleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

/// What one attacking type does to each defending type
///
/// Anything not listed takes neutral damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matchups {
    pub super_effective: &'static [Type],
    pub resisted_by: &'static [Type],
    pub no_effect_on: &'static [Type],
}

impl Type {
    pub const ALL: [Type; 18] = [
        Type::Normal,
        Type::Fire,
        Type::Water,
        Type::Electric,
        Type::Grass,
        Type::Ice,
        Type::Fighting,
        Type::Poison,
        Type::Ground,
        Type::Flying,
        Type::Psychic,
        Type::Bug,
        Type::Rock,
        Type::Ghost,
        Type::Dragon,
        Type::Dark,
        Type::Steel,
        Type::Fairy,
    ];

    pub fn all() -> &'static [Type] {
        &Self::ALL
    }

    /// Offensive matchups of this type
    pub fn matchups(&self) -> Matchups {
        use Type::*;
        let lists: (&[Type], &[Type], &[Type]) = match self {
            Normal => (&[], &[Rock, Steel], &[Ghost]),
            Fire => (&[Grass, Ice, Bug, Steel], &[Fire, Water, Rock, Dragon], &[]),
            Water => (&[Fire, Ground, Rock], &[Water, Grass, Dragon], &[]),
            Electric => (&[Water, Flying], &[Electric, Grass, Dragon], &[Ground]),
            Grass => (
                &[Water, Ground, Rock],
                &[Fire, Grass, Poison, Flying, Bug, Dragon, Steel],
                &[],
            ),
            Ice => (&[Grass, Ground, Flying, Dragon], &[Fire, Water, Ice, Steel], &[]),
            Fighting => (
                &[Normal, Ice, Rock, Dark, Steel],
                &[Poison, Flying, Psychic, Bug, Fairy],
                &[Ghost],
            ),
            Poison => (&[Grass, Fairy], &[Poison, Ground, Rock, Ghost], &[Steel]),
            Ground => (&[Fire, Electric, Poison, Rock, Steel], &[Grass, Bug], &[Flying]),
            Flying => (&[Grass, Fighting, Bug], &[Electric, Rock, Steel], &[]),
            Psychic => (&[Fighting, Poison], &[Psychic, Steel], &[Dark]),
            Bug => (
                &[Grass, Psychic, Dark],
                &[Fire, Fighting, Poison, Flying, Ghost, Steel, Fairy],
                &[],
            ),
            Rock => (&[Fire, Ice, Flying, Bug], &[Fighting, Ground, Steel], &[]),
            Ghost => (&[Psychic, Ghost], &[Dark], &[Normal]),
            Dragon => (&[Dragon], &[Steel], &[Fairy]),
            Dark => (&[Psychic, Ghost], &[Fighting, Dark, Fairy], &[]),
            Steel => (&[Ice, Rock, Fairy], &[Fire, Water, Electric, Steel], &[]),
            Fairy => (&[Fighting, Dragon, Dark], &[Fire, Poison, Steel], &[]),
        };
        let (super_effective, resisted_by, no_effect_on) = lists;
        Matchups {
            super_effective,
            resisted_by,
            no_effect_on,
        }
    }

    /// Multiplier against a single defending type: 0, 0.5, 1 or 2
    pub fn effectiveness(&self, defender: Type) -> f64 {
        let m = self.matchups();
        if m.no_effect_on.contains(&defender) {
            0.0
        } else if m.resisted_by.contains(&defender) {
            0.5
        } else if m.super_effective.contains(&defender) {
            2.0
        } else {
            1.0
        }
    }

    /// Product of the multipliers against every defending type
    pub fn effectiveness_multi(&self, defenders: &[Type]) -> f64 {
        defenders
            .iter()
            .map(|t| self.effectiveness(*t))
            .product()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Type::Normal => "Normal",
            Type::Fire => "Fire",
            Type::Water => "Water",
            Type::Electric => "Electric",
            Type::Grass => "Grass",
            Type::Ice => "Ice",
            Type::Fighting => "Fighting",
            Type::Poison => "Poison",
            Type::Ground => "Ground",
            Type::Flying => "Flying",
            Type::Psychic => "Psychic",
            Type::Bug => "Bug",
            Type::Rock => "Rock",
            Type::Ghost => "Ghost",
            Type::Dragon => "Dragon",
            Type::Dark => "Dark",
            Type::Steel => "Steel",
            Type::Fairy => "Fairy",
        }
    }
}

impl FromStr for Type {
    type Err = BattleError;

    /// Case-insensitive type name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Type::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| BattleError::UnknownType(s.to_string()))
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
