//! Natures

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::stats::Stat;

/// The 25 natures; each raises one stat by 10% and lowers another by 10%
/// (the five where both are the same stat are neutral)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

// Row = raised stat, column = lowered stat, both in Atk/Def/Spe/SpA/SpD order.
const NATURE_GRID_STATS: [Stat; 5] = [
    Stat::Attack,
    Stat::Defense,
    Stat::Speed,
    Stat::SpAttack,
    Stat::SpDefense,
];

impl Nature {
    pub const ALL: [Nature; 25] = [
        Nature::Hardy,
        Nature::Lonely,
        Nature::Brave,
        Nature::Adamant,
        Nature::Naughty,
        Nature::Bold,
        Nature::Docile,
        Nature::Relaxed,
        Nature::Impish,
        Nature::Lax,
        Nature::Timid,
        Nature::Hasty,
        Nature::Serious,
        Nature::Jolly,
        Nature::Naive,
        Nature::Modest,
        Nature::Mild,
        Nature::Quiet,
        Nature::Bashful,
        Nature::Rash,
        Nature::Calm,
        Nature::Gentle,
        Nature::Sassy,
        Nature::Careful,
        Nature::Quirky,
    ];

    fn grid_position(&self) -> (usize, usize) {
        let index = *self as usize;
        (index / 5, index % 5)
    }

    /// Stat raised by this nature (None when neutral)
    pub fn increased(&self) -> Option<Stat> {
        let (up, down) = self.grid_position();
        (up != down).then_some(NATURE_GRID_STATS[up])
    }

    /// Stat lowered by this nature (None when neutral)
    pub fn decreased(&self) -> Option<Stat> {
        let (up, down) = self.grid_position();
        (up != down).then_some(NATURE_GRID_STATS[down])
    }

    pub fn is_neutral(&self) -> bool {
        self.increased().is_none()
    }

    /// Apply the nature to a computed stat, truncating toward zero
    pub fn apply(&self, stat: Stat, value: u32) -> u32 {
        if self.increased() == Some(stat) {
            value * 11 / 10
        } else if self.decreased() == Some(stat) {
            value * 9 / 10
        } else {
            value
        }
    }
}

impl std::fmt::Display for Nature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
