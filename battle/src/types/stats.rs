//! Stats, stat stages and computed stat blocks

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_STAGE, MIN_STAGE};
use crate::error::BattleError;

/// A combatant statistic
///
/// The six permanent stats come first; accuracy and evasion only exist as
/// stages and have no underlying value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl Stat {
    /// The six stats with a computed value
    pub const PERMANENT: [Stat; 6] = [
        Stat::Hp,
        Stat::Attack,
        Stat::Defense,
        Stat::SpAttack,
        Stat::SpDefense,
        Stat::Speed,
    ];

    /// Whether stages use the 3-based accuracy table
    pub fn is_accuracy_like(&self) -> bool {
        matches!(self, Stat::Accuracy | Stat::Evasion)
    }

    /// Short display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Attack => "Attack",
            Stat::Defense => "Defense",
            Stat::SpAttack => "Sp. Atk",
            Stat::SpDefense => "Sp. Def",
            Stat::Speed => "Speed",
            Stat::Accuracy => "accuracy",
            Stat::Evasion => "evasiveness",
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stat stages (-6 to +6)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatStages {
    pub atk: i8,
    pub def: i8,
    pub spa: i8,
    pub spd: i8,
    pub spe: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatStages {
    /// Create new stat stages (all at 0)
    pub fn new() -> Self {
        Self::default()
    }

    /// Get stage for a stat (HP has no stage and always reads 0)
    pub fn get(&self, stat: Stat) -> i8 {
        match stat {
            Stat::Hp => 0,
            Stat::Attack => self.atk,
            Stat::Defense => self.def,
            Stat::SpAttack => self.spa,
            Stat::SpDefense => self.spd,
            Stat::Speed => self.spe,
            Stat::Accuracy => self.accuracy,
            Stat::Evasion => self.evasion,
        }
    }

    fn slot_mut(&mut self, stat: Stat) -> Result<&mut i8, BattleError> {
        match stat {
            Stat::Hp => Err(BattleError::NoStage(stat)),
            Stat::Attack => Ok(&mut self.atk),
            Stat::Defense => Ok(&mut self.def),
            Stat::SpAttack => Ok(&mut self.spa),
            Stat::SpDefense => Ok(&mut self.spd),
            Stat::Speed => Ok(&mut self.spe),
            Stat::Accuracy => Ok(&mut self.accuracy),
            Stat::Evasion => Ok(&mut self.evasion),
        }
    }

    /// Set stage for a stat (clamped to -6..+6)
    pub fn set(&mut self, stat: Stat, value: i8) -> Result<(), BattleError> {
        *self.slot_mut(stat)? = value.clamp(MIN_STAGE, MAX_STAGE);
        Ok(())
    }

    /// Apply a boost to a stat, returns actual change applied
    ///
    /// The delta is widened before clamping so any magnitude is safe.
    pub fn boost(&mut self, stat: Stat, amount: i32) -> Result<i8, BattleError> {
        let slot = self.slot_mut(stat)?;
        let current = *slot;
        let new_value = (current as i32 + amount).clamp(MIN_STAGE as i32, MAX_STAGE as i32) as i8;
        *slot = new_value;
        Ok(new_value - current)
    }

    /// Reset all stages to 0
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check if all stats are at 0
    pub fn is_clear(&self) -> bool {
        self.atk == 0
            && self.def == 0
            && self.spa == 0
            && self.spd == 0
            && self.spe == 0
            && self.accuracy == 0
            && self.evasion == 0
    }
}

/// Computed values of the six permanent stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatBlock {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub sp_attack: u32,
    pub sp_defense: u32,
    pub speed: u32,
}

impl StatBlock {
    pub fn new(hp: u32, attack: u32, defense: u32, sp_attack: u32, sp_defense: u32, speed: u32) -> Self {
        Self {
            hp,
            attack,
            defense,
            sp_attack,
            sp_defense,
            speed,
        }
    }

    /// Sum of all six stats
    pub fn total(&self) -> u32 {
        self.hp + self.attack + self.defense + self.sp_attack + self.sp_defense + self.speed
    }

    /// Value of a permanent stat; accuracy and evasion read 0
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::SpAttack => self.sp_attack,
            Stat::SpDefense => self.sp_defense,
            Stat::Speed => self.speed,
            Stat::Accuracy | Stat::Evasion => 0,
        }
    }

    /// Set a permanent stat; accuracy and evasion are ignored
    pub fn set(&mut self, stat: Stat, value: u32) {
        match stat {
            Stat::Hp => self.hp = value,
            Stat::Attack => self.attack = value,
            Stat::Defense => self.defense = value,
            Stat::SpAttack => self.sp_attack = value,
            Stat::SpDefense => self.sp_defense = value,
            Stat::Speed => self.speed = value,
            Stat::Accuracy | Stat::Evasion => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stages_are_zero() {
        let stages = StatStages::new();
        assert_eq!(stages.atk, 0);
        assert_eq!(stages.spe, 0);
        assert_eq!(stages.accuracy, 0);
        assert_eq!(stages.evasion, 0);
        assert!(stages.is_clear());
    }

    #[test]
    fn test_get_set() {
        let mut stages = StatStages::new();
        stages.set(Stat::Attack, 3).unwrap();
        assert_eq!(stages.get(Stat::Attack), 3);

        stages.set(Stat::Speed, -2).unwrap();
        assert_eq!(stages.get(Stat::Speed), -2);
    }

    #[test]
    fn test_set_clamps_to_bounds() {
        let mut stages = StatStages::new();
        stages.set(Stat::Attack, 10).unwrap();
        assert_eq!(stages.atk, 6);

        stages.set(Stat::Defense, -10).unwrap();
        assert_eq!(stages.def, -6);
    }

    #[test]
    fn test_boost() {
        let mut stages = StatStages::new();

        let change = stages.boost(Stat::Attack, 2).unwrap();
        assert_eq!(change, 2);
        assert_eq!(stages.atk, 2);

        // Boost that hits cap
        stages.atk = 5;
        let change = stages.boost(Stat::Attack, 3).unwrap();
        assert_eq!(change, 1);
        assert_eq!(stages.atk, 6);

        // Boost when already at max
        let change = stages.boost(Stat::Attack, 1).unwrap();
        assert_eq!(change, 0);
        assert_eq!(stages.atk, 6);
    }

    #[test]
    fn test_negative_boost() {
        let mut stages = StatStages::new();

        let change = stages.boost(Stat::Defense, -2).unwrap();
        assert_eq!(change, -2);

        stages.def = -5;
        let change = stages.boost(Stat::Defense, -3).unwrap();
        assert_eq!(change, -1);
        assert_eq!(stages.def, -6);
    }

    #[test]
    fn test_huge_delta_is_clamped() {
        let mut stages = StatStages::new();
        assert_eq!(stages.boost(Stat::Speed, i32::MAX).unwrap(), 6);
        assert_eq!(stages.boost(Stat::Speed, i32::MIN).unwrap(), -12);
        assert_eq!(stages.spe, -6);
    }

    #[test]
    fn test_hp_has_no_stage() {
        let mut stages = StatStages::new();
        assert_eq!(stages.boost(Stat::Hp, 1), Err(BattleError::NoStage(Stat::Hp)));
        assert_eq!(stages.set(Stat::Hp, 1), Err(BattleError::NoStage(Stat::Hp)));
        assert_eq!(stages.get(Stat::Hp), 0);
    }

    #[test]
    fn test_clear() {
        let mut stages = StatStages {
            atk: 3,
            def: -2,
            spa: 1,
            spd: -1,
            spe: 6,
            accuracy: 2,
            evasion: -3,
        };

        stages.clear();
        assert!(stages.is_clear());
    }

    #[test]
    fn test_stat_block_get_set() {
        let mut block = StatBlock::new(150, 100, 90, 80, 70, 60);
        assert_eq!(block.get(Stat::Hp), 150);
        assert_eq!(block.get(Stat::Speed), 60);
        assert_eq!(block.get(Stat::Accuracy), 0);

        block.set(Stat::Attack, 120);
        assert_eq!(block.attack, 120);
        assert_eq!(block.total(), 570);
    }
}
