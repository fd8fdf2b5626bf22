//! Active battle positions

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::combatant::Combatant;
use crate::error::BattleError;
use crate::formulas::stage_multiplier;
use crate::types::{Stat, StatStages, Status, Volatile};

/// One active position on a side
///
/// The slot owns everything that is reset when its occupant changes: stat
/// stages and volatile conditions. The occupant itself is a party index; the
/// party keeps the combatant alive whether or not it is on the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BattleSlot {
    occupant: Option<usize>,
    stages: StatStages,
    volatiles: HashSet<Volatile>,
    confusion_turns: u8,
}

impl BattleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Party index of the combatant in this slot
    pub fn occupant(&self) -> Option<usize> {
        self.occupant
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    /// Put a party member in the slot, resetting battle state
    pub fn set_occupant(&mut self, party_index: usize) {
        self.occupant = Some(party_index);
        self.reset_battle_state();
    }

    /// Empty the slot, returning the previous occupant
    pub fn clear_occupant(&mut self) -> Option<usize> {
        self.reset_battle_state();
        self.occupant.take()
    }

    // === Stat stages ===

    pub fn stages(&self) -> &StatStages {
        &self.stages
    }

    pub fn stage(&self, stat: Stat) -> i8 {
        self.stages.get(stat)
    }

    /// Apply `delta` to a stage, returning the change actually applied
    ///
    /// Zero means the stage was already at its bound.
    pub fn modify_stat_stage(&mut self, stat: Stat, delta: i32) -> Result<i8, BattleError> {
        self.stages.boost(stat, delta)
    }

    /// Zero every stage and drop all volatiles
    ///
    /// The occupant's persistent status lives on the combatant and is untouched.
    pub fn reset_battle_state(&mut self) {
        self.stages.clear();
        self.volatiles.clear();
        self.confusion_turns = 0;
    }

    // === Volatiles ===

    pub fn has_volatile(&self, volatile: Volatile) -> bool {
        self.volatiles.contains(&volatile)
    }

    /// Add a volatile, returns false if it was already present
    pub fn add_volatile(&mut self, volatile: Volatile) -> bool {
        self.volatiles.insert(volatile)
    }

    pub fn remove_volatile(&mut self, volatile: Volatile) -> bool {
        if volatile == Volatile::Confusion {
            self.confusion_turns = 0;
        }
        self.volatiles.remove(&volatile)
    }

    pub fn volatiles(&self) -> impl Iterator<Item = Volatile> + '_ {
        self.volatiles.iter().copied()
    }

    /// Confuse the occupant for `turns` move attempts
    pub fn confuse(&mut self, turns: u8) -> bool {
        if !self.volatiles.insert(Volatile::Confusion) {
            return false;
        }
        self.confusion_turns = turns;
        true
    }

    /// Count down confusion on a move attempt, returns true if it just ended
    pub fn tick_confusion(&mut self) -> bool {
        if !self.has_volatile(Volatile::Confusion) {
            return false;
        }
        self.confusion_turns = self.confusion_turns.saturating_sub(1);
        if self.confusion_turns == 0 {
            self.volatiles.remove(&Volatile::Confusion);
            return true;
        }
        false
    }

    /// Drop volatiles that only last for the current turn
    pub fn clear_turn_volatiles(&mut self) {
        self.volatiles.retain(|v| !v.expires_at_turn_end());
    }

    // === Effective stats ===

    /// Stat after stages, before status
    pub fn get_effective_stat_raw(&self, combatant: &Combatant, stat: Stat) -> u32 {
        let base = combatant.stat(stat);
        if stat == Stat::Hp {
            return base;
        }
        (base as f64 * stage_multiplier(self.stages.get(stat))).floor() as u32
    }

    /// Stat after stages and then status (burn halves Attack, paralysis quarters Speed)
    pub fn get_effective_stat(&self, combatant: &Combatant, stat: Stat) -> u32 {
        let staged = self.get_effective_stat_raw(combatant, stat) as f64;
        let factor = match (combatant.status(), stat) {
            (Some(Status::Burn), Stat::Attack) => 0.5,
            (Some(Status::Paralysis), Stat::Speed) => 0.25,
            _ => 1.0,
        };
        (staged * factor).floor() as u32
    }
}
