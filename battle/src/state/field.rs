//! Whole-battle aggregate

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::combatant::Combatant;
use super::side::BattleSide;
use super::slot::BattleSlot;
use super::{SideId, SlotId};
use crate::error::BattleError;
use crate::rules::BattleRules;
use crate::types::{FieldConditions, Stat, StatStages};

/// How a battle stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BattleOutcome {
    Ongoing,
    /// Every enemy fainted
    Victory,
    /// Every player combatant fainted
    Defeat,
    /// Both sides wiped out together, or the turn limit ran out
    Draw,
    Fled,
    Caught,
}

impl BattleOutcome {
    pub fn is_terminal(&self) -> bool {
        *self != BattleOutcome::Ongoing
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BattleOutcome::Ongoing => "ongoing",
            BattleOutcome::Victory => "victory",
            BattleOutcome::Defeat => "defeat",
            BattleOutcome::Draw => "draw",
            BattleOutcome::Fled => "fled",
            BattleOutcome::Caught => "caught",
        }
    }
}

impl std::fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Complete battle state
#[derive(Debug, Clone)]
pub struct BattleField {
    rules: BattleRules,
    player: BattleSide,
    enemy: BattleSide,

    /// Current turn number (0 before the first turn)
    turn: u32,

    /// Weather, terrain and room
    pub conditions: FieldConditions,

    /// Terminal outcome set by an action rather than inferred from HP
    forced_outcome: Option<BattleOutcome>,
}

impl BattleField {
    /// Validate the rules and both parties and build the field
    ///
    /// Slots start empty; the engine sends out leads when the battle starts.
    pub fn new(
        rules: BattleRules,
        player_party: Vec<Combatant>,
        enemy_party: Vec<Combatant>,
    ) -> Result<Self, BattleError> {
        rules.validate()?;
        let player = BattleSide::new(
            SideId::Player,
            player_party,
            rules.slots_per_side,
            rules.max_party_size,
        )?;
        let enemy = BattleSide::new(
            SideId::Enemy,
            enemy_party,
            rules.slots_per_side,
            rules.max_party_size,
        )?;
        Ok(Self {
            rules,
            player,
            enemy,
            turn: 0,
            conditions: FieldConditions::new(),
            forced_outcome: None,
        })
    }

    pub fn rules(&self) -> &BattleRules {
        &self.rules
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Start the next turn, returning its number
    pub fn advance_turn(&mut self) -> u32 {
        self.turn += 1;
        self.turn
    }

    // === Sides ===

    pub fn side(&self, id: SideId) -> &BattleSide {
        match id {
            SideId::Player => &self.player,
            SideId::Enemy => &self.enemy,
        }
    }

    pub fn side_mut(&mut self, id: SideId) -> &mut BattleSide {
        match id {
            SideId::Player => &mut self.player,
            SideId::Enemy => &mut self.enemy,
        }
    }

    // === Slots ===

    /// Error unless `id` names a slot that exists under the current rules
    pub fn check_slot(&self, id: SlotId) -> Result<(), BattleError> {
        if id.index < self.rules.slots_per_side {
            Ok(())
        } else {
            Err(BattleError::InvalidSlot(id))
        }
    }

    pub fn slot(&self, id: SlotId) -> Option<&BattleSlot> {
        self.side(id.side).slot(id.index)
    }

    pub fn slot_mut(&mut self, id: SlotId) -> Option<&mut BattleSlot> {
        self.side_mut(id.side).slot_mut(id.index)
    }

    /// Combatant occupying a slot
    pub fn combatant(&self, id: SlotId) -> Option<&Combatant> {
        self.side(id.side).occupant(id.index)
    }

    pub fn combatant_mut(&mut self, id: SlotId) -> Option<&mut Combatant> {
        self.side_mut(id.side).occupant_mut(id.index)
    }

    /// Slot and occupant together
    pub fn occupied(&self, id: SlotId) -> Option<(&BattleSlot, &Combatant)> {
        self.side(id.side).occupied(id.index)
    }

    /// Every slot address, side-then-slot order
    pub fn all_slots(&self) -> Vec<SlotId> {
        SideId::ALL
            .iter()
            .flat_map(|&side| (0..self.rules.slots_per_side).map(move |i| SlotId::new(side, i)))
            .collect()
    }

    /// Slots with a living occupant, side-then-slot order
    pub fn active_slots(&self) -> Vec<SlotId> {
        self.all_slots()
            .into_iter()
            .filter(|&id| self.combatant(id).is_some_and(Combatant::is_alive))
            .collect()
    }

    /// Living foes of `id`, in slot order
    pub fn foes_of(&self, id: SlotId) -> Vec<SlotId> {
        self.active_slots()
            .into_iter()
            .filter(|s| s.is_foe_of(id))
            .collect()
    }

    /// Occupied slots whose occupant has no HP left
    pub fn fainted_slots(&self) -> Vec<SlotId> {
        self.all_slots()
            .into_iter()
            .filter(|&id| self.combatant(id).is_some_and(Combatant::is_fainted))
            .collect()
    }

    /// Empty slots, side-then-slot order
    pub fn empty_slots(&self) -> Vec<SlotId> {
        self.all_slots()
            .into_iter()
            .filter(|&id| self.slot(id).is_some_and(BattleSlot::is_empty))
            .collect()
    }

    /// Stat of the occupant after stages and status
    pub fn effective_stat(&self, id: SlotId, stat: Stat) -> Option<u32> {
        self.occupied(id)
            .map(|(slot, combatant)| slot.get_effective_stat(combatant, stat))
    }

    /// Read-only view of the occupant's stages, backed by its slot
    pub fn stages_of(&self, id: SlotId) -> Option<&StatStages> {
        self.slot(id).map(BattleSlot::stages)
    }

    // === Outcome ===

    /// End the battle with an outcome that is not derived from HP
    pub fn conclude(&mut self, outcome: BattleOutcome) {
        if outcome.is_terminal() && self.forced_outcome.is_none() {
            self.forced_outcome = Some(outcome);
        }
    }

    pub fn forced_outcome(&self) -> Option<BattleOutcome> {
        self.forced_outcome
    }
}
