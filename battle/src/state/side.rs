//! Side (party) state

use std::collections::HashMap;

use super::combatant::Combatant;
use super::slot::BattleSlot;
use super::SideId;
use crate::error::BattleError;
use crate::types::{SideCondition, SideConditionState};

/// One team in the battle
///
/// The party owns every combatant for the whole battle; slots refer to party
/// members by index, so an occupant is always a member of this party.
#[derive(Debug, Clone)]
pub struct BattleSide {
    id: SideId,

    /// Party in roster order
    party: Vec<Combatant>,

    /// Active positions
    slots: Vec<BattleSlot>,

    /// Side conditions (hazards, screens, tailwind)
    conditions: HashMap<SideCondition, SideConditionState>,
}

impl BattleSide {
    /// Create a side with empty slots
    ///
    /// The party must be non-empty, within `max_party_size`, and have at
    /// least one member able to battle.
    pub fn new(
        id: SideId,
        party: Vec<Combatant>,
        slot_count: usize,
        max_party_size: usize,
    ) -> Result<Self, BattleError> {
        if party.is_empty() {
            return Err(BattleError::EmptyParty);
        }
        if party.len() > max_party_size {
            return Err(BattleError::PartyTooLarge {
                size: party.len(),
                max: max_party_size,
            });
        }
        if party.iter().all(Combatant::is_fainted) {
            return Err(BattleError::AllFainted);
        }
        Ok(Self {
            id,
            party,
            slots: vec![BattleSlot::new(); slot_count],
            conditions: HashMap::new(),
        })
    }

    pub fn id(&self) -> SideId {
        self.id
    }

    // === Party ===

    pub fn party(&self) -> &[Combatant] {
        &self.party
    }

    /// Get a party member by index
    pub fn combatant(&self, index: usize) -> Option<&Combatant> {
        self.party.get(index)
    }

    /// Get a party member by index mutably
    pub fn combatant_mut(&mut self, index: usize) -> Option<&mut Combatant> {
        self.party.get_mut(index)
    }

    /// Count non-fainted party members
    pub fn alive_count(&self) -> usize {
        self.party.iter().filter(|p| p.is_alive()).count()
    }

    /// Count fainted party members
    pub fn fainted_count(&self) -> usize {
        self.party.iter().filter(|p| p.is_fainted()).count()
    }

    /// Check if every party member has fainted
    pub fn all_fainted(&self) -> bool {
        self.party.iter().all(Combatant::is_fainted)
    }

    // === Slots ===

    pub fn slots(&self) -> &[BattleSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&BattleSlot> {
        self.slots.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut BattleSlot> {
        self.slots.get_mut(index)
    }

    /// Get the combatant occupying a slot
    pub fn occupant(&self, slot: usize) -> Option<&Combatant> {
        self.slots
            .get(slot)
            .and_then(BattleSlot::occupant)
            .and_then(|idx| self.party.get(idx))
    }

    /// Get the combatant occupying a slot mutably
    pub fn occupant_mut(&mut self, slot: usize) -> Option<&mut Combatant> {
        let idx = self.slots.get(slot).and_then(BattleSlot::occupant)?;
        self.party.get_mut(idx)
    }

    /// Slot and combatant together, for stat queries that need both
    pub fn occupied(&self, slot: usize) -> Option<(&BattleSlot, &Combatant)> {
        let battle_slot = self.slots.get(slot)?;
        let combatant = battle_slot.occupant().and_then(|idx| self.party.get(idx))?;
        Some((battle_slot, combatant))
    }

    /// Find the slot a party member occupies
    pub fn find_active_slot(&self, party_index: usize) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.occupant() == Some(party_index))
    }

    /// Party members that are neither on the field nor fainted
    pub fn get_available_switches(&self) -> Vec<usize> {
        self.party
            .iter()
            .enumerate()
            .filter(|(idx, poke)| poke.is_alive() && self.find_active_slot(*idx).is_none())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Put `party_index` into `slot`, returning the previous occupant
    ///
    /// The slot's stages and volatiles reset. A badly poisoned combatant
    /// leaving the field has its toxic counter restarted.
    pub fn switch_in(&mut self, slot: usize, party_index: usize) -> Option<usize> {
        if party_index >= self.party.len() {
            return None;
        }
        let battle_slot = self.slots.get_mut(slot)?;
        let previous = battle_slot.occupant();
        battle_slot.set_occupant(party_index);

        if let Some(prev) = previous.and_then(|idx| self.party.get_mut(idx)) {
            prev.on_switch_out();
        }
        previous
    }

    /// Empty a slot (after a faint), returning the previous occupant
    pub fn clear_slot(&mut self, slot: usize) -> Option<usize> {
        self.slots.get_mut(slot).and_then(BattleSlot::clear_occupant)
    }

    /// Fill every slot with the first able party members in roster order
    ///
    /// Returns (slot, party index) for each slot filled.
    pub fn send_out_leads(&mut self) -> Vec<(usize, usize)> {
        let mut leads = Vec::new();
        let mut candidates = self.get_available_switches().into_iter();
        for slot in 0..self.slots.len() {
            if !self.slots[slot].is_empty() {
                continue;
            }
            let Some(party_index) = candidates.next() else {
                break;
            };
            self.slots[slot].set_occupant(party_index);
            leads.push((slot, party_index));
        }
        leads
    }

    // === Side conditions ===

    /// Check if side has a condition
    pub fn has_condition(&self, cond: SideCondition) -> bool {
        self.conditions.contains_key(&cond)
    }

    /// Get layers for a condition (0 if not present)
    pub fn condition_layers(&self, cond: SideCondition) -> u8 {
        self.conditions.get(&cond).map_or(0, |s| s.layers)
    }

    pub fn conditions(&self) -> impl Iterator<Item = (&SideCondition, &SideConditionState)> {
        self.conditions.iter()
    }

    /// Add a side condition
    ///
    /// Returns true if the condition was added or gained a layer, false if
    /// it is already at its maximum.
    pub fn add_condition(&mut self, cond: SideCondition, duration: Option<u8>) -> bool {
        if let Some(state) = self.conditions.get_mut(&cond) {
            state.add_layer(cond)
        } else {
            self.conditions.insert(cond, SideConditionState::new(duration));
            true
        }
    }

    /// Remove a side condition
    pub fn remove_condition(&mut self, cond: SideCondition) -> bool {
        self.conditions.remove(&cond).is_some()
    }

    /// Clear all side conditions
    pub fn clear_conditions(&mut self) {
        self.conditions.clear();
    }

    /// Count down timed conditions, removing and returning the ones that ran out
    pub fn tick_conditions(&mut self) -> Vec<SideCondition> {
        let mut expired: Vec<SideCondition> = self
            .conditions
            .iter_mut()
            .filter_map(|(cond, state)| state.tick().then_some(*cond))
            .collect();
        for cond in &expired {
            self.conditions.remove(cond);
        }
        // HashMap order is unspecified
        expired.sort_by_key(|c| SideCondition::ALL.iter().position(|a| a == c));
        expired
    }

    /// Check if any hazards are set
    pub fn has_hazards(&self) -> bool {
        self.conditions.keys().any(|c| c.is_hazard())
    }

    /// Check if any screens are active
    pub fn has_screens(&self) -> bool {
        self.conditions.keys().any(|c| c.is_screen())
    }
}
