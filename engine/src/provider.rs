use std::collections::VecDeque;

use async_trait::async_trait;
use clash_battle::{BattleField, SlotId};

use crate::rng::BattleRng;

/// A decision for one active slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    UseMove { move_index: usize, target: SlotId },
    Switch { party_index: usize },
    Flee,
}

/// Source of decisions for one side: a player's input, an AI, a script.
///
/// The engine asks once per living slot per turn and awaits the answer.
/// Both sides are asked concurrently.
///
/// # Example
///
/// ```ignore
/// struct AlwaysFirstMove;
///
/// #[async_trait]
/// impl ActionProvider for AlwaysFirstMove {
///     async fn choose_action(&mut self, field: &BattleField, slot: SlotId) -> Decision {
///         let target = field.foes_of(slot).first().copied().unwrap_or(slot);
///         Decision::UseMove { move_index: 0, target }
///     }
/// }
/// ```
#[async_trait]
pub trait ActionProvider: Send {
    /// Choose what the combatant in `slot` does this turn
    async fn choose_action(&mut self, field: &BattleField, slot: SlotId) -> Decision;

    /// Choose a party member to fill `slot` after a faint.
    /// Returning None leaves the slot empty.
    async fn choose_replacement(&mut self, field: &BattleField, slot: SlotId) -> Option<usize> {
        field.side(slot.side).get_available_switches().first().copied()
    }
}

/// Picks a random usable move against a random foe
#[derive(Debug, Clone)]
pub struct RandomProvider {
    rng: BattleRng,
}

impl RandomProvider {
    pub fn new() -> Self {
        Self {
            rng: BattleRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: BattleRng::seeded(seed),
        }
    }
}

impl Default for RandomProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionProvider for RandomProvider {
    async fn choose_action(&mut self, field: &BattleField, slot: SlotId) -> Decision {
        let usable: Vec<usize> = field
            .combatant(slot)
            .map(|c| c.usable_moves().collect())
            .unwrap_or_default();
        if usable.is_empty() {
            let switches = field.side(slot.side).get_available_switches();
            if let Some(&party_index) = switches.first() {
                return Decision::Switch { party_index };
            }
            // Out of PP everywhere; the move use reports it
            return Decision::UseMove {
                move_index: 0,
                target: slot,
            };
        }

        let move_index = usable[self.rng.index(usable.len())];
        let foes = field.foes_of(slot);
        let target = if foes.is_empty() {
            slot
        } else {
            foes[self.rng.index(foes.len())]
        };
        Decision::UseMove { move_index, target }
    }
}

/// Replays a fixed list of decisions, then falls back to the first usable
/// move against the first foe
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    decisions: VecDeque<Decision>,
    replacements: VecDeque<usize>,
}

impl ScriptedProvider {
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
            replacements: VecDeque::new(),
        }
    }

    /// Party indices to send in after faints, in order
    pub fn with_replacements(mut self, replacements: impl IntoIterator<Item = usize>) -> Self {
        self.replacements = replacements.into_iter().collect();
        self
    }

    pub fn remaining(&self) -> usize {
        self.decisions.len()
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn choose_action(&mut self, field: &BattleField, slot: SlotId) -> Decision {
        if let Some(decision) = self.decisions.pop_front() {
            return decision;
        }
        let move_index = field
            .combatant(slot)
            .and_then(|c| c.usable_moves().next())
            .unwrap_or(0);
        let target = field.foes_of(slot).first().copied().unwrap_or(slot);
        Decision::UseMove { move_index, target }
    }

    async fn choose_replacement(&mut self, field: &BattleField, slot: SlotId) -> Option<usize> {
        match self.replacements.pop_front() {
            Some(party_index) => Some(party_index),
            None => field.side(slot.side).get_available_switches().first().copied(),
        }
    }
}
