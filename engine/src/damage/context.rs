//! Damage calculation context

use clash_battle::query;
use clash_battle::{
    BattleError, BattleField, BattleSlot, Combatant, MoveCategory, MoveData, SlotId, Type,
};

/// Caller overrides for the two random steps
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageOverrides {
    /// Force a critical hit on or off instead of rolling
    pub force_critical: Option<bool>,
    /// Fixed value in 0.0..=1.0 for the random factor step
    pub fixed_random: Option<f64>,
}

impl DamageOverrides {
    /// No crit, maximum roll
    pub fn deterministic() -> Self {
        Self {
            force_critical: Some(false),
            fixed_random: Some(1.0),
        }
    }
}

/// Scratch state for one damage calculation
///
/// Built from a field, two occupied slots and a move; each pipeline step
/// reads the participants and folds its result into the running values.
#[derive(Debug, Clone)]
pub struct DamageContext<'a> {
    // === Participants ===
    pub attacker: SlotId,
    pub defender: SlotId,
    pub move_data: &'a MoveData,
    pub field: &'a BattleField,
    attacker_slot: &'a BattleSlot,
    attacker_mon: &'a Combatant,
    defender_slot: &'a BattleSlot,
    defender_mon: &'a Combatant,

    // === Inputs ===
    pub overrides: DamageOverrides,
    /// Ignore type matchups and same-type bonus (confusion self-hits)
    pub typeless: bool,

    // === Accumulated ===
    pub base_damage: u32,
    pub multiplier: f64,
    pub is_stab: bool,
    pub is_critical: bool,
    pub type_effectiveness: f64,
    pub random_factor: f64,
    pub final_damage: u32,
    /// Set by a step to skip every later step
    pub halted: bool,
}

impl<'a> DamageContext<'a> {
    /// Both slots must be occupied
    pub fn new(
        field: &'a BattleField,
        attacker: SlotId,
        defender: SlotId,
        move_data: &'a MoveData,
    ) -> Result<Self, BattleError> {
        let (attacker_slot, attacker_mon) = field
            .occupied(attacker)
            .ok_or(BattleError::InvalidSlot(attacker))?;
        let (defender_slot, defender_mon) = field
            .occupied(defender)
            .ok_or(BattleError::InvalidSlot(defender))?;
        Ok(Self {
            attacker,
            defender,
            move_data,
            field,
            attacker_slot,
            attacker_mon,
            defender_slot,
            defender_mon,
            overrides: DamageOverrides::default(),
            typeless: false,
            base_damage: 0,
            multiplier: 1.0,
            is_stab: false,
            is_critical: false,
            type_effectiveness: 1.0,
            random_factor: 1.0,
            final_damage: 0,
            halted: false,
        })
    }

    pub fn with_overrides(mut self, overrides: DamageOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_typeless(mut self) -> Self {
        self.typeless = true;
        self
    }

    pub fn attacker_slot(&self) -> &'a BattleSlot {
        self.attacker_slot
    }

    pub fn attacker_mon(&self) -> &'a Combatant {
        self.attacker_mon
    }

    pub fn defender_slot(&self) -> &'a BattleSlot {
        self.defender_slot
    }

    pub fn defender_mon(&self) -> &'a Combatant {
        self.defender_mon
    }

    pub fn move_type(&self) -> Type {
        self.move_data.move_type
    }

    pub fn is_physical(&self) -> bool {
        self.move_data.category == MoveCategory::Physical
    }

    /// Matchup of the move against the defender, independent of step order
    pub fn matchup(&self) -> f64 {
        if self.typeless {
            return 1.0;
        }
        let (first, second) = self.defender_mon.type_pair();
        query::effectiveness(self.move_type(), first, second)
    }

    pub fn is_immune(&self) -> bool {
        self.type_effectiveness == 0.0
    }

    /// `floor(base * multiplier)`, at least 1 unless the defender is immune
    pub fn compute_final(&self) -> u32 {
        if self.base_damage == 0 || self.is_immune() {
            return 0;
        }
        ((self.base_damage as f64 * self.multiplier).floor() as u32).max(1)
    }
}
