//! Ordered damage pipeline

use clash_battle::{BattleField, MoveData, SlotId};

use super::context::{DamageContext, DamageOverrides};
use super::steps::{
    AttackerAbilityStep, AttackerItemStep, BaseDamageStep, BurnStep, CriticalHitStep, DamageStep,
    DefenderModifierStep, RandomFactorStep, StabStep, TypeEffectivenessStep,
};
use crate::error::EngineError;
use crate::rng::BattleRng;

/// An owned, ordered list of damage steps
///
/// Each pipeline value carries its own step sequence; adding or inserting a
/// step affects only that pipeline.
pub struct DamagePipeline {
    steps: Vec<Box<dyn DamageStep>>,
}

impl DamagePipeline {
    /// BaseDamage, CriticalHit, RandomFactor, STAB, AttackerAbility,
    /// AttackerItem, DefenderModifiers, TypeEffectiveness, Burn
    pub fn new() -> Self {
        Self {
            steps: vec![
                Box::new(BaseDamageStep),
                Box::new(CriticalHitStep),
                Box::new(RandomFactorStep),
                Box::new(StabStep),
                Box::new(AttackerAbilityStep),
                Box::new(AttackerItemStep),
                Box::new(DefenderModifierStep),
                Box::new(TypeEffectivenessStep),
                Box::new(BurnStep),
            ],
        }
    }

    /// A pipeline with no steps
    pub fn empty() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in execution order
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Append a step
    pub fn add_step(&mut self, step: impl DamageStep + 'static) {
        self.steps.push(Box::new(step));
    }

    /// Insert a step before `position` (`position == len` appends)
    pub fn insert_step(
        &mut self,
        position: usize,
        step: impl DamageStep + 'static,
    ) -> Result<(), EngineError> {
        if position > self.steps.len() {
            return Err(EngineError::StepOutOfRange {
                position,
                len: self.steps.len(),
            });
        }
        self.steps.insert(position, Box::new(step));
        Ok(())
    }

    /// Remove the first step named `name`, returns false if there is none
    pub fn remove_step(&mut self, name: &str) -> bool {
        match self.steps.iter().position(|s| s.name() == name) {
            Some(index) => {
                self.steps.remove(index);
                true
            }
            None => false,
        }
    }

    /// Run every step over a prepared context and fill in the final damage
    pub fn run(&self, ctx: &mut DamageContext<'_>, rng: &mut BattleRng) {
        for step in &self.steps {
            if ctx.halted {
                break;
            }
            step.process(ctx, rng);
            tracing::trace!(
                step = step.name(),
                base = ctx.base_damage,
                multiplier = ctx.multiplier,
                "damage step"
            );
        }
        ctx.final_damage = ctx.compute_final();
    }

    /// Damage `move_data` from `attacker` would deal to `defender`
    ///
    /// Reads the field without changing it; the same inputs with both
    /// overrides fixed always give the same result.
    pub fn calculate<'a>(
        &self,
        field: &'a BattleField,
        attacker: SlotId,
        defender: SlotId,
        move_data: &'a MoveData,
        overrides: DamageOverrides,
        rng: &mut BattleRng,
    ) -> Result<DamageContext<'a>, EngineError> {
        if let Some(value) = overrides.fixed_random {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::RandomOutOfRange(value));
            }
        }
        let mut ctx = DamageContext::new(field, attacker, defender, move_data)?.with_overrides(overrides);
        self.run(&mut ctx, rng);
        Ok(ctx)
    }
}

impl Default for DamagePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DamagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DamagePipeline")
            .field("steps", &self.step_names())
            .finish()
    }
}
