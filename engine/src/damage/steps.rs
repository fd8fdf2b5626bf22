//! Damage pipeline steps

use clash_battle::constants::{
    BURN_DAMAGE_MULTIPLIER, CRIT_CHANCE_BY_STAGE, CRIT_MULTIPLIER, RANDOM_FACTOR_MAX,
    RANDOM_FACTOR_MIN,
};
use clash_battle::query;
use clash_battle::{MoveCategory, Room, SideCondition, Stat, Status, Volatile};

use super::context::DamageContext;
use crate::modifiers::{self, StatModifier};
use crate::rng::BattleRng;

/// One ordered transformation of a damage context
pub trait DamageStep: Send + Sync {
    fn name(&self) -> &'static str;

    fn process(&self, ctx: &mut DamageContext<'_>, rng: &mut BattleRng);
}

/// `floor((2*level/5+2) * power * atk / def / 50) + 2`
///
/// Status moves short-circuit to zero. Attack and defense are the staged
/// values times each side's passive stat multipliers; status is left to
/// the burn step.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseDamageStep;

impl DamageStep for BaseDamageStep {
    fn name(&self) -> &'static str {
        "base-damage"
    }

    fn process(&self, ctx: &mut DamageContext<'_>, _rng: &mut BattleRng) {
        if !ctx.move_data.is_damaging() {
            ctx.base_damage = 0;
            ctx.halted = true;
            return;
        }

        let (attack_stat, mut defense_stat) = match ctx.move_data.category {
            MoveCategory::Special => (Stat::SpAttack, Stat::SpDefense),
            _ => (Stat::Attack, Stat::Defense),
        };
        if ctx.field.conditions.has_room(Room::WonderRoom) {
            defense_stat = match defense_stat {
                Stat::Defense => Stat::SpDefense,
                _ => Stat::Defense,
            };
        }

        let attack = ctx
            .attacker_slot()
            .get_effective_stat_raw(ctx.attacker_mon(), attack_stat) as f64
            * modifiers::stat_multiplier(ctx.field, ctx.attacker, attack_stat);
        let defense = ctx
            .defender_slot()
            .get_effective_stat_raw(ctx.defender_mon(), defense_stat) as f64
            * modifiers::stat_multiplier(ctx.field, ctx.defender, defense_stat);

        let attack = attack.floor().max(1.0) as u64;
        let defense = defense.floor().max(1.0) as u64;
        let level = ctx.attacker_mon().level() as u64;
        let power = ctx.move_data.power as u64;

        let base = (2 * level / 5 + 2) * power * attack / defense / 50 + 2;
        ctx.base_damage = base.min(u32::MAX as u64) as u32;
    }
}

/// Rolls (or takes the forced value of) a critical hit
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticalHitStep;

impl CriticalHitStep {
    /// +1 for high-crit moves, +2 for Focus Energy, capped at the table
    pub fn crit_stage(ctx: &DamageContext<'_>) -> usize {
        let mut stage = 0;
        if ctx.move_data.has_high_crit_ratio() {
            stage += 1;
        }
        if ctx.attacker_slot().has_volatile(Volatile::FocusEnergy) {
            stage += 2;
        }
        stage.min(CRIT_CHANCE_BY_STAGE.len() - 1)
    }
}

impl DamageStep for CriticalHitStep {
    fn name(&self) -> &'static str {
        "critical-hit"
    }

    fn process(&self, ctx: &mut DamageContext<'_>, rng: &mut BattleRng) {
        let critical = match ctx.overrides.force_critical {
            Some(forced) => forced,
            None => rng.chance(CRIT_CHANCE_BY_STAGE[Self::crit_stage(ctx)]),
        };
        ctx.is_critical = critical;
        if critical {
            ctx.multiplier *= CRIT_MULTIPLIER;
        }
    }
}

/// Maps a value in 0.0..=1.0 linearly onto 0.85..=1.00
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFactorStep;

impl RandomFactorStep {
    pub fn factor_for(value: f64) -> f64 {
        RANDOM_FACTOR_MIN + (RANDOM_FACTOR_MAX - RANDOM_FACTOR_MIN) * value.clamp(0.0, 1.0)
    }
}

impl DamageStep for RandomFactorStep {
    fn name(&self) -> &'static str {
        "random-factor"
    }

    fn process(&self, ctx: &mut DamageContext<'_>, rng: &mut BattleRng) {
        let value = ctx.overrides.fixed_random.unwrap_or_else(|| rng.unit());
        ctx.random_factor = Self::factor_for(value);
        ctx.multiplier *= ctx.random_factor;
    }
}

/// Same-type attack bonus
#[derive(Debug, Clone, Copy, Default)]
pub struct StabStep;

impl DamageStep for StabStep {
    fn name(&self) -> &'static str {
        "stab"
    }

    fn process(&self, ctx: &mut DamageContext<'_>, _rng: &mut BattleRng) {
        if ctx.typeless {
            return;
        }
        let (first, second) = ctx.attacker_mon().type_pair();
        let stab = query::stab_multiplier(ctx.move_type(), first, second);
        ctx.is_stab = stab > 1.0;
        ctx.multiplier *= stab;
    }
}

/// Damage multipliers from the attacker's ability
#[derive(Debug, Clone, Copy, Default)]
pub struct AttackerAbilityStep;

impl DamageStep for AttackerAbilityStep {
    fn name(&self) -> &'static str {
        "attacker-ability"
    }

    fn process(&self, ctx: &mut DamageContext<'_>, _rng: &mut BattleRng) {
        if let Some(ability) = modifiers::ability_modifier(ctx.field, ctx.attacker) {
            let factor = ability.damage_multiplier(ctx);
            ctx.multiplier *= factor;
        }
    }
}

/// Damage multipliers from the attacker's held item
#[derive(Debug, Clone, Copy, Default)]
pub struct AttackerItemStep;

impl DamageStep for AttackerItemStep {
    fn name(&self) -> &'static str {
        "attacker-item"
    }

    fn process(&self, ctx: &mut DamageContext<'_>, _rng: &mut BattleRng) {
        if let Some(item) = modifiers::item_modifier(ctx.field, ctx.attacker) {
            let factor = item.damage_multiplier(ctx);
            ctx.multiplier *= factor;
        }
    }
}

/// Damage reductions from the defender's ability and held item
#[derive(Debug, Clone, Copy, Default)]
pub struct DefenderModifierStep;

impl DamageStep for DefenderModifierStep {
    fn name(&self) -> &'static str {
        "defender-modifiers"
    }

    fn process(&self, ctx: &mut DamageContext<'_>, _rng: &mut BattleRng) {
        let view: &DamageContext<'_> = ctx;
        let factor: f64 = modifiers::sources(view.field, view.defender)
            .iter()
            .map(|m| m.defense_multiplier(view))
            .product();
        ctx.multiplier *= factor;
    }
}

/// Dual-type effectiveness; an immunity zeroes the multiplier outright
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeEffectivenessStep;

impl DamageStep for TypeEffectivenessStep {
    fn name(&self) -> &'static str {
        "type-effectiveness"
    }

    fn process(&self, ctx: &mut DamageContext<'_>, _rng: &mut BattleRng) {
        let effectiveness = ctx.matchup();
        ctx.type_effectiveness = effectiveness;
        if effectiveness == 0.0 {
            ctx.multiplier = 0.0;
        } else {
            ctx.multiplier *= effectiveness;
        }
    }
}

/// Halves physical damage from a burned attacker
#[derive(Debug, Clone, Copy, Default)]
pub struct BurnStep;

impl DamageStep for BurnStep {
    fn name(&self) -> &'static str {
        "burn"
    }

    fn process(&self, ctx: &mut DamageContext<'_>, _rng: &mut BattleRng) {
        if ctx.attacker_mon().status() == Some(Status::Burn) && ctx.is_physical() {
            ctx.multiplier *= BURN_DAMAGE_MULTIPLIER;
        }
    }
}

/// Sun and rain boost or weaken fire and water moves
///
/// Not part of the default order.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherStep;

impl DamageStep for WeatherStep {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn process(&self, ctx: &mut DamageContext<'_>, _rng: &mut BattleRng) {
        if let Some(weather) = ctx.field.conditions.weather() {
            ctx.multiplier *= weather.type_multiplier(ctx.move_type());
        }
    }
}

/// Reflect and Light Screen halve non-critical damage
///
/// Not part of the default order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenStep;

impl DamageStep for ScreenStep {
    fn name(&self) -> &'static str {
        "screen"
    }

    fn process(&self, ctx: &mut DamageContext<'_>, _rng: &mut BattleRng) {
        if ctx.is_critical {
            return;
        }
        let screen = match ctx.move_data.category {
            MoveCategory::Physical => SideCondition::Reflect,
            MoveCategory::Special => SideCondition::LightScreen,
            MoveCategory::Status => return,
        };
        if ctx.field.side(ctx.defender.side).has_condition(screen) {
            ctx.multiplier *= 0.5;
        }
    }
}
