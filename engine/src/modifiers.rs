//! Passive stat and damage modifiers from abilities and held items
//!
//! The damage pipeline never special-cases a particular ability or item. It
//! asks every modifier source on the participants for a multiplier, and the
//! sources answer from their [`PassiveEffect`] lists.

use std::sync::Arc;

use clash_battle::{AbilityData, BattleField, ItemData, PassiveEffect, Room, SlotId, Stat};

use crate::damage::DamageContext;

/// A source of continuous stat and conditional damage multipliers
pub trait StatModifier: Send + Sync {
    /// Name of the ability or item, for logging
    fn source(&self) -> &str;

    /// Passive multiplier on `stat` for the combatant in `slot`
    fn stat_multiplier(&self, slot: SlotId, stat: Stat, field: &BattleField) -> f64;

    /// Move-specific multiplier while this source's holder is attacking
    fn damage_multiplier(&self, ctx: &DamageContext<'_>) -> f64;

    /// Move-specific multiplier while this source's holder is being hit
    fn defense_multiplier(&self, ctx: &DamageContext<'_>) -> f64;
}

fn effects_stat_multiplier(effects: &[PassiveEffect], stat: Stat) -> f64 {
    effects
        .iter()
        .map(|effect| match effect {
            PassiveEffect::StatMultiplier { stat: s, factor } if *s == stat => *factor,
            _ => 1.0,
        })
        .product()
}

fn effects_damage_multiplier(effects: &[PassiveEffect], ctx: &DamageContext<'_>) -> f64 {
    effects
        .iter()
        .map(|effect| match effect {
            PassiveEffect::LowHpTypeBoost { move_type, factor } => {
                let attacker = ctx.attacker_mon();
                let low = attacker.hp() * 3 <= attacker.max_hp();
                if low && *move_type == ctx.move_type() {
                    *factor
                } else {
                    1.0
                }
            }
            PassiveEffect::TypeDamageBoost { move_type, factor } if *move_type == ctx.move_type() => {
                *factor
            }
            PassiveEffect::SuperEffectiveBoost { factor } if ctx.matchup() > 1.0 => *factor,
            _ => 1.0,
        })
        .product()
}

fn effects_defense_multiplier(effects: &[PassiveEffect], ctx: &DamageContext<'_>) -> f64 {
    effects
        .iter()
        .map(|effect| match effect {
            PassiveEffect::TypeDamageReduction { move_type, factor }
                if *move_type == ctx.move_type() =>
            {
                *factor
            }
            PassiveEffect::SuperEffectiveReduction { factor } if ctx.matchup() > 1.0 => *factor,
            _ => 1.0,
        })
        .product()
}

/// An ability acting as a modifier source
#[derive(Debug, Clone)]
pub struct AbilityModifier {
    ability: Arc<AbilityData>,
}

impl AbilityModifier {
    pub fn new(ability: Arc<AbilityData>) -> Self {
        Self { ability }
    }
}

impl StatModifier for AbilityModifier {
    fn source(&self) -> &str {
        &self.ability.name
    }

    fn stat_multiplier(&self, _slot: SlotId, stat: Stat, _field: &BattleField) -> f64 {
        effects_stat_multiplier(&self.ability.effects, stat)
    }

    fn damage_multiplier(&self, ctx: &DamageContext<'_>) -> f64 {
        effects_damage_multiplier(&self.ability.effects, ctx)
    }

    fn defense_multiplier(&self, ctx: &DamageContext<'_>) -> f64 {
        effects_defense_multiplier(&self.ability.effects, ctx)
    }
}

/// A held item acting as a modifier source
///
/// Magic Room turns every item multiplier into 1.0.
#[derive(Debug, Clone)]
pub struct ItemModifier {
    item: Arc<ItemData>,
}

impl ItemModifier {
    pub fn new(item: Arc<ItemData>) -> Self {
        Self { item }
    }
}

impl StatModifier for ItemModifier {
    fn source(&self) -> &str {
        &self.item.name
    }

    fn stat_multiplier(&self, _slot: SlotId, stat: Stat, field: &BattleField) -> f64 {
        if field.conditions.has_room(Room::MagicRoom) {
            return 1.0;
        }
        effects_stat_multiplier(&self.item.effects, stat)
    }

    fn damage_multiplier(&self, ctx: &DamageContext<'_>) -> f64 {
        if ctx.field.conditions.has_room(Room::MagicRoom) {
            return 1.0;
        }
        effects_damage_multiplier(&self.item.effects, ctx)
    }

    fn defense_multiplier(&self, ctx: &DamageContext<'_>) -> f64 {
        if ctx.field.conditions.has_room(Room::MagicRoom) {
            return 1.0;
        }
        effects_defense_multiplier(&self.item.effects, ctx)
    }
}

/// Ability modifier of the combatant in `slot`
pub fn ability_modifier(field: &BattleField, slot: SlotId) -> Option<AbilityModifier> {
    field
        .combatant(slot)
        .map(|c| AbilityModifier::new(Arc::clone(c.ability())))
}

/// Held-item modifier of the combatant in `slot`
pub fn item_modifier(field: &BattleField, slot: SlotId) -> Option<ItemModifier> {
    field
        .combatant(slot)
        .and_then(|c| c.item())
        .map(|item| ItemModifier::new(Arc::clone(item)))
}

/// Every modifier source on the combatant in `slot`
pub fn sources(field: &BattleField, slot: SlotId) -> Vec<Box<dyn StatModifier>> {
    let mut out: Vec<Box<dyn StatModifier>> = Vec::new();
    if let Some(ability) = ability_modifier(field, slot) {
        out.push(Box::new(ability));
    }
    if let Some(item) = item_modifier(field, slot) {
        out.push(Box::new(item));
    }
    out
}

/// Product of every source's stat multiplier for `slot`
pub fn stat_multiplier(field: &BattleField, slot: SlotId, stat: Stat) -> f64 {
    sources(field, slot)
        .iter()
        .map(|m| m.stat_multiplier(slot, stat, field))
        .product()
}
