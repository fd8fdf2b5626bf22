//! Trigger dispatch for abilities, items and end-of-turn residuals
//!
//! Dispatch reads the field and returns actions; it never mutates state
//! itself. Listeners on one combatant fire ability first, then held item,
//! then status residual. Across combatants the order is side-then-slot.

use clash_battle::{
    BattleField, Combatant, PassiveEffect, Room, SlotId, Status, Trigger, Type, Weather,
};

use crate::action::{ActionKind, BattleAction};

#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerDispatcher;

impl TriggerDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Actions for `trigger` from every living combatant on the field
    pub fn dispatch(&self, trigger: Trigger, field: &BattleField) -> Vec<BattleAction> {
        let actions: Vec<BattleAction> = field
            .active_slots()
            .into_iter()
            .flat_map(|slot| self.dispatch_for(trigger, field, slot))
            .collect();
        tracing::debug!(trigger = %trigger, actions = actions.len(), "dispatched trigger");
        actions
    }

    /// Actions for `trigger` from the combatant in `slot` alone
    pub fn dispatch_for(
        &self,
        trigger: Trigger,
        field: &BattleField,
        slot: SlotId,
    ) -> Vec<BattleAction> {
        let Some(mon) = field.combatant(slot).filter(|c| c.is_alive()) else {
            return Vec::new();
        };

        let ability = mon.ability();
        let mut out: Vec<BattleAction> = ability
            .listeners(trigger)
            .flat_map(|effect| passive_actions(field, slot, mon, &ability.name, effect))
            .collect();

        if let Some(item) = mon.item() {
            if !field.conditions.has_room(Room::MagicRoom) {
                out.extend(
                    item.listeners(trigger)
                        .flat_map(|effect| passive_actions(field, slot, mon, &item.name, effect)),
                );
            }
        }

        if trigger == Trigger::OnTurnEnd {
            out.extend(turn_end_residuals(field, slot, mon));
        }
        out
    }
}

fn passive_actions(
    field: &BattleField,
    slot: SlotId,
    holder: &Combatant,
    source: &str,
    effect: &PassiveEffect,
) -> Vec<BattleAction> {
    let name = holder.name();
    match effect {
        PassiveEffect::LowerFoeStatOnEntry { stat, stages } => {
            let foes = field.foes_of(slot);
            if foes.is_empty() {
                return Vec::new();
            }
            let mut out = vec![BattleAction::message(format!("{name}'s {source}!"))];
            out.extend(
                foes.into_iter()
                    .map(|foe| BattleAction::stat_change(foe, *stat, *stages)),
            );
            out
        }
        PassiveEffect::WeatherOnEntry(weather) => {
            if field.conditions.weather() == Some(*weather) {
                return Vec::new();
            }
            vec![
                BattleAction::message(format!("{name}'s {source}!")),
                BattleAction::environment(ActionKind::SetWeather {
                    weather: *weather,
                    turns: field.rules().field_duration,
                }),
            ]
        }
        PassiveEffect::HealAtTurnEnd { denominator } => {
            if holder.hp() >= holder.max_hp() {
                return Vec::new();
            }
            let amount = (holder.max_hp() / (*denominator).max(1)).max(1);
            vec![
                BattleAction::message(format!(
                    "{name} restored a little HP using its {source}!"
                )),
                BattleAction::heal(slot, amount),
            ]
        }
        PassiveEffect::BoostAtTurnEnd { stat, stages } => vec![
            BattleAction::message(format!("{name}'s {source}!")),
            BattleAction::stat_change(slot, *stat, *stages),
        ],
        PassiveEffect::CureStatusOnSwitchOut => {
            if holder.status().is_none() {
                return Vec::new();
            }
            vec![BattleAction::environment(ActionKind::CureStatus { target: slot })]
        }
        PassiveEffect::StatMultiplier { .. }
        | PassiveEffect::LowHpTypeBoost { .. }
        | PassiveEffect::TypeDamageBoost { .. }
        | PassiveEffect::SuperEffectiveBoost { .. }
        | PassiveEffect::TypeDamageReduction { .. }
        | PassiveEffect::SuperEffectiveReduction { .. } => Vec::new(),
    }
}

/// Status chip and sandstorm damage at the end of a turn
fn turn_end_residuals(field: &BattleField, slot: SlotId, mon: &Combatant) -> Vec<BattleAction> {
    let mut out = Vec::new();
    if matches!(
        mon.status(),
        Some(Status::Burn | Status::Poison | Status::BadPoison)
    ) {
        out.push(BattleAction::environment(ActionKind::Residual { target: slot }));
    }

    let sand_proof = [Type::Rock, Type::Ground, Type::Steel]
        .into_iter()
        .any(|t| mon.has_type(t));
    if field.conditions.weather() == Some(Weather::Sand) && !sand_proof {
        out.push(BattleAction::message(format!(
            "{} is buffeted by the sandstorm!",
            mon.name()
        )));
        out.push(BattleAction::damage(slot, (mon.max_hp() / 16).max(1)));
    }
    out
}
