//! Logic phase of a move use
//!
//! Checks run in a fixed order: the user must still be on the field, then
//! sleep, freeze, paralysis, flinch and confusion get a chance to stop it.
//! A move that goes ahead spends PP, finds a living target, passes protect
//! and accuracy, and only then reaches the damage pipeline and its effects.

use std::sync::Arc;

use clash_battle::constants::{
    CONFUSION_SELF_HIT_CHANCE, CONFUSION_SELF_HIT_POWER, FULL_PARALYSIS_CHANCE, THAW_CHANCE,
};
use clash_battle::formulas::accuracy_stage_multiplier;
use clash_battle::{
    EffectTarget, MoveCategory, MoveData, MoveEffect, SlotId, Stat, Status, Type, Volatile,
};

use super::{ActionContext, ActionKind, BattleAction};
use crate::damage::{DamageContext, DamageOverrides};

pub(super) fn use_move(
    ctx: &mut ActionContext<'_>,
    user_slot: SlotId,
    user: usize,
    move_index: usize,
    target: SlotId,
    blockable: bool,
) -> Vec<BattleAction> {
    let still_active = ctx.field.slot(user_slot).and_then(|s| s.occupant()) == Some(user)
        && ctx.field.combatant(user_slot).is_some_and(|c| c.is_alive());
    if !still_active {
        tracing::debug!(slot = %user_slot, user, "move skipped, user left the field");
        let name = ctx
            .field
            .side(user_slot.side)
            .combatant(user)
            .map(|c| c.name().to_string())
            .unwrap_or_default();
        return vec![BattleAction::message(format!("{name} can't move!"))];
    }

    let Some((name, move_data)) = ctx.field.combatant(user_slot).and_then(|c| {
        c.move_slot(move_index)
            .map(|m| (c.name().to_string(), Arc::clone(&m.data)))
    }) else {
        tracing::warn!(slot = %user_slot, move_index, "move index out of range");
        return Vec::new();
    };

    let mut out = Vec::new();
    if !can_act(ctx, user_slot, &name, &mut out) {
        return out;
    }

    let has_pp = ctx
        .field
        .combatant_mut(user_slot)
        .is_some_and(|c| c.deduct_pp(move_index));
    if !has_pp {
        out.push(BattleAction::message(format!(
            "{name} has no PP left for {}!",
            move_data.name
        )));
        return out;
    }
    out.push(BattleAction::message(format!(
        "{name} used {}!",
        move_data.name
    )));

    let target = if needs_target(&move_data) {
        match resolve_target(ctx, user_slot, target) {
            Some(t) => t,
            None => {
                out.push(BattleAction::message("But there was no target..."));
                return out;
            }
        }
    } else {
        user_slot
    };

    let target_name = ctx
        .field
        .combatant(target)
        .map(|c| c.name().to_string())
        .unwrap_or_default();

    if target != user_slot {
        let protected = blockable
            && ctx
                .field
                .slot(target)
                .is_some_and(|s| s.has_volatile(Volatile::Protect));
        if protected {
            out.push(BattleAction::message(format!(
                "{target_name} protected itself!"
            )));
            return out;
        }

        if let Some(accuracy) = move_data.accuracy {
            let stage =
                stage_of(ctx, user_slot, Stat::Accuracy) - stage_of(ctx, target, Stat::Evasion);
            let hit = accuracy as f64 / 100.0 * accuracy_stage_multiplier(stage);
            if !ctx.rng.chance(hit) {
                out.push(BattleAction::message(format!("{name}'s attack missed!")));
                return out;
            }
        }
    }

    let mut dealt = 0;
    let mut target_faints = false;
    if move_data.is_damaging() {
        let result = ctx.pipeline.calculate(
            ctx.field,
            user_slot,
            target,
            &move_data,
            DamageOverrides::default(),
            ctx.rng,
        );
        let (amount, critical, effectiveness, target_hp) = match result {
            Ok(dmg) => (
                dmg.final_damage,
                dmg.is_critical,
                dmg.type_effectiveness,
                dmg.defender_mon().hp(),
            ),
            Err(e) => {
                tracing::warn!(error = %e, "damage calculation failed");
                return out;
            }
        };

        if effectiveness == 0.0 {
            out.push(BattleAction::message(format!(
                "It doesn't affect {target_name}..."
            )));
            return out;
        }
        if critical {
            out.push(BattleAction::message("A critical hit!"));
        }
        if effectiveness > 1.0 {
            out.push(BattleAction::message("It's super effective!"));
        } else if effectiveness < 1.0 {
            out.push(BattleAction::message("It's not very effective..."));
        }
        out.push(BattleAction::damage(target, amount));
        dealt = amount.min(target_hp);
        target_faints = amount >= target_hp;
    }

    let hit = Hit {
        user_slot,
        target,
        name: &name,
        target_name: &target_name,
        dealt,
        target_faints,
    };
    for effect in &move_data.effects {
        apply_effect(ctx, effect, &hit, &mut out);
    }
    out
}

/// What a move did, as seen by its secondary effects
struct Hit<'a> {
    user_slot: SlotId,
    target: SlotId,
    name: &'a str,
    target_name: &'a str,
    /// HP actually removed from the target
    dealt: u32,
    target_faints: bool,
}

/// Status and volatile checks before a move; false means the turn is lost
fn can_act(
    ctx: &mut ActionContext<'_>,
    user_slot: SlotId,
    name: &str,
    out: &mut Vec<BattleAction>,
) -> bool {
    let Some(mon) = ctx.field.combatant_mut(user_slot) else {
        return false;
    };
    match mon.status() {
        Some(Status::Sleep) => {
            let counter = mon.status_counter();
            if counter == 0 {
                mon.cure_status();
                out.push(BattleAction::message(format!("{name} woke up!")));
            } else {
                mon.set_status_counter(counter - 1);
                out.push(BattleAction::message(format!("{name} is fast asleep.")));
                return false;
            }
        }
        Some(Status::Freeze) => {
            if ctx.rng.chance(THAW_CHANCE) {
                mon.cure_status();
                out.push(BattleAction::message(format!("{name} thawed out!")));
            } else {
                out.push(BattleAction::message(format!("{name} is frozen solid!")));
                return false;
            }
        }
        Some(Status::Paralysis) if ctx.rng.chance(FULL_PARALYSIS_CHANCE) => {
            out.push(BattleAction::message(format!(
                "{name} is paralyzed! It can't move!"
            )));
            return false;
        }
        _ => {}
    }

    let Some(slot) = ctx.field.slot_mut(user_slot) else {
        return false;
    };
    if slot.has_volatile(Volatile::Flinch) {
        out.push(BattleAction::message(format!(
            "{name} flinched and couldn't move!"
        )));
        return false;
    }
    if slot.has_volatile(Volatile::Confusion) {
        if slot.tick_confusion() {
            out.push(BattleAction::message(format!(
                "{name} snapped out of its confusion!"
            )));
        } else {
            out.push(BattleAction::message(format!("{name} is confused!")));
            if ctx.rng.chance(CONFUSION_SELF_HIT_CHANCE) {
                let amount = confusion_damage(ctx, user_slot);
                out.push(BattleAction::message("It hurt itself in its confusion!"));
                out.push(BattleAction::damage(user_slot, amount));
                return false;
            }
        }
    }
    true
}

/// Typeless physical hit against itself, never critical
fn confusion_damage(ctx: &mut ActionContext<'_>, slot: SlotId) -> u32 {
    let self_hit = MoveData::new(
        "Confusion",
        Type::Normal,
        MoveCategory::Physical,
        CONFUSION_SELF_HIT_POWER,
    );
    let dmg = match DamageContext::new(ctx.field, slot, slot, &self_hit) {
        Ok(dmg) => dmg,
        Err(e) => {
            tracing::warn!(error = %e, "confusion self-hit without a combatant");
            return 0;
        }
    };
    let mut dmg = dmg.with_typeless().with_overrides(DamageOverrides {
        force_critical: Some(false),
        fixed_random: None,
    });
    ctx.pipeline.run(&mut dmg, ctx.rng);
    dmg.final_damage
}

fn needs_target(move_data: &MoveData) -> bool {
    move_data.is_damaging()
        || move_data.effects.iter().any(|effect| {
            matches!(
                effect,
                MoveEffect::InflictStatus { .. }
                    | MoveEffect::StatChange {
                        target: EffectTarget::Target,
                        ..
                    }
                    | MoveEffect::AddVolatile {
                        target: EffectTarget::Target,
                        ..
                    }
            )
        })
}

/// Keep the chosen target if it can still be hit, else the first living foe
fn resolve_target(ctx: &ActionContext<'_>, user_slot: SlotId, chosen: SlotId) -> Option<SlotId> {
    let alive = ctx.field.combatant(chosen).is_some_and(|c| c.is_alive());
    if chosen != user_slot && alive {
        return Some(chosen);
    }
    let retarget = ctx.field.foes_of(user_slot).into_iter().next();
    if let Some(new_target) = retarget {
        tracing::debug!(from = %chosen, to = %new_target, "retargeted move");
    }
    retarget
}

fn stage_of(ctx: &ActionContext<'_>, slot: SlotId, stat: Stat) -> i8 {
    ctx.field.slot(slot).map_or(0, |s| s.stage(stat))
}

fn effect_slot(effect_target: EffectTarget, user_slot: SlotId, target: SlotId) -> SlotId {
    match effect_target {
        EffectTarget::User => user_slot,
        EffectTarget::Target => target,
    }
}

fn apply_effect(
    ctx: &mut ActionContext<'_>,
    effect: &MoveEffect,
    hit: &Hit<'_>,
    out: &mut Vec<BattleAction>,
) {
    let Hit {
        user_slot,
        target,
        name,
        target_name,
        dealt,
        target_faints,
    } = *hit;
    let chance = effect.chance();
    let duration = ctx.field.rules().field_duration;
    match effect {
        MoveEffect::StatChange {
            target: who,
            stat,
            stages,
            ..
        } => {
            let slot = effect_slot(*who, user_slot, target);
            if slot == target && slot != user_slot && target_faints {
                return;
            }
            if ctx.rng.percent(chance) {
                out.push(BattleAction::stat_change(slot, *stat, *stages));
            }
        }
        MoveEffect::InflictStatus { status, .. } => {
            if target_faints {
                return;
            }
            let receptive = ctx
                .field
                .combatant(target)
                .is_some_and(|c| c.can_receive_status(*status));
            // Secondary effects fail silently; a pure status move reports why
            if chance < 100 && !receptive {
                return;
            }
            if ctx.rng.percent(chance) {
                out.push(BattleAction::apply_status(target, *status));
            }
        }
        MoveEffect::AddVolatile {
            target: who,
            volatile,
            ..
        } => {
            let slot = effect_slot(*who, user_slot, target);
            if slot == target && slot != user_slot && target_faints {
                return;
            }
            if ctx.rng.percent(chance) {
                out.push(BattleAction::environment(ActionKind::AddVolatile {
                    target: slot,
                    volatile: *volatile,
                }));
            }
        }
        MoveEffect::Drain { percent } => {
            if dealt > 0 {
                let amount = (dealt * *percent as u32 / 100).max(1);
                out.push(BattleAction::message(format!(
                    "{target_name} had its energy drained!"
                )));
                out.push(BattleAction::heal(user_slot, amount));
            }
        }
        MoveEffect::Recoil { percent } => {
            if dealt > 0 {
                let amount = (dealt * *percent as u32 / 100).max(1);
                out.push(BattleAction::message(format!(
                    "{name} is damaged by recoil!"
                )));
                out.push(BattleAction::damage(user_slot, amount));
            }
        }
        MoveEffect::Heal { percent } => {
            let Some(mon) = ctx.field.combatant(user_slot) else {
                return;
            };
            if mon.hp() == mon.max_hp() {
                out.push(BattleAction::message(format!("{name}'s HP is full!")));
                return;
            }
            let amount = (mon.max_hp() * *percent as u32 / 100).max(1);
            out.push(BattleAction::message(format!("{name} regained health!")));
            out.push(BattleAction::heal(user_slot, amount));
        }
        MoveEffect::SetWeather(weather) => out.push(BattleAction::environment(
            ActionKind::SetWeather {
                weather: *weather,
                turns: duration,
            },
        )),
        MoveEffect::SetTerrain(terrain) => out.push(BattleAction::environment(
            ActionKind::SetTerrain {
                terrain: *terrain,
                turns: duration,
            },
        )),
        MoveEffect::ToggleRoom(room) => out.push(BattleAction::environment(
            ActionKind::ToggleRoom {
                room: *room,
                turns: duration,
            },
        )),
        MoveEffect::SetSideCondition { condition, side } => {
            let side = match side {
                EffectTarget::User => user_slot.side,
                EffectTarget::Target => user_slot.side.opponent(),
            };
            out.push(BattleAction::environment(ActionKind::SetSideCondition {
                side,
                condition: *condition,
            }));
        }
        MoveEffect::HighCritRatio => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::DamagePipeline;
    use crate::rng::BattleRng;
    use crate::test_support::{field_vs, field_with, foe, pikachu};
    use crate::triggers::TriggerDispatcher;
    use clash_battle::{BattleField, Combatant, CombatantConfig, SideCondition, SideId};

    fn use_first_move(field: &mut BattleField, seed: u64) -> Vec<BattleAction> {
        use_move_at(field, 0, seed)
    }

    fn use_move_at(field: &mut BattleField, move_index: usize, seed: u64) -> Vec<BattleAction> {
        let pipeline = DamagePipeline::new();
        let mut rng = BattleRng::seeded(seed);
        let triggers = TriggerDispatcher::new();
        let mut ctx = ActionContext {
            field,
            pipeline: &pipeline,
            rng: &mut rng,
            triggers: &triggers,
        };
        let mut action = BattleAction::use_move(SlotId::player(0), 0, move_index, SlotId::enemy(0), 0);
        action.execute_logic(&mut ctx)
    }

    fn texts(actions: &[BattleAction]) -> Vec<String> {
        actions
            .iter()
            .filter_map(|a| match a.kind() {
                ActionKind::Message(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn damage_to(actions: &[BattleAction], slot: SlotId) -> Option<u32> {
        actions.iter().find_map(|a| match a.kind() {
            ActionKind::Damage { target, amount } if *target == slot => Some(*amount),
            _ => None,
        })
    }

    #[test]
    fn test_move_produces_damage_and_spends_pp() {
        let mut field = field_with(pikachu());
        let reactions = use_first_move(&mut field, 3);
        assert_eq!(texts(&reactions)[0], "Pikachu used Tackle!");
        assert!(damage_to(&reactions, SlotId::enemy(0)).is_some_and(|d| d > 0));
        // Damage is deferred to the reaction
        assert_eq!(field.combatant(SlotId::enemy(0)).unwrap().hp(), 200);

        let slot = field.combatant(SlotId::player(0)).unwrap().move_slot(0).unwrap();
        assert_eq!(slot.pp, slot.data.max_pp - 1);
    }

    #[test]
    fn test_fainted_user_cannot_move() {
        let mut field = field_with(pikachu());
        field.combatant_mut(SlotId::player(0)).unwrap().take_damage(1000);
        let reactions = use_first_move(&mut field, 3);
        assert_eq!(texts(&reactions), vec!["Pikachu can't move!".to_string()]);
        assert_eq!(damage_to(&reactions, SlotId::enemy(0)), None);
    }

    #[test]
    fn test_withdrawn_user_cannot_move() {
        let mut field = field_with(pikachu());
        field.side_mut(SideId::Player).clear_slot(0);
        let reactions = use_first_move(&mut field, 3);
        assert_eq!(texts(&reactions), vec!["Pikachu can't move!".to_string()]);
        let slot = field.side(SideId::Player).combatant(0).unwrap().move_slot(0).unwrap();
        assert_eq!(slot.pp, slot.data.max_pp);
    }

    #[test]
    fn test_no_pp_left() {
        let mut field = field_with(pikachu());
        let mon = field.combatant_mut(SlotId::player(0)).unwrap();
        while mon.deduct_pp(0) {}
        let reactions = use_first_move(&mut field, 3);
        assert_eq!(texts(&reactions), vec!["Pikachu has no PP left for Tackle!".to_string()]);
    }

    #[test]
    fn test_immune_target() {
        let mut field = field_vs(pikachu(), foe("Gastly", vec![Type::Ghost, Type::Poison]));
        let reactions = use_first_move(&mut field, 3);
        assert_eq!(damage_to(&reactions, SlotId::enemy(0)), None);
        assert!(texts(&reactions).contains(&"It doesn't affect Gastly...".to_string()));
    }

    #[test]
    fn test_super_effective_message() {
        let mut field = field_vs(pikachu(), foe("Squirtle", vec![Type::Water]));
        let reactions = use_move_at(&mut field, 1, 3);
        assert!(texts(&reactions).contains(&"It's super effective!".to_string()));
    }

    #[test]
    fn test_sleeping_user_loses_turn() {
        let mut field = field_with(pikachu());
        field
            .combatant_mut(SlotId::player(0))
            .unwrap()
            .set_status(Status::Sleep, 1);

        let reactions = use_first_move(&mut field, 3);
        assert_eq!(texts(&reactions), vec!["Pikachu is fast asleep.".to_string()]);

        let reactions = use_first_move(&mut field, 3);
        assert_eq!(texts(&reactions)[0], "Pikachu woke up!");
        assert_eq!(field.combatant(SlotId::player(0)).unwrap().status(), None);
    }

    #[test]
    fn test_flinch_stops_move() {
        let mut field = field_with(pikachu());
        field
            .slot_mut(SlotId::player(0))
            .unwrap()
            .add_volatile(Volatile::Flinch);
        let reactions = use_first_move(&mut field, 3);
        assert_eq!(
            texts(&reactions),
            vec!["Pikachu flinched and couldn't move!".to_string()]
        );
    }

    #[test]
    fn test_protect_blocks_move() {
        let mut field = field_with(pikachu());
        field
            .slot_mut(SlotId::enemy(0))
            .unwrap()
            .add_volatile(Volatile::Protect);
        let reactions = use_first_move(&mut field, 3);
        assert_eq!(damage_to(&reactions, SlotId::enemy(0)), None);
        assert!(texts(&reactions).contains(&"Rattata protected itself!".to_string()));
    }

    #[test]
    fn test_protect_only_stops_blockable_moves() {
        let mut field = field_with(pikachu());
        field
            .slot_mut(SlotId::enemy(0))
            .unwrap()
            .add_volatile(Volatile::Protect);
        let pipeline = DamagePipeline::new();
        let mut rng = BattleRng::seeded(3);
        let triggers = TriggerDispatcher::new();
        let mut ctx = ActionContext {
            field: &mut field,
            pipeline: &pipeline,
            rng: &mut rng,
            triggers: &triggers,
        };
        let reactions = use_move(&mut ctx, SlotId::player(0), 0, 0, SlotId::enemy(0), false);
        assert!(!texts(&reactions).contains(&"Rattata protected itself!".to_string()));
        assert!(damage_to(&reactions, SlotId::enemy(0)).is_some_and(|d| d > 0));
    }

    #[test]
    fn test_retargets_to_living_foe() {
        let mut field = field_with(pikachu());
        let pipeline = DamagePipeline::new();
        let mut rng = BattleRng::seeded(3);
        let triggers = TriggerDispatcher::new();
        let mut ctx = ActionContext {
            field: &mut field,
            pipeline: &pipeline,
            rng: &mut rng,
            triggers: &triggers,
        };
        // Aimed at itself, a damaging move lands on the foe instead
        let mut action = BattleAction::use_move(SlotId::player(0), 0, 0, SlotId::player(0), 0);
        let reactions = action.execute_logic(&mut ctx);
        assert!(damage_to(&reactions, SlotId::enemy(0)).is_some());
    }

    #[test]
    fn test_status_move_effects() {
        let growl = Arc::new(
            MoveData::new("Growl", Type::Normal, MoveCategory::Status, 0).with_effect(
                MoveEffect::StatChange {
                    target: EffectTarget::Target,
                    stat: Stat::Attack,
                    stages: -1,
                    chance: 100,
                },
            ),
        );
        let spikes = Arc::new(
            MoveData::new("Spikes", Type::Ground, MoveCategory::Status, 0)
                .with_accuracy(None)
                .with_effect(MoveEffect::SetSideCondition {
                    condition: SideCondition::Spikes,
                    side: EffectTarget::Target,
                }),
        );
        let base = pikachu();
        let species = Arc::new(base.species().clone().with_learnset(["Growl", "Spikes"]));
        let config = CombatantConfig::new(50, Arc::clone(base.ability()), vec![growl, spikes]);
        let user = Combatant::new(species, config).unwrap();
        let mut field = field_with(user);

        let reactions = use_move_at(&mut field, 0, 3);
        assert!(reactions.contains(&BattleAction::stat_change(
            SlotId::enemy(0),
            Stat::Attack,
            -1
        )));

        let reactions = use_move_at(&mut field, 1, 3);
        assert!(reactions.contains(&BattleAction::environment(
            ActionKind::SetSideCondition {
                side: SideId::Enemy,
                condition: SideCondition::Spikes,
            }
        )));
    }

    #[test]
    fn test_recoil_scales_with_damage_dealt() {
        let mut field = field_with(pikachu());
        let pipeline = DamagePipeline::new();
        let mut rng = BattleRng::seeded(3);
        let triggers = TriggerDispatcher::new();
        let mut ctx = ActionContext {
            field: &mut field,
            pipeline: &pipeline,
            rng: &mut rng,
            triggers: &triggers,
        };
        let hit = Hit {
            user_slot: SlotId::player(0),
            target: SlotId::enemy(0),
            name: "Pikachu",
            target_name: "Rattata",
            dealt: 60,
            target_faints: false,
        };
        let mut out = Vec::new();
        apply_effect(&mut ctx, &MoveEffect::Recoil { percent: 33 }, &hit, &mut out);
        assert_eq!(out[1], BattleAction::damage(SlotId::player(0), 19));

        let mut out = Vec::new();
        let missed = Hit { dealt: 0, ..hit };
        apply_effect(&mut ctx, &MoveEffect::Drain { percent: 50 }, &missed, &mut out);
        assert!(out.is_empty());
    }
}
