//! Logic phase for every action kind except move use

use clash_battle::constants::{DEFAULT_SCREEN_DURATION, TAILWIND_DURATION};
use clash_battle::formulas::experience_yield;
use clash_battle::{
    BattleOutcome, Room, SideCondition, SideId, SlotId, Stat, Status, Terrain, Trigger, Type,
    Volatile, Weather,
};

use super::{ActionContext, ActionKind, BattleAction, moves};

pub(super) fn run(
    kind: &ActionKind,
    source: Option<SlotId>,
    ctx: &mut ActionContext<'_>,
) -> Vec<BattleAction> {
    match kind {
        ActionKind::UseMove {
            user,
            move_index,
            target,
        } => match source {
            Some(user_slot) => moves::use_move(
                ctx,
                user_slot,
                *user,
                *move_index,
                *target,
                kind.can_be_blocked(),
            ),
            None => {
                tracing::warn!("move action without a user slot");
                Vec::new()
            }
        },
        ActionKind::Damage { target, amount } => damage(ctx, *target, *amount),
        ActionKind::Heal { target, amount } => heal(ctx, *target, *amount),
        ActionKind::StatChange {
            target,
            stat,
            stages,
        } => stat_change(ctx, *target, *stat, *stages),
        ActionKind::ApplyStatus { target, status } => apply_status(ctx, *target, *status),
        ActionKind::CureStatus { target } => cure_status(ctx, *target),
        ActionKind::AddVolatile { target, volatile } => add_volatile(ctx, *target, *volatile),
        ActionKind::Residual { target } => residual(ctx, *target),
        ActionKind::Switch { slot, party_index } => switch(ctx, *slot, *party_index),
        ActionKind::SwitchIn { slot, party_index } => switch_in(ctx, *slot, *party_index),
        ActionKind::Faint { target } => faint(ctx, *target),
        ActionKind::GainExperience {
            side,
            party_index,
            amount,
        } => gain_experience(ctx, *side, *party_index, *amount),
        ActionKind::SetWeather { weather, turns } => set_weather(ctx, *weather, *turns),
        ActionKind::SetTerrain { terrain, turns } => set_terrain(ctx, *terrain, *turns),
        ActionKind::ToggleRoom { room, turns } => toggle_room(ctx, *room, *turns),
        ActionKind::SetSideCondition { side, condition } => {
            set_side_condition(ctx, *side, *condition)
        }
        ActionKind::FieldTick => field_tick(ctx),
        ActionKind::Flee { side } => {
            ctx.field.conclude(BattleOutcome::Fled);
            tracing::info!(side = %side, "side fled");
            Vec::new()
        }
        ActionKind::Message(_) => Vec::new(),
    }
}

fn living_name(ctx: &ActionContext<'_>, target: SlotId) -> Option<String> {
    ctx.field
        .combatant(target)
        .filter(|c| c.is_alive())
        .map(|c| c.name().to_string())
}

fn damage(ctx: &mut ActionContext<'_>, target: SlotId, amount: u32) -> Vec<BattleAction> {
    let Some(mon) = ctx.field.combatant_mut(target) else {
        tracing::warn!(slot = %target, "damage against an empty slot");
        return Vec::new();
    };
    if mon.is_fainted() {
        return Vec::new();
    }
    mon.take_damage(amount);
    if mon.is_fainted() {
        vec![BattleAction::faint(target)]
    } else {
        Vec::new()
    }
}

fn heal(ctx: &mut ActionContext<'_>, target: SlotId, amount: u32) -> Vec<BattleAction> {
    if let Some(mon) = ctx.field.combatant_mut(target) {
        mon.heal(amount);
    }
    Vec::new()
}

/// Text for a stage change of `requested` stages that moved `applied`
fn stage_message(name: &str, stat: Stat, requested: i8, applied: i8) -> String {
    if applied == 0 {
        let direction = if requested > 0 { "higher" } else { "lower" };
        return format!("{name}'s {stat} won't go any {direction}!");
    }
    let verb = match applied {
        1 => "rose",
        2 => "rose sharply",
        3.. => "rose drastically",
        -1 => "fell",
        -2 => "harshly fell",
        _ => "severely fell",
    };
    format!("{name}'s {stat} {verb}!")
}

fn stat_change(
    ctx: &mut ActionContext<'_>,
    target: SlotId,
    stat: Stat,
    stages: i8,
) -> Vec<BattleAction> {
    let Some(name) = living_name(ctx, target) else {
        return Vec::new();
    };
    let Some(slot) = ctx.field.slot_mut(target) else {
        return Vec::new();
    };
    match slot.modify_stat_stage(stat, stages as i32) {
        Ok(applied) => vec![BattleAction::message(stage_message(
            &name, stat, stages, applied,
        ))],
        Err(e) => {
            tracing::warn!(error = %e, slot = %target, "stat change ignored");
            Vec::new()
        }
    }
}

fn status_message(name: &str, status: Status) -> String {
    match status {
        Status::Burn => format!("{name} was burned!"),
        Status::Freeze => format!("{name} was frozen solid!"),
        Status::Paralysis => format!("{name} is paralyzed! It may be unable to move!"),
        Status::Poison => format!("{name} was poisoned!"),
        Status::BadPoison => format!("{name} was badly poisoned!"),
        Status::Sleep => format!("{name} fell asleep!"),
    }
}

fn apply_status(ctx: &mut ActionContext<'_>, target: SlotId, status: Status) -> Vec<BattleAction> {
    let counter = match status {
        Status::Sleep => ctx.rng.range(1, 3),
        Status::BadPoison => 1,
        _ => 0,
    };
    let Some(mon) = ctx.field.combatant_mut(target).filter(|c| c.is_alive()) else {
        return Vec::new();
    };
    let name = mon.name().to_string();
    if status.is_immune(mon.types()) {
        return vec![BattleAction::message(format!("It doesn't affect {name}..."))];
    }
    if mon.set_status(status, counter) {
        vec![BattleAction::message(status_message(&name, status))]
    } else {
        vec![BattleAction::message("But it failed!")]
    }
}

fn cure_status(ctx: &mut ActionContext<'_>, target: SlotId) -> Vec<BattleAction> {
    let Some(mon) = ctx.field.combatant_mut(target) else {
        return Vec::new();
    };
    match mon.cure_status() {
        Some(status) => vec![BattleAction::message(format!(
            "{} was cured of its {}!",
            mon.name(),
            status.as_str().to_lowercase()
        ))],
        None => Vec::new(),
    }
}

fn add_volatile(
    ctx: &mut ActionContext<'_>,
    target: SlotId,
    volatile: Volatile,
) -> Vec<BattleAction> {
    let Some(name) = living_name(ctx, target) else {
        return Vec::new();
    };
    let turns = match volatile {
        Volatile::Confusion => ctx.rng.range(2, 5),
        _ => 0,
    };
    let Some(slot) = ctx.field.slot_mut(target) else {
        return Vec::new();
    };
    let text = match volatile {
        Volatile::Confusion if slot.confuse(turns) => format!("{name} became confused!"),
        Volatile::Confusion => format!("{name} is already confused!"),
        Volatile::Flinch => {
            slot.add_volatile(Volatile::Flinch);
            return Vec::new();
        }
        Volatile::FocusEnergy if slot.add_volatile(volatile) => {
            format!("{name} is getting pumped!")
        }
        Volatile::Protect if slot.add_volatile(volatile) => format!("{name} protected itself!"),
        _ => "But it failed!".to_string(),
    };
    vec![BattleAction::message(text)]
}

/// Burn and poison chip; bad poison grows by 1/16 each turn
fn residual(ctx: &mut ActionContext<'_>, target: SlotId) -> Vec<BattleAction> {
    let Some(mon) = ctx.field.combatant_mut(target).filter(|c| c.is_alive()) else {
        return Vec::new();
    };
    let max = mon.max_hp();
    let (amount, text) = match mon.status() {
        Some(Status::Burn) => (max / 16, format!("{} is hurt by its burn!", mon.name())),
        Some(Status::Poison) => (max / 8, format!("{} is hurt by poison!", mon.name())),
        Some(Status::BadPoison) => {
            let counter = mon.status_counter().max(1);
            mon.set_status_counter(counter.saturating_add(1).min(15));
            (
                max * counter as u32 / 16,
                format!("{} is hurt by poison!", mon.name()),
            )
        }
        _ => return Vec::new(),
    };
    vec![
        BattleAction::message(text),
        BattleAction::damage(target, amount.max(1)),
    ]
}

/// Whether `party_index` can enter `slot` right now
fn can_enter(ctx: &ActionContext<'_>, slot: SlotId, party_index: usize) -> bool {
    let side = ctx.field.side(slot.side);
    let Some(incoming) = side.combatant(party_index) else {
        tracing::warn!(slot = %slot, party_index, "switch to unknown party member");
        return false;
    };
    if incoming.is_fainted() || side.find_active_slot(party_index).is_some() {
        tracing::warn!(slot = %slot, party_index, "switch target unavailable");
        return false;
    }
    true
}

/// Switch-out effects of the current occupant, then the entry itself
fn switch(ctx: &mut ActionContext<'_>, slot: SlotId, party_index: usize) -> Vec<BattleAction> {
    if !can_enter(ctx, slot, party_index) {
        return Vec::new();
    }
    let mut reactions = ctx
        .triggers
        .dispatch_for(Trigger::OnSwitchOut, ctx.field, slot);
    reactions.push(BattleAction::switch_in(slot, party_index));
    reactions
}

fn switch_in(ctx: &mut ActionContext<'_>, slot: SlotId, party_index: usize) -> Vec<BattleAction> {
    if !can_enter(ctx, slot, party_index) {
        return Vec::new();
    }
    let incoming_name = ctx
        .field
        .side(slot.side)
        .combatant(party_index)
        .map(|c| c.name().to_string())
        .unwrap_or_default();

    ctx.field.side_mut(slot.side).switch_in(slot.index, party_index);
    tracing::debug!(slot = %slot, party_index, name = %incoming_name, "switched in");

    let mut reactions = vec![BattleAction::message(format!("Go! {incoming_name}!"))];
    reactions.extend(entry_hazards(ctx, slot));
    reactions.extend(ctx.triggers.dispatch_for(Trigger::OnSwitchIn, ctx.field, slot));
    reactions
}

/// Damage and status from hazards on the side `slot` belongs to
fn entry_hazards(ctx: &mut ActionContext<'_>, slot: SlotId) -> Vec<BattleAction> {
    let side = ctx.field.side(slot.side);
    if !side.has_hazards() {
        return Vec::new();
    }
    let Some(mon) = ctx.field.combatant(slot) else {
        return Vec::new();
    };
    let name = mon.name().to_string();
    let max = mon.max_hp();
    let grounded = !mon.has_type(Type::Flying);
    let mut out = Vec::new();

    if side.has_condition(SideCondition::StealthRock) {
        let factor = Type::Rock.effectiveness_multi(mon.types());
        let amount = ((max as f64 * factor / 8.0).floor() as u32).max(1);
        out.push(BattleAction::message(format!("Pointed stones dug into {name}!")));
        out.push(BattleAction::damage(slot, amount));
    }

    if grounded {
        let spikes = match side.condition_layers(SideCondition::Spikes) {
            0 => 0,
            1 => max / 8,
            2 => max / 6,
            _ => max / 4,
        };
        if side.has_condition(SideCondition::Spikes) {
            out.push(BattleAction::message(format!("{name} is hurt by the spikes!")));
            out.push(BattleAction::damage(slot, spikes.max(1)));
        }
    }

    let toxic_layers = side.condition_layers(SideCondition::ToxicSpikes);
    if grounded && toxic_layers > 0 {
        if mon.has_type(Type::Poison) {
            ctx.field
                .side_mut(slot.side)
                .remove_condition(SideCondition::ToxicSpikes);
            out.push(BattleAction::message(format!(
                "{name} absorbed the poison spikes!"
            )));
        } else {
            let status = if toxic_layers >= 2 {
                Status::BadPoison
            } else {
                Status::Poison
            };
            if mon.can_receive_status(status) {
                out.push(BattleAction::apply_status(slot, status));
            }
        }
    }
    out
}

fn faint(ctx: &mut ActionContext<'_>, target: SlotId) -> Vec<BattleAction> {
    let Some(mon) = ctx.field.combatant(target) else {
        return Vec::new();
    };
    if mon.is_alive() {
        return Vec::new();
    }
    let name = mon.name().to_string();
    let reward = experience_yield(mon.species().base_stats.total(), mon.level());

    ctx.field.side_mut(target.side).clear_slot(target.index);
    tracing::info!(slot = %target, name = %name, "combatant fainted");

    let mut reactions = vec![BattleAction::message(format!("{name} fainted!"))];
    if target.side == SideId::Enemy {
        let player = ctx.field.side(SideId::Player);
        for slot in player.slots() {
            let Some(party_index) = slot.occupant() else {
                continue;
            };
            if player.combatant(party_index).is_some_and(|c| c.is_alive()) {
                reactions.push(BattleAction::environment(ActionKind::GainExperience {
                    side: SideId::Player,
                    party_index,
                    amount: reward,
                }));
            }
        }
    }
    reactions
}

fn gain_experience(
    ctx: &mut ActionContext<'_>,
    side: SideId,
    party_index: usize,
    amount: u32,
) -> Vec<BattleAction> {
    let Some(mon) = ctx.field.side_mut(side).combatant_mut(party_index) else {
        return Vec::new();
    };
    let name = mon.name().to_string();
    match mon.gain_experience(amount) {
        Ok(levels) => {
            let mut out = vec![BattleAction::message(format!(
                "{name} gained {amount} Exp. Points!"
            ))];
            if levels > 0 {
                out.push(BattleAction::message(format!(
                    "{name} grew to level {}!",
                    mon.level()
                )));
            }
            out
        }
        Err(e) => {
            tracing::warn!(error = %e, name = %name, "experience not applied");
            Vec::new()
        }
    }
}

fn set_weather(ctx: &mut ActionContext<'_>, weather: Weather, turns: u8) -> Vec<BattleAction> {
    if !ctx.field.conditions.set_weather(weather, turns) {
        return vec![BattleAction::message("But it failed!")];
    }
    let text = match weather {
        Weather::Sun => "The sunlight turned harsh!",
        Weather::Rain => "It started to rain!",
        Weather::Sand => "A sandstorm kicked up!",
        Weather::Snow => "It started to snow!",
    };
    vec![BattleAction::message(text)]
}

fn set_terrain(ctx: &mut ActionContext<'_>, terrain: Terrain, turns: u8) -> Vec<BattleAction> {
    if !ctx.field.conditions.set_terrain(terrain, turns) {
        return vec![BattleAction::message("But it failed!")];
    }
    vec![BattleAction::message(format!(
        "{terrain} spread across the battlefield!"
    ))]
}

fn toggle_room(ctx: &mut ActionContext<'_>, room: Room, turns: u8) -> Vec<BattleAction> {
    let text = if ctx.field.conditions.toggle_room(room, turns) {
        format!("{room} took effect!")
    } else {
        format!("{room} wore off!")
    };
    vec![BattleAction::message(text)]
}

fn set_side_condition(
    ctx: &mut ActionContext<'_>,
    side: SideId,
    condition: SideCondition,
) -> Vec<BattleAction> {
    let duration = if condition.is_screen() {
        Some(DEFAULT_SCREEN_DURATION)
    } else if condition == SideCondition::Tailwind {
        Some(TAILWIND_DURATION)
    } else {
        None
    };
    if ctx.field.side_mut(side).add_condition(condition, duration) {
        vec![BattleAction::message(format!(
            "{condition} now covers the {side} side!"
        ))]
    } else {
        vec![BattleAction::message("But it failed!")]
    }
}

fn field_tick(ctx: &mut ActionContext<'_>) -> Vec<BattleAction> {
    for id in ctx.field.all_slots() {
        if let Some(slot) = ctx.field.slot_mut(id) {
            slot.clear_turn_volatiles();
        }
    }

    let mut out: Vec<BattleAction> = ctx
        .field
        .conditions
        .tick()
        .into_iter()
        .map(|expired| BattleAction::message(format!("{expired} ended.")))
        .collect();
    for side in SideId::ALL {
        for expired in ctx.field.side_mut(side).tick_conditions() {
            out.push(BattleAction::message(format!(
                "The {side} side's {expired} wore off."
            )));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::DamagePipeline;
    use crate::rng::BattleRng;
    use crate::test_support::{field_vs, field_with, foe, pikachu};
    use crate::triggers::TriggerDispatcher;
    use clash_battle::BattleField;

    fn run_one(field: &mut BattleField, mut action: BattleAction) -> Vec<BattleAction> {
        let pipeline = DamagePipeline::new();
        let mut rng = BattleRng::seeded(7);
        let triggers = TriggerDispatcher::new();
        let mut ctx = ActionContext {
            field,
            pipeline: &pipeline,
            rng: &mut rng,
            triggers: &triggers,
        };
        action.execute_logic(&mut ctx)
    }

    fn messages(actions: &[BattleAction]) -> Vec<String> {
        actions
            .iter()
            .filter_map(|a| match a.kind() {
                ActionKind::Message(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_damage_to_zero_queues_faint() {
        let mut field = field_with(pikachu());
        let reactions = run_one(&mut field, BattleAction::damage(SlotId::enemy(0), 10));
        assert!(reactions.is_empty());
        assert_eq!(field.combatant(SlotId::enemy(0)).unwrap().hp(), 190);

        let reactions = run_one(&mut field, BattleAction::damage(SlotId::enemy(0), 1000));
        assert_eq!(reactions, vec![BattleAction::faint(SlotId::enemy(0))]);
        assert_eq!(field.combatant(SlotId::enemy(0)).unwrap().hp(), 0);
    }

    #[test]
    fn test_faint_clears_slot_and_awards_experience() {
        let mut field = field_with(pikachu());
        field.combatant_mut(SlotId::enemy(0)).unwrap().take_damage(1000);
        let before = field.combatant(SlotId::player(0)).unwrap().experience();

        let reactions = run_one(&mut field, BattleAction::faint(SlotId::enemy(0)));
        assert!(field.slot(SlotId::enemy(0)).unwrap().is_empty());
        assert_eq!(messages(&reactions), vec!["Rattata fainted!".to_string()]);

        let gain = reactions
            .into_iter()
            .find(|a| matches!(a.kind(), ActionKind::GainExperience { .. }))
            .expect("experience reaction");
        run_one(&mut field, gain);
        assert!(field.combatant(SlotId::player(0)).unwrap().experience() > before);
    }

    #[test]
    fn test_stat_change_reports_limits() {
        let mut field = field_with(pikachu());
        let reactions = run_one(
            &mut field,
            BattleAction::stat_change(SlotId::enemy(0), Stat::Attack, -2),
        );
        assert_eq!(
            messages(&reactions),
            vec!["Rattata's Attack harshly fell!".to_string()]
        );

        field
            .slot_mut(SlotId::enemy(0))
            .unwrap()
            .modify_stat_stage(Stat::Attack, -6)
            .unwrap();
        let reactions = run_one(
            &mut field,
            BattleAction::stat_change(SlotId::enemy(0), Stat::Attack, -1),
        );
        assert_eq!(
            messages(&reactions),
            vec!["Rattata's Attack won't go any lower!".to_string()]
        );
    }

    #[test]
    fn test_apply_status_respects_immunity() {
        let mut field = field_vs(pikachu(), foe("Geodude", vec![Type::Rock, Type::Ground]));
        run_one(
            &mut field,
            BattleAction::apply_status(SlotId::player(0), Status::Paralysis),
        );
        // Electric types cannot be paralyzed
        assert_eq!(field.combatant(SlotId::player(0)).unwrap().status(), None);

        run_one(
            &mut field,
            BattleAction::apply_status(SlotId::enemy(0), Status::Burn),
        );
        assert_eq!(
            field.combatant(SlotId::enemy(0)).unwrap().status(),
            Some(Status::Burn)
        );

        let reactions = run_one(
            &mut field,
            BattleAction::apply_status(SlotId::enemy(0), Status::Poison),
        );
        assert_eq!(messages(&reactions), vec!["But it failed!".to_string()]);
    }

    #[test]
    fn test_bad_poison_residual_grows() {
        let mut field = field_with(pikachu());
        run_one(
            &mut field,
            BattleAction::apply_status(SlotId::enemy(0), Status::BadPoison),
        );

        let first = run_one(
            &mut field,
            BattleAction::environment(ActionKind::Residual {
                target: SlotId::enemy(0),
            }),
        );
        assert_eq!(first[1], BattleAction::damage(SlotId::enemy(0), 12));

        let second = run_one(
            &mut field,
            BattleAction::environment(ActionKind::Residual {
                target: SlotId::enemy(0),
            }),
        );
        assert_eq!(second[1], BattleAction::damage(SlotId::enemy(0), 25));
    }

    #[test]
    fn test_switch_applies_spikes() {
        let mut field = BattleField::new(
            clash_battle::BattleRules::singles(),
            vec![pikachu(), foe("Rattata", vec![Type::Normal])],
            vec![foe("Pidgey", vec![Type::Normal, Type::Flying])],
        )
        .unwrap();
        field.side_mut(SideId::Player).send_out_leads();
        field.side_mut(SideId::Enemy).send_out_leads();
        field
            .side_mut(SideId::Player)
            .add_condition(SideCondition::Spikes, None);

        let reactions = run_one(&mut field, BattleAction::switch(SlotId::player(0), 1));
        assert_eq!(reactions, vec![BattleAction::switch_in(SlotId::player(0), 1)]);
        assert_eq!(field.slot(SlotId::player(0)).unwrap().occupant(), Some(0));

        let entry = reactions.into_iter().next().unwrap();
        let reactions = run_one(&mut field, entry);
        assert_eq!(field.slot(SlotId::player(0)).unwrap().occupant(), Some(1));
        assert!(reactions.contains(&BattleAction::damage(SlotId::player(0), 25)));
        assert_eq!(
            messages(&reactions),
            vec![
                "Go! Rattata!".to_string(),
                "Rattata is hurt by the spikes!".to_string()
            ]
        );
    }

    #[test]
    fn test_switch_to_active_member_is_ignored() {
        let mut field = field_with(pikachu());
        let reactions = run_one(&mut field, BattleAction::switch(SlotId::player(0), 0));
        assert!(reactions.is_empty());
        assert_eq!(field.slot(SlotId::player(0)).unwrap().occupant(), Some(0));
    }

    #[test]
    fn test_field_tick_expires_screens() {
        let mut field = field_with(pikachu());
        field
            .side_mut(SideId::Enemy)
            .add_condition(SideCondition::Reflect, Some(1));
        field
            .slot_mut(SlotId::player(0))
            .unwrap()
            .add_volatile(Volatile::Flinch);

        let reactions = run_one(&mut field, BattleAction::field_tick());
        assert!(!field.side(SideId::Enemy).has_condition(SideCondition::Reflect));
        assert!(!field
            .slot(SlotId::player(0))
            .unwrap()
            .has_volatile(Volatile::Flinch));
        assert_eq!(
            messages(&reactions),
            vec!["The enemy side's Reflect wore off.".to_string()]
        );
    }

    #[test]
    fn test_flee_concludes_battle() {
        let mut field = field_with(pikachu());
        run_one(&mut field, BattleAction::flee(SlotId::player(0)));
        assert_eq!(field.forced_outcome(), Some(BattleOutcome::Fled));
    }

    #[test]
    fn test_executes_once() {
        let mut field = field_with(pikachu());
        let pipeline = DamagePipeline::new();
        let mut rng = BattleRng::seeded(1);
        let triggers = TriggerDispatcher::new();
        let mut ctx = ActionContext {
            field: &mut field,
            pipeline: &pipeline,
            rng: &mut rng,
            triggers: &triggers,
        };
        let mut action = BattleAction::damage(SlotId::enemy(0), 10);
        action.execute_logic(&mut ctx);
        action.execute_logic(&mut ctx);
        assert!(action.is_executed());
        assert_eq!(field.combatant(SlotId::enemy(0)).unwrap().hp(), 190);
    }
}
