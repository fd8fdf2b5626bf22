//! Turn order resolution
//!
//! Actions sort by priority (highest first), then by the effective speed of
//! their source. Trick Room flips the speed comparison within a priority
//! tier. Exact ties fall back to a random key drawn from the battle RNG.

use std::cmp::Ordering;

use clash_battle::{BattleField, Room, SideCondition, SlotId, Stat};

use crate::action::BattleAction;
use crate::modifiers;
use crate::rng::BattleRng;

#[derive(Debug, Clone, Copy, Default)]
pub struct TurnOrderResolver;

impl TurnOrderResolver {
    pub fn new() -> Self {
        Self
    }

    /// Speed used for ordering: stages, status, passive multipliers, Tailwind
    ///
    /// Empty slots and sourceless actions move at speed 0.
    pub fn effective_speed(field: &BattleField, slot: SlotId) -> u32 {
        let Some(staged) = field.effective_stat(slot, Stat::Speed) else {
            return 0;
        };
        let mut speed = staged as f64 * modifiers::stat_multiplier(field, slot, Stat::Speed);
        if field.side(slot.side).has_condition(SideCondition::Tailwind) {
            speed *= 2.0;
        }
        speed.floor() as u32
    }

    /// Order `actions` for execution
    ///
    /// Every action draws one tiebreak key so the number of RNG draws does
    /// not depend on whether ties occur.
    pub fn sort_actions(
        &self,
        actions: Vec<BattleAction>,
        field: &BattleField,
        rng: &mut BattleRng,
    ) -> Vec<BattleAction> {
        let trick_room = field.conditions.has_room(Room::TrickRoom);
        let mut keyed: Vec<(i8, u32, u64, BattleAction)> = actions
            .into_iter()
            .map(|action| {
                let speed = action
                    .source()
                    .map_or(0, |slot| Self::effective_speed(field, slot));
                (action.priority(), speed, rng.tiebreak(), action)
            })
            .collect();

        keyed.sort_by(|a, b| {
            let by_speed = if trick_room {
                a.1.cmp(&b.1)
            } else {
                b.1.cmp(&a.1)
            };
            b.0.cmp(&a.0)
                .then(by_speed)
                .then_with(|| a.2.cmp(&b.2))
        });

        let sorted: Vec<BattleAction> = keyed.into_iter().map(|(.., action)| action).collect();
        tracing::trace!(
            order = ?sorted.iter().map(|a| a.source()).collect::<Vec<_>>(),
            trick_room,
            "sorted actions"
        );
        sorted
    }

    /// Compare two actions without a tiebreak; `Equal` means a speed tie
    pub fn compare(&self, a: &BattleAction, b: &BattleAction, field: &BattleField) -> Ordering {
        let speed = |action: &BattleAction| {
            action
                .source()
                .map_or(0, |slot| Self::effective_speed(field, slot))
        };
        let by_speed = if field.conditions.has_room(Room::TrickRoom) {
            speed(a).cmp(&speed(b))
        } else {
            speed(b).cmp(&speed(a))
        };
        b.priority().cmp(&a.priority()).then(by_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{field_with, pikachu};
    use clash_battle::{SideId, Status};

    fn opposing_moves() -> (BattleAction, BattleAction) {
        (
            BattleAction::use_move(SlotId::player(0), 0, 0, SlotId::enemy(0), 0),
            BattleAction::use_move(SlotId::enemy(0), 0, 0, SlotId::player(0), 0),
        )
    }

    fn slow_player(field: &mut BattleField) {
        field
            .slot_mut(SlotId::player(0))
            .unwrap()
            .modify_stat_stage(Stat::Speed, -1)
            .unwrap();
    }

    #[test]
    fn test_priority_beats_speed() {
        let mut field = field_with(pikachu());
        slow_player(&mut field);
        let quick = BattleAction::use_move(SlotId::player(0), 0, 0, SlotId::enemy(0), 1);
        let (_, enemy) = opposing_moves();

        let sorted = TurnOrderResolver::new().sort_actions(
            vec![enemy, quick.clone()],
            &field,
            &mut BattleRng::seeded(1),
        );
        assert_eq!(sorted[0], quick);
    }

    #[test]
    fn test_faster_moves_first() {
        let mut field = field_with(pikachu());
        slow_player(&mut field);
        let (player, enemy) = opposing_moves();

        let sorted = TurnOrderResolver::new().sort_actions(
            vec![player, enemy.clone()],
            &field,
            &mut BattleRng::seeded(1),
        );
        assert_eq!(sorted[0], enemy);
    }

    #[test]
    fn test_trick_room_reverses_speed() {
        let mut field = field_with(pikachu());
        slow_player(&mut field);
        field.conditions.toggle_room(Room::TrickRoom, 5);
        let (player, enemy) = opposing_moves();

        let sorted = TurnOrderResolver::new().sort_actions(
            vec![enemy, player.clone()],
            &field,
            &mut BattleRng::seeded(1),
        );
        assert_eq!(sorted[0], player);
    }

    #[test]
    fn test_tailwind_and_paralysis() {
        let mut field = field_with(pikachu());
        assert_eq!(TurnOrderResolver::effective_speed(&field, SlotId::player(0)), 100);

        field
            .side_mut(SideId::Player)
            .add_condition(SideCondition::Tailwind, Some(4));
        assert_eq!(TurnOrderResolver::effective_speed(&field, SlotId::player(0)), 200);

        field
            .combatant_mut(SlotId::enemy(0))
            .unwrap()
            .set_status(Status::Paralysis, 0);
        assert_eq!(TurnOrderResolver::effective_speed(&field, SlotId::enemy(0)), 25);
        assert_eq!(TurnOrderResolver::effective_speed(&field, SlotId::enemy(1)), 0);
    }

    #[test]
    fn test_speed_ties_are_seeded() {
        let field = field_with(pikachu());
        let resolver = TurnOrderResolver::new();
        let (player, enemy) = opposing_moves();
        assert_eq!(resolver.compare(&player, &enemy, &field), Ordering::Equal);

        let first = |seed| {
            resolver.sort_actions(
                vec![player.clone(), enemy.clone()],
                &field,
                &mut BattleRng::seeded(seed),
            )[0]
                .clone()
        };
        assert_eq!(first(11), first(11));
        let winners: std::collections::HashSet<Option<SlotId>> =
            (0..32).map(|seed| first(seed).source()).collect();
        assert_eq!(winners.len(), 2);
    }
}
