//! FIFO action queue with front insertion for reactions

use std::collections::VecDeque;

use super::{ActionContext, BattleAction};
use crate::log::BattleLog;
use crate::view::BattleView;

#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    actions: VecDeque<BattleAction>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn enqueue(&mut self, action: BattleAction) {
        self.actions.push_back(action);
    }

    pub fn enqueue_range(&mut self, actions: impl IntoIterator<Item = BattleAction>) {
        self.actions.extend(actions);
    }

    /// Put `actions` at the head of the queue, keeping their relative order
    pub fn insert_at_front(&mut self, actions: Vec<BattleAction>) {
        for action in actions.into_iter().rev() {
            self.actions.push_front(action);
        }
    }

    pub fn pop(&mut self) -> Option<BattleAction> {
        self.actions.pop_front()
    }

    pub fn peek(&self) -> Option<&BattleAction> {
        self.actions.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleAction> {
        self.actions.iter()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Drain the queue, presenting each action after its logic has run
    ///
    /// Reactions jump ahead of everything already queued. Once an action
    /// forces an outcome, whatever is still queued is dropped. Returns the
    /// number of actions processed.
    pub async fn process_queue(
        &mut self,
        ctx: &mut ActionContext<'_>,
        view: &dyn BattleView,
        log: &mut BattleLog,
    ) -> usize {
        let mut processed = 0;
        while let Some(action) = self.step(ctx, log) {
            action.execute_visual(view, ctx.field).await;
            processed += 1;
        }
        processed
    }

    /// Drain the queue without presentation, for lookahead and tests
    pub fn process_headless(&mut self, ctx: &mut ActionContext<'_>, log: &mut BattleLog) -> usize {
        let mut processed = 0;
        while self.step(ctx, log).is_some() {
            processed += 1;
        }
        processed
    }

    fn step(&mut self, ctx: &mut ActionContext<'_>, log: &mut BattleLog) -> Option<BattleAction> {
        let mut action = self.actions.pop_front()?;
        let reactions = action.execute_logic(ctx);
        self.insert_at_front(reactions);
        log.record(ctx.field.turn(), &action);

        if let Some(outcome) = ctx.field.forced_outcome() {
            if !self.actions.is_empty() {
                tracing::debug!(
                    outcome = %outcome,
                    dropped = self.actions.len(),
                    "battle concluded, dropping queued actions"
                );
                self.actions.clear();
            }
        }
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::DamagePipeline;
    use crate::rng::BattleRng;
    use crate::test_support::{attacker_with, field_with, foe, pikachu};
    use crate::triggers::TriggerDispatcher;
    use crate::view::NullView;
    use clash_battle::{
        AbilityData, BattleField, BattleRules, PassiveEffect, SideId, SlotId, Status, Type,
    };

    #[test]
    fn test_insert_at_front_keeps_order() {
        let mut queue = ActionQueue::new();
        queue.enqueue(BattleAction::message("c"));
        queue.insert_at_front(vec![BattleAction::message("a"), BattleAction::message("b")]);
        let order: Vec<String> = queue.iter().map(|a| a.to_string()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(queue.peek(), Some(&BattleAction::message("a")));
    }

    #[test]
    fn test_reactions_run_before_queued_actions() {
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
        let mut log = BattleLog::new();
        let mut queue = ActionQueue::new();
        queue.enqueue(BattleAction::damage(SlotId::enemy(0), 1000));
        queue.enqueue(BattleAction::message("after"));

        let processed = queue.process_headless(&mut ctx, &mut log);
        let kinds: Vec<&str> = log.events().iter().map(|e| e.kind).collect();
        // damage -> faint -> "fainted" -> experience -> its messages -> "after"
        assert_eq!(kinds[..3], ["damage", "faint", "message"]);
        assert_eq!(log.events().last().map(|e| e.detail.as_str()), Some("after"));
        assert_eq!(processed, log.len());
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_flee_drops_remaining_actions() {
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
        let mut log = BattleLog::new();
        let mut queue = ActionQueue::new();
        queue.enqueue(BattleAction::flee(SlotId::player(0)));
        queue.enqueue(BattleAction::damage(SlotId::enemy(0), 10));

        let processed = queue.process_queue(&mut ctx, &NullView, &mut log).await;
        assert_eq!(processed, 1);
        assert!(queue.is_empty());
        assert_eq!(field.combatant(SlotId::enemy(0)).unwrap().hp(), 200);
        assert_eq!(log.events()[0].kind, "flee");
    }

    #[test]
    fn test_switch_out_effects_are_logged_before_entry() {
        let natural_cure =
            AbilityData::new("Natural Cure").with_effect(PassiveEffect::CureStatusOnSwitchOut);
        let mut field = BattleField::new(
            BattleRules::singles(),
            vec![
                attacker_with(Some(natural_cure), None),
                foe("Raichu", vec![Type::Electric]),
            ],
            vec![foe("Rattata", vec![Type::Normal])],
        )
        .unwrap();
        for side in SideId::ALL {
            field.side_mut(side).send_out_leads();
        }
        field
            .combatant_mut(SlotId::player(0))
            .unwrap()
            .set_status(Status::Burn, 0);

        let pipeline = DamagePipeline::new();
        let mut rng = BattleRng::seeded(1);
        let triggers = TriggerDispatcher::new();
        let mut ctx = ActionContext {
            field: &mut field,
            pipeline: &pipeline,
            rng: &mut rng,
            triggers: &triggers,
        };
        let mut log = BattleLog::new();
        let mut queue = ActionQueue::new();
        queue.enqueue(BattleAction::switch(SlotId::player(0), 1));
        queue.process_headless(&mut ctx, &mut log);

        let kinds: Vec<&str> = log.events().iter().map(|e| e.kind).collect();
        let cured = kinds.iter().position(|k| *k == "cure-status").unwrap();
        let entered = kinds.iter().position(|k| *k == "switch-in").unwrap();
        assert_eq!(kinds[0], "switch");
        assert!(cured < entered);

        let side = field.side(SideId::Player);
        assert_eq!(side.combatant(0).unwrap().status(), None);
        assert_eq!(side.slot(0).unwrap().occupant(), Some(1));
    }
}
