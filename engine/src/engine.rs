//! Turn orchestration
//!
//! A turn goes: collect one decision per living slot from both providers at
//! once, sort them, drain the queue, fire end-of-turn triggers and the field
//! countdown, refill fainted slots, then ask the arbiter whether anyone won.

use futures_util::future::join;

use clash_battle::{
    BattleField, BattleOutcome, BattleRules, Combatant, SideId, SlotId, Trigger,
};

use crate::action::{ActionContext, ActionQueue, BattleAction};
use crate::arbiter::BattleArbiter;
use crate::damage::DamagePipeline;
use crate::error::EngineError;
use crate::log::BattleLog;
use crate::provider::{ActionProvider, Decision};
use crate::rng::BattleRng;
use crate::triggers::TriggerDispatcher;
use crate::turn_order::TurnOrderResolver;
use crate::view::{BattleView, NullView};

/// Engine construction options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Fixed RNG seed; None seeds from the operating system
    pub seed: Option<u64>,
}

impl EngineOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

pub struct CombatEngine {
    field: BattleField,
    queue: ActionQueue,
    pipeline: DamagePipeline,
    resolver: TurnOrderResolver,
    triggers: TriggerDispatcher,
    rng: BattleRng,
    player: Box<dyn ActionProvider>,
    enemy: Box<dyn ActionProvider>,
    view: Box<dyn BattleView>,
    log: BattleLog,
    started: bool,
}

impl CombatEngine {
    /// Validate both parties and build an engine; nothing is sent out yet
    pub fn initialize(
        rules: BattleRules,
        player_party: Vec<Combatant>,
        enemy_party: Vec<Combatant>,
        player: Box<dyn ActionProvider>,
        enemy: Box<dyn ActionProvider>,
        options: EngineOptions,
    ) -> Result<Self, EngineError> {
        let field = BattleField::new(rules, player_party, enemy_party)?;
        let rng = match options.seed {
            Some(seed) => BattleRng::seeded(seed),
            None => BattleRng::from_entropy(),
        };
        tracing::info!(
            slots = field.rules().slots_per_side,
            player_party = field.side(SideId::Player).party().len(),
            enemy_party = field.side(SideId::Enemy).party().len(),
            seed = ?options.seed,
            "battle initialized"
        );
        Ok(Self {
            field,
            queue: ActionQueue::new(),
            pipeline: DamagePipeline::new(),
            resolver: TurnOrderResolver::new(),
            triggers: TriggerDispatcher::new(),
            rng,
            player,
            enemy,
            view: Box::new(NullView),
            log: BattleLog::new(),
            started: false,
        })
    }

    pub fn with_view(mut self, view: Box<dyn BattleView>) -> Self {
        self.view = view;
        self
    }

    pub fn field(&self) -> &BattleField {
        &self.field
    }

    /// Direct field access for hosts, e.g. to conclude a capture
    pub fn field_mut(&mut self) -> &mut BattleField {
        &mut self.field
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn pipeline(&self) -> &DamagePipeline {
        &self.pipeline
    }

    /// Customize damage steps for this battle only
    pub fn pipeline_mut(&mut self) -> &mut DamagePipeline {
        &mut self.pipeline
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng.seed()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn outcome(&self) -> BattleOutcome {
        BattleArbiter::check_outcome(&self.field)
    }

    /// Send out leads and fire their switch-in triggers
    ///
    /// Leads enter together, so an entry ability sees every opposing lead.
    pub async fn start(&mut self) -> Result<(), EngineError> {
        if self.started {
            return Ok(());
        }
        self.started = true;

        let mut intro = Vec::new();
        for side in SideId::ALL {
            for (slot, party_index) in self.field.side_mut(side).send_out_leads() {
                let name = self
                    .field
                    .side(side)
                    .combatant(party_index)
                    .map(|c| c.name().to_string())
                    .unwrap_or_default();
                tracing::debug!(side = %side, slot, name = %name, "lead sent out");
                intro.push(BattleAction::message(format!("{side} sent out {name}!")));
            }
        }
        intro.extend(self.triggers.dispatch(Trigger::OnSwitchIn, &self.field));
        self.queue.enqueue_range(intro);
        self.drain().await;
        Ok(())
    }

    /// Play one full turn and return the outcome after it
    pub async fn run_turn(&mut self) -> Result<BattleOutcome, EngineError> {
        self.start().await?;
        let outcome = self.outcome();
        if outcome.is_terminal() {
            return Err(EngineError::BattleOver(outcome));
        }

        // A rejected decision leaves the field untouched, turn counter included
        let decisions = self.collect_decisions().await;
        let mut actions = Vec::with_capacity(decisions.len());
        for (slot, decision) in decisions {
            actions.push(self.to_action(slot, decision)?);
        }

        let turn = self.field.advance_turn();
        tracing::info!(turn, "turn started");
        let ordered = self
            .resolver
            .sort_actions(actions, &self.field, &mut self.rng);
        self.queue.enqueue_range(ordered);
        self.drain().await;

        if !self.outcome().is_terminal() {
            let mut end = self.triggers.dispatch(Trigger::OnTurnEnd, &self.field);
            end.push(BattleAction::field_tick());
            self.queue.enqueue_range(end);
            self.drain().await;
        }

        if !self.outcome().is_terminal() {
            self.refill_slots().await?;
        }

        if !self.outcome().is_terminal() && BattleArbiter::turn_limit_reached(&self.field) {
            tracing::info!(turn, "turn limit reached");
            self.field.conclude(BattleOutcome::Draw);
        }

        let outcome = self.outcome();
        if outcome.is_terminal() {
            tracing::info!(turn, outcome = %outcome, "battle ended");
        }
        Ok(outcome)
    }

    /// Play turns until the battle ends
    pub async fn run_battle(&mut self) -> Result<BattleOutcome, EngineError> {
        loop {
            let outcome = self.run_turn().await?;
            if outcome.is_terminal() {
                return Ok(outcome);
            }
        }
    }

    /// Run `actions` to completion without presentation
    ///
    /// Reactions are processed too. Useful for lookahead on a cloned field
    /// or for scripted setups.
    pub fn execute_headless(&mut self, actions: Vec<BattleAction>) -> usize {
        self.queue.enqueue_range(actions);
        let mut ctx = ActionContext {
            field: &mut self.field,
            pipeline: &self.pipeline,
            rng: &mut self.rng,
            triggers: &self.triggers,
        };
        self.queue.process_headless(&mut ctx, &mut self.log)
    }

    async fn drain(&mut self) -> usize {
        let mut ctx = ActionContext {
            field: &mut self.field,
            pipeline: &self.pipeline,
            rng: &mut self.rng,
            triggers: &self.triggers,
        };
        self.queue
            .process_queue(&mut ctx, self.view.as_ref(), &mut self.log)
            .await
    }

    async fn collect_decisions(&mut self) -> Vec<(SlotId, Decision)> {
        let active = self.field.active_slots();
        let (player_slots, enemy_slots): (Vec<SlotId>, Vec<SlotId>) = active
            .into_iter()
            .partition(|slot| slot.side == SideId::Player);

        let field = &self.field;
        let (mut decisions, enemy) = join(
            gather(self.player.as_mut(), field, player_slots),
            gather(self.enemy.as_mut(), field, enemy_slots),
        )
        .await;
        decisions.extend(enemy);
        decisions
    }

    fn to_action(&self, slot: SlotId, decision: Decision) -> Result<BattleAction, EngineError> {
        let side = self.field.side(slot.side);
        let (battle_slot, mon) = self
            .field
            .occupied(slot)
            .ok_or(EngineError::InvalidDecision {
                slot,
                reason: "slot is empty".to_string(),
            })?;
        let user = battle_slot.occupant().unwrap_or_default();

        match decision {
            Decision::UseMove { move_index, target } => {
                let move_slot = mon.move_slot(move_index).ok_or_else(|| {
                    EngineError::InvalidDecision {
                        slot,
                        reason: format!("no move at index {move_index}"),
                    }
                })?;
                self.field.check_slot(target)?;
                Ok(BattleAction::use_move(
                    slot,
                    user,
                    move_index,
                    target,
                    move_slot.data.priority,
                ))
            }
            Decision::Switch { party_index } => {
                if !side.get_available_switches().contains(&party_index) {
                    return Err(EngineError::InvalidDecision {
                        slot,
                        reason: format!("party member {party_index} cannot switch in"),
                    });
                }
                Ok(BattleAction::switch(slot, party_index))
            }
            Decision::Flee => Ok(BattleAction::flee(slot)),
        }
    }

    /// Ask providers to fill slots emptied by faints
    async fn refill_slots(&mut self) -> Result<(), EngineError> {
        for slot in self.field.empty_slots() {
            if self.field.side(slot.side).get_available_switches().is_empty() {
                continue;
            }
            let provider = match slot.side {
                SideId::Player => self.player.as_mut(),
                SideId::Enemy => self.enemy.as_mut(),
            };
            let Some(party_index) = provider.choose_replacement(&self.field, slot).await else {
                continue;
            };
            if !self
                .field
                .side(slot.side)
                .get_available_switches()
                .contains(&party_index)
            {
                return Err(EngineError::InvalidDecision {
                    slot,
                    reason: format!("party member {party_index} cannot replace"),
                });
            }
            self.queue.enqueue(BattleAction::switch(slot, party_index));
            self.drain().await;
        }
        Ok(())
    }
}

async fn gather(
    provider: &mut dyn ActionProvider,
    field: &BattleField,
    slots: Vec<SlotId>,
) -> Vec<(SlotId, Decision)> {
    let mut decisions = Vec::with_capacity(slots.len());
    for slot in slots {
        let decision = provider.choose_action(field, slot).await;
        tracing::debug!(slot = %slot, decision = ?decision, "decision received");
        decisions.push((slot, decision));
    }
    decisions
}

impl std::fmt::Debug for CombatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatEngine")
            .field("turn", &self.field.turn())
            .field("outcome", &self.outcome())
            .field("queued", &self.queue.len())
            .field("seed", &self.rng.seed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ScriptedProvider;
    use crate::test_support::{foe, pikachu};
    use clash_battle::Type;

    fn engine(player: Vec<Decision>, enemy: Vec<Decision>) -> CombatEngine {
        CombatEngine::initialize(
            BattleRules::singles(),
            vec![pikachu()],
            vec![foe("Rattata", vec![Type::Normal])],
            Box::new(ScriptedProvider::new(player)),
            Box::new(ScriptedProvider::new(enemy)),
            EngineOptions::default().with_seed(42),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_start_sends_out_leads_once() {
        let mut engine = engine(vec![], vec![]);
        assert!(engine.field().slot(SlotId::player(0)).unwrap().is_empty());
        engine.start().await.unwrap();
        engine.start().await.unwrap();
        assert!(engine.is_started());
        assert_eq!(engine.field().slot(SlotId::player(0)).unwrap().occupant(), Some(0));
        assert_eq!(
            engine.log().messages().collect::<Vec<_>>(),
            vec!["player sent out Pikachu!", "enemy sent out Rattata!"]
        );
    }

    #[tokio::test]
    async fn test_invalid_move_index_is_rejected() {
        let mut engine = engine(
            vec![Decision::UseMove {
                move_index: 3,
                target: SlotId::enemy(0),
            }],
            vec![],
        );
        let err = engine.run_turn().await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidDecision { .. }));
        assert_eq!(engine.field().turn(), 0);
        assert_eq!(engine.outcome(), BattleOutcome::Ongoing);
    }

    #[tokio::test]
    async fn test_run_turn_after_end_is_an_error() {
        let mut engine = engine(vec![Decision::Flee], vec![]);
        assert_eq!(engine.run_turn().await.unwrap(), BattleOutcome::Fled);
        assert_eq!(
            engine.run_turn().await.unwrap_err(),
            EngineError::BattleOver(BattleOutcome::Fled)
        );
    }

    #[test]
    fn test_execute_headless() {
        let mut engine = engine(vec![], vec![]);
        engine.field_mut().side_mut(SideId::Player).send_out_leads();
        engine.field_mut().side_mut(SideId::Enemy).send_out_leads();
        let processed = engine.execute_headless(vec![BattleAction::damage(SlotId::enemy(0), 5)]);
        assert_eq!(processed, 1);
        assert_eq!(engine.field().combatant(SlotId::enemy(0)).unwrap().hp(), 195);
    }
}
