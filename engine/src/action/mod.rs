//! Battle actions and the queue that runs them
//!
//! A [`BattleAction`] is one unit of work. Running it has two phases:
//! [`BattleAction::execute_logic`] mutates the field and returns reaction
//! actions, and [`BattleAction::execute_visual`] hands the finished action to
//! a [`BattleView`]. The [`ActionQueue`] puts reactions in front of anything
//! already queued, so a move's damage and the resulting faint resolve before
//! the next independently queued action.

mod execute;
mod moves;
mod queue;

pub use queue::ActionQueue;

use clash_battle::constants::MAX_PRIORITY;
use clash_battle::{
    BattleField, Room, SideCondition, SideId, SlotId, Stat, Status, Terrain, Volatile, Weather,
};

use crate::damage::DamagePipeline;
use crate::rng::BattleRng;
use crate::triggers::TriggerDispatcher;
use crate::view::BattleView;

/// What an action does
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    /// The combatant at party index `user` uses one of its moves
    UseMove {
        user: usize,
        move_index: usize,
        target: SlotId,
    },
    Damage {
        target: SlotId,
        amount: u32,
    },
    Heal {
        target: SlotId,
        amount: u32,
    },
    StatChange {
        target: SlotId,
        stat: Stat,
        stages: i8,
    },
    ApplyStatus {
        target: SlotId,
        status: Status,
    },
    CureStatus {
        target: SlotId,
    },
    AddVolatile {
        target: SlotId,
        volatile: Volatile,
    },
    /// End-of-turn damage from burn or poison
    Residual {
        target: SlotId,
    },
    /// Withdraw the occupant of `slot`; its switch-out effects run first
    Switch {
        slot: SlotId,
        party_index: usize,
    },
    /// Put party member `party_index` into `slot`
    SwitchIn {
        slot: SlotId,
        party_index: usize,
    },
    Faint {
        target: SlotId,
    },
    GainExperience {
        side: SideId,
        party_index: usize,
        amount: u32,
    },
    SetWeather {
        weather: Weather,
        turns: u8,
    },
    SetTerrain {
        terrain: Terrain,
        turns: u8,
    },
    ToggleRoom {
        room: Room,
        turns: u8,
    },
    SetSideCondition {
        side: SideId,
        condition: SideCondition,
    },
    /// Count down field and side durations and drop one-turn volatiles
    FieldTick,
    Flee {
        side: SideId,
    },
    Message(String),
}

impl ActionKind {
    /// Whether protect on the target stops this action
    pub fn can_be_blocked(&self) -> bool {
        !matches!(
            self,
            ActionKind::Switch { .. } | ActionKind::SwitchIn { .. } | ActionKind::Flee { .. }
        )
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::UseMove { .. } => "use-move",
            ActionKind::Damage { .. } => "damage",
            ActionKind::Heal { .. } => "heal",
            ActionKind::StatChange { .. } => "stat-change",
            ActionKind::ApplyStatus { .. } => "apply-status",
            ActionKind::CureStatus { .. } => "cure-status",
            ActionKind::AddVolatile { .. } => "add-volatile",
            ActionKind::Residual { .. } => "residual",
            ActionKind::Switch { .. } => "switch",
            ActionKind::SwitchIn { .. } => "switch-in",
            ActionKind::Faint { .. } => "faint",
            ActionKind::GainExperience { .. } => "gain-experience",
            ActionKind::SetWeather { .. } => "set-weather",
            ActionKind::SetTerrain { .. } => "set-terrain",
            ActionKind::ToggleRoom { .. } => "toggle-room",
            ActionKind::SetSideCondition { .. } => "set-side-condition",
            ActionKind::FieldTick => "field-tick",
            ActionKind::Flee { .. } => "flee",
            ActionKind::Message(_) => "message",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::UseMove {
                user,
                move_index,
                target,
            } => write!(f, "#{user} uses move {move_index} on {target}"),
            ActionKind::Damage { target, amount } => write!(f, "{target} takes {amount} damage"),
            ActionKind::Heal { target, amount } => write!(f, "{target} heals {amount}"),
            ActionKind::StatChange {
                target,
                stat,
                stages,
            } => write!(f, "{target} {stat} {stages:+}"),
            ActionKind::ApplyStatus { target, status } => write!(f, "{target} gets {status}"),
            ActionKind::CureStatus { target } => write!(f, "{target} is cured"),
            ActionKind::AddVolatile { target, volatile } => write!(f, "{target} gets {volatile}"),
            ActionKind::Residual { target } => write!(f, "{target} takes residual damage"),
            ActionKind::Switch { slot, party_index } => write!(f, "{slot} sends in #{party_index}"),
            ActionKind::SwitchIn { slot, party_index } => write!(f, "#{party_index} enters {slot}"),
            ActionKind::Faint { target } => write!(f, "{target} faints"),
            ActionKind::GainExperience {
                side,
                party_index,
                amount,
            } => write!(f, "{side} #{party_index} gains {amount} exp"),
            ActionKind::SetWeather { weather, turns } => write!(f, "{weather} for {turns} turns"),
            ActionKind::SetTerrain { terrain, turns } => write!(f, "{terrain} for {turns} turns"),
            ActionKind::ToggleRoom { room, turns } => write!(f, "toggle {room} ({turns} turns)"),
            ActionKind::SetSideCondition { side, condition } => {
                write!(f, "{condition} on the {side} side")
            }
            ActionKind::FieldTick => write!(f, "end of turn"),
            ActionKind::Flee { side } => write!(f, "{side} flees"),
            ActionKind::Message(text) => write!(f, "{text}"),
        }
    }
}

/// Everything an action's logic phase may touch
pub struct ActionContext<'a> {
    pub field: &'a mut BattleField,
    pub pipeline: &'a DamagePipeline,
    pub rng: &'a mut BattleRng,
    pub triggers: &'a TriggerDispatcher,
}

/// One unit of battle work
#[derive(Debug, Clone, PartialEq)]
pub struct BattleAction {
    source: Option<SlotId>,
    priority: i8,
    kind: ActionKind,
    executed: bool,
}

impl BattleAction {
    pub fn new(kind: ActionKind, source: Option<SlotId>, priority: i8) -> Self {
        Self {
            source,
            priority,
            kind,
            executed: false,
        }
    }

    /// An action with no originating slot and default priority
    pub fn environment(kind: ActionKind) -> Self {
        Self::new(kind, None, 0)
    }

    pub fn use_move(
        user_slot: SlotId,
        user: usize,
        move_index: usize,
        target: SlotId,
        priority: i8,
    ) -> Self {
        Self::new(
            ActionKind::UseMove {
                user,
                move_index,
                target,
            },
            Some(user_slot),
            priority,
        )
    }

    /// Switches always take the top priority tier
    pub fn switch(slot: SlotId, party_index: usize) -> Self {
        Self::new(
            ActionKind::Switch { slot, party_index },
            Some(slot),
            MAX_PRIORITY,
        )
    }

    pub(crate) fn switch_in(slot: SlotId, party_index: usize) -> Self {
        Self::new(
            ActionKind::SwitchIn { slot, party_index },
            Some(slot),
            MAX_PRIORITY,
        )
    }

    pub fn flee(slot: SlotId) -> Self {
        Self::new(ActionKind::Flee { side: slot.side }, Some(slot), MAX_PRIORITY)
    }

    pub fn damage(target: SlotId, amount: u32) -> Self {
        Self::environment(ActionKind::Damage { target, amount })
    }

    pub fn heal(target: SlotId, amount: u32) -> Self {
        Self::environment(ActionKind::Heal { target, amount })
    }

    pub fn stat_change(target: SlotId, stat: Stat, stages: i8) -> Self {
        Self::environment(ActionKind::StatChange {
            target,
            stat,
            stages,
        })
    }

    pub fn apply_status(target: SlotId, status: Status) -> Self {
        Self::environment(ActionKind::ApplyStatus { target, status })
    }

    pub fn faint(target: SlotId) -> Self {
        Self::environment(ActionKind::Faint { target })
    }

    pub fn field_tick() -> Self {
        Self::environment(ActionKind::FieldTick)
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self::environment(ActionKind::Message(text.into()))
    }

    pub fn source(&self) -> Option<SlotId> {
        self.source
    }

    pub fn priority(&self) -> i8 {
        self.priority
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Switches and escapes cannot be stopped by the opposing side
    pub fn can_be_blocked(&self) -> bool {
        self.kind.can_be_blocked()
    }

    /// Apply this action to the field and return its reactions
    ///
    /// Runs at most once; a second call does nothing.
    pub fn execute_logic(&mut self, ctx: &mut ActionContext<'_>) -> Vec<BattleAction> {
        if self.executed {
            tracing::warn!(kind = self.kind.name(), "action already executed");
            return Vec::new();
        }
        self.executed = true;

        let reactions = execute::run(&self.kind, self.source, ctx);
        tracing::debug!(
            kind = self.kind.name(),
            source = ?self.source,
            reactions = reactions.len(),
            "executed action"
        );
        reactions
    }

    /// Hand the action to the presentation layer; never touches battle state
    pub async fn execute_visual(&self, view: &dyn BattleView, field: &BattleField) {
        view.present(self, field).await;
    }
}

impl std::fmt::Display for BattleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_and_flee_take_top_priority() {
        let switch = BattleAction::switch(SlotId::player(0), 1);
        assert_eq!(switch.priority(), MAX_PRIORITY);
        assert!(!switch.can_be_blocked());

        let flee = BattleAction::flee(SlotId::player(0));
        assert_eq!(flee.priority(), MAX_PRIORITY);
        assert_eq!(flee.kind(), &ActionKind::Flee { side: SideId::Player });
    }

    #[test]
    fn test_environment_actions_have_no_source() {
        let damage = BattleAction::damage(SlotId::enemy(0), 10);
        assert_eq!(damage.source(), None);
        assert_eq!(damage.priority(), 0);
        assert!(damage.can_be_blocked());
        assert!(!damage.is_executed());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            BattleAction::damage(SlotId::enemy(0), 12).to_string(),
            "enemy[0] takes 12 damage"
        );
        assert_eq!(
            BattleAction::stat_change(SlotId::player(1), Stat::Attack, -1).to_string(),
            "player[1] Attack -1"
        );
        assert_eq!(BattleAction::message("Hello").to_string(), "Hello");
    }
}
