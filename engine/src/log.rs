//! Battle event log

use clash_battle::SlotId;

use crate::action::BattleAction;

/// One processed action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleEvent {
    pub turn: u32,
    pub source: Option<SlotId>,
    pub kind: &'static str,
    pub detail: String,
}

/// Every action processed so far, in execution order
#[derive(Debug, Clone, Default)]
pub struct BattleLog {
    events: Vec<BattleEvent>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, turn: u32, action: &BattleAction) {
        self.events.push(BattleEvent {
            turn,
            source: action.source(),
            kind: action.kind().name(),
            detail: action.to_string(),
        });
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events from one turn
    pub fn turn(&self, turn: u32) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter().filter(move |e| e.turn == turn)
    }

    /// Message text only, the way a player would read the battle
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.events
            .iter()
            .filter(|e| e.kind == "message")
            .map(|e| e.detail.as_str())
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
