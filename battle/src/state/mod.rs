//! Battle position model
//!
//! A [`BattleField`] owns two [`BattleSide`]s. Each side owns its party of
//! [`Combatant`]s and a fixed row of [`BattleSlot`]s that refer into the party.

mod combatant;
mod field;
mod side;
mod slot;

pub use combatant::{Combatant, CombatantConfig, MoveSlot};
pub use field::{BattleField, BattleOutcome};
pub use side::BattleSide;
pub use slot::BattleSlot;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which team a side belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SideId {
    Player,
    Enemy,
}

impl SideId {
    pub const ALL: [SideId; 2] = [SideId::Player, SideId::Enemy];

    pub fn opponent(&self) -> SideId {
        match self {
            SideId::Player => SideId::Enemy,
            SideId::Enemy => SideId::Player,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SideId::Player => "player",
            SideId::Enemy => "enemy",
        }
    }
}

impl std::fmt::Display for SideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Address of one active position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlotId {
    pub side: SideId,
    pub index: usize,
}

impl SlotId {
    pub fn new(side: SideId, index: usize) -> Self {
        Self { side, index }
    }

    pub fn player(index: usize) -> Self {
        Self::new(SideId::Player, index)
    }

    pub fn enemy(index: usize) -> Self {
        Self::new(SideId::Enemy, index)
    }

    pub fn is_foe_of(&self, other: SlotId) -> bool {
        self.side != other.side
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.side, self.index)
    }
}
