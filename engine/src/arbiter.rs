//! Battle outcome decisions

use clash_battle::{BattleField, BattleOutcome, SideId};

/// Decides whether and how a battle has ended
#[derive(Debug, Clone, Copy, Default)]
pub struct BattleArbiter;

impl BattleArbiter {
    /// Outcome from the player's point of view
    ///
    /// A forced outcome (flee, capture, turn limit) wins over HP. Otherwise
    /// both sides wiped is a draw, and one side wiped is a win for the other.
    pub fn check_outcome(field: &BattleField) -> BattleOutcome {
        if let Some(outcome) = field.forced_outcome() {
            return outcome;
        }
        let player_out = field.side(SideId::Player).all_fainted();
        let enemy_out = field.side(SideId::Enemy).all_fainted();
        match (player_out, enemy_out) {
            (true, true) => BattleOutcome::Draw,
            (true, false) => BattleOutcome::Defeat,
            (false, true) => BattleOutcome::Victory,
            (false, false) => BattleOutcome::Ongoing,
        }
    }

    /// Whether the configured turn limit has been reached
    pub fn turn_limit_reached(field: &BattleField) -> bool {
        field
            .rules()
            .turn_limit
            .is_some_and(|limit| field.turn() >= limit)
    }
}
