//! Deterministic turn-based combat engine.
//!
//! Runs battles over the state model in `clash-battle`: damage calculation,
//! the action queue, turn ordering, trigger dispatch and the turn loop.
//!
//! # Overview
//!
//! ```text
//! ActionProvider (player)   ActionProvider (enemy)
//!            │                     │
//!            └──────────┬──────────┘
//!                       ▼
//!                 CombatEngine ──► TurnOrderResolver
//!                       │
//!                       ▼
//!                  ActionQueue ──► BattleAction::execute_logic ──► BattleField
//!                       │                 │
//!                       │                 ├─► DamagePipeline
//!                       │                 └─► TriggerDispatcher
//!                       ▼
//!                  BattleView (presentation only)
//! ```
//!
//! All randomness comes from one [`BattleRng`] per engine. Given a seed and
//! the same provider decisions, a battle replays identically.
//!
//! # Main Types
//!
//! - [`CombatEngine`] - Owns the field and runs turns
//! - [`BattleAction`], [`ActionKind`] - Units of work with a logic and a visual phase
//! - [`ActionQueue`] - FIFO queue where reactions jump the line
//! - [`DamagePipeline`] - Ordered, per-instance list of damage steps
//! - [`TurnOrderResolver`] - Priority, then speed, then a seeded tiebreak
//! - [`TriggerDispatcher`] - Ability, item and residual listeners
//! - [`BattleArbiter`] - Victory, defeat, draw and forced outcomes
//! - [`ActionProvider`], [`BattleView`] - Async boundaries for input and presentation
//!
//! # Example Usage
//!
//! ```ignore
//! use clash_engine::{CombatEngine, EngineOptions, RandomProvider};
//!
//! let mut engine = CombatEngine::initialize(
//!     BattleRules::singles(),
//!     player_party,
//!     enemy_party,
//!     Box::new(RandomProvider::seeded(1)),
//!     Box::new(RandomProvider::seeded(2)),
//!     EngineOptions::default().with_seed(42),
//! )?;
//! let outcome = engine.run_battle().await?;
//! println!("{outcome} after {} turns", engine.field().turn());
//! ```

pub mod action;
pub mod arbiter;
pub mod damage;
pub mod engine;
pub mod error;
pub mod log;
pub mod modifiers;
pub mod provider;
pub mod rng;
pub mod triggers;
pub mod turn_order;
pub mod view;

#[cfg(test)]
mod test_support;

pub use action::{ActionContext, ActionKind, ActionQueue, BattleAction};
pub use arbiter::BattleArbiter;
pub use damage::{DamageContext, DamageOverrides, DamagePipeline, DamageStep};
pub use engine::{CombatEngine, EngineOptions};
pub use error::EngineError;
pub use log::{BattleEvent, BattleLog};
pub use modifiers::{AbilityModifier, ItemModifier, StatModifier};
pub use provider::{ActionProvider, Decision, RandomProvider, ScriptedProvider};
pub use rng::BattleRng;
pub use triggers::TriggerDispatcher;
pub use turn_order::TurnOrderResolver;
pub use view::{BattleView, NullView, TracingView};
