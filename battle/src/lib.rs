//! Battle state model and domain types for a turn-based monster battler.
//!
//! This crate provides everything the combat engine reads and mutates that
//! does not itself depend on randomness or turn sequencing.
//!
//! # Overview
//!
//! `clash-battle` sits below `clash-engine`:
//!
//! ```text
//! content tables (species, moves, abilities, items)
//!        │
//!        ▼
//! clash-battle (domain types + formulas + battle state) ← THIS CRATE
//!        │
//!        ▼
//! clash-engine (damage pipeline, action queue, turn loop)
//! ```
//!
//! # Main Types
//!
//! ## Domain Types
//! - [`Type`] - Elemental types with effectiveness chart
//! - [`Status`] - Persistent status conditions (Burn, Freeze, etc.)
//! - [`Volatile`] - Volatile conditions (Confusion, Flinch, etc.)
//! - [`StatStages`] - Stat stage modifiers (-6 to +6)
//! - [`Weather`], [`Terrain`], [`Room`], [`SideCondition`] - Field conditions
//! - [`Nature`] - Stat-growth natures
//!
//! ## Blueprints
//! - [`SpeciesData`], [`MoveData`], [`AbilityData`], [`ItemData`] - Read-only content records
//! - [`MoveEffect`], [`PassiveEffect`] - Closed effect catalogs
//!
//! ## Battle State
//! - [`BattleField`] - Both sides plus global conditions
//! - [`BattleSide`] - One party and its active slots
//! - [`BattleSlot`] - One active position with stages and volatiles
//! - [`Combatant`] - A party member's runtime state
//!
//! ## Numeric Libraries
//! - [`formulas`] - Stat, stage and experience formulas
//! - [`query`] - Type matchup and same-type bonus
//!
//! # Example Usage
//!
//! ```ignore
//! use clash_battle::{BattleField, BattleRules, SlotId, Stat};
//!
//! let mut field = BattleField::new(BattleRules::singles(), player_party, enemy_party)?;
//! field.side_mut(SideId::Player).send_out_leads();
//!
//! let slot = field.slot_mut(SlotId::player(0)).unwrap();
//! let applied = slot.modify_stat_stage(Stat::Attack, 2)?;
//! if applied == 0 {
//!     println!("Attack won't go any higher!");
//! }
//! ```

pub mod constants;
pub mod dex;
pub mod error;
pub mod formulas;
pub mod query;
pub mod rules;
pub mod state;
pub mod types;

// Re-export main types at crate root for convenience
pub use dex::{
    AbilityData, EffectTarget, ItemData, MoveCategory, MoveData, MoveEffect, PassiveEffect,
    SpeciesData, Trigger,
};
pub use error::BattleError;
pub use rules::BattleRules;
pub use state::{
    BattleField, BattleOutcome, BattleSide, BattleSlot, Combatant, CombatantConfig, MoveSlot,
    SideId, SlotId,
};
pub use types::{
    ExpiredCondition, FieldConditions, Matchups, Nature, Room, SideCondition, SideConditionState,
    Stat, StatBlock, StatStages, Status, Terrain, Timed, Type, Volatile, Weather,
};
