//! Game-rule constants shared by the state model and the engine

/// Lowest stat stage
pub const MIN_STAGE: i8 = -6;

/// Highest stat stage
pub const MAX_STAGE: i8 = 6;

/// Lowest legal level
pub const MIN_LEVEL: u8 = 1;

/// Highest legal level
pub const MAX_LEVEL: u8 = 100;

/// Highest species base value per stat
pub const MAX_BASE_STAT: u32 = 255;

/// Highest individual value per stat
pub const MAX_IV: u8 = 31;

/// Highest effort value per stat
pub const MAX_EV: u16 = 252;

/// IV used when a caller does not specify one
pub const DEFAULT_IV: u8 = 31;

/// EV used when a caller does not specify one
pub const DEFAULT_EV: u16 = 252;

/// Most moves a combatant can know
pub const MAX_MOVES: usize = 4;

/// Hard cap on party size regardless of rules
pub const MAX_PARTY_SIZE: usize = 6;

/// Most active slots per side (triples)
pub const MAX_SLOTS_PER_SIDE: usize = 3;

/// Default duration for weather, terrain and rooms
pub const DEFAULT_FIELD_DURATION: u8 = 5;

/// Default duration for screens and tailwind
pub const DEFAULT_SCREEN_DURATION: u8 = 5;

/// Tailwind lasts four turns
pub const TAILWIND_DURATION: u8 = 4;

/// Priority tier of switches and escapes; no move reaches it
pub const MAX_PRIORITY: i8 = 6;

/// Lowest move priority tier
pub const MIN_PRIORITY: i8 = -7;

/// Same-type attack bonus
pub const STAB_MULTIPLIER: f64 = 1.5;

/// Critical hit damage multiplier
pub const CRIT_MULTIPLIER: f64 = 1.5;

/// Burned attackers deal this fraction of physical damage
pub const BURN_DAMAGE_MULTIPLIER: f64 = 0.5;

/// Bottom of the damage variance range
pub const RANDOM_FACTOR_MIN: f64 = 0.85;

/// Top of the damage variance range
pub const RANDOM_FACTOR_MAX: f64 = 1.0;

/// Chance of a critical hit by crit stage (stage 3 and above always crit)
pub const CRIT_CHANCE_BY_STAGE: [f64; 4] = [1.0 / 24.0, 1.0 / 8.0, 1.0 / 2.0, 1.0];

/// Chance a paralyzed combatant cannot move
pub const FULL_PARALYSIS_CHANCE: f64 = 0.25;

/// Chance a frozen combatant thaws when trying to move
pub const THAW_CHANCE: f64 = 0.2;

/// Chance a confused combatant hits itself
pub const CONFUSION_SELF_HIT_CHANCE: f64 = 1.0 / 3.0;

/// Power of the confusion self-hit
pub const CONFUSION_SELF_HIT_POWER: u32 = 40;
