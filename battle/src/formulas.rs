//! Stat formulas
//!
//! Pure functions for computed stats, stage multipliers and the experience
//! curve. Out-of-range base/level/IV/EV input is a caller bug and is rejected;
//! stage input is clamped because stages routinely run past their bounds
//! during a battle.

use crate::constants::{
    MAX_BASE_STAT, MAX_EV, MAX_IV, MAX_LEVEL, MAX_STAGE, MIN_LEVEL, MIN_STAGE,
};
use crate::error::BattleError;
use crate::types::{Nature, Stat};

fn validate(base: u32, level: u8, iv: u8, ev: u16) -> Result<(), BattleError> {
    if base > MAX_BASE_STAT {
        return Err(BattleError::InvalidBaseStat(base));
    }
    if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        return Err(BattleError::InvalidLevel(level));
    }
    if iv > MAX_IV {
        return Err(BattleError::InvalidIv(iv));
    }
    if ev > MAX_EV {
        return Err(BattleError::InvalidEv(ev));
    }
    Ok(())
}

fn core(base: u32, level: u8, iv: u8, ev: u16) -> u32 {
    (2 * base + iv as u32 + ev as u32 / 4) * level as u32 / 100
}

/// `floor((2*base + iv + floor(ev/4)) * level / 100) + level + 10`
pub fn calculate_hp(base: u32, level: u8, iv: u8, ev: u16) -> Result<u32, BattleError> {
    validate(base, level, iv, ev)?;
    Ok(core(base, level, iv, ev) + level as u32 + 10)
}

/// `floor((2*base + iv + floor(ev/4)) * level / 100) + 5`, then the nature
/// factor truncated toward zero
pub fn calculate_stat(
    base: u32,
    level: u8,
    nature: Nature,
    stat: Stat,
    iv: u8,
    ev: u16,
) -> Result<u32, BattleError> {
    validate(base, level, iv, ev)?;
    Ok(nature.apply(stat, core(base, level, iv, ev) + 5))
}

/// Multiplier for a stat stage
/// +1 = 1.5x, +2 = 2x, ..., +6 = 4x
/// -1 = 0.67x, -2 = 0.5x, ..., -6 = 0.25x
pub fn stage_multiplier(stage: i8) -> f64 {
    let stage = stage.clamp(MIN_STAGE, MAX_STAGE) as i32;
    if stage >= 0 {
        (2 + stage) as f64 / 2.0
    } else {
        2.0 / (2 - stage) as f64
    }
}

/// Multiplier for accuracy/evasion stages (3-based table)
/// +1 = 1.33x, ..., +6 = 3x
/// -1 = 0.75x, ..., -6 = 0.33x
pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    let stage = stage.clamp(MIN_STAGE, MAX_STAGE) as i32;
    if stage >= 0 {
        (3 + stage) as f64 / 3.0
    } else {
        3.0 / (3 - stage) as f64
    }
}

/// Total experience needed to reach `level` (cubic curve)
pub fn exp_for_level(level: u8) -> Result<u32, BattleError> {
    if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        return Err(BattleError::InvalidLevel(level));
    }
    Ok((level as u32).pow(3))
}

/// Highest level whose experience threshold `exp` has reached, within 1..=100
pub fn level_for_exp(exp: u32) -> u8 {
    let mut level = MIN_LEVEL;
    while level < MAX_LEVEL && ((level + 1) as u32).pow(3) <= exp {
        level += 1;
    }
    level
}

/// Experience for defeating a combatant: `floor(base_stat_total * level / 7)`
pub fn experience_yield(base_stat_total: u32, level: u8) -> u32 {
    base_stat_total * level as u32 / 7
}
