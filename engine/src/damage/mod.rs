//! Damage calculation
//!
//! A [`DamagePipeline`] runs an ordered list of [`DamageStep`]s over a
//! [`DamageContext`]. The default order mirrors the mainline games; callers
//! add steps such as [`WeatherStep`] or [`ScreenStep`] where they want them.

mod context;
mod pipeline;
mod steps;

pub use context::{DamageContext, DamageOverrides};
pub use pipeline::DamagePipeline;
pub use steps::{
    AttackerAbilityStep, AttackerItemStep, BaseDamageStep, BurnStep, CriticalHitStep, DamageStep,
    DefenderModifierStep, RandomFactorStep, ScreenStep, StabStep, TypeEffectivenessStep,
    WeatherStep,
};
