//! Read-only content blueprints
//!
//! Species, moves, abilities and items are authored elsewhere and handed to
//! the battle core behind `Arc`s; nothing here is mutated during a battle.

mod effects;

pub use effects::{EffectTarget, MoveEffect, PassiveEffect, Trigger};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{StatBlock, Type};

/// Damage class of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Species blueprint
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeciesData {
    pub name: String,
    pub base_stats: StatBlock,
    /// One or two types
    pub types: Vec<Type>,
    /// Names of abilities this species may have
    pub abilities: Vec<String>,
    /// Names of moves this species may know
    pub learnset: Vec<String>,
}

impl SpeciesData {
    pub fn new(name: impl Into<String>, base_stats: StatBlock, types: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            base_stats,
            types,
            abilities: Vec::new(),
            learnset: Vec::new(),
        }
    }

    pub fn with_abilities<I, S>(mut self, abilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities = abilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_learnset<I, S>(mut self, moves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.learnset = moves.into_iter().map(Into::into).collect();
        self
    }

    pub fn can_learn(&self, move_name: &str) -> bool {
        self.learnset.iter().any(|m| m == move_name)
    }

    pub fn can_have_ability(&self, ability: &str) -> bool {
        self.abilities.iter().any(|a| a == ability)
    }
}

/// Move blueprint
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveData {
    pub name: String,
    pub move_type: Type,
    pub category: MoveCategory,
    pub power: u32,
    /// Percentage; None never misses
    pub accuracy: Option<u8>,
    pub max_pp: u8,
    pub priority: i8,
    pub effects: Vec<MoveEffect>,
}

impl MoveData {
    pub fn new(name: impl Into<String>, move_type: Type, category: MoveCategory, power: u32) -> Self {
        Self {
            name: name.into(),
            move_type,
            category,
            power,
            accuracy: Some(100),
            max_pp: 10,
            priority: 0,
            effects: Vec::new(),
        }
    }

    pub fn with_accuracy(mut self, accuracy: Option<u8>) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_pp(mut self, pp: u8) -> Self {
        self.max_pp = pp;
        self
    }

    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_effect(mut self, effect: MoveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Status moves deal no damage
    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status && self.power > 0
    }

    pub fn has_high_crit_ratio(&self) -> bool {
        self.effects.contains(&MoveEffect::HighCritRatio)
    }
}

/// Ability blueprint
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AbilityData {
    pub name: String,
    pub effects: Vec<PassiveEffect>,
}

impl AbilityData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: PassiveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Effects listening to `trigger`
    pub fn listeners(&self, trigger: Trigger) -> impl Iterator<Item = &PassiveEffect> {
        self.effects
            .iter()
            .filter(move |e| e.trigger() == Some(trigger))
    }
}

/// Held item blueprint
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemData {
    pub name: String,
    pub effects: Vec<PassiveEffect>,
}

impl ItemData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: PassiveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Effects listening to `trigger`
    pub fn listeners(&self, trigger: Trigger) -> impl Iterator<Item = &PassiveEffect> {
        self.effects
            .iter()
            .filter(move |e| e.trigger() == Some(trigger))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Stat;

    #[test]
    fn test_species_learnset_and_abilities() {
        let pikachu = SpeciesData::new(
            "Pikachu",
            StatBlock::new(35, 55, 40, 50, 50, 90),
            vec![Type::Electric],
        )
        .with_abilities(["Static"])
        .with_learnset(["Thunderbolt", "Quick Attack"]);

        assert!(pikachu.can_learn("Thunderbolt"));
        assert!(!pikachu.can_learn("Surf"));
        assert!(pikachu.can_have_ability("Static"));
        assert!(!pikachu.can_have_ability("Levitate"));
    }

    #[test]
    fn test_move_is_damaging() {
        let tackle = MoveData::new("Tackle", Type::Normal, MoveCategory::Physical, 40);
        let growl = MoveData::new("Growl", Type::Normal, MoveCategory::Status, 0);
        assert!(tackle.is_damaging());
        assert!(!growl.is_damaging());
    }

    #[test]
    fn test_high_crit_ratio() {
        let slash = MoveData::new("Slash", Type::Normal, MoveCategory::Physical, 70)
            .with_effect(MoveEffect::HighCritRatio);
        assert!(slash.has_high_crit_ratio());
    }

    #[test]
    fn test_listeners_filter_by_trigger() {
        let leftovers = ItemData::new("Leftovers")
            .with_effect(PassiveEffect::HealAtTurnEnd { denominator: 16 });
        assert_eq!(leftovers.listeners(Trigger::OnTurnEnd).count(), 1);
        assert_eq!(leftovers.listeners(Trigger::OnSwitchIn).count(), 0);

        let ability = AbilityData::new("Intimidate").with_effect(PassiveEffect::LowerFoeStatOnEntry {
            stat: Stat::Attack,
            stages: -1,
        });
        assert_eq!(ability.listeners(Trigger::OnSwitchIn).count(), 1);
    }
}
