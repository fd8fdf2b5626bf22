//! Type matchup queries

use crate::constants::STAB_MULTIPLIER;
use crate::types::Type;

/// Effectiveness of `attack` against a one- or two-typed defender
///
/// The single-type lookups are multiplied, so dual-type immunities and 4x
/// weaknesses fall out of the product without clamping.
pub fn effectiveness(attack: Type, defender: Type, second: Option<Type>) -> f64 {
    let first = attack.effectiveness(defender);
    match second {
        Some(t) if t != defender => first * attack.effectiveness(t),
        _ => first,
    }
}

/// 1.5 when `move_type` matches either type, 1.0 otherwise
pub fn stab_multiplier(move_type: Type, type1: Type, type2: Option<Type>) -> f64 {
    if move_type == type1 || Some(move_type) == type2 {
        STAB_MULTIPLIER
    } else {
        1.0
    }
}

pub fn is_super_effective(attack: Type, defender: Type, second: Option<Type>) -> bool {
    effectiveness(attack, defender, second) > 1.0
}

pub fn is_not_very_effective(attack: Type, defender: Type, second: Option<Type>) -> bool {
    let value = effectiveness(attack, defender, second);
    value > 0.0 && value < 1.0
}

pub fn is_immune(attack: Type, defender: Type, second: Option<Type>) -> bool {
    effectiveness(attack, defender, second) == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effectiveness_single_and_dual() {
        assert_eq!(effectiveness(Type::Electric, Type::Water, None), 2.0);
        assert_eq!(effectiveness(Type::Electric, Type::Water, Some(Type::Flying)), 4.0);
        assert_eq!(effectiveness(Type::Fire, Type::Water, Some(Type::Rock)), 0.25);
        assert_eq!(effectiveness(Type::Ground, Type::Steel, Some(Type::Flying)), 0.0);
        assert_eq!(effectiveness(Type::Normal, Type::Normal, None), 1.0);
    }

    #[test]
    fn test_effectiveness_repeated_type_counts_once() {
        assert_eq!(effectiveness(Type::Electric, Type::Water, Some(Type::Water)), 2.0);
    }

    #[test]
    fn test_immune_pairs() {
        assert!(is_immune(Type::Normal, Type::Ghost, None));
        assert!(is_immune(Type::Ground, Type::Flying, None));
        assert!(is_immune(Type::Electric, Type::Ground, None));
        assert!(is_immune(Type::Dragon, Type::Fairy, None));
        assert!(!is_immune(Type::Dark, Type::Ghost, None));
    }

    #[test]
    fn test_predicates() {
        assert!(is_super_effective(Type::Water, Type::Fire, None));
        assert!(!is_super_effective(Type::Water, Type::Grass, None));
        assert!(is_not_very_effective(Type::Water, Type::Grass, None));
        assert!(!is_not_very_effective(Type::Normal, Type::Ghost, None));
    }

    #[test]
    fn test_stab_multiplier() {
        assert_eq!(stab_multiplier(Type::Electric, Type::Electric, None), 1.5);
        assert_eq!(stab_multiplier(Type::Flying, Type::Fire, Some(Type::Flying)), 1.5);
        assert_eq!(stab_multiplier(Type::Water, Type::Fire, Some(Type::Flying)), 1.0);
    }
}
