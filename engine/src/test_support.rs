//! Shared fixtures for unit tests
//!
//! Every combatant is level 50 with flat 200 HP / 100 everything else, so
//! damage numbers in tests can be worked out by hand.

use std::sync::Arc;

use clash_battle::{
    AbilityData, BattleField, BattleRules, Combatant, CombatantConfig, ItemData, MoveCategory,
    MoveData, SideId, SpeciesData, StatBlock, Type,
};

pub(crate) fn flat_stats() -> StatBlock {
    StatBlock::new(200, 100, 100, 100, 100, 100)
}

pub(crate) fn tackle() -> MoveData {
    MoveData::new("Tackle", Type::Normal, MoveCategory::Physical, 40)
}

pub(crate) fn thunder_shock() -> MoveData {
    MoveData::new("Thunder Shock", Type::Electric, MoveCategory::Special, 40)
}

fn build(
    name: &str,
    types: Vec<Type>,
    ability: AbilityData,
    item: Option<ItemData>,
    moves: Vec<MoveData>,
) -> Combatant {
    let species = SpeciesData::new(name, StatBlock::new(35, 55, 40, 50, 50, 90), types)
        .with_abilities([ability.name.clone()])
        .with_learnset(moves.iter().map(|m| m.name.clone()));
    let moves = moves.into_iter().map(Arc::new).collect();
    let mut config = CombatantConfig::new(50, Arc::new(ability), moves);
    if let Some(item) = item {
        config = config.with_item(Arc::new(item));
    }
    Combatant::new(Arc::new(species), config)
        .expect("fixture combatant is valid")
        .with_stats(flat_stats())
}

/// Electric-type attacker knowing Tackle and Thunder Shock
pub(crate) fn pikachu() -> Combatant {
    attacker_with(None, None)
}

/// Pikachu with a custom ability and/or held item
pub(crate) fn attacker_with(ability: Option<AbilityData>, item: Option<ItemData>) -> Combatant {
    build(
        "Pikachu",
        vec![Type::Electric],
        ability.unwrap_or_else(|| AbilityData::new("Static")),
        item,
        vec![tackle(), thunder_shock()],
    )
}

/// A plain opponent of the given types that only knows Tackle
pub(crate) fn foe(name: &str, types: Vec<Type>) -> Combatant {
    build(
        name,
        types,
        AbilityData::new("Run Away"),
        None,
        vec![tackle()],
    )
}

/// Normal-type Rattata with a custom ability
pub(crate) fn foe_with(ability: AbilityData) -> Combatant {
    build("Rattata", vec![Type::Normal], ability, None, vec![tackle()])
}

/// Singles field against a Normal-type Rattata, leads already out
pub(crate) fn field_with(player: Combatant) -> BattleField {
    field_vs(player, foe("Rattata", vec![Type::Normal]))
}

/// Singles field with both leads already out
pub(crate) fn field_vs(player: Combatant, enemy: Combatant) -> BattleField {
    let mut field = BattleField::new(BattleRules::singles(), vec![player], vec![enemy])
        .expect("fixture field is valid");
    for side in SideId::ALL {
        field.side_mut(side).send_out_leads();
    }
    field
}
