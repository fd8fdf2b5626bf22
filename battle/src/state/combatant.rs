//! Runtime state for one party member

use std::sync::Arc;

use crate::constants::{DEFAULT_EV, DEFAULT_IV, MAX_MOVES};
use crate::dex::{AbilityData, ItemData, MoveData, SpeciesData};
use crate::error::BattleError;
use crate::formulas;
use crate::types::{Nature, Stat, StatBlock, Status, Type};

/// A known move and its remaining PP
#[derive(Debug, Clone, PartialEq)]
pub struct MoveSlot {
    pub data: Arc<MoveData>,
    pub pp: u8,
}

impl MoveSlot {
    pub fn new(data: Arc<MoveData>) -> Self {
        let pp = data.max_pp;
        Self { data, pp }
    }
}

/// Everything needed to build a combatant besides its species
#[derive(Debug, Clone)]
pub struct CombatantConfig {
    pub level: u8,
    pub nature: Nature,
    /// Indexed in `Stat::PERMANENT` order
    pub ivs: [u8; 6],
    /// Indexed in `Stat::PERMANENT` order
    pub evs: [u16; 6],
    pub ability: Arc<AbilityData>,
    pub item: Option<Arc<ItemData>>,
    pub moves: Vec<Arc<MoveData>>,
    pub nickname: Option<String>,
}

impl CombatantConfig {
    /// Neutral nature with default IVs and EVs
    pub fn new(level: u8, ability: Arc<AbilityData>, moves: Vec<Arc<MoveData>>) -> Self {
        Self {
            level,
            nature: Nature::Hardy,
            ivs: [DEFAULT_IV; 6],
            evs: [DEFAULT_EV; 6],
            ability,
            item: None,
            moves,
            nickname: None,
        }
    }

    pub fn with_nature(mut self, nature: Nature) -> Self {
        self.nature = nature;
        self
    }

    pub fn with_item(mut self, item: Arc<ItemData>) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_ivs(mut self, ivs: [u8; 6]) -> Self {
        self.ivs = ivs;
        self
    }

    pub fn with_evs(mut self, evs: [u16; 6]) -> Self {
        self.evs = evs;
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }
}

fn compute_stats(
    base: &StatBlock,
    level: u8,
    nature: Nature,
    ivs: &[u8; 6],
    evs: &[u16; 6],
) -> Result<StatBlock, BattleError> {
    let mut stats = StatBlock::default();
    for (i, stat) in Stat::PERMANENT.iter().enumerate() {
        let value = if *stat == Stat::Hp {
            formulas::calculate_hp(base.get(*stat), level, ivs[i], evs[i])?
        } else {
            formulas::calculate_stat(base.get(*stat), level, nature, *stat, ivs[i], evs[i])?
        };
        stats.set(*stat, value);
    }
    Ok(stats)
}

/// Combatant state during battle
///
/// Owned by its party for the whole battle. Stat stages and volatile
/// conditions belong to the slot it occupies, not to the combatant.
#[derive(Debug, Clone)]
pub struct Combatant {
    species: Arc<SpeciesData>,
    nickname: Option<String>,
    level: u8,
    nature: Nature,
    ivs: [u8; 6],
    evs: [u16; 6],
    stats: StatBlock,
    experience: u32,

    // === HP ===
    hp: u32,

    // === Status ===
    status: Option<Status>,
    /// Sleep turns left, or the badly-poisoned damage counter
    status_counter: u8,

    // === Loadout ===
    ability: Arc<AbilityData>,
    item: Option<Arc<ItemData>>,
    moves: Vec<MoveSlot>,
}

impl Combatant {
    /// Build a combatant, validating level, IVs, EVs, learnset and ability
    pub fn new(species: Arc<SpeciesData>, config: CombatantConfig) -> Result<Self, BattleError> {
        if config.moves.is_empty() || config.moves.len() > MAX_MOVES {
            return Err(BattleError::InvalidMoveCount(config.moves.len()));
        }
        if let Some(m) = config.moves.iter().find(|m| !species.can_learn(&m.name)) {
            return Err(BattleError::MoveNotLearnable {
                species: species.name.clone(),
                move_name: m.name.clone(),
            });
        }
        if !species.can_have_ability(&config.ability.name) {
            return Err(BattleError::AbilityNotAllowed {
                species: species.name.clone(),
                ability: config.ability.name.clone(),
            });
        }

        let stats = compute_stats(
            &species.base_stats,
            config.level,
            config.nature,
            &config.ivs,
            &config.evs,
        )?;
        let experience = formulas::exp_for_level(config.level)?;

        Ok(Self {
            species,
            nickname: config.nickname,
            level: config.level,
            nature: config.nature,
            ivs: config.ivs,
            evs: config.evs,
            hp: stats.hp,
            stats,
            experience,
            status: None,
            status_counter: 0,
            ability: config.ability,
            item: config.item,
            moves: config.moves.into_iter().map(MoveSlot::new).collect(),
        })
    }

    /// Replace the computed stats (scripted encounters, tests); HP refills
    pub fn with_stats(mut self, stats: StatBlock) -> Self {
        self.stats = stats;
        self.hp = stats.hp;
        self
    }

    // === Identity ===

    pub fn species(&self) -> &SpeciesData {
        &self.species
    }

    /// Get display name (nickname or species)
    pub fn name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.species.name)
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn nature(&self) -> Nature {
        self.nature
    }

    pub fn types(&self) -> &[Type] {
        &self.species.types
    }

    /// Primary type and optional second type
    pub fn type_pair(&self) -> (Type, Option<Type>) {
        let types = self.types();
        (
            types.first().copied().unwrap_or(Type::Normal),
            types.get(1).copied(),
        )
    }

    pub fn has_type(&self, t: Type) -> bool {
        self.species.types.contains(&t)
    }

    // === Stats and HP ===

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    /// Computed value of a permanent stat before any battle modifier
    pub fn stat(&self, stat: Stat) -> u32 {
        self.stats.get(stat)
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.hp
    }

    /// Get HP as percentage (0-100)
    pub fn hp_percent(&self) -> u32 {
        if self.stats.hp == 0 {
            return 0;
        }
        self.hp * 100 / self.stats.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Check if Pokemon is alive (not fainted)
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Lose up to `amount` HP, returns the HP actually lost
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Recover up to `amount` HP, returns the HP actually restored
    ///
    /// Fainted combatants cannot be healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.is_fainted() {
            return 0;
        }
        let restored = amount.min(self.stats.hp - self.hp);
        self.hp += restored;
        restored
    }

    // === Status ===

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    pub fn status_counter(&self) -> u8 {
        self.status_counter
    }

    pub fn set_status_counter(&mut self, counter: u8) {
        self.status_counter = counter;
    }

    /// Whether `status` could be applied right now
    pub fn can_receive_status(&self, status: Status) -> bool {
        self.is_alive() && self.status.is_none() && !status.is_immune(self.types())
    }

    /// Apply a persistent status; returns false if it did not stick
    pub fn set_status(&mut self, status: Status, counter: u8) -> bool {
        if !self.can_receive_status(status) {
            return false;
        }
        self.status = Some(status);
        self.status_counter = counter;
        true
    }

    /// Remove any persistent status, returning it
    pub fn cure_status(&mut self) -> Option<Status> {
        self.status_counter = 0;
        self.status.take()
    }

    /// Called when leaving the field; bad poison damage starts over
    pub fn on_switch_out(&mut self) {
        if self.status == Some(Status::BadPoison) {
            self.status_counter = 1;
        }
    }

    // === Ability and item ===

    pub fn ability(&self) -> &Arc<AbilityData> {
        &self.ability
    }

    pub fn set_ability(&mut self, ability: Arc<AbilityData>) {
        self.ability = ability;
    }

    pub fn item(&self) -> Option<&Arc<ItemData>> {
        self.item.as_ref()
    }

    /// Remove the held item, returning it
    pub fn take_item(&mut self) -> Option<Arc<ItemData>> {
        self.item.take()
    }

    /// Replace the held item, returning the previous one
    pub fn set_item(&mut self, item: Option<Arc<ItemData>>) -> Option<Arc<ItemData>> {
        std::mem::replace(&mut self.item, item)
    }

    // === Moves ===

    pub fn moves(&self) -> &[MoveSlot] {
        &self.moves
    }

    pub fn move_slot(&self, index: usize) -> Option<&MoveSlot> {
        self.moves.get(index)
    }

    /// Indices of moves with PP left
    pub fn usable_moves(&self) -> impl Iterator<Item = usize> + '_ {
        self.moves
            .iter()
            .enumerate()
            .filter(|(_, m)| m.pp > 0)
            .map(|(i, _)| i)
    }

    /// Spend one PP, returns false if the move is unknown or out of PP
    pub fn deduct_pp(&mut self, index: usize) -> bool {
        match self.moves.get_mut(index) {
            Some(slot) if slot.pp > 0 => {
                slot.pp -= 1;
                true
            }
            _ => false,
        }
    }

    // === Experience ===

    pub fn experience(&self) -> u32 {
        self.experience
    }

    /// Add experience, leveling up and recomputing stats as thresholds pass
    ///
    /// HP lost before the level-up stays lost. Returns the levels gained.
    pub fn gain_experience(&mut self, amount: u32) -> Result<u8, BattleError> {
        self.experience = self.experience.saturating_add(amount);
        let new_level = formulas::level_for_exp(self.experience);
        if new_level <= self.level {
            return Ok(0);
        }

        let gained = new_level - self.level;
        let stats = compute_stats(
            &self.species.base_stats,
            new_level,
            self.nature,
            &self.ivs,
            &self.evs,
        )?;
        let missing = self.stats.hp - self.hp;
        self.level = new_level;
        self.stats = stats;
        if self.is_alive() {
            self.hp = stats.hp.saturating_sub(missing).max(1);
        }
        Ok(gained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::MoveCategory;

    fn pikachu_species() -> Arc<SpeciesData> {
        Arc::new(
            SpeciesData::new(
                "Pikachu",
                StatBlock::new(35, 55, 40, 50, 50, 90),
                vec![Type::Electric],
            )
            .with_abilities(["Static"])
            .with_learnset(["Thunderbolt", "Quick Attack"]),
        )
    }

    fn thunderbolt() -> Arc<MoveData> {
        Arc::new(MoveData::new("Thunderbolt", Type::Electric, MoveCategory::Special, 90).with_pp(2))
    }

    fn pikachu(level: u8) -> Combatant {
        let config = CombatantConfig::new(level, Arc::new(AbilityData::new("Static")), vec![thunderbolt()]);
        Combatant::new(pikachu_species(), config).unwrap()
    }

    #[test]
    fn test_new_computes_stats() {
        let poke = pikachu(50);
        assert_eq!(poke.name(), "Pikachu");
        assert_eq!(poke.max_hp(), 142);
        assert_eq!(poke.hp(), 142);
        // (110 + 31 + 63) * 50 / 100 + 5
        assert_eq!(poke.stat(Stat::Attack), 107);
        assert_eq!(poke.experience(), 125_000);
    }

    #[test]
    fn test_rejects_unlearnable_move() {
        let surf = Arc::new(MoveData::new("Surf", Type::Water, MoveCategory::Special, 90));
        let config = CombatantConfig::new(50, Arc::new(AbilityData::new("Static")), vec![surf]);
        let err = Combatant::new(pikachu_species(), config).unwrap_err();
        assert_eq!(
            err,
            BattleError::MoveNotLearnable {
                species: "Pikachu".to_string(),
                move_name: "Surf".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_illegal_ability() {
        let config = CombatantConfig::new(50, Arc::new(AbilityData::new("Levitate")), vec![thunderbolt()]);
        assert!(matches!(
            Combatant::new(pikachu_species(), config),
            Err(BattleError::AbilityNotAllowed { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_level_and_move_count() {
        let config = CombatantConfig::new(0, Arc::new(AbilityData::new("Static")), vec![thunderbolt()]);
        assert_eq!(
            Combatant::new(pikachu_species(), config).unwrap_err(),
            BattleError::InvalidLevel(0)
        );

        let config = CombatantConfig::new(50, Arc::new(AbilityData::new("Static")), vec![]);
        assert_eq!(
            Combatant::new(pikachu_species(), config).unwrap_err(),
            BattleError::InvalidMoveCount(0)
        );
    }

    #[test]
    fn test_damage_and_heal() {
        let mut poke = pikachu(50);
        assert_eq!(poke.take_damage(42), 42);
        assert_eq!(poke.hp(), 100);
        assert_eq!(poke.heal(100), 42);
        assert_eq!(poke.take_damage(500), 142);
        assert!(poke.is_fainted());
        assert_eq!(poke.heal(10), 0);
    }

    #[test]
    fn test_status_rules() {
        let mut poke = pikachu(50);
        assert!(!poke.set_status(Status::Paralysis, 0)); // Electric is immune
        assert!(poke.set_status(Status::Burn, 0));
        assert!(!poke.set_status(Status::Poison, 0)); // Already statused
        assert_eq!(poke.cure_status(), Some(Status::Burn));
        assert!(poke.status().is_none());
    }

    #[test]
    fn test_deduct_pp() {
        let mut poke = pikachu(50);
        assert!(poke.deduct_pp(0));
        assert!(poke.deduct_pp(0));
        assert!(!poke.deduct_pp(0));
        assert!(!poke.deduct_pp(3));
        assert_eq!(poke.usable_moves().count(), 0);
    }

    #[test]
    fn test_item_swap() {
        let mut poke = pikachu(50);
        let orb = Arc::new(ItemData::new("Light Ball"));
        assert!(poke.set_item(Some(orb)).is_none());
        assert_eq!(poke.item().map(|i| i.name.as_str()), Some("Light Ball"));
        assert!(poke.take_item().is_some());
        assert!(poke.item().is_none());
    }

    #[test]
    fn test_gain_experience_levels_up() {
        let mut poke = pikachu(50);
        poke.take_damage(40);
        let before = poke.max_hp();

        let gained = poke.gain_experience(exp_to(51) - poke.experience()).unwrap();
        assert_eq!(gained, 1);
        assert_eq!(poke.level(), 51);
        assert!(poke.max_hp() > before);
        assert_eq!(poke.max_hp() - poke.hp(), 40);

        assert_eq!(poke.gain_experience(1).unwrap(), 0);
    }

    fn exp_to(level: u8) -> u32 {
        formulas::exp_for_level(level).unwrap()
    }

    #[test]
    fn test_with_stats_override() {
        let poke = pikachu(50).with_stats(StatBlock::new(100, 100, 100, 100, 100, 100));
        assert_eq!(poke.hp(), 100);
        assert_eq!(poke.stat(Stat::Attack), 100);
    }
}
