use crate::core::constants::*;
use serde::{Deserialize, Serialize};

/// Precomputed stat bundle read by the battle engine at setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterStats {
    pub attack_power: f64,
    pub spell_power: f64,
    pub haste_percent: f64,
    /// Fraction in `0..=1`.
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub strength: u32,
    pub agility: u32,
    pub intellect: u32,
    pub stamina: u32,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self {
            attack_power: 0.0,
            spell_power: 0.0,
            haste_percent: 0.0,
            crit_chance: 0.0,
            crit_multiplier: BASE_CRIT_MULTIPLIER,
            strength: 0,
            agility: 0,
            intellect: 0,
            stamina: 0,
        }
    }
}

impl CharacterStats {
    /// Derives the combat ratings from primary attributes.
    pub fn from_attributes(strength: u32, agility: u32, intellect: u32, stamina: u32) -> Self {
        Self {
            attack_power: strength as f64 * AP_PER_STRENGTH + agility as f64 * AP_PER_AGILITY,
            spell_power: intellect as f64 * SP_PER_INTELLECT,
            haste_percent: 0.0,
            crit_chance: BASE_CRIT_CHANCE + agility as f64 * CRIT_CHANCE_PER_AGILITY,
            crit_multiplier: BASE_CRIT_MULTIPLIER,
            strength,
            agility,
            intellect,
            stamina,
        }
    }

    /// Stats with equipment bonuses folded in.
    pub fn with_equipment(&self, bonuses: &EquipmentBonuses) -> Self {
        Self {
            attack_power: self.attack_power
                + bonuses.attack_power
                + bonuses.strength as f64 * AP_PER_STRENGTH
                + bonuses.agility as f64 * AP_PER_AGILITY,
            spell_power: self.spell_power
                + bonuses.spell_power
                + bonuses.intellect as f64 * SP_PER_INTELLECT,
            haste_percent: self.haste_percent + bonuses.haste_percent,
            crit_chance: self.crit_chance
                + bonuses.crit_chance
                + bonuses.agility as f64 * CRIT_CHANCE_PER_AGILITY,
            crit_multiplier: self.crit_multiplier + bonuses.crit_multiplier_bonus,
            strength: self.strength + bonuses.strength,
            agility: self.agility + bonuses.agility,
            intellect: self.intellect + bonuses.intellect,
            stamina: self.stamina + bonuses.stamina,
        }
    }

    pub fn with_attack_power(mut self, attack_power: f64) -> Self {
        self.attack_power = attack_power;
        self
    }

    pub fn with_spell_power(mut self, spell_power: f64) -> Self {
        self.spell_power = spell_power;
        self
    }

    pub fn with_haste(mut self, haste_percent: f64) -> Self {
        self.haste_percent = haste_percent;
        self
    }

    pub fn with_crit(mut self, crit_chance: f64, crit_multiplier: f64) -> Self {
        self.crit_chance = crit_chance;
        self.crit_multiplier = crit_multiplier;
        self
    }

    pub fn max_hp(&self) -> u32 {
        BASE_HP + self.stamina * HP_PER_STAMINA
    }

    /// Raw damage of one basic attack swing before crits and mitigation.
    pub fn basic_attack_damage(&self) -> f64 {
        BASE_WEAPON_DAMAGE + self.attack_power * BASIC_ATTACK_AP_COEFFICIENT
    }

    /// 1.0 at zero haste, 1.25 at 25% haste.
    pub fn haste_factor(&self) -> f64 {
        1.0 + self.haste_percent.max(0.0) / 100.0
    }
}

/// Bonuses contributed by equipped items, summed by an external service.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentBonuses {
    pub attack_power: f64,
    pub spell_power: f64,
    pub haste_percent: f64,
    pub crit_chance: f64,
    pub crit_multiplier_bonus: f64,
    pub strength: u32,
    pub agility: u32,
    pub intellect: u32,
    pub stamina: u32,
}

/// Looks up equipment bonuses for a character, once per battle setup.
pub trait EquipmentSource {
    fn bonuses_for(&self, character_id: &str) -> EquipmentBonuses;
}

/// A character with nothing equipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEquipment;

impl EquipmentSource for NoEquipment {
    fn bonuses_for(&self, _character_id: &str) -> EquipmentBonuses {
        EquipmentBonuses::default()
    }
}
