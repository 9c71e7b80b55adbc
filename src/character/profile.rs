use super::stats::{CharacterStats, EquipmentSource};
use crate::profession::Profession;
use serde::{Deserialize, Serialize};

/// The character-side inputs of a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub profession: Profession,
    pub stats: CharacterStats,
}

impl CharacterProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, profession: Profession) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: 1,
            profession,
            stats: CharacterStats::default(),
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn with_stats(mut self, stats: CharacterStats) -> Self {
        self.stats = stats;
        self
    }

    /// Folds equipment bonuses into the stats. Looked up once, at setup.
    pub fn equipped(mut self, source: &dyn EquipmentSource) -> Self {
        let bonuses = source.bonuses_for(&self.id);
        self.stats = self.stats.with_equipment(&bonuses);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::stats::{EquipmentBonuses, NoEquipment};

    struct FixedGear(EquipmentBonuses);

    impl EquipmentSource for FixedGear {
        fn bonuses_for(&self, _character_id: &str) -> EquipmentBonuses {
            self.0
        }
    }

    #[test]
    fn test_no_equipment_leaves_stats_unchanged() {
        let stats = CharacterStats::from_attributes(10, 10, 10, 10);
        let profile = CharacterProfile::new("c1", "Aria", Profession::Mage)
            .with_stats(stats)
            .equipped(&NoEquipment);
        assert_eq!(profile.stats, stats);
    }

    #[test]
    fn test_equipment_bonuses_applied() {
        let gear = FixedGear(EquipmentBonuses {
            attack_power: 25.0,
            haste_percent: 10.0,
            ..EquipmentBonuses::default()
        });
        let profile = CharacterProfile::new("c1", "Brann", Profession::Warrior).equipped(&gear);
        assert_eq!(profile.stats.attack_power, 25.0);
        assert_eq!(profile.stats.haste_percent, 10.0);
    }
}
