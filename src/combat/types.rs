use crate::core::constants::ENEMY_ATTACK_INTERVAL_SECONDS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle of a combatant inside an encounter's arena.
///
/// Handles are never reused within one battle, so buffs and scheduled events can
/// hold them without keeping references into the encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DamageType {
    #[default]
    Physical,
    Fire,
    Frost,
    Nature,
    Shadow,
    Arcane,
    Holy,
}

impl DamageType {
    pub fn is_physical(&self) -> bool {
        matches!(self, DamageType::Physical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DamageType::Physical => "physical",
            DamageType::Fire => "fire",
            DamageType::Frost => "frost",
            DamageType::Nature => "nature",
            DamageType::Shadow => "shadow",
            DamageType::Arcane => "arcane",
            DamageType::Holy => "holy",
        }
    }
}

/// Defensive parameters of a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Mitigation {
    /// Fractional reduction applied to physical damage.
    #[serde(default)]
    pub armor: f64,
    /// Fractional reduction applied to every non-physical school.
    #[serde(default)]
    pub resistance: f64,
    /// Flat amount subtracted after the percentage reduction.
    #[serde(default)]
    pub flat: u32,
}

impl Mitigation {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn reduction_for(&self, damage_type: DamageType) -> f64 {
        if damage_type.is_physical() {
            self.armor
        } else {
            self.resistance
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: CombatantId,
    pub name: String,
    pub max_hp: u32,
    pub current_hp: u32,
    pub damage: u32,
    #[serde(default = "default_attack_interval")]
    pub attack_interval: f64,
    #[serde(default)]
    pub mitigation: Mitigation,
}

fn default_attack_interval() -> f64 {
    ENEMY_ATTACK_INTERVAL_SECONDS
}

impl Enemy {
    /// The id is a placeholder until the enemy is added to an encounter.
    pub fn new(name: impl Into<String>, max_hp: u32, damage: u32) -> Self {
        Self {
            id: CombatantId(0),
            name: name.into(),
            max_hp,
            current_hp: max_hp,
            damage,
            attack_interval: ENEMY_ATTACK_INTERVAL_SECONDS,
            mitigation: Mitigation::none(),
        }
    }

    pub fn with_mitigation(mut self, mitigation: Mitigation) -> Self {
        self.mitigation = mitigation;
        self
    }

    pub fn with_attack_interval(mut self, interval: f64) -> Self {
        self.attack_interval = interval;
        self
    }

    /// A harmless target that never attacks back.
    pub fn dummy(name: impl Into<String>, max_hp: u32) -> Self {
        Self::new(name, max_hp, 0)
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Fresh copy at full health, used when a group respawns.
    pub fn revived(&self) -> Self {
        Self {
            current_hp: self.max_hp,
            ..self.clone()
        }
    }
}

/// Outcome of one hit landing on an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageOutcome {
    /// Mitigated damage of the hit, including any overkill.
    pub amount: u32,
    /// Portion of `amount` beyond the target's remaining health.
    pub overkill: u32,
    pub killed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_new_starts_full_health() {
        let enemy = Enemy::new("Wolf", 50, 4);
        assert_eq!(enemy.current_hp, 50);
        assert!(enemy.is_alive());
    }

    #[test]
    fn test_revived_restores_health_and_keeps_id() {
        let mut enemy = Enemy::new("Wolf", 50, 4);
        enemy.id = CombatantId(3);
        enemy.current_hp = 0;
        let revived = enemy.revived();
        assert_eq!(revived.current_hp, 50);
        assert_eq!(revived.id, CombatantId(3));
    }

    #[test]
    fn test_reduction_by_school() {
        let m = Mitigation {
            armor: 0.3,
            resistance: 0.1,
            flat: 0,
        };
        assert_eq!(m.reduction_for(DamageType::Physical), 0.3);
        assert_eq!(m.reduction_for(DamageType::Shadow), 0.1);
    }
}
