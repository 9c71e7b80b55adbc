//! Shared combat math functions for the battle engine and simulator.
//!
//! These pure functions calculate combat outcomes without side effects.
//! Live battles, offline fast-forward and the simulator all go through them.

use crate::combat::types::{DamageType, Mitigation};
use crate::core::rng::RandomStream;

/// Result of a single damage roll before mitigation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackResult {
    /// Raw damage (after crit multiplier if applicable).
    pub damage: f64,
    /// Whether this roll was a critical hit.
    pub is_crit: bool,
}

/// Roll a crit for `base_damage` and apply the multiplier on success.
///
/// Consumes exactly one draw from `rng` whenever `crit_chance > 0`.
pub fn roll_attack(
    base_damage: f64,
    crit_chance: f64,
    crit_multiplier: f64,
    rng: &mut RandomStream,
) -> AttackResult {
    let is_crit = roll_crit(crit_chance, rng);
    let damage = if is_crit {
        base_damage * crit_multiplier
    } else {
        base_damage
    };
    AttackResult { damage, is_crit }
}

/// Roll for critical hit. `crit_chance` is a fraction in `0..=1`.
pub fn roll_crit(crit_chance: f64, rng: &mut RandomStream) -> bool {
    rng.roll(crit_chance)
}

/// Calculate actual damage taken after the target's mitigation.
///
/// Percentage reduction applies first, then flat defense. The result is rounded
/// to an integral amount.
pub fn mitigate(raw_damage: f64, damage_type: DamageType, mitigation: &Mitigation) -> u32 {
    if raw_damage <= 0.0 {
        return 0;
    }
    let reduction = mitigation.reduction_for(damage_type).clamp(0.0, 1.0);
    let reduced = (raw_damage * (1.0 - reduction)).round() as u32;
    reduced.saturating_sub(mitigation.flat)
}

/// Per-tick value of a periodic effect.
///
/// Haste never enters this formula: it changes tick cadence, not magnitude.
pub fn periodic_tick_value(
    base_value: f64,
    attack_power: f64,
    ap_coefficient: f64,
    spell_power: f64,
    sp_coefficient: f64,
    stacks: u32,
) -> f64 {
    let per_stack = base_value + attack_power * ap_coefficient + spell_power * sp_coefficient;
    per_stack * stacks.max(1) as f64
}

/// Interval after haste. `haste_percent` of 25 means 25% faster.
pub fn hasted_interval(interval: f64, haste_percent: f64) -> f64 {
    let factor = 1.0 + haste_percent.max(0.0) / 100.0;
    interval / factor
}

/// Apply damage to HP, returning remaining HP.
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

/// Check if entity is still alive.
pub fn is_alive(current_hp: u32) -> bool {
    current_hp > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mitigate_zero_mitigation_rounds() {
        assert_eq!(mitigate(59.6, DamageType::Physical, &Mitigation::none()), 60);
        assert_eq!(mitigate(0.0, DamageType::Fire, &Mitigation::none()), 0);
    }

    #[test]
    fn test_mitigate_uses_type_specific_reduction() {
        let m = Mitigation {
            armor: 0.5,
            resistance: 0.25,
            flat: 0,
        };
        assert_eq!(mitigate(100.0, DamageType::Physical, &m), 50);
        assert_eq!(mitigate(100.0, DamageType::Fire, &m), 75);
    }

    #[test]
    fn test_mitigate_flat_defense_saturates() {
        let m = Mitigation {
            armor: 0.0,
            resistance: 0.0,
            flat: 30,
        };
        assert_eq!(mitigate(20.0, DamageType::Physical, &m), 0);
        assert_eq!(mitigate(50.0, DamageType::Physical, &m), 20);
    }

    #[test]
    fn test_periodic_tick_value_scales_with_power_not_haste() {
        assert_eq!(periodic_tick_value(10.0, 0.0, 0.2, 0.0, 0.0, 1), 10.0);
        assert_eq!(periodic_tick_value(10.0, 200.0, 0.2, 0.0, 0.0, 1), 50.0);
        assert_eq!(periodic_tick_value(10.0, 0.0, 0.0, 100.0, 0.5, 2), 120.0);
    }

    #[test]
    fn test_hasted_interval() {
        assert_eq!(hasted_interval(2.0, 0.0), 2.0);
        assert_eq!(hasted_interval(2.0, 100.0), 1.0);
        assert_eq!(hasted_interval(2.0, -50.0), 2.0);
    }

    #[test]
    fn test_roll_attack_crit_always() {
        let mut rng = RandomStream::new(1);
        let result = roll_attack(10.0, 1.0, 2.5, &mut rng);
        assert!(result.is_crit);
        assert_eq!(result.damage, 25.0);
    }

    #[test]
    fn test_roll_attack_never_crits_at_zero() {
        let mut rng = RandomStream::new(1);
        for _ in 0..100 {
            let result = roll_attack(10.0, 0.0, 2.0, &mut rng);
            assert!(!result.is_crit);
            assert_eq!(result.damage, 10.0);
        }
    }

    #[test]
    fn test_apply_damage_saturates() {
        assert_eq!(apply_damage(50, 70), 0);
        assert!(!is_alive(apply_damage(50, 70)));
        assert!(is_alive(apply_damage(50, 20)));
    }
}
