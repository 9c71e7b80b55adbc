//! Deterministic enemy generation for idle encounters.

use super::encounter::EncounterSpec;
use super::types::{Enemy, Mitigation};
use crate::core::constants::*;
use crate::core::rng::RandomStream;

const PREFIXES: [&str; 10] = [
    "Meadow", "Shadow", "Stone", "Cursed", "Ember", "Frost", "Crystal", "Tidal", "Storm", "Grim",
];
const SUFFIXES: [&str; 10] = [
    "Beetle", "Wolf", "Golem", "Skeleton", "Imp", "Wraith", "Sprite", "Naga", "Harpy", "Horror",
];

fn pick<'a>(options: &[&'a str], rng: &mut RandomStream) -> &'a str {
    let index = (rng.next_float() * options.len() as f64) as usize;
    options[index.min(options.len() - 1)]
}

/// Generates a themed enemy name.
pub fn generate_enemy_name(rng: &mut RandomStream) -> String {
    let prefix = pick(&PREFIXES, rng);
    let suffix = pick(&SUFFIXES, rng);
    format!("{} {}", prefix, suffix)
}

/// Calculates enemy stats for a character level (1-based).
/// Returns (hp, damage, armor) with variance applied.
fn calc_enemy_stats(level: u32, rng: &mut RandomStream) -> (u32, u32, f64) {
    let (base_hp, hp_step, base_dmg, dmg_step, armor_step) = ENEMY_BASE_STATS;
    let depth = level.saturating_sub(1);
    let raw_hp = base_hp.saturating_add(depth.saturating_mul(hp_step));
    let raw_dmg = base_dmg.saturating_add(depth.saturating_mul(dmg_step));

    let hp_var = rng.range(ENEMY_STAT_VARIANCE_MIN, ENEMY_STAT_VARIANCE_MAX);
    let dmg_var = rng.range(ENEMY_STAT_VARIANCE_MIN, ENEMY_STAT_VARIANCE_MAX);

    let hp = ((raw_hp as f64) * hp_var).max(1.0) as u32;
    let damage = ((raw_dmg as f64) * dmg_var).max(1.0) as u32;
    let armor = (depth as f64 * armor_step / 10.0).min(ENEMY_MAX_ARMOR);
    (hp, damage, armor)
}

/// Generates one enemy scaled for `level`.
pub fn generate_enemy(level: u32, rng: &mut RandomStream) -> Enemy {
    let (hp, damage, armor) = calc_enemy_stats(level, rng);
    let name = generate_enemy_name(rng);
    Enemy::new(name, hp, damage).with_mitigation(Mitigation {
        armor,
        resistance: armor / 2.0,
        flat: 0,
    })
}

/// A respawning pack used for idle and offline farming.
pub fn idle_encounter(level: u32, rng: &mut RandomStream) -> EncounterSpec {
    let pack = (0..ENEMIES_PER_PACK)
        .map(|_| generate_enemy(level, rng))
        .collect();
    EncounterSpec::Endless(pack)
}
