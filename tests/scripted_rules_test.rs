//! Integration test: Data-driven class rules
//!
//! Resources, heals, cast-triggered grants and stat scaling described entirely
//! through a RuleSet.

use quest_battle::battle::{BattleConfig, BattleResult, BattleSimulator, Termination};
use quest_battle::buffs::BuffDefinition;
use quest_battle::character::CharacterStats;
use quest_battle::combat::{EncounterSpec, Enemy};
use quest_battle::profession::scripted::GrantTarget;
use quest_battle::profession::{Profession, RuleSet};
use quest_battle::skills::{ResourcePool, SkillDefinition};

fn run(rules: RuleSet, config: BattleConfig, duration: f64) -> BattleResult {
    let config = BattleConfig {
        profession: Profession::Scripted(rules),
        ..config
    };
    BattleSimulator::run_for_duration(&config, duration).unwrap()
}

#[test]
fn test_attacks_build_resource_for_skills() {
    let rules = RuleSet::new("Berserker")
        .with_resource(ResourcePool::new("rage", 100.0).starting_at(0.0))
        .with_attack_resource("rage", 25.0)
        .with_skill(SkillDefinition::new("smash", 10, 100.0).with_cost("rage", 50.0));
    let result = run(rules, BattleConfig::default(), 6.0);

    // Swings at 0, 1.5, 3.0, 4.5; every second swing pays for a smash.
    assert_eq!(result.tag_total("basic_attack"), 4);
    assert_eq!(result.tag_total("skill_cast:smash"), 2);
}

#[test]
fn test_heal_over_time_keeps_character_alive() {
    let ogre = EncounterSpec::Single(Enemy::new("Ogre", 1_000_000, 30).with_attack_interval(2.0));
    let config = BattleConfig::default().with_encounter(ogre);

    let unhealed = run(RuleSet::new("Plain"), config.clone(), 10.0);
    assert_eq!(unhealed.termination, Termination::CharacterDied);
    assert_eq!(unhealed.end_time, 8.0);

    let healer = RuleSet::new("Healer")
        .with_buff(BuffDefinition::new("renew", 100.0).heal_over_time(1.0, 20.0))
        .with_start_buff("renew", GrantTarget::Caster);
    let healed = run(healer, config, 10.0);
    assert_eq!(healed.termination, Termination::DurationReached);
    assert_eq!(healed.tag_total("buff_tick:renew"), 9);
    assert!(healed.character_hp > 0);
}

#[test]
fn test_cast_grants_buff_to_primary() {
    let rules = RuleSet::new("Marker")
        .with_buff(BuffDefinition::new("marked", 5.0))
        .with_skill(SkillDefinition::new("mark", 10, 0.0).with_cooldown(100.0))
        .with_cast_buff("mark", "marked", GrantTarget::Primary);
    let result = run(rules, BattleConfig::default(), 3.0);

    assert_eq!(result.tag_total("skill_cast:mark"), 1);
    assert_eq!(result.tag_total("buff_apply:marked"), 1);
}

#[test]
fn test_cast_grant_can_hit_every_enemy() {
    let pack = EncounterSpec::Group(vec![
        Enemy::dummy("A", 1_000),
        Enemy::dummy("B", 1_000),
        Enemy::dummy("C", 1_000),
    ]);
    let rules = RuleSet::new("Plaguebringer")
        .with_buff(BuffDefinition::new("plague", 5.0))
        .with_skill(SkillDefinition::new("spread", 10, 0.0).with_cooldown(100.0))
        .with_cast_buff("spread", "plague", GrantTarget::AllEnemies);
    let result = run(rules, BattleConfig::default().with_encounter(pack), 1.0);

    assert_eq!(result.tag_total("buff_apply:plague"), 3);
}

#[test]
fn test_guaranteed_crits_multiply_damage() {
    let stats = CharacterStats::default().with_crit(1.0, 3.0);
    let result = run(RuleSet::new("Plain"), BattleConfig::default().with_stats(stats), 3.0);

    assert_eq!(result.tag_total("basic_attack"), 2);
    assert_eq!(result.tag_total("crit:basic_attack"), 2);
    let swing = CharacterStats::default().basic_attack_damage() * 3.0;
    assert_eq!(result.total_damage(), 2 * swing.round() as u64);
}

#[test]
fn test_spell_power_scales_skill() {
    let rules = RuleSet::new("Channeler").with_skill(
        SkillDefinition::new("bolt", 10, 0.0)
            .with_coefficients(0.0, 1.0)
            .with_cooldown(100.0),
    );
    let stats = CharacterStats::default().with_spell_power(40.0);
    let result = run(rules, BattleConfig::default().with_stats(stats), 0.1);

    let swing = CharacterStats::default().basic_attack_damage().round() as u64;
    assert_eq!(result.total_damage(), 40 + swing);
}

#[test]
fn test_resource_buff_needs_known_pool() {
    let rules = RuleSet::new("Broken")
        .with_buff(BuffDefinition::new("surge", 10.0).resource_over_time("mana", 1.0, 5.0));
    let config = BattleConfig::new(Profession::Scripted(rules), 1);
    assert!(BattleSimulator::run_for_duration(&config, 5.0).is_err());

    let rules = RuleSet::new("Fixed")
        .with_resource(ResourcePool::new("mana", 50.0).starting_at(0.0))
        .with_buff(BuffDefinition::new("surge", 10.0).resource_over_time("mana", 1.0, 5.0))
        .with_start_buff("surge", GrantTarget::Caster)
        .with_skill(SkillDefinition::new("spend", 10, 1.0).with_cost("mana", 20.0).with_cooldown(100.0));
    let result = run(rules, BattleConfig::new(Profession::Warrior, 1), 5.0);
    // Four ticks of five mana by t=4 pay for one cast.
    assert_eq!(result.tag_total("buff_tick:surge"), 4);
    assert_eq!(result.tag_total("skill_cast:spend"), 1);
}

#[test]
fn test_unknown_granted_buff_is_rejected() {
    let rules = RuleSet::new("Broken").with_start_buff("ghost", GrantTarget::Primary);
    let config = BattleConfig::new(Profession::Scripted(rules), 1);
    assert!(BattleSimulator::run_for_duration(&config, 5.0).is_err());
}

#[test]
fn test_oversized_heal_caps_at_max_health() {
    let ogre = EncounterSpec::Single(Enemy::new("Ogre", 1_000_000, 30).with_attack_interval(2.0));
    let rules = RuleSet::new("Saint")
        .with_buff(BuffDefinition::new("miracle", 100.0).heal_over_time(1.0, 1.0e12))
        .with_start_buff("miracle", GrantTarget::Caster);
    let result = run(rules, BattleConfig::default().with_encounter(ogre), 10.0);

    assert_eq!(result.termination, Termination::DurationReached);
    assert_eq!(result.character_hp, CharacterStats::default().max_hp());
}
