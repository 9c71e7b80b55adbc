//! Integration test: Offline progression
//!
//! Fast-forward bounds, plan state invariants and snapshot resume.

use chrono::Utc;
use quest_battle::activity::{ActivityPlan, BattleSnapshot, PlanState};
use quest_battle::character::{CharacterProfile, CharacterStats};
use quest_battle::core::constants::{MAX_OFFLINE_SECONDS, OFFLINE_PAUSE_THRESHOLD_SECONDS};
use quest_battle::core::offline::OfflineFastForwardEngine;
use quest_battle::profession::Profession;

fn hero(profession: Profession) -> CharacterProfile {
    CharacterProfile::new("hero-1", "Aria", profession)
        .with_level(6)
        .with_stats(CharacterStats::from_attributes(22, 18, 22, 25))
}

fn plan_at(limit: f64, executed: f64) -> ActivityPlan {
    let mut plan = ActivityPlan::with_seconds_limit("hero-1", limit);
    plan.executed_seconds = executed;
    plan
}

#[test]
fn test_offline_gap_within_remaining_budget() {
    let engine = OfflineFastForwardEngine::new();
    let plan = plan_at(3600.0, 1800.0);
    let result = engine.fast_forward(&hero(Profession::Warrior), &plan, 1200.0).unwrap();

    assert_eq!(result.simulated_seconds, 1200.0);
    assert_eq!(result.updated_executed_seconds, 3000.0);
    assert!(!result.plan_completed);
    assert!(result.gold > 0);
    assert!(result.exp > 0);
    assert!(result.snapshot.is_some());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_offline_gap_clamped_to_limit() {
    let engine = OfflineFastForwardEngine::new();
    let plan = plan_at(3600.0, 3000.0);
    let result = engine.fast_forward(&hero(Profession::Mage), &plan, 10_000.0).unwrap();

    assert_eq!(result.simulated_seconds, 600.0);
    assert_eq!(result.updated_executed_seconds, 3600.0);
    assert!(result.plan_completed);
    assert!(result.snapshot.is_none());
}

#[test]
fn test_overshot_plan_simulates_nothing() {
    let engine = OfflineFastForwardEngine::new();
    let plan = plan_at(100.0, 250.0);
    let result = engine.fast_forward(&hero(Profession::Rogue), &plan, 500.0).unwrap();

    assert_eq!(result.simulated_seconds, 0.0);
    assert_eq!(result.updated_executed_seconds, 250.0);
    assert!(result.plan_completed);
    assert_eq!(result.gold, 0);
}

#[test]
fn test_unlimited_plan_capped_at_max_offline() {
    let engine = OfflineFastForwardEngine::new();
    let plan = ActivityPlan::unlimited("hero-1");
    assert_eq!(
        OfflineFastForwardEngine::simulated_seconds(&plan, MAX_OFFLINE_SECONDS * 3.0),
        MAX_OFFLINE_SECONDS
    );
    let result = engine.fast_forward(&hero(Profession::Warrior), &plan, 900.0).unwrap();
    assert!(!result.plan_completed);
    assert!(result.snapshot.is_some());
}

#[test]
fn test_pause_then_resume_then_complete() {
    let engine = OfflineFastForwardEngine::new();
    let character = hero(Profession::Warrior);
    let mut plan = plan_at(3600.0, 1800.0);

    let first = engine.fast_forward(&character, &plan, 600.0).unwrap();
    plan.apply_fast_forward(&first, Utc::now());
    assert_eq!(plan.executed_seconds, 2400.0);
    assert_eq!(plan.state, PlanState::Running);

    // Away long enough to pause.
    assert!(OfflineFastForwardEngine::should_pause(OFFLINE_PAUSE_THRESHOLD_SECONDS * 2.0));
    let blob = plan.snapshot.clone().unwrap();
    assert!(plan.pause(blob));
    plan.executed_seconds = 9999.0;
    assert!(!plan.is_limit_reached());
    assert!(plan.snapshot.is_some());
    assert!(plan.completed_at.is_none());
    plan.executed_seconds = 2400.0;

    assert!(plan.resume());
    let second = engine.fast_forward(&character, &plan, 5000.0).unwrap();
    assert_eq!(second.simulated_seconds, 1200.0);
    assert!(second.plan_completed);

    let now = Utc::now();
    plan.apply_fast_forward(&second, now);
    assert_eq!(plan.state, PlanState::Completed);
    assert!(plan.snapshot.is_none());
    assert_eq!(plan.completed_at, Some(now));
    assert!(plan.is_limit_reached());
    assert_eq!(plan.executed_seconds, 3600.0);
}

#[test]
fn test_resume_reads_previous_snapshot() {
    let engine = OfflineFastForwardEngine::new();
    let character = hero(Profession::Rogue);
    let mut plan = plan_at(7200.0, 0.0);

    let first = engine.fast_forward(&character, &plan, 400.0).unwrap();
    plan.apply_fast_forward(&first, Utc::now());
    let first_snapshot = BattleSnapshot::decode(plan.snapshot.as_deref().unwrap()).unwrap();
    assert_eq!(first_snapshot.simulated_seconds, 400.0);
    assert_eq!(first_snapshot.profession, Profession::Rogue);

    let second = engine.fast_forward(&character, &plan, 400.0).unwrap();
    let second_snapshot = BattleSnapshot::decode(second.snapshot.as_deref().unwrap()).unwrap();
    assert_eq!(second_snapshot.simulated_seconds, 800.0);
    assert!(second_snapshot.kills >= first_snapshot.kills);
    // Rewards only count kills made during this stretch.
    assert_eq!(second.kills, second_snapshot.kills - first_snapshot.kills);
}

#[test]
fn test_corrupt_or_foreign_snapshot_starts_fresh() {
    let engine = OfflineFastForwardEngine::new();
    let mut plan = plan_at(3600.0, 600.0);
    plan.snapshot = Some(b"not a snapshot at all, just bytes".to_vec());
    let result = engine.fast_forward(&hero(Profession::Mage), &plan, 300.0).unwrap();
    assert_eq!(result.warnings.len(), 1);
    assert!(result.total_damage > 0);

    // A snapshot from another class is not reused either.
    let mage_plan = {
        let mut p = plan_at(3600.0, 600.0);
        p.snapshot = result.snapshot.clone();
        p
    };
    let result = engine.fast_forward(&hero(Profession::Warrior), &mage_plan, 300.0).unwrap();
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_fast_forward_is_deterministic() {
    let engine = OfflineFastForwardEngine::new();
    let plan = plan_at(3600.0, 1200.0);
    let character = hero(Profession::Mage);
    let a = engine.fast_forward(&character, &plan, 900.0).unwrap();
    let b = engine.fast_forward(&character, &plan, 900.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_longer_absence_keeps_earning() {
    let engine = OfflineFastForwardEngine::new();
    for profession in [Profession::Warrior, Profession::Mage, Profession::Rogue] {
        let character = hero(profession);
        let plan = ActivityPlan::unlimited("hero-1");
        let short = engine.fast_forward(&character, &plan, 1200.0).unwrap();
        let long = engine.fast_forward(&character, &plan, 3600.0).unwrap();

        assert!(short.warnings.is_empty());
        assert!(long.warnings.is_empty());
        assert!(long.total_damage > short.total_damage);
        assert!(long.kills > short.kills);
        // Damage keeps landing through the last stretch.
        let late: u64 = long
            .segments
            .iter()
            .filter(|s| s.start_time >= 3000.0)
            .map(|s| s.total_damage)
            .sum();
        assert!(late > 0);
    }
}
