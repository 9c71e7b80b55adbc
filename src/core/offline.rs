//! Offline progression.
//!
//! Replays the battle engine over the time a player was away, bounded by the
//! plan's remaining budget, and converts the result into rewards. Cost scales
//! with the number of scheduled events, not with the length of the gap.

use super::constants::*;
use super::error::ConfigError;
use super::rng::RandomStream;
use crate::activity::plan::{ActivityPlan, PlanState};
use crate::activity::snapshot::BattleSnapshot;
use crate::battle::runner::BattleRunner;
use crate::battle::types::{BattleConfig, Termination};
use crate::character::CharacterProfile;
use crate::combat::generation::idle_encounter;
use crate::combat::segment::Segment;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

/// What the caller persists after a fast-forward. The plan itself is untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FastForwardResult {
    pub simulated_seconds: f64,
    pub updated_executed_seconds: f64,
    pub plan_completed: bool,
    pub gold: u64,
    pub exp: u64,
    pub total_damage: u64,
    pub kills: u32,
    pub segments: Vec<Segment>,
    /// Encoded battle state to resume from next time; `None` once completed.
    pub snapshot: Option<Vec<u8>>,
    pub warnings: Vec<String>,
}

/// Gold and experience earned for `damage` and `kills`.
pub fn rewards_for(damage: u64, kills: u32) -> (u64, u64) {
    let kills = u64::from(kills);
    let gold = damage / DAMAGE_PER_GOLD + kills * GOLD_PER_KILL;
    let exp = damage / DAMAGE_PER_EXP + kills * EXP_PER_KILL;
    (gold, exp)
}

#[derive(Debug, Clone)]
pub struct OfflineFastForwardEngine {
    segment_seconds: f64,
    revives: u32,
}

impl Default for OfflineFastForwardEngine {
    fn default() -> Self {
        Self {
            segment_seconds: OFFLINE_SEGMENT_SECONDS,
            revives: OFFLINE_REVIVES,
        }
    }
}

impl OfflineFastForwardEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_segment_seconds(mut self, seconds: f64) -> Self {
        self.segment_seconds = seconds;
        self
    }

    pub fn with_revives(mut self, revives: u32) -> Self {
        self.revives = revives;
        self
    }

    /// Whether an absence this long should pause the plan.
    pub fn should_pause(offline_seconds: f64) -> bool {
        offline_seconds > OFFLINE_PAUSE_THRESHOLD_SECONDS
    }

    /// Seconds of the gap that may be simulated for `plan`.
    pub fn simulated_seconds(plan: &ActivityPlan, offline_seconds: f64) -> f64 {
        if plan.state == PlanState::Completed {
            return 0.0;
        }
        let offline = offline_seconds.clamp(0.0, MAX_OFFLINE_SECONDS);
        match plan.remaining_seconds() {
            Some(remaining) => offline.min(remaining.max(0.0)),
            None => offline,
        }
    }

    pub fn fast_forward(
        &self,
        character: &CharacterProfile,
        plan: &ActivityPlan,
        offline_seconds: f64,
    ) -> Result<FastForwardResult, ConfigError> {
        let simulated = Self::simulated_seconds(plan, offline_seconds);
        let updated_executed_seconds = plan.executed_seconds + simulated;
        let plan_completed = plan.state == PlanState::Completed
            || (plan.limit_type.is_bounded() && updated_executed_seconds >= plan.limit_value);

        let mut warnings = Vec::new();
        let resumed = plan
            .snapshot
            .as_deref()
            .and_then(|blob| match BattleSnapshot::decode(blob) {
                Ok(snapshot) if snapshot.profession == character.profession => Some(snapshot),
                Ok(_) => {
                    warn!(plan = %plan.id, "snapshot belongs to another profession, starting fresh");
                    warnings.push("battle snapshot was for another profession; started a fresh encounter".to_string());
                    None
                }
                Err(e) => {
                    warn!(plan = %plan.id, error = %e, "discarding unreadable battle snapshot");
                    warnings.push(format!("battle snapshot discarded: {e}"));
                    None
                }
            });

        let mut rng = RandomStream::new(fast_forward_seed(character, plan));
        let encounter = idle_encounter(character.level, &mut rng);
        let config = BattleConfig::new(character.profession.clone(), rng.next_seed())
            .with_character(character.id.clone(), character.name.clone())
            .with_stats(character.stats)
            .with_encounter(encounter)
            .with_segment_seconds(self.segment_seconds)
            .with_revives(self.revives);

        let mut runner = BattleRunner::new(&config, character.profession.module(), simulated)?;
        let (previous_kills, previous_seconds) = match &resumed {
            Some(snapshot) => {
                runner = runner.resume_from(snapshot);
                (snapshot.kills, snapshot.simulated_seconds)
            }
            None => (0, 0.0),
        };

        runner.step_until(simulated);
        let next_snapshot = if plan_completed {
            None
        } else {
            match runner.snapshot(previous_seconds + simulated).encode() {
                Ok(blob) => Some(blob),
                Err(e) => {
                    warn!(plan = %plan.id, error = %e, "could not encode battle snapshot");
                    warnings.push(format!("battle snapshot not saved: {e}"));
                    None
                }
            }
        };
        let result = runner.finish();
        if result.termination == Termination::CharacterDied {
            warn!(plan = %plan.id, at = result.end_time, "character fell during offline battle");
            warnings.push(format!(
                "character died after {:.0}s of {:.0}s offline; no further progress was made",
                result.end_time, simulated
            ));
        }

        let total_damage = result.total_damage();
        let kills = result.kills.saturating_sub(previous_kills);
        let (gold, exp) = rewards_for(total_damage, kills);

        info!(
            character = %character.id,
            plan = %plan.id,
            simulated,
            total_damage,
            kills,
            gold,
            exp,
            plan_completed,
            "offline fast-forward"
        );

        Ok(FastForwardResult {
            simulated_seconds: simulated,
            updated_executed_seconds,
            plan_completed,
            gold,
            exp,
            total_damage,
            kills,
            segments: result.segments,
            snapshot: next_snapshot,
            warnings,
        })
    }
}

/// Seed for a fresh offline battle, stable for a given character, plan and progress.
fn fast_forward_seed(character: &CharacterProfile, plan: &ActivityPlan) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(character.id.as_bytes());
    hasher.update(plan.id.as_bytes());
    hasher.update(plan.executed_seconds.to_bits().to_le_bytes());
    let digest = hasher.finalize();
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed)
}
