use crate::character::CharacterStats;
use crate::combat::encounter::EncounterSpec;
use crate::combat::segment::{self, Segment};
use crate::combat::types::Enemy;
use crate::core::constants::*;
use crate::core::error::ConfigError;
use crate::profession::Profession;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything needed to set up one battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleConfig {
    pub character_id: String,
    pub character_name: String,
    pub profession: Profession,
    pub seed: u64,
    pub stats: CharacterStats,
    pub encounter: EncounterSpec,
    pub attack_interval: f64,
    pub special_interval: f64,
    pub segment_seconds: f64,
    pub revives: u32,
    /// Collect [`crate::combat::BattleEvent`] records while running.
    pub record_events: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            character_id: "character".to_string(),
            character_name: "Hero".to_string(),
            profession: Profession::Warrior,
            seed: 0,
            stats: CharacterStats::default(),
            encounter: EncounterSpec::Single(Enemy::dummy("Training Dummy", 1_000_000)),
            attack_interval: DEFAULT_ATTACK_INTERVAL_SECONDS,
            special_interval: DEFAULT_SPECIAL_INTERVAL_SECONDS,
            segment_seconds: DEFAULT_SEGMENT_SECONDS,
            revives: 0,
            record_events: false,
        }
    }
}

impl BattleConfig {
    pub fn new(profession: Profession, seed: u64) -> Self {
        Self {
            profession,
            seed,
            ..Self::default()
        }
    }

    pub fn with_stats(mut self, stats: CharacterStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_encounter(mut self, encounter: EncounterSpec) -> Self {
        self.encounter = encounter;
        self
    }

    pub fn with_segment_seconds(mut self, seconds: f64) -> Self {
        self.segment_seconds = seconds;
        self
    }

    pub fn with_intervals(mut self, attack: f64, special: f64) -> Self {
        self.attack_interval = attack;
        self.special_interval = special;
        self
    }

    pub fn with_revives(mut self, revives: u32) -> Self {
        self.revives = revives;
        self
    }

    pub fn with_character(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.character_id = id.into();
        self.character_name = name.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.attack_interval > 0.0) {
            return Err(ConfigError::InvalidSetting(
                "attack interval must be positive".into(),
            ));
        }
        if !(self.special_interval > 0.0) {
            return Err(ConfigError::InvalidSetting(
                "special interval must be positive".into(),
            ));
        }
        if self.encounter.enemy_count() == 0 {
            return Err(ConfigError::InvalidSetting("encounter has no enemies".into()));
        }
        Ok(())
    }
}

/// Identity record of one battle. Frozen once ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    id: Uuid,
    character_id: String,
    profession: Profession,
    attack_interval: f64,
    special_interval: f64,
    start_time: f64,
    end_time: Option<f64>,
}

impl Battle {
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            character_id: config.character_id.clone(),
            profession: config.profession.clone(),
            attack_interval: config.attack_interval,
            special_interval: config.special_interval,
            start_time: 0.0,
            end_time: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn character_id(&self) -> &str {
        &self.character_id
    }

    pub fn profession(&self) -> &Profession {
        &self.profession
    }

    pub fn attack_interval(&self) -> f64 {
        self.attack_interval
    }

    pub fn special_interval(&self) -> f64 {
        self.special_interval
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> Option<f64> {
        self.end_time
    }

    pub fn is_ended(&self) -> bool {
        self.end_time.is_some()
    }

    /// Marks the battle ended at `time`. Returns false if it already was.
    pub fn end(&mut self, time: f64) -> bool {
        if self.end_time.is_some() {
            return false;
        }
        self.end_time = Some(time.max(self.start_time));
        true
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    DurationReached,
    CharacterDied,
    EncounterCleared,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    pub battle: Battle,
    pub segments: Vec<Segment>,
    /// At least one enemy group was fully cleared.
    pub killed: bool,
    /// When the first group was cleared.
    pub kill_time: Option<f64>,
    pub overkill: u64,
    pub kills: u32,
    pub termination: Termination,
    pub end_time: f64,
    pub character_hp: u32,
    pub revives_used: u32,
}

impl BattleResult {
    pub fn total_damage(&self) -> u64 {
        segment::total_damage(&self.segments)
    }

    pub fn tag_total(&self, tag: &str) -> u64 {
        segment::tag_total(&self.segments, tag)
    }

    pub fn dps(&self) -> f64 {
        if self.end_time <= 0.0 {
            0.0
        } else {
            self.total_damage() as f64 / self.end_time
        }
    }

    /// Equal outcomes, ignoring the battle identity.
    pub fn same_outcome(&self, other: &BattleResult) -> bool {
        self.segments == other.segments
            && self.killed == other.killed
            && self.kill_time == other.kill_time
            && self.overkill == other.overkill
            && self.kills == other.kills
            && self.termination == other.termination
            && self.end_time == other.end_time
            && self.character_hp == other.character_hp
            && self.revives_used == other.revives_used
    }
}
