//! Simulation configuration.

use crate::character::CharacterStats;
use crate::combat::encounter::EncounterSpec;
use crate::combat::types::Enemy;
use crate::core::constants::DEFAULT_SEGMENT_SECONDS;
use crate::core::error::SimError;
use crate::profession::Profession;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a batch of simulated battles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of battles to run
    pub num_runs: u32,

    /// Parent seed; each run draws its own seed from it
    pub seed: u64,

    /// Simulated seconds per battle
    pub duration_seconds: f64,

    pub profession: Profession,

    /// Level used to generate enemies when no fixed encounter is given
    pub level: u32,

    pub strength: u32,
    pub agility: u32,
    pub intellect: u32,
    pub stamina: u32,

    /// Fixed encounter for every run (None = a generated idle pack per run)
    pub encounter: Option<EncounterSpec>,

    pub revives: u32,
    pub segment_seconds: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: 42,
            duration_seconds: 300.0,
            profession: Profession::Warrior,
            level: 10,
            strength: 20,
            agility: 15,
            intellect: 10,
            stamina: 20,
            encounter: None,
            revives: 0,
            segment_seconds: DEFAULT_SEGMENT_SECONDS,
        }
    }
}

impl SimConfig {
    pub fn from_path(path: &Path) -> Result<Self, SimError> {
        let data = fs::read_to_string(path)?;
        let cfg: SimConfig = toml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn stats(&self) -> CharacterStats {
        CharacterStats::from_attributes(self.strength, self.agility, self.intellect, self.stamina)
    }

    /// Quick config for comparing a class against a single target
    pub fn single_target(profession: Profession, num_runs: u32) -> Self {
        Self {
            num_runs,
            profession,
            encounter: Some(EncounterSpec::Single(Enemy::dummy("Training Dummy", 1_000_000))),
            ..Default::default()
        }
    }
}
