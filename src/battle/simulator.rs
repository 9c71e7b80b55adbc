//! Entry points for running battles.

use super::live::RunningBattle;
use super::runner::BattleRunner;
use super::types::{BattleConfig, BattleResult};
use crate::core::error::ConfigError;
use crate::profession::ProfessionModule;

pub struct BattleSimulator;

impl BattleSimulator {
    /// Runs one battle with the configured profession until `duration`
    /// simulated seconds pass or the battle ends.
    ///
    /// Identical configs always produce identical segment sequences.
    pub fn run_for_duration(config: &BattleConfig, duration: f64) -> Result<BattleResult, ConfigError> {
        Self::run_with_module(config, config.profession.module(), duration)
    }

    /// Like [`BattleSimulator::run_for_duration`] with an explicitly supplied module.
    pub fn run_with_module(
        config: &BattleConfig,
        module: Box<dyn ProfessionModule>,
        duration: f64,
    ) -> Result<BattleResult, ConfigError> {
        Ok(BattleRunner::new(config, module, duration)?.run())
    }

    /// Builds a battle for step-polling consumers without running it.
    pub fn create_running_battle(
        config: &BattleConfig,
        duration: f64,
    ) -> Result<RunningBattle, ConfigError> {
        let runner = BattleRunner::new(config, config.profession.module(), duration)?;
        Ok(RunningBattle::new(runner))
    }
}
