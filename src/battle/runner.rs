//! Drains a battle's timeline up to a duration or a terminating condition.

use super::context::BattleContext;
use super::types::{Battle, BattleConfig, BattleResult, Termination};
use crate::activity::snapshot::BattleSnapshot;
use crate::core::error::ConfigError;
use crate::profession::{Profession, ProfessionModule};
use tracing::info;

pub struct BattleRunner {
    battle: Battle,
    profession: Profession,
    ctx: BattleContext,
    module: Box<dyn ProfessionModule>,
    duration: f64,
    cursor: f64,
    started: bool,
}

impl BattleRunner {
    /// Registers the module's rules. Nothing runs until the first step.
    pub fn new(
        config: &BattleConfig,
        module: Box<dyn ProfessionModule>,
        duration: f64,
    ) -> Result<Self, ConfigError> {
        if !(duration >= 0.0) {
            return Err(ConfigError::InvalidSetting(format!(
                "battle duration {duration} is negative"
            )));
        }
        let ctx = BattleContext::new(config, module.as_ref())?;
        Ok(Self {
            battle: Battle::new(config),
            profession: config.profession.clone(),
            ctx,
            module,
            duration,
            cursor: 0.0,
            started: false,
        })
    }

    /// Continues the fight stored in `snapshot` instead of a fresh encounter.
    pub fn resume_from(mut self, snapshot: &BattleSnapshot) -> Self {
        if !self.started {
            self.ctx.restore(snapshot);
        }
        self
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    pub fn context(&self) -> &BattleContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut BattleContext {
        &mut self.ctx
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Simulated time processed so far.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.ctx.termination().is_some() || self.cursor >= self.duration
    }

    fn ensure_started(&mut self) {
        if !self.started {
            self.started = true;
            self.ctx.start(self.module.as_ref());
        }
    }

    /// Processes every event scheduled strictly before `time` (capped at the
    /// duration). Returns the number of events handled.
    pub fn step_until(&mut self, time: f64) -> usize {
        self.ensure_started();
        let horizon = time.min(self.duration);
        let mut handled = 0;
        while self.ctx.termination().is_none() {
            let Some(event) = self.ctx.pop_before(horizon) else {
                break;
            };
            self.ctx.handle(event, self.module.as_ref());
            handled += 1;
        }
        self.cursor = match self.ctx.termination() {
            Some(_) => self.ctx.now(),
            None => self.cursor.max(horizon),
        };
        handled
    }

    /// Snapshot of the battle as it stands, for a later resume.
    pub fn snapshot(&self, simulated_seconds: f64) -> BattleSnapshot {
        self.ctx.snapshot(&self.profession, simulated_seconds)
    }

    /// Runs to the end and returns the result.
    pub fn run(mut self) -> BattleResult {
        self.step_until(self.duration);
        self.finish()
    }

    /// Drains whatever is left and closes the segment stream.
    pub fn finish(mut self) -> BattleResult {
        self.step_until(self.duration);
        let termination = self
            .ctx
            .termination()
            .unwrap_or(Termination::DurationReached);
        let end_time = match termination {
            Termination::DurationReached => self.duration,
            _ => self.ctx.now(),
        };
        self.battle.end(end_time);

        let killed = self.ctx.kill_time().is_some();
        let kill_time = self.ctx.kill_time();
        let overkill = self.ctx.overkill();
        let kills = self.ctx.kills();
        let character_hp = self.ctx.character_hp();
        let revives_used = self.ctx.revives_used();
        let segments = self.ctx.finish_segments(end_time);

        let result = BattleResult {
            battle: self.battle,
            segments,
            killed,
            kill_time,
            overkill,
            kills,
            termination,
            end_time,
            character_hp,
            revives_used,
        };
        info!(
            battle = %result.battle.id(),
            profession = self.profession.name(),
            damage = result.total_damage(),
            kills,
            ?termination,
            end_time,
            "battle finished"
        );
        result
    }
}
