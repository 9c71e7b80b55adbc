//! A battle advanced incrementally by a polling client.

use super::runner::BattleRunner;
use super::types::{Battle, BattleResult};
use crate::combat::events::BattleEvent;
use crate::combat::segment::Segment;

pub struct RunningBattle {
    runner: BattleRunner,
}

impl RunningBattle {
    pub(crate) fn new(mut runner: BattleRunner) -> Self {
        runner.context_mut().enable_event_recording();
        Self { runner }
    }

    pub fn battle(&self) -> &Battle {
        self.runner.battle()
    }

    /// Simulated time reached so far.
    pub fn now(&self) -> f64 {
        self.runner.cursor()
    }

    pub fn duration(&self) -> f64 {
        self.runner.duration()
    }

    pub fn is_finished(&self) -> bool {
        self.runner.is_finished()
    }

    /// Runs every event before `time` and returns the records they produced.
    pub fn step_until(&mut self, time: f64) -> Vec<BattleEvent> {
        self.runner.step_until(time);
        self.runner.context_mut().take_events()
    }

    pub fn advance(&mut self, seconds: f64) -> Vec<BattleEvent> {
        let target = self.now() + seconds.max(0.0);
        self.step_until(target)
    }

    pub fn segments_so_far(&self) -> Vec<Segment> {
        self.runner.context().segments_so_far()
    }

    pub fn finish(self) -> BattleResult {
        self.runner.finish()
    }
}
