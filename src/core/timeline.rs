//! Simulated clock and ordered event queue.
//!
//! Events are dequeued in ascending `(time, seq)` order where `seq` is a
//! monotonically increasing insertion counter, so two events scheduled for the
//! same instant always come out in the order they were scheduled. Draining the
//! queue is the only way simulated time moves forward.

use crate::buffs::types::BuffInstanceId;
use crate::combat::types::CombatantId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// What happens between waves of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterTransition {
    /// The next queued wave enters the fight.
    NextWave,
    /// An endless encounter brings its group back.
    Respawn,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    AttackTick,
    SpecialPulse,
    BuffTick { instance: BuffInstanceId },
    SkillCooldownReady { skill: usize },
    CastComplete { skill: usize },
    EnemyAttack { enemy: CombatantId },
    EncounterTransition(EncounterTransition),
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::AttackTick => "attack_tick",
            EventKind::SpecialPulse => "special_pulse",
            EventKind::BuffTick { .. } => "buff_tick",
            EventKind::SkillCooldownReady { .. } => "skill_cooldown_ready",
            EventKind::CastComplete { .. } => "cast_complete",
            EventKind::EnemyAttack { .. } => "enemy_attack",
            EventKind::EncounterTransition(_) => "encounter_transition",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScheduledEvent {
    pub time: f64,
    pub seq: u64,
    pub kind: EventKind,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    // BinaryHeap is a max-heap; reverse so the earliest (time, seq) is on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Default)]
pub struct Timeline {
    now: f64,
    next_seq: u64,
    queue: BinaryHeap<ScheduledEvent>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a timeline whose clock starts at `start` instead of zero.
    pub fn starting_at(start: f64) -> Self {
        Self {
            now: start.max(0.0),
            ..Self::default()
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedules `kind` at an absolute time. Times in the past are pulled up to `now`.
    pub fn schedule_at(&mut self, time: f64, kind: EventKind) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(ScheduledEvent {
            time: time.max(self.now),
            seq,
            kind,
        });
        seq
    }

    pub fn schedule_in(&mut self, delay: f64, kind: EventKind) -> u64 {
        self.schedule_at(self.now + delay.max(0.0), kind)
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.queue.peek().map(|e| e.time)
    }

    /// Pops the next event if it is scheduled strictly before `horizon`,
    /// moving the clock to its time.
    pub fn pop_before(&mut self, horizon: f64) -> Option<ScheduledEvent> {
        if self.queue.peek()?.time >= horizon {
            return None;
        }
        let event = self.queue.pop()?;
        self.now = event.time;
        Some(event)
    }

    /// Moves the clock forward without processing anything.
    pub fn advance_to(&mut self, time: f64) {
        self.now = self.now.max(time);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drain(timeline: &mut Timeline) -> Vec<(f64, u64)> {
        let mut out = Vec::new();
        while let Some(e) = timeline.pop_before(f64::INFINITY) {
            out.push((e.time, e.seq));
        }
        out
    }

    #[test]
    fn test_events_come_out_in_time_order() {
        let mut timeline = Timeline::new();
        timeline.schedule_at(3.0, EventKind::AttackTick);
        timeline.schedule_at(1.0, EventKind::SpecialPulse);
        timeline.schedule_at(2.0, EventKind::AttackTick);

        let times: Vec<f64> = drain(&mut timeline).iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_equal_times_break_ties_by_insertion() {
        let mut timeline = Timeline::new();
        timeline.schedule_at(1.0, EventKind::AttackTick);
        timeline.schedule_at(1.0, EventKind::SpecialPulse);
        timeline.schedule_at(1.0, EventKind::SkillCooldownReady { skill: 0 });

        let first = timeline.pop_before(10.0).unwrap();
        let second = timeline.pop_before(10.0).unwrap();
        let third = timeline.pop_before(10.0).unwrap();
        assert_eq!(first.kind, EventKind::AttackTick);
        assert_eq!(second.kind, EventKind::SpecialPulse);
        assert_eq!(third.kind, EventKind::SkillCooldownReady { skill: 0 });
    }

    #[test]
    fn test_pop_before_respects_horizon() {
        let mut timeline = Timeline::new();
        timeline.schedule_at(5.0, EventKind::AttackTick);
        assert!(timeline.pop_before(5.0).is_none());
        assert_eq!(timeline.len(), 1);
        assert!(timeline.pop_before(5.1).is_some());
        assert_eq!(timeline.now(), 5.0);
    }

    #[test]
    fn test_past_times_clamped_to_now() {
        let mut timeline = Timeline::starting_at(4.0);
        timeline.schedule_at(1.0, EventKind::AttackTick);
        assert_eq!(timeline.peek_time(), Some(4.0));
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut timeline = Timeline::new();
        timeline.advance_to(3.0);
        timeline.advance_to(2.0);
        assert_eq!(timeline.now(), 3.0);
    }

    proptest! {
        #[test]
        fn prop_drain_order_is_sorted(times in proptest::collection::vec(0u32..50, 1..64)) {
            let mut timeline = Timeline::new();
            for t in &times {
                timeline.schedule_at(*t as f64 * 0.5, EventKind::AttackTick);
            }
            let drained = drain(&mut timeline);
            prop_assert_eq!(drained.len(), times.len());
            for pair in drained.windows(2) {
                let (t0, s0) = pair[0];
                let (t1, s1) = pair[1];
                prop_assert!(t0 < t1 || (t0 == t1 && s0 < s1));
            }
        }
    }
}
