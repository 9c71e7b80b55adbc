//! Time-bucketed damage and event-tag accounting.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TAG_BASIC_ATTACK: &str = "basic_attack";
pub const TAG_KILL: &str = "kill";
pub const TAG_REVIVE: &str = "revive";
pub const TAG_WAVE: &str = "wave";

pub fn buff_tick_tag(buff_id: &str) -> String {
    format!("buff_tick:{buff_id}")
}

pub fn buff_apply_tag(buff_id: &str) -> String {
    format!("buff_apply:{buff_id}")
}

pub fn buff_expire_tag(buff_id: &str) -> String {
    format!("buff_expire:{buff_id}")
}

pub fn proc_tag(proc_id: &str) -> String {
    format!("proc:{proc_id}")
}

pub fn skill_cast_tag(skill_id: &str) -> String {
    format!("skill_cast:{skill_id}")
}

pub fn crit_tag(source: &str) -> String {
    format!("crit:{source}")
}

/// A closed time bucket `[start_time, end_time)`.
///
/// Tag counters use an ordered map so serialised segments are byte-identical
/// across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: u32,
    pub start_time: f64,
    pub end_time: f64,
    pub total_damage: u64,
    pub tag_counters: BTreeMap<String, u64>,
}

impl Segment {
    fn open(index: u32, start_time: f64, end_time: f64) -> Self {
        Self {
            index,
            start_time,
            end_time,
            total_damage: 0,
            tag_counters: BTreeMap::new(),
        }
    }

    pub fn tag(&self, tag: &str) -> u64 {
        self.tag_counters.get(tag).copied().unwrap_or(0)
    }
}

/// Sum of `total_damage` over `segments`.
pub fn total_damage(segments: &[Segment]) -> u64 {
    segments.iter().map(|s| s.total_damage).sum()
}

/// Sum of one tag counter over `segments`.
pub fn tag_total(segments: &[Segment], tag: &str) -> u64 {
    segments.iter().map(|s| s.tag(tag)).sum()
}

/// All tag counters merged over `segments`.
pub fn merged_tags(segments: &[Segment]) -> BTreeMap<String, u64> {
    let mut merged = BTreeMap::new();
    for segment in segments {
        for (tag, count) in &segment.tag_counters {
            *merged.entry(tag.clone()).or_insert(0) += count;
        }
    }
    merged
}

/// Append-only builder of fixed-length segments.
#[derive(Debug, Clone)]
pub struct SegmentCollector {
    origin: f64,
    segment_seconds: f64,
    closed: Vec<Segment>,
    current: Segment,
}

impl SegmentCollector {
    pub fn new(origin: f64, segment_seconds: f64) -> Self {
        let segment_seconds = if segment_seconds > 0.0 {
            segment_seconds
        } else {
            f64::INFINITY
        };
        Self {
            origin,
            segment_seconds,
            closed: Vec::new(),
            current: Segment::open(0, origin, origin + segment_seconds),
        }
    }

    fn roll(&mut self) {
        let index = self.current.index + 1;
        let start = self.origin + index as f64 * self.segment_seconds;
        let next = Segment::open(index, start, start + self.segment_seconds);
        let done = std::mem::replace(&mut self.current, next);
        self.closed.push(done);
    }

    /// Closes every bucket that ends at or before `time`.
    pub fn advance_to(&mut self, time: f64) {
        while time >= self.current.end_time {
            self.roll();
        }
    }

    pub fn add_damage(&mut self, amount: u64) {
        self.current.total_damage += amount;
    }

    pub fn tag(&mut self, tag: impl Into<String>) {
        self.tag_n(tag, 1);
    }

    pub fn tag_n(&mut self, tag: impl Into<String>, count: u64) {
        *self.current.tag_counters.entry(tag.into()).or_insert(0) += count;
    }

    /// Segments closed so far plus the open one.
    pub fn segments_so_far(&self) -> Vec<Segment> {
        let mut all = self.closed.clone();
        all.push(self.current.clone());
        all
    }

    /// Damage recorded so far across all buckets.
    pub fn running_damage(&self) -> u64 {
        total_damage(&self.closed) + self.current.total_damage
    }

    /// Closes the collector at `end_time`, truncating the last bucket.
    pub fn finish(mut self, end_time: f64) -> Vec<Segment> {
        while end_time > self.current.end_time {
            self.roll();
        }
        self.current.end_time = end_time.max(self.current.start_time);
        self.closed.push(self.current);
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_bucket() {
        let mut collector = SegmentCollector::new(0.0, 10.0);
        collector.add_damage(30);
        collector.tag("basic_attack");
        collector.tag("basic_attack");
        let segments = collector.finish(4.0);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].total_damage, 30);
        assert_eq!(segments[0].tag("basic_attack"), 2);
        assert_eq!(segments[0].end_time, 4.0);
    }

    #[test]
    fn test_empty_gaps_still_produce_buckets() {
        let mut collector = SegmentCollector::new(0.0, 5.0);
        collector.add_damage(1);
        collector.advance_to(12.0);
        collector.add_damage(2);
        let segments = collector.finish(15.0);
        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments.iter().map(|s| s.total_damage).collect::<Vec<_>>(),
            vec![1, 0, 2]
        );
        assert_eq!(segments[2].start_time, 10.0);
        assert_eq!(segments[2].end_time, 15.0);
    }

    #[test]
    fn test_boundary_event_opens_next_bucket() {
        let mut collector = SegmentCollector::new(0.0, 5.0);
        collector.advance_to(5.0);
        collector.add_damage(7);
        let segments = collector.finish(8.1);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].total_damage, 0);
        assert_eq!(segments[1].total_damage, 7);
    }

    #[test]
    fn test_finish_extends_to_end_time() {
        let collector = SegmentCollector::new(0.0, 2.0);
        let segments = collector.finish(7.0);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3].start_time, 6.0);
        assert_eq!(segments[3].end_time, 7.0);
    }

    #[test]
    fn test_helpers_sum_across_segments() {
        let mut collector = SegmentCollector::new(0.0, 1.0);
        collector.tag("proc:ignite");
        collector.add_damage(5);
        collector.advance_to(1.5);
        collector.tag("proc:ignite");
        collector.add_damage(6);
        let segments = collector.finish(2.0);
        assert_eq!(total_damage(&segments), 11);
        assert_eq!(tag_total(&segments, "proc:ignite"), 2);
        assert_eq!(merged_tags(&segments).get("proc:ignite"), Some(&2));
    }

    #[test]
    fn test_non_positive_length_means_one_bucket() {
        let mut collector = SegmentCollector::new(0.0, 0.0);
        collector.advance_to(1_000.0);
        collector.add_damage(3);
        let segments = collector.finish(1_000.0);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end_time, 1_000.0);
    }

    #[test]
    fn test_tag_helpers() {
        assert_eq!(buff_tick_tag("rend"), "buff_tick:rend");
        assert_eq!(proc_tag("ignite"), "proc:ignite");
        assert_eq!(skill_cast_tag("cleave"), "skill_cast:cleave");
        assert_eq!(crit_tag("cleave"), "crit:cleave");
    }
}
