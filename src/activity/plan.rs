//! The activity-plan view the battle engine reads and writes back.

use crate::core::offline::FastForwardResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanState {
    Running,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitType {
    /// Stops after `limit_value` executed seconds.
    Seconds,
    Unlimited,
}

impl LimitType {
    pub fn is_bounded(&self) -> bool {
        matches!(self, LimitType::Seconds)
    }
}

/// Invariants:
/// - `Completed` has no snapshot and a completion time.
/// - `Paused` keeps its snapshot and has no completion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPlan {
    pub id: Uuid,
    pub character_id: String,
    pub state: PlanState,
    pub executed_seconds: f64,
    pub limit_type: LimitType,
    pub limit_value: f64,
    pub snapshot: Option<Vec<u8>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ActivityPlan {
    pub fn new(character_id: impl Into<String>, limit_type: LimitType, limit_value: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            character_id: character_id.into(),
            state: PlanState::Running,
            executed_seconds: 0.0,
            limit_type,
            limit_value: limit_value.max(0.0),
            snapshot: None,
            completed_at: None,
        }
    }

    pub fn with_seconds_limit(character_id: impl Into<String>, seconds: f64) -> Self {
        Self::new(character_id, LimitType::Seconds, seconds)
    }

    pub fn unlimited(character_id: impl Into<String>) -> Self {
        Self::new(character_id, LimitType::Unlimited, 0.0)
    }

    /// State decides first: a paused plan is never "reached", whatever the numbers say.
    pub fn is_limit_reached(&self) -> bool {
        match self.state {
            PlanState::Paused => false,
            PlanState::Completed => true,
            PlanState::Running => {
                self.limit_type.is_bounded() && self.executed_seconds >= self.limit_value
            }
        }
    }

    /// Seconds left before the limit, never negative. `None` when unbounded.
    pub fn remaining_seconds(&self) -> Option<f64> {
        self.limit_type
            .is_bounded()
            .then(|| (self.limit_value - self.executed_seconds).max(0.0))
    }

    /// Pauses a running plan, keeping `snapshot` for the resume.
    pub fn pause(&mut self, snapshot: Vec<u8>) -> bool {
        if self.state != PlanState::Running {
            return false;
        }
        self.state = PlanState::Paused;
        self.snapshot = Some(snapshot);
        self.completed_at = None;
        true
    }

    /// Resumes a paused plan. The snapshot stays until the engine consumes it.
    pub fn resume(&mut self) -> bool {
        if self.state != PlanState::Paused {
            return false;
        }
        self.state = PlanState::Running;
        true
    }

    pub fn complete(&mut self, now: DateTime<Utc>) -> bool {
        if self.state == PlanState::Completed {
            return false;
        }
        self.state = PlanState::Completed;
        self.snapshot = None;
        self.completed_at = Some(now);
        true
    }

    /// Persists a fast-forward outcome onto the plan.
    ///
    /// Progress is recorded whatever the state. Completion follows the
    /// returned flag; otherwise the fresh snapshot replaces the old one.
    pub fn apply_fast_forward(&mut self, result: &FastForwardResult, now: DateTime<Utc>) {
        self.executed_seconds = match self.limit_type {
            LimitType::Seconds => result.updated_executed_seconds.min(self.limit_value),
            LimitType::Unlimited => result.updated_executed_seconds,
        };
        if result.plan_completed {
            self.complete(now);
        } else if let Some(blob) = &result.snapshot {
            self.snapshot = Some(blob.clone());
        }
    }
}
