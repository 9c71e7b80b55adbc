//! Area damage distribution.
//!
//! Turns one damage value into a list of per-target hits. Mitigation and
//! bookkeeping happen later, once per hit, in the battle context.

use super::encounter::Encounter;
use super::types::CombatantId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AoeMode {
    /// Primary target only.
    #[default]
    Single,
    /// The full value lands on every selected target.
    CleaveFull,
    /// The value is divided into `max_targets` equal shares.
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AoeParams {
    #[serde(default)]
    pub mode: AoeMode,
    #[serde(default = "default_max_targets")]
    pub max_targets: u32,
    #[serde(default = "default_true")]
    pub include_primary: bool,
    /// When fewer targets are alive than `max_targets`, unused hits land on the
    /// primary target instead of being discarded.
    #[serde(default)]
    pub split_remainder_to_primary: bool,
}

fn default_max_targets() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for AoeParams {
    fn default() -> Self {
        Self::single()
    }
}

impl AoeParams {
    pub fn single() -> Self {
        Self {
            mode: AoeMode::Single,
            max_targets: 1,
            include_primary: true,
            split_remainder_to_primary: false,
        }
    }

    pub fn cleave_full(max_targets: u32) -> Self {
        Self {
            mode: AoeMode::CleaveFull,
            max_targets,
            ..Self::single()
        }
    }

    pub fn split(max_targets: u32) -> Self {
        Self {
            mode: AoeMode::Split,
            max_targets,
            ..Self::single()
        }
    }

    pub fn with_remainder_to_primary(mut self) -> Self {
        self.split_remainder_to_primary = true;
        self
    }

    pub fn excluding_primary(mut self) -> Self {
        self.include_primary = false;
        self
    }
}

/// One hit of raw (pre-mitigation) damage on one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedHit {
    pub target: CombatantId,
    pub raw: f64,
}

/// Resolves targets for `value` and returns the hits in application order.
///
/// Returns nothing when no enemy is alive.
pub fn plan_hits(encounter: &Encounter, value: f64, params: &AoeParams) -> Vec<PlannedHit> {
    let Some(primary) = encounter.primary_target() else {
        return Vec::new();
    };
    let max_targets = params.max_targets.max(1) as usize;

    let per_hit = match params.mode {
        AoeMode::Single => {
            return vec![PlannedHit {
                target: primary,
                raw: value,
            }]
        }
        AoeMode::CleaveFull => value,
        AoeMode::Split => value / max_targets as f64,
    };

    let targets = encounter.select_aoe_targets(max_targets, params.include_primary);
    let mut hits: Vec<PlannedHit> = targets
        .iter()
        .map(|&target| PlannedHit {
            target,
            raw: per_hit,
        })
        .collect();

    if params.split_remainder_to_primary {
        for _ in targets.len()..max_targets {
            hits.push(PlannedHit {
                target: primary,
                raw: per_hit,
            });
        }
    }
    hits
}
