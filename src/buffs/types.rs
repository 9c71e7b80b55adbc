use crate::combat::types::{CombatantId, DamageType};
use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuffInstanceId(pub u64);

/// What happens when a buff is applied to a target that already carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StackPolicy {
    /// Reset the duration, keep the stack count.
    #[default]
    Refresh,
    /// Add a stack (up to the cap) and reset the duration.
    Stack,
    /// Always create a separate, co-existing instance.
    Independent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PeriodicKind {
    #[default]
    None,
    Damage,
    Heal,
    Resource,
}

/// Who carries a buff instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuffTarget {
    Caster,
    Enemy(CombatantId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffDefinition {
    pub id: String,
    pub duration: f64,
    #[serde(default = "default_max_stacks")]
    pub max_stacks: u32,
    #[serde(default)]
    pub stack_policy: StackPolicy,
    #[serde(default)]
    pub periodic_kind: PeriodicKind,
    #[serde(default)]
    pub periodic_interval: f64,
    #[serde(default)]
    pub periodic_base_value: f64,
    #[serde(default)]
    pub periodic_resource_id: Option<String>,
    #[serde(default)]
    pub periodic_damage_type: DamageType,
    #[serde(default)]
    pub haste_affected: bool,
    #[serde(default)]
    pub pandemic_ratio: f64,
    #[serde(default)]
    pub ap_coefficient: f64,
    #[serde(default)]
    pub sp_coefficient: f64,
}

fn default_max_stacks() -> u32 {
    1
}

impl BuffDefinition {
    /// A plain, non-periodic buff.
    pub fn new(id: impl Into<String>, duration: f64) -> Self {
        Self {
            id: id.into(),
            duration,
            max_stacks: 1,
            stack_policy: StackPolicy::Refresh,
            periodic_kind: PeriodicKind::None,
            periodic_interval: 0.0,
            periodic_base_value: 0.0,
            periodic_resource_id: None,
            periodic_damage_type: DamageType::Physical,
            haste_affected: false,
            pandemic_ratio: 0.0,
            ap_coefficient: 0.0,
            sp_coefficient: 0.0,
        }
    }

    pub fn damage_over_time(
        mut self,
        interval: f64,
        base_value: f64,
        damage_type: DamageType,
    ) -> Self {
        self.periodic_kind = PeriodicKind::Damage;
        self.periodic_interval = interval;
        self.periodic_base_value = base_value;
        self.periodic_damage_type = damage_type;
        self
    }

    pub fn heal_over_time(mut self, interval: f64, base_value: f64) -> Self {
        self.periodic_kind = PeriodicKind::Heal;
        self.periodic_interval = interval;
        self.periodic_base_value = base_value;
        self
    }

    pub fn resource_over_time(
        mut self,
        resource_id: impl Into<String>,
        interval: f64,
        amount: f64,
    ) -> Self {
        self.periodic_kind = PeriodicKind::Resource;
        self.periodic_interval = interval;
        self.periodic_base_value = amount;
        self.periodic_resource_id = Some(resource_id.into());
        self
    }

    pub fn stacking(mut self, policy: StackPolicy, max_stacks: u32) -> Self {
        self.stack_policy = policy;
        self.max_stacks = max_stacks.max(1);
        self
    }

    pub fn hasted(mut self) -> Self {
        self.haste_affected = true;
        self
    }

    pub fn pandemic(mut self, ratio: f64) -> Self {
        self.pandemic_ratio = ratio;
        self
    }

    pub fn coefficients(mut self, ap_coefficient: f64, sp_coefficient: f64) -> Self {
        self.ap_coefficient = ap_coefficient;
        self.sp_coefficient = sp_coefficient;
        self
    }

    pub fn is_periodic(&self) -> bool {
        self.periodic_kind != PeriodicKind::None
    }

    /// Seconds between ticks once haste is applied.
    pub fn tick_interval(&self, haste_factor: f64) -> f64 {
        if self.haste_affected && haste_factor > 0.0 {
            self.periodic_interval / haste_factor
        } else {
            self.periodic_interval
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration < 0.0 || self.duration.is_nan() {
            return Err(ConfigError::NegativeDuration(self.id.clone()));
        }
        if self.is_periodic() && !(self.periodic_interval > 0.0) {
            return Err(ConfigError::InvalidPeriodicInterval(self.id.clone()));
        }
        if self.periodic_kind == PeriodicKind::Resource && self.periodic_resource_id.is_none() {
            return Err(ConfigError::UnknownResource {
                owner: self.id.clone(),
                resource: String::new(),
            });
        }
        Ok(())
    }
}

/// A live application of a buff on one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffInstance {
    pub instance_id: BuffInstanceId,
    pub buff_id: String,
    pub target: BuffTarget,
    pub stacks: u32,
    pub applied_at: f64,
    pub expires_at: f64,
    /// `None` once no further tick fits before expiry.
    pub next_tick_at: Option<f64>,
}

impl BuffInstance {
    pub fn remaining(&self, now: f64) -> f64 {
        (self.expires_at - now).max(0.0)
    }
}

/// Result of applying a buff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplyOutcome {
    pub instance: BuffInstanceId,
    pub created: bool,
    pub stacks: u32,
    pub expires_at: f64,
    /// A new tick chain must be scheduled at this time.
    pub schedule_tick_at: Option<f64>,
}

/// A periodic tick that is due, computed by the buff engine and resolved by
/// the battle context.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub instance: BuffInstanceId,
    pub buff_id: String,
    pub kind: PeriodicKind,
    pub value: f64,
    pub damage_type: DamageType,
    pub resource_id: Option<String>,
    pub target: BuffTarget,
    pub next_tick_at: Option<f64>,
}
