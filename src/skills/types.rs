use crate::combat::aoe::AoeParams;
use crate::combat::types::DamageType;
use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCost {
    pub resource: String,
    pub amount: f64,
}

impl ResourceCost {
    pub fn new(resource: impl Into<String>, amount: f64) -> Self {
        Self {
            resource: resource.into(),
            amount,
        }
    }
}

/// A skill the auto-caster may pick. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    #[serde(default)]
    pub cost: Option<ResourceCost>,
    #[serde(default)]
    pub cooldown: f64,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub base_damage: f64,
    #[serde(default)]
    pub damage_type: DamageType,
    #[serde(default)]
    pub ap_coefficient: f64,
    #[serde(default)]
    pub sp_coefficient: f64,
    #[serde(default)]
    pub cast_time: f64,
    #[serde(default = "default_gcd")]
    pub gcd: f64,
    #[serde(default)]
    pub off_gcd: bool,
    #[serde(default)]
    pub allow_during_casting_for_off_gcd: bool,
    #[serde(default)]
    pub lock_attack_during_cast: bool,
    #[serde(default)]
    pub aoe: AoeParams,
}

fn default_gcd() -> f64 {
    1.0
}

impl SkillDefinition {
    pub fn new(id: impl Into<String>, priority: i32, base_damage: f64) -> Self {
        Self {
            id: id.into(),
            cost: None,
            cooldown: 0.0,
            priority,
            base_damage,
            damage_type: DamageType::Physical,
            ap_coefficient: 0.0,
            sp_coefficient: 0.0,
            cast_time: 0.0,
            gcd: default_gcd(),
            off_gcd: false,
            allow_during_casting_for_off_gcd: false,
            lock_attack_during_cast: false,
            aoe: AoeParams::single(),
        }
    }

    pub fn with_cost(mut self, resource: impl Into<String>, amount: f64) -> Self {
        self.cost = Some(ResourceCost::new(resource, amount));
        self
    }

    pub fn with_cooldown(mut self, seconds: f64) -> Self {
        self.cooldown = seconds;
        self
    }

    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = damage_type;
        self
    }

    pub fn with_coefficients(mut self, ap_coefficient: f64, sp_coefficient: f64) -> Self {
        self.ap_coefficient = ap_coefficient;
        self.sp_coefficient = sp_coefficient;
        self
    }

    /// A cast of `seconds`. With `lock_attack` basic attacks wait for completion.
    pub fn with_cast_time(mut self, seconds: f64, lock_attack: bool) -> Self {
        self.cast_time = seconds;
        self.lock_attack_during_cast = lock_attack;
        self
    }

    pub fn with_gcd(mut self, seconds: f64) -> Self {
        self.gcd = seconds;
        self
    }

    /// Bypasses the GCD; with `during_cast` it may also be woven into another cast.
    pub fn off_gcd(mut self, during_cast: bool) -> Self {
        self.off_gcd = true;
        self.allow_during_casting_for_off_gcd = during_cast;
        self
    }

    pub fn with_aoe(mut self, aoe: AoeParams) -> Self {
        self.aoe = aoe;
        self
    }

    pub fn is_instant(&self) -> bool {
        self.cast_time <= 0.0
    }

    /// Raw damage before crits and mitigation.
    pub fn raw_damage(&self, attack_power: f64, spell_power: f64) -> f64 {
        self.base_damage + attack_power * self.ap_coefficient + spell_power * self.sp_coefficient
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cooldown < 0.0 || self.cooldown.is_nan() {
            return Err(ConfigError::NegativeCooldown(self.id.clone()));
        }
        if self.cast_time < 0.0 || self.gcd < 0.0 || self.cast_time.is_nan() || self.gcd.is_nan() {
            return Err(ConfigError::NegativeCastTiming(self.id.clone()));
        }
        if let Some(cost) = &self.cost {
            if cost.amount < 0.0 {
                return Err(ConfigError::InvalidSetting(format!(
                    "skill `{}` has a negative cost",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// Mutable per-skill tracking.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkillState {
    pub last_cast: Option<f64>,
    pub cooldown_until: f64,
}

/// A cast in progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveCast {
    pub skill: usize,
    pub started_at: f64,
    pub completes_at: f64,
    pub locks_attack: bool,
}

/// What the battle context must schedule after a cast begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastStart {
    pub skill: usize,
    /// `None` for instant skills, which resolve immediately.
    pub completes_at: Option<f64>,
    pub cooldown_ready_at: Option<f64>,
    pub gcd_ready_at: Option<f64>,
}
