use crate::combat::aoe::AoeParams;
use crate::combat::types::{CombatantId, DamageType};
use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const BASIC_ATTACK_ID: &str = "basic_attack";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcTrigger {
    OnHit,
    OnCrit,
    OnSkillCast,
    OnKill,
    /// A periodic damage tick landed. Always sourced from a DoT.
    OnDotTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceFilter {
    #[default]
    Any,
    SkillOnly,
}

/// Where a piece of damage (or a cast) came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    BasicAttack,
    Skill(String),
    Dot(String),
    Proc(String),
}

impl DamageSource {
    /// Id used in tags and event records.
    pub fn label(&self) -> &str {
        match self {
            DamageSource::BasicAttack => BASIC_ATTACK_ID,
            DamageSource::Skill(id) | DamageSource::Dot(id) | DamageSource::Proc(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProcBuffTarget {
    #[default]
    Caster,
    /// The enemy involved in the triggering event, falling back to the primary target.
    EventTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcAction {
    ApplyBuff {
        buff_id: String,
        #[serde(default)]
        target: ProcBuffTarget,
    },
    DealDamage {
        value: f64,
        #[serde(default)]
        damage_type: DamageType,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcDefinition {
    pub id: String,
    pub trigger: ProcTrigger,
    pub chance: f64,
    #[serde(default)]
    pub icd_seconds: f64,
    #[serde(default)]
    pub source_filter: SourceFilter,
    #[serde(default)]
    pub allow_from_dot: bool,
    #[serde(default)]
    pub damage_type_filter: Option<DamageType>,
    pub action: ProcAction,
    #[serde(default)]
    pub aoe: AoeParams,
}

impl ProcDefinition {
    pub fn new(id: impl Into<String>, trigger: ProcTrigger, chance: f64, action: ProcAction) -> Self {
        Self {
            id: id.into(),
            trigger,
            chance,
            icd_seconds: 0.0,
            source_filter: SourceFilter::Any,
            allow_from_dot: false,
            damage_type_filter: None,
            action,
            aoe: AoeParams::single(),
        }
    }

    pub fn apply_buff(
        id: impl Into<String>,
        trigger: ProcTrigger,
        chance: f64,
        buff_id: impl Into<String>,
        target: ProcBuffTarget,
    ) -> Self {
        Self::new(
            id,
            trigger,
            chance,
            ProcAction::ApplyBuff {
                buff_id: buff_id.into(),
                target,
            },
        )
    }

    pub fn deal_damage(
        id: impl Into<String>,
        trigger: ProcTrigger,
        chance: f64,
        value: f64,
        damage_type: DamageType,
    ) -> Self {
        Self::new(id, trigger, chance, ProcAction::DealDamage { value, damage_type })
    }

    pub fn with_icd(mut self, seconds: f64) -> Self {
        self.icd_seconds = seconds;
        self
    }

    pub fn skill_only(mut self) -> Self {
        self.source_filter = SourceFilter::SkillOnly;
        self
    }

    pub fn from_dots(mut self) -> Self {
        self.allow_from_dot = true;
        self
    }

    pub fn only_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type_filter = Some(damage_type);
        self
    }

    pub fn with_aoe(mut self, aoe: AoeParams) -> Self {
        self.aoe = aoe;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let chance_ok = (0.0..=1.0).contains(&self.chance);
        let icd_ok = self.icd_seconds >= 0.0;
        if !chance_ok || !icd_ok {
            return Err(ConfigError::InvalidProc(self.id.clone()));
        }
        Ok(())
    }

    /// Whether this proc listens to the event described by `ctx`.
    pub fn matches(&self, ctx: &ProcContext) -> bool {
        if self.trigger != ctx.trigger {
            return false;
        }
        match &ctx.source {
            DamageSource::Proc(_) => return false,
            DamageSource::Dot(_)
                if !self.allow_from_dot && self.trigger != ProcTrigger::OnDotTick =>
            {
                return false
            }
            _ => {}
        }
        if self.source_filter == SourceFilter::SkillOnly
            && !matches!(ctx.source, DamageSource::Skill(_))
        {
            return false;
        }
        match self.damage_type_filter {
            Some(wanted) => ctx.damage_type == Some(wanted),
            None => true,
        }
    }
}

/// The event a proc evaluation reacts to.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcContext {
    pub trigger: ProcTrigger,
    pub now: f64,
    pub source: DamageSource,
    pub damage_type: Option<DamageType>,
    pub target: Option<CombatantId>,
}

/// A proc that passed its roll, to be executed by the battle context.
#[derive(Debug, Clone, PartialEq)]
pub struct FiredProc {
    pub proc_id: String,
    pub action: ProcAction,
    pub aoe: AoeParams,
    pub target: Option<CombatantId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(trigger: ProcTrigger, source: DamageSource) -> ProcContext {
        ProcContext {
            trigger,
            now: 0.0,
            source,
            damage_type: Some(DamageType::Fire),
            target: None,
        }
    }

    #[test]
    fn test_validate_chance_range() {
        let bad = ProcDefinition::deal_damage("x", ProcTrigger::OnHit, 1.5, 1.0, DamageType::Fire);
        assert!(bad.validate().is_err());
        let bad_icd = ProcDefinition::deal_damage("x", ProcTrigger::OnHit, 0.5, 1.0, DamageType::Fire)
            .with_icd(-1.0);
        assert!(bad_icd.validate().is_err());
    }

    #[test]
    fn test_matches_trigger_and_source_filter() {
        let def = ProcDefinition::deal_damage("p", ProcTrigger::OnHit, 1.0, 5.0, DamageType::Fire)
            .skill_only();
        assert!(def.matches(&ctx(ProcTrigger::OnHit, DamageSource::Skill("fireball".into()))));
        assert!(!def.matches(&ctx(ProcTrigger::OnHit, DamageSource::BasicAttack)));
        assert!(!def.matches(&ctx(ProcTrigger::OnCrit, DamageSource::Skill("fireball".into()))));
    }

    #[test]
    fn test_dot_sources_need_opt_in() {
        let def = ProcDefinition::deal_damage("p", ProcTrigger::OnHit, 1.0, 5.0, DamageType::Fire);
        let from_dot = ctx(ProcTrigger::OnHit, DamageSource::Dot("ignite".into()));
        assert!(!def.matches(&from_dot));
        assert!(def.clone().from_dots().matches(&from_dot));
    }

    #[test]
    fn test_dot_tick_trigger_accepts_dot_sources() {
        let def = ProcDefinition::deal_damage("p", ProcTrigger::OnDotTick, 1.0, 5.0, DamageType::Fire);
        assert!(def.matches(&ctx(ProcTrigger::OnDotTick, DamageSource::Dot("ignite".into()))));
    }

    #[test]
    fn test_proc_damage_never_chains() {
        let def = ProcDefinition::deal_damage("p", ProcTrigger::OnHit, 1.0, 5.0, DamageType::Fire)
            .from_dots();
        assert!(!def.matches(&ctx(ProcTrigger::OnHit, DamageSource::Proc("p".into()))));
    }

    #[test]
    fn test_damage_type_filter() {
        let def = ProcDefinition::deal_damage("p", ProcTrigger::OnHit, 1.0, 5.0, DamageType::Fire)
            .only_damage_type(DamageType::Frost);
        assert!(!def.matches(&ctx(ProcTrigger::OnHit, DamageSource::BasicAttack)));
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(DamageSource::BasicAttack.label(), "basic_attack");
        assert_eq!(DamageSource::Dot("rend".into()).label(), "rend");
    }
}
