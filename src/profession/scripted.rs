//! A profession described entirely by data.
//!
//! `RuleSet` deserialises from TOML, so a custom class can be simulated without
//! writing a module:
//!
//! ```toml
//! name = "Pyromancer"
//!
//! [[resources]]
//! id = "mana"
//! current = 100.0
//! max = 100.0
//!
//! [[skills]]
//! id = "scorch"
//! priority = 10
//! base_damage = 30.0
//!
//! [[start_buffs]]
//! buff = "burning"
//! target = "Primary"
//! ```

use super::{rules, ProfessionModule};
use crate::battle::context::BattleContext;
use crate::buffs::{BuffDefinition, BuffEngine, BuffTarget};
use crate::core::error::ConfigError;
use crate::procs::{ProcDefinition, ProcEngine};
use crate::skills::{ResourcePool, SkillDefinition};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GrantTarget {
    Caster,
    #[default]
    Primary,
    /// Every living enemy.
    AllEnemies,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffGrant {
    pub buff: String,
    #[serde(default)]
    pub target: GrantTarget,
}

/// Buff applied whenever `skill` resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastBuff {
    pub skill: String,
    pub buff: String,
    #[serde(default)]
    pub target: GrantTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGrant {
    pub resource: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub name: String,
    pub resources: Vec<ResourcePool>,
    pub buffs: Vec<BuffDefinition>,
    pub procs: Vec<ProcDefinition>,
    pub skills: Vec<SkillDefinition>,
    pub start_buffs: Vec<BuffGrant>,
    pub cast_buffs: Vec<CastBuff>,
    /// Granted after every basic attack.
    pub attack_resource: Option<ResourceGrant>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_resource(mut self, pool: ResourcePool) -> Self {
        self.resources.push(pool);
        self
    }

    pub fn with_buff(mut self, def: BuffDefinition) -> Self {
        self.buffs.push(def);
        self
    }

    pub fn with_proc(mut self, def: ProcDefinition) -> Self {
        self.procs.push(def);
        self
    }

    pub fn with_skill(mut self, def: SkillDefinition) -> Self {
        self.skills.push(def);
        self
    }

    pub fn with_start_buff(mut self, buff: impl Into<String>, target: GrantTarget) -> Self {
        self.start_buffs.push(BuffGrant {
            buff: buff.into(),
            target,
        });
        self
    }

    pub fn with_cast_buff(
        mut self,
        skill: impl Into<String>,
        buff: impl Into<String>,
        target: GrantTarget,
    ) -> Self {
        self.cast_buffs.push(CastBuff {
            skill: skill.into(),
            buff: buff.into(),
            target,
        });
        self
    }

    pub fn with_attack_resource(mut self, resource: impl Into<String>, amount: f64) -> Self {
        self.attack_resource = Some(ResourceGrant {
            resource: resource.into(),
            amount,
        });
        self
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedProfession {
    rules: RuleSet,
}

impl ScriptedProfession {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    fn grant(ctx: &mut BattleContext, buff: &str, target: GrantTarget) {
        match target {
            GrantTarget::Caster => {
                ctx.apply_buff(buff, BuffTarget::Caster);
            }
            GrantTarget::Primary => {
                rules::apply_to_primary(ctx, buff);
            }
            GrantTarget::AllEnemies => {
                let living = ctx.encounter().living_count();
                rules::apply_to_enemies(ctx, buff, living);
            }
        }
    }
}

impl ProfessionModule for ScriptedProfession {
    fn name(&self) -> &str {
        &self.rules.name
    }

    fn resources(&self) -> Vec<ResourcePool> {
        self.rules.resources.clone()
    }

    fn register_buff_definitions(&self, buffs: &mut BuffEngine) -> Result<(), ConfigError> {
        rules::register_buffs(buffs, self.rules.buffs.iter().cloned())?;
        let grants = self
            .rules
            .start_buffs
            .iter()
            .map(|g| &g.buff)
            .chain(self.rules.cast_buffs.iter().map(|c| &c.buff));
        for buff in grants {
            if buffs.definition(buff).is_none() {
                return Err(ConfigError::UnknownBuff {
                    proc_id: self.rules.name.clone(),
                    buff_id: buff.clone(),
                });
            }
        }
        Ok(())
    }

    fn register_proc_definitions(&self, procs: &mut ProcEngine) -> Result<(), ConfigError> {
        rules::register_procs(procs, self.rules.procs.iter().cloned())
    }

    fn build_skills(&self) -> Vec<SkillDefinition> {
        self.rules.skills.clone()
    }

    fn on_battle_start(&self, ctx: &mut BattleContext) {
        rules::on_battle_start(ctx);
        for grant in &self.rules.start_buffs {
            Self::grant(ctx, &grant.buff, grant.target);
        }
    }

    fn on_attack_tick(&self, ctx: &mut BattleContext) {
        rules::on_attack_tick(ctx);
        if let Some(grant) = &self.rules.attack_resource {
            ctx.add_resource(&grant.resource, grant.amount);
        }
    }

    fn on_skill_cast(&self, ctx: &mut BattleContext, skill_id: &str) {
        rules::on_skill_cast(ctx, skill_id);
        for cast in self.rules.cast_buffs.iter().filter(|c| c.skill == skill_id) {
            Self::grant(ctx, &cast.buff, cast.target);
        }
    }
}
