//! Per-class rule sets plugged into a battle.
//!
//! A [`ProfessionModule`] is a capability set: it declares resources, buffs,
//! procs and skills at setup and reacts at fixed hook points during the run.
//! Modules keep no state of their own; anything that must persist lives in the
//! [`BattleContext`] handed to every hook. Shared behavior lives in [`rules`]
//! and modules call into it explicitly.

pub mod mage;
pub mod rogue;
pub mod rules;
pub mod scripted;
pub mod warrior;

use crate::battle::context::BattleContext;
use crate::buffs::BuffEngine;
use crate::combat::encounter::Encounter;
use crate::combat::types::CombatantId;
use crate::core::error::ConfigError;
use crate::procs::ProcEngine;
use crate::skills::{ResourcePool, SkillDefinition};
use serde::{Deserialize, Serialize};

pub use mage::Mage;
pub use rogue::Rogue;
pub use scripted::{RuleSet, ScriptedProfession};
pub use warrior::Warrior;

pub trait ProfessionModule {
    fn name(&self) -> &str;

    fn resources(&self) -> Vec<ResourcePool>;

    fn register_buff_definitions(&self, buffs: &mut BuffEngine) -> Result<(), ConfigError>;

    fn register_proc_definitions(&self, procs: &mut ProcEngine) -> Result<(), ConfigError>;

    fn build_skills(&self) -> Vec<SkillDefinition>;

    fn on_battle_start(&self, ctx: &mut BattleContext) {
        rules::on_battle_start(ctx);
    }

    /// Called after a basic attack swing resolved.
    fn on_attack_tick(&self, ctx: &mut BattleContext) {
        rules::on_attack_tick(ctx);
    }

    fn on_special_pulse(&self, ctx: &mut BattleContext) {
        rules::on_special_pulse(ctx);
    }

    /// Called once a skill resolves: immediately for instants, at completion
    /// for cast-time skills.
    fn on_skill_cast(&self, ctx: &mut BattleContext, skill_id: &str) {
        rules::on_skill_cast(ctx, skill_id);
    }

    /// `None` keeps the default (first living enemy).
    fn select_primary_target(&self, encounter: &Encounter) -> Option<CombatantId> {
        rules::default_primary_target(encounter)
    }
}

/// Playable classes, including data-driven ones.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Profession {
    #[default]
    Warrior,
    Mage,
    Rogue,
    Scripted(RuleSet),
}

impl Profession {
    pub fn module(&self) -> Box<dyn ProfessionModule> {
        match self {
            Profession::Warrior => Box::new(Warrior),
            Profession::Mage => Box::new(Mage),
            Profession::Rogue => Box::new(Rogue),
            Profession::Scripted(rules) => Box::new(ScriptedProfession::new(rules.clone())),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Profession::Warrior => "Warrior",
            Profession::Mage => "Mage",
            Profession::Rogue => "Rogue",
            Profession::Scripted(rules) => &rules.name,
        }
    }

    /// Parses a built-in class name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "warrior" => Some(Profession::Warrior),
            "mage" => Some(Profession::Mage),
            "rogue" => Some(Profession::Rogue),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Profession::from_name("MAGE"), Some(Profession::Mage));
        assert_eq!(Profession::from_name("bard"), None);
    }

    #[test]
    fn test_modules_register_cleanly() {
        for profession in [Profession::Warrior, Profession::Mage, Profession::Rogue] {
            let module = profession.module();
            let mut buffs = BuffEngine::new();
            let mut procs = ProcEngine::new();
            module.register_buff_definitions(&mut buffs).unwrap();
            module.register_proc_definitions(&mut procs).unwrap();
            procs.validate_buff_refs(&buffs).unwrap();
            assert!(!module.build_skills().is_empty(), "{}", module.name());
            assert_eq!(module.name(), profession.name());
        }
    }
}
