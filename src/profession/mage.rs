use super::{rules, ProfessionModule};
use crate::battle::context::BattleContext;
use crate::buffs::{BuffDefinition, BuffEngine, StackPolicy};
use crate::combat::aoe::AoeParams;
use crate::combat::types::DamageType;
use crate::core::error::ConfigError;
use crate::procs::{ProcBuffTarget, ProcDefinition, ProcEngine, ProcTrigger};
use crate::skills::{ResourcePool, SkillDefinition};

pub const MANA: &str = "mana";
pub const IGNITE: &str = "ignite";
pub const FLAMESTRIKE_BURN: &str = "flamestrike_burn";

const FLAMESTRIKE_TARGETS: u32 = 4;

/// Fire caster: long locking Fireballs with instant Fire Blasts woven in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mage;

impl ProfessionModule for Mage {
    fn name(&self) -> &str {
        "Mage"
    }

    fn resources(&self) -> Vec<ResourcePool> {
        vec![ResourcePool::new(MANA, 500.0).with_regen(8.0)]
    }

    fn register_buff_definitions(&self, buffs: &mut BuffEngine) -> Result<(), ConfigError> {
        rules::register_buffs(
            buffs,
            [
                BuffDefinition::new(IGNITE, 6.0)
                    .damage_over_time(2.0, 4.0, DamageType::Fire)
                    .coefficients(0.0, 0.1)
                    .hasted()
                    .pandemic(0.3),
                BuffDefinition::new(FLAMESTRIKE_BURN, 8.0)
                    .damage_over_time(2.0, 6.0, DamageType::Fire)
                    .coefficients(0.0, 0.05)
                    .stacking(StackPolicy::Independent, 1),
            ],
        )
    }

    fn register_proc_definitions(&self, procs: &mut ProcEngine) -> Result<(), ConfigError> {
        rules::register_procs(
            procs,
            [
                ProcDefinition::apply_buff(
                    "ignite_on_crit",
                    ProcTrigger::OnCrit,
                    1.0,
                    IGNITE,
                    ProcBuffTarget::EventTarget,
                )
                .skill_only()
                .only_damage_type(DamageType::Fire),
                ProcDefinition::deal_damage(
                    "arcane_echo",
                    ProcTrigger::OnHit,
                    0.15,
                    15.0,
                    DamageType::Arcane,
                )
                .skill_only()
                .with_icd(2.0)
                .with_aoe(AoeParams::split(2)),
            ],
        )
    }

    fn build_skills(&self) -> Vec<SkillDefinition> {
        vec![
            SkillDefinition::new("fire_blast", 30, 25.0)
                .with_cost(MANA, 15.0)
                .with_cooldown(6.0)
                .with_damage_type(DamageType::Fire)
                .with_coefficients(0.0, 0.4)
                .off_gcd(true),
            SkillDefinition::new("flamestrike", 20, 20.0)
                .with_cost(MANA, 40.0)
                .with_cooldown(10.0)
                .with_cast_time(1.5, true)
                .with_damage_type(DamageType::Fire)
                .with_coefficients(0.0, 0.3)
                .with_aoe(AoeParams::cleave_full(FLAMESTRIKE_TARGETS)),
            SkillDefinition::new("fireball", 10, 50.0)
                .with_cost(MANA, 20.0)
                .with_cast_time(2.0, true)
                .with_damage_type(DamageType::Fire)
                .with_coefficients(0.0, 0.8),
        ]
    }

    fn on_skill_cast(&self, ctx: &mut BattleContext, skill_id: &str) {
        if skill_id == "flamestrike" {
            rules::apply_to_enemies(ctx, FLAMESTRIKE_BURN, FLAMESTRIKE_TARGETS as usize);
        } else {
            rules::on_skill_cast(ctx, skill_id);
        }
    }
}
