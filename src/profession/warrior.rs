use super::{rules, ProfessionModule};
use crate::battle::context::BattleContext;
use crate::buffs::{BuffDefinition, BuffEngine, BuffTarget};
use crate::combat::aoe::AoeParams;
use crate::combat::types::DamageType;
use crate::core::error::ConfigError;
use crate::procs::{ProcBuffTarget, ProcDefinition, ProcEngine, ProcTrigger};
use crate::skills::{ResourcePool, SkillDefinition};

pub const RAGE: &str = "rage";
pub const REND: &str = "rend";
pub const ENRAGE: &str = "enrage";

const RAGE_PER_SWING: f64 = 10.0;
const ENRAGED_RAGE_PER_SWING: f64 = 15.0;
const BERSERKER_RAGE_GAIN: f64 = 20.0;

/// Rage-fuelled melee: builds rage on swings, spends it on strikes and cleaves.
#[derive(Debug, Clone, Copy, Default)]
pub struct Warrior;

impl ProfessionModule for Warrior {
    fn name(&self) -> &str {
        "Warrior"
    }

    fn resources(&self) -> Vec<ResourcePool> {
        vec![ResourcePool::new(RAGE, 100.0).starting_at(0.0)]
    }

    fn register_buff_definitions(&self, buffs: &mut BuffEngine) -> Result<(), ConfigError> {
        rules::register_buffs(
            buffs,
            [
                BuffDefinition::new(REND, 12.0)
                    .damage_over_time(3.0, 8.0, DamageType::Physical)
                    .coefficients(0.15, 0.0)
                    .pandemic(0.3),
                BuffDefinition::new(ENRAGE, 8.0),
            ],
        )
    }

    fn register_proc_definitions(&self, procs: &mut ProcEngine) -> Result<(), ConfigError> {
        rules::register_procs(
            procs,
            [ProcDefinition::apply_buff(
                "enrage_on_crit",
                ProcTrigger::OnCrit,
                1.0,
                ENRAGE,
                ProcBuffTarget::Caster,
            )],
        )
    }

    fn build_skills(&self) -> Vec<SkillDefinition> {
        vec![
            SkillDefinition::new("berserker_rage", 40, 0.0)
                .off_gcd(false)
                .with_cooldown(30.0),
            SkillDefinition::new("mortal_strike", 30, 45.0)
                .with_cost(RAGE, 30.0)
                .with_cooldown(6.0)
                .with_gcd(1.5)
                .with_coefficients(1.0, 0.0),
            SkillDefinition::new("cleave", 20, 25.0)
                .with_cost(RAGE, 20.0)
                .with_cooldown(3.0)
                .with_gcd(1.5)
                .with_coefficients(0.4, 0.0)
                .with_aoe(AoeParams::cleave_full(3)),
            SkillDefinition::new(REND, 10, 0.0)
                .with_cost(RAGE, 10.0)
                .with_cooldown(9.0)
                .with_gcd(1.5),
        ]
    }

    fn on_attack_tick(&self, ctx: &mut BattleContext) {
        rules::on_attack_tick(ctx);
        let gain = if ctx.has_buff(ENRAGE, BuffTarget::Caster) {
            ENRAGED_RAGE_PER_SWING
        } else {
            RAGE_PER_SWING
        };
        ctx.add_resource(RAGE, gain);
    }

    fn on_skill_cast(&self, ctx: &mut BattleContext, skill_id: &str) {
        match skill_id {
            REND => {
                rules::apply_to_primary(ctx, REND);
            }
            "berserker_rage" => {
                ctx.apply_buff(ENRAGE, BuffTarget::Caster);
                ctx.add_resource(RAGE, BERSERKER_RAGE_GAIN);
            }
            _ => rules::on_skill_cast(ctx, skill_id),
        }
    }
}
