use super::{rules, ProfessionModule};
use crate::battle::context::BattleContext;
use crate::buffs::{BuffDefinition, BuffEngine, StackPolicy};
use crate::combat::aoe::AoeParams;
use crate::combat::encounter::Encounter;
use crate::combat::types::{CombatantId, DamageType};
use crate::core::error::ConfigError;
use crate::procs::{ProcBuffTarget, ProcDefinition, ProcEngine, ProcTrigger};
use crate::skills::{ResourcePool, SkillDefinition};

pub const ENERGY: &str = "energy";
pub const COMBO: &str = "combo";
pub const DEADLY_POISON: &str = "deadly_poison";
pub const GARROTE: &str = "garrote";

/// Energy and combo points, poisons on hit, finishes the weakest enemy first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rogue;

impl ProfessionModule for Rogue {
    fn name(&self) -> &str {
        "Rogue"
    }

    fn resources(&self) -> Vec<ResourcePool> {
        vec![
            ResourcePool::new(ENERGY, 100.0).with_regen(10.0),
            ResourcePool::new(COMBO, 5.0).starting_at(0.0),
        ]
    }

    fn register_buff_definitions(&self, buffs: &mut BuffEngine) -> Result<(), ConfigError> {
        rules::register_buffs(
            buffs,
            [
                BuffDefinition::new(DEADLY_POISON, 12.0)
                    .damage_over_time(3.0, 4.0, DamageType::Nature)
                    .coefficients(0.05, 0.0)
                    .stacking(StackPolicy::Stack, 5),
                BuffDefinition::new(GARROTE, 18.0)
                    .damage_over_time(3.0, 6.0, DamageType::Physical)
                    .coefficients(0.1, 0.0)
                    .stacking(StackPolicy::Independent, 1),
            ],
        )
    }

    fn register_proc_definitions(&self, procs: &mut ProcEngine) -> Result<(), ConfigError> {
        rules::register_procs(
            procs,
            [
                ProcDefinition::apply_buff(
                    "deadly_poison_on_hit",
                    ProcTrigger::OnHit,
                    0.3,
                    DEADLY_POISON,
                    ProcBuffTarget::EventTarget,
                )
                .with_icd(1.0),
                ProcDefinition::deal_damage(
                    "instant_poison",
                    ProcTrigger::OnHit,
                    0.2,
                    12.0,
                    DamageType::Nature,
                )
                .with_icd(2.0),
            ],
        )
    }

    fn build_skills(&self) -> Vec<SkillDefinition> {
        vec![
            SkillDefinition::new("eviscerate", 30, 80.0)
                .with_cost(COMBO, 5.0)
                .with_coefficients(1.0, 0.0),
            SkillDefinition::new(GARROTE, 20, 0.0)
                .with_cost(ENERGY, 45.0)
                .with_cooldown(15.0),
            SkillDefinition::new("fan_of_knives", 15, 40.0)
                .with_cost(ENERGY, 50.0)
                .with_cooldown(8.0)
                .with_damage_type(DamageType::Physical)
                .with_coefficients(0.3, 0.0)
                .with_aoe(AoeParams::split(4).with_remainder_to_primary()),
            SkillDefinition::new("sinister_strike", 10, 20.0)
                .with_cost(ENERGY, 40.0)
                .with_coefficients(0.5, 0.0),
        ]
    }

    fn on_skill_cast(&self, ctx: &mut BattleContext, skill_id: &str) {
        match skill_id {
            "sinister_strike" => {
                ctx.add_resource(COMBO, 1.0);
            }
            GARROTE => {
                rules::apply_to_primary(ctx, GARROTE);
            }
            _ => rules::on_skill_cast(ctx, skill_id),
        }
    }

    fn select_primary_target(&self, encounter: &Encounter) -> Option<CombatantId> {
        rules::lowest_health_target(encounter)
    }
}
