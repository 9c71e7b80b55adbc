//! Shared default behavior that profession modules delegate to.

use crate::battle::context::BattleContext;
use crate::buffs::{BuffDefinition, BuffEngine, BuffTarget};
use crate::combat::encounter::Encounter;
use crate::combat::types::CombatantId;
use crate::core::error::ConfigError;
use crate::procs::{ProcDefinition, ProcEngine};

pub fn on_battle_start(_ctx: &mut BattleContext) {}

pub fn on_attack_tick(_ctx: &mut BattleContext) {}

pub fn on_special_pulse(_ctx: &mut BattleContext) {}

pub fn on_skill_cast(_ctx: &mut BattleContext, _skill_id: &str) {}

pub fn default_primary_target(_encounter: &Encounter) -> Option<CombatantId> {
    None
}

/// The living enemy with the least health; the earliest one on ties.
pub fn lowest_health_target(encounter: &Encounter) -> Option<CombatantId> {
    encounter
        .living()
        .fold(None::<(CombatantId, u32)>, |best, enemy| match best {
            Some((_, hp)) if hp <= enemy.current_hp => best,
            _ => Some((enemy.id, enemy.current_hp)),
        })
        .map(|(id, _)| id)
}

pub fn register_buffs(
    buffs: &mut BuffEngine,
    defs: impl IntoIterator<Item = BuffDefinition>,
) -> Result<(), ConfigError> {
    for def in defs {
        buffs.register_definition(def)?;
    }
    Ok(())
}

pub fn register_procs(
    procs: &mut ProcEngine,
    defs: impl IntoIterator<Item = ProcDefinition>,
) -> Result<(), ConfigError> {
    for def in defs {
        procs.register_definition(def)?;
    }
    Ok(())
}

/// Applies `buff_id` to the current primary target. Returns false with no target.
pub fn apply_to_primary(ctx: &mut BattleContext, buff_id: &str) -> bool {
    match ctx.encounter().primary_target() {
        Some(id) => ctx.apply_buff(buff_id, BuffTarget::Enemy(id)).is_some(),
        None => false,
    }
}

/// Applies `buff_id` to up to `max_targets` living enemies, primary first.
pub fn apply_to_enemies(ctx: &mut BattleContext, buff_id: &str, max_targets: usize) -> usize {
    let targets = ctx.encounter().select_aoe_targets(max_targets, true);
    targets
        .into_iter()
        .filter(|&id| ctx.apply_buff(buff_id, BuffTarget::Enemy(id)).is_some())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::encounter::EncounterSpec;
    use crate::combat::types::Enemy;

    #[test]
    fn test_lowest_health_prefers_first_on_tie() {
        let mut encounter = Encounter::new(EncounterSpec::Group(vec![
            Enemy::new("A", 50, 1),
            Enemy::new("B", 30, 1),
            Enemy::new("C", 30, 1),
        ]));
        assert_eq!(lowest_health_target(&encounter), Some(CombatantId(1)));
        encounter.apply_damage(CombatantId(1), 30);
        assert_eq!(lowest_health_target(&encounter), Some(CombatantId(2)));
    }

    #[test]
    fn test_default_target_has_no_override() {
        let encounter = Encounter::new(EncounterSpec::Single(Enemy::dummy("Dummy", 10)));
        assert_eq!(default_primary_target(&encounter), None);
    }
}
