//! Priority-driven skill selection and cast-state tracking.
//!
//! The engine decides *whether* and *what* to cast. Damage resolution, tags and
//! scheduling of follow-up events belong to the battle context.

use super::resources::ResourcePools;
use super::types::*;
use crate::core::constants::TIME_EPSILON;
use crate::core::error::ConfigError;
use tracing::debug;

#[derive(Debug, Default)]
pub struct AutoCastEngine {
    skills: Vec<SkillDefinition>,
    states: Vec<SkillState>,
    /// Skill indices by descending priority, registration order within a tie.
    order: Vec<usize>,
    gcd_until: f64,
    active_cast: Option<ActiveCast>,
}

impl AutoCastEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `def` and returns its index. An identical re-registration
    /// returns the existing index.
    pub fn register(&mut self, def: SkillDefinition) -> Result<usize, ConfigError> {
        def.validate()?;
        if let Some(index) = self.index_of(&def.id) {
            if self.skills[index] == def {
                return Ok(index);
            }
            return Err(ConfigError::DuplicateId(def.id));
        }
        self.skills.push(def);
        self.states.push(SkillState::default());

        let mut order: Vec<usize> = (0..self.skills.len()).collect();
        // sort_by_key is stable, so equal priorities keep registration order.
        order.sort_by_key(|&i| std::cmp::Reverse(self.skills[i].priority));
        self.order = order;
        Ok(self.skills.len() - 1)
    }

    /// Every skill cost must name an existing pool.
    pub fn validate_resources(&self, pools: &ResourcePools) -> Result<(), ConfigError> {
        for skill in &self.skills {
            if let Some(cost) = &skill.cost {
                if !pools.has(&cost.resource) {
                    return Err(ConfigError::UnknownResource {
                        owner: skill.id.clone(),
                        resource: cost.resource.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn skill(&self, index: usize) -> Option<&SkillDefinition> {
        self.skills.get(index)
    }

    pub fn skills(&self) -> &[SkillDefinition] {
        &self.skills
    }

    pub fn state(&self, index: usize) -> Option<&SkillState> {
        self.states.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.skills.iter().position(|s| s.id == id)
    }

    pub fn priority_order(&self) -> &[usize] {
        &self.order
    }

    pub fn gcd_until(&self) -> f64 {
        self.gcd_until
    }

    pub fn active_cast(&self) -> Option<&ActiveCast> {
        self.active_cast.as_ref()
    }

    pub fn is_casting(&self) -> bool {
        self.active_cast.is_some()
    }

    /// Whether basic attacks are currently suppressed by a locking cast.
    pub fn attack_locked(&self) -> bool {
        self.active_cast.is_some_and(|c| c.locks_attack)
    }

    pub fn can_cast(&self, index: usize, now: f64, pools: &ResourcePools) -> bool {
        let (Some(skill), Some(state)) = (self.skills.get(index), self.states.get(index)) else {
            return false;
        };
        if let Some(cost) = &skill.cost {
            if !pools.can_afford(cost) {
                return false;
            }
        }
        if state.cooldown_until > now + TIME_EPSILON {
            return false;
        }
        if !skill.off_gcd && self.gcd_until > now + TIME_EPSILON {
            return false;
        }
        if self.active_cast.is_some() {
            // Only instant off-GCD weaves fit inside another cast.
            return skill.off_gcd && skill.allow_during_casting_for_off_gcd && skill.is_instant();
        }
        true
    }

    /// The highest-priority castable skill.
    pub fn select(&self, now: f64, pools: &ResourcePools) -> Option<usize> {
        self.order
            .iter()
            .copied()
            .find(|&i| self.can_cast(i, now, pools))
    }

    /// Commits to casting `index`: pays the cost and starts cooldown and GCD.
    ///
    /// Returns `None` if the skill is not castable right now.
    pub fn begin_cast(
        &mut self,
        index: usize,
        now: f64,
        pools: &mut ResourcePools,
    ) -> Option<CastStart> {
        if !self.can_cast(index, now, pools) {
            return None;
        }
        let skill = self.skills.get(index)?;
        if let Some(cost) = &skill.cost {
            pools.spend(cost);
        }

        let state = self.states.get_mut(index)?;
        state.last_cast = Some(now);
        state.cooldown_until = now + skill.cooldown;
        let cooldown_ready_at = (skill.cooldown > 0.0).then_some(state.cooldown_until);

        let gcd_ready_at = if !skill.off_gcd && skill.gcd > 0.0 {
            self.gcd_until = now + skill.gcd;
            Some(self.gcd_until)
        } else {
            None
        };

        let completes_at = if skill.is_instant() {
            None
        } else {
            let completes_at = now + skill.cast_time;
            self.active_cast = Some(ActiveCast {
                skill: index,
                started_at: now,
                completes_at,
                locks_attack: skill.lock_attack_during_cast,
            });
            Some(completes_at)
        };

        debug!(skill = %skill.id, time = now, ?completes_at, "cast started");
        Some(CastStart {
            skill: index,
            completes_at,
            cooldown_ready_at,
            gcd_ready_at,
        })
    }

    /// Ends the active cast if it belongs to `index`.
    pub fn complete_cast(&mut self, index: usize) -> Option<ActiveCast> {
        match self.active_cast {
            Some(cast) if cast.skill == index => self.active_cast.take(),
            _ => None,
        }
    }
}
