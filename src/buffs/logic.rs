//! Buff registry and active-instance tracking.
//!
//! The engine owns definitions and instances but never touches the encounter or
//! the timeline: it reports what must be scheduled or resolved and the battle
//! context acts on it.

use super::types::*;
use crate::core::combat_math::periodic_tick_value;
use crate::core::constants::TIME_EPSILON;
use crate::core::error::ConfigError;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct BuffEngine {
    definitions: BTreeMap<String, BuffDefinition>,
    instances: BTreeMap<BuffInstanceId, BuffInstance>,
    next_instance: u64,
}

impl BuffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `def`. Re-registering an identical definition is a no-op.
    pub fn register_definition(&mut self, def: BuffDefinition) -> Result<(), ConfigError> {
        def.validate()?;
        if let Some(existing) = self.definitions.get(&def.id) {
            if *existing == def {
                return Ok(());
            }
            return Err(ConfigError::DuplicateId(def.id));
        }
        self.definitions.insert(def.id.clone(), def);
        Ok(())
    }

    pub fn definition(&self, id: &str) -> Option<&BuffDefinition> {
        self.definitions.get(id)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &BuffDefinition> {
        self.definitions.values()
    }

    pub fn instance(&self, id: BuffInstanceId) -> Option<&BuffInstance> {
        self.instances.get(&id)
    }

    /// Live instances in creation order.
    pub fn instances(&self) -> impl Iterator<Item = &BuffInstance> {
        self.instances.values()
    }

    pub fn instances_of<'a>(&'a self, buff_id: &'a str) -> impl Iterator<Item = &'a BuffInstance> {
        self.instances.values().filter(move |i| i.buff_id == buff_id)
    }

    pub fn has_active(&self, buff_id: &str, target: BuffTarget, now: f64) -> bool {
        self.instances_of(buff_id)
            .any(|i| i.target == target && i.expires_at + TIME_EPSILON >= now)
    }

    /// Stacks of `buff_id` on `target`, summed over independent instances.
    pub fn stacks_of(&self, buff_id: &str, target: BuffTarget) -> u32 {
        self.instances_of(buff_id)
            .filter(|i| i.target == target)
            .map(|i| i.stacks)
            .sum()
    }

    fn find_existing(&self, buff_id: &str, target: BuffTarget) -> Option<BuffInstanceId> {
        self.instances_of(buff_id)
            .find(|i| i.target == target)
            .map(|i| i.instance_id)
    }

    /// Applies `buff_id` to `target` at time `at` following the stack policy.
    ///
    /// Returns `None` for an unregistered id.
    pub fn apply(
        &mut self,
        buff_id: &str,
        at: f64,
        target: BuffTarget,
        haste_factor: f64,
    ) -> Option<ApplyOutcome> {
        let def = self.definitions.get(buff_id)?.clone();

        let existing = match def.stack_policy {
            StackPolicy::Independent => None,
            StackPolicy::Refresh | StackPolicy::Stack => self.find_existing(buff_id, target),
        };

        let Some(instance_id) = existing else {
            return Some(self.create_instance(&def, at, target, haste_factor));
        };

        let instance = self.instances.get_mut(&instance_id)?;
        let remaining = instance.remaining(at);
        instance.expires_at = refreshed_expiry(&def, at, remaining);
        instance.stacks = match def.stack_policy {
            StackPolicy::Stack => (instance.stacks + 1).min(def.max_stacks),
            _ => instance.stacks.min(def.max_stacks),
        };

        // A chain that ran out before the old expiry restarts on refresh.
        let mut schedule_tick_at = None;
        if def.is_periodic() && instance.next_tick_at.is_none() {
            let next = at + def.tick_interval(haste_factor);
            if next <= instance.expires_at + TIME_EPSILON {
                instance.next_tick_at = Some(next);
                schedule_tick_at = Some(next);
            }
        }

        Some(ApplyOutcome {
            instance: instance_id,
            created: false,
            stacks: instance.stacks,
            expires_at: instance.expires_at,
            schedule_tick_at,
        })
    }

    fn create_instance(
        &mut self,
        def: &BuffDefinition,
        at: f64,
        target: BuffTarget,
        haste_factor: f64,
    ) -> ApplyOutcome {
        let instance_id = BuffInstanceId(self.next_instance);
        self.next_instance += 1;

        let expires_at = at + def.duration;
        let next_tick_at = if def.is_periodic() {
            let next = at + def.tick_interval(haste_factor);
            (next <= expires_at + TIME_EPSILON).then_some(next)
        } else {
            None
        };

        self.instances.insert(
            instance_id,
            BuffInstance {
                instance_id,
                buff_id: def.id.clone(),
                target,
                stacks: 1,
                applied_at: at,
                expires_at,
                next_tick_at,
            },
        );

        ApplyOutcome {
            instance: instance_id,
            created: true,
            stacks: 1,
            expires_at,
            schedule_tick_at: next_tick_at,
        }
    }

    /// Resolves the tick of `instance` due at `now`.
    ///
    /// Returns `None` for stale events: the instance is gone, expired, or its
    /// chain was rescheduled.
    pub fn tick(
        &mut self,
        instance: BuffInstanceId,
        now: f64,
        haste_factor: f64,
        attack_power: f64,
        spell_power: f64,
    ) -> Option<TickOutcome> {
        let inst = self.instances.get(&instance)?;
        let due = inst.next_tick_at?;
        if (due - now).abs() > TIME_EPSILON {
            return None;
        }
        if now > inst.expires_at + TIME_EPSILON {
            self.instances.remove(&instance);
            return None;
        }

        let def = self.definitions.get(&inst.buff_id)?;
        let value = periodic_tick_value(
            def.periodic_base_value,
            attack_power,
            def.ap_coefficient,
            spell_power,
            def.sp_coefficient,
            inst.stacks,
        );
        let next = now + def.tick_interval(haste_factor);
        let next_tick_at = (next <= inst.expires_at + TIME_EPSILON).then_some(next);

        let outcome = TickOutcome {
            instance,
            buff_id: def.id.clone(),
            kind: def.periodic_kind,
            value,
            damage_type: def.periodic_damage_type,
            resource_id: def.periodic_resource_id.clone(),
            target: inst.target,
            next_tick_at,
        };

        if let Some(inst) = self.instances.get_mut(&instance) {
            inst.next_tick_at = next_tick_at;
        }
        Some(outcome)
    }

    /// Removes every instance that expired strictly before `now`.
    pub fn purge_expired(&mut self, now: f64) -> Vec<BuffInstance> {
        let expired: Vec<BuffInstanceId> = self
            .instances
            .values()
            .filter(|i| i.expires_at + TIME_EPSILON < now)
            .map(|i| i.instance_id)
            .collect();
        expired
            .into_iter()
            .filter_map(|id| self.instances.remove(&id))
            .collect()
    }

    /// Drops every instance carried by `target`, e.g. when it dies.
    pub fn remove_target(&mut self, target: BuffTarget) -> Vec<BuffInstance> {
        let doomed: Vec<BuffInstanceId> = self
            .instances
            .values()
            .filter(|i| i.target == target)
            .map(|i| i.instance_id)
            .collect();
        doomed
            .into_iter()
            .filter_map(|id| self.instances.remove(&id))
            .collect()
    }

    pub fn remove(&mut self, instance: BuffInstanceId) -> Option<BuffInstance> {
        self.instances.remove(&instance)
    }

    pub fn active_count(&self) -> usize {
        self.instances.len()
    }
}

/// Expiry after reapplying `def` with `remaining` seconds left.
///
/// Inside the pandemic window the leftover duration carries over; outside it the
/// duration simply resets, so late refreshes never bank extra time.
pub fn refreshed_expiry(def: &BuffDefinition, at: f64, remaining: f64) -> f64 {
    let window = def.duration * def.pandemic_ratio.max(0.0);
    if remaining <= window + TIME_EPSILON {
        at + def.duration + remaining
    } else {
        at + def.duration
    }
}
