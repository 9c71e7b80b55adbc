//! Named numeric resource pools (rage, mana, energy, ...).

use super::types::ResourceCost;
use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePool {
    pub id: String,
    pub current: f64,
    pub max: f64,
    /// Passive gain on every special pulse.
    #[serde(default)]
    pub regen_per_pulse: f64,
}

impl ResourcePool {
    /// A full pool.
    pub fn new(id: impl Into<String>, max: f64) -> Self {
        Self {
            id: id.into(),
            current: max,
            max,
            regen_per_pulse: 0.0,
        }
    }

    pub fn starting_at(mut self, current: f64) -> Self {
        self.current = current.clamp(0.0, self.max);
        self
    }

    pub fn with_regen(mut self, per_pulse: f64) -> Self {
        self.regen_per_pulse = per_pulse;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourcePools {
    pools: BTreeMap<String, ResourcePool>,
}

impl ResourcePools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pool: ResourcePool) -> Result<(), ConfigError> {
        if pool.max < 0.0 {
            return Err(ConfigError::InvalidSetting(format!(
                "resource `{}` has a negative maximum",
                pool.id
            )));
        }
        if self.pools.contains_key(&pool.id) {
            return Err(ConfigError::DuplicateId(pool.id));
        }
        self.pools.insert(pool.id.clone(), pool);
        Ok(())
    }

    pub fn has(&self, id: &str) -> bool {
        self.pools.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ResourcePool> {
        self.pools.get(id)
    }

    pub fn current(&self, id: &str) -> f64 {
        self.pools.get(id).map_or(0.0, |p| p.current)
    }

    pub fn can_afford(&self, cost: &ResourceCost) -> bool {
        self.current(&cost.resource) + 1e-9 >= cost.amount
    }

    /// Deducts `cost` if affordable.
    pub fn spend(&mut self, cost: &ResourceCost) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        if let Some(pool) = self.pools.get_mut(&cost.resource) {
            pool.current = (pool.current - cost.amount).max(0.0);
        }
        true
    }

    /// Adds `amount` (capped at max). Returns the amount actually gained.
    pub fn gain(&mut self, id: &str, amount: f64) -> f64 {
        let Some(pool) = self.pools.get_mut(id) else {
            return 0.0;
        };
        let before = pool.current;
        pool.current = (pool.current + amount).clamp(0.0, pool.max);
        pool.current - before
    }

    pub fn regen_all(&mut self) {
        for pool in self.pools.values_mut() {
            if pool.regen_per_pulse != 0.0 {
                pool.current = (pool.current + pool.regen_per_pulse).clamp(0.0, pool.max);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourcePool> {
        self.pools.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rage() -> ResourcePools {
        let mut pools = ResourcePools::new();
        pools
            .insert(ResourcePool::new("rage", 100.0).starting_at(20.0))
            .unwrap();
        pools
    }

    #[test]
    fn test_spend_requires_enough() {
        let mut pools = rage();
        assert!(!pools.spend(&ResourceCost::new("rage", 30.0)));
        assert!(pools.spend(&ResourceCost::new("rage", 15.0)));
        assert_eq!(pools.current("rage"), 5.0);
    }

    #[test]
    fn test_gain_caps_at_max() {
        let mut pools = rage();
        assert_eq!(pools.gain("rage", 500.0), 80.0);
        assert_eq!(pools.current("rage"), 100.0);
        assert_eq!(pools.gain("mana", 10.0), 0.0);
    }

    #[test]
    fn test_regen_per_pulse() {
        let mut pools = ResourcePools::new();
        pools
            .insert(ResourcePool::new("energy", 100.0).starting_at(0.0).with_regen(10.0))
            .unwrap();
        for _ in 0..3 {
            pools.regen_all();
        }
        assert_eq!(pools.current("energy"), 30.0);
    }

    #[test]
    fn test_duplicate_pool_rejected() {
        let mut pools = rage();
        assert!(pools.insert(ResourcePool::new("rage", 50.0)).is_err());
    }

    #[test]
    fn test_unknown_resource_is_unaffordable() {
        let pools = rage();
        assert!(!pools.can_afford(&ResourceCost::new("mana", 1.0)));
        assert!(pools.can_afford(&ResourceCost::new("mana", 0.0)));
    }
}
