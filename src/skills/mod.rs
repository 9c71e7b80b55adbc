//! Skill definitions, auto-cast selection and resource pools.

pub mod logic;
pub mod resources;
pub mod types;

pub use logic::AutoCastEngine;
pub use resources::{ResourcePool, ResourcePools};
pub use types::{ActiveCast, CastStart, ResourceCost, SkillDefinition, SkillState};
