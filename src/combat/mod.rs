//! Enemies, encounters, area damage and combat accounting.

pub mod aoe;
pub mod encounter;
pub mod events;
pub mod generation;
pub mod segment;
pub mod types;

pub use aoe::{AoeMode, AoeParams};
pub use encounter::{Encounter, EncounterSpec};
pub use events::BattleEvent;
pub use segment::{Segment, SegmentCollector};
pub use types::{CombatantId, DamageType, Enemy, Mitigation};
