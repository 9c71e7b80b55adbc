//! Timed and periodic effects.

pub mod logic;
pub mod types;

pub use logic::BuffEngine;
pub use types::{
    BuffDefinition, BuffInstance, BuffInstanceId, BuffTarget, PeriodicKind, StackPolicy,
};
