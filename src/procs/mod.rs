//! Proc-triggered reactions.

pub mod logic;
pub mod types;

pub use logic::ProcEngine;
pub use types::{
    DamageSource, FiredProc, ProcAction, ProcBuffTarget, ProcContext, ProcDefinition,
    ProcTrigger, SourceFilter, BASIC_ATTACK_ID,
};
