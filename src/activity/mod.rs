//! Activity-plan contract and the battle snapshot blob it carries.

pub mod plan;
pub mod snapshot;

pub use plan::{ActivityPlan, LimitType, PlanState};
pub use snapshot::BattleSnapshot;
