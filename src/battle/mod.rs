//! Battle orchestration: context, runner and entry points.

pub mod context;
pub mod live;
pub mod runner;
pub mod simulator;
pub mod types;

pub use context::BattleContext;
pub use live::RunningBattle;
pub use runner::BattleRunner;
pub use simulator::BattleSimulator;
pub use types::{Battle, BattleConfig, BattleResult, Termination};
