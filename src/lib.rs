//! Quest Battle - deterministic idle-RPG combat engine
//!
//! Battles run on a simulated clock driven by a timeline of scheduled events.
//! The same seed, class and encounter produce the same outcome whether the
//! battle is stepped live, fast-forwarded offline or run by the simulator.

pub mod activity;
pub mod battle;
pub mod buffs;
pub mod character;
pub mod combat;
pub mod core;
pub mod procs;
pub mod profession;
pub mod simulator;
pub mod skills;

pub use battle::{BattleConfig, BattleResult, BattleSimulator, RunningBattle, Termination};
pub use core::offline::{FastForwardResult, OfflineFastForwardEngine};
pub use core::rng::RandomStream;
pub use profession::{Profession, ProfessionModule};
