//! Battle balance simulator for Monte Carlo analysis.
//!
//! Runs many seeded battles through the same engine used live and offline, then
//! aggregates DPS, kill and tag statistics per class.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use runner::run_simulation;
