//! Batch runner: one parent seed, many independent battles.

use super::config::SimConfig;
use super::report::{RunStats, SimReport};
use crate::battle::{BattleConfig, BattleSimulator};
use crate::combat::generation::idle_encounter;
use crate::combat::segment::merged_tags;
use crate::core::error::ConfigError;
use crate::core::rng::RandomStream;
use tracing::debug;

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport, ConfigError> {
    let mut parent = RandomStream::new(config.seed);
    let mut runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = parent.child();
        let stats = simulate_single_run(config, &mut rng)?;
        debug!(
            run = run_idx + 1,
            of = config.num_runs,
            seed = stats.seed,
            dps = stats.dps,
            kills = stats.kills,
            termination = ?stats.termination,
            "simulated run"
        );
        runs.push(stats);
    }

    Ok(SimReport::from_runs(config, runs))
}

fn simulate_single_run(config: &SimConfig, rng: &mut RandomStream) -> Result<RunStats, ConfigError> {
    let encounter = match &config.encounter {
        Some(spec) => spec.clone(),
        None => idle_encounter(config.level, rng),
    };
    let seed = rng.next_seed();
    let battle = BattleConfig::new(config.profession.clone(), seed)
        .with_stats(config.stats())
        .with_encounter(encounter)
        .with_segment_seconds(config.segment_seconds)
        .with_revives(config.revives);

    let result = BattleSimulator::run_for_duration(&battle, config.duration_seconds)?;
    Ok(RunStats {
        seed,
        total_damage: result.total_damage(),
        dps: result.dps(),
        kills: result.kills,
        kill_time: result.kill_time,
        termination: result.termination,
        end_time: result.end_time,
        tags: merged_tags(&result.segments),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profession::Profession;

    fn quick(profession: Profession) -> SimConfig {
        SimConfig {
            num_runs: 4,
            duration_seconds: 30.0,
            profession,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_same_seed_same_report() {
        let config = quick(Profession::Rogue);
        let a = run_simulation(&config).unwrap();
        let b = run_simulation(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_runs_get_distinct_seeds() {
        let report = run_simulation(&quick(Profession::Warrior)).unwrap();
        assert_eq!(report.runs.len(), 4);
        let mut seeds: Vec<u64> = report.runs.iter().map(|r| r.seed).collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), 4);
    }

    #[test]
    fn test_every_class_deals_damage() {
        for profession in [Profession::Warrior, Profession::Mage, Profession::Rogue] {
            let report = run_simulation(&quick(profession)).unwrap();
            assert!(report.min_dps > 0.0);
            assert!(report.tag_averages.contains_key("basic_attack"));
        }
    }

    #[test]
    fn test_single_target_config_never_clears() {
        let config = SimConfig {
            duration_seconds: 20.0,
            ..SimConfig::single_target(Profession::Mage, 3)
        };
        let report = run_simulation(&config).unwrap();
        assert_eq!(report.num_runs, 3);
        assert_eq!(report.runs_cleared, 0);
        assert_eq!(report.avg_kills, 0.0);
        assert!(report.tag_averages.contains_key("skill_cast:fireball"));
    }

    #[test]
    fn test_zero_runs() {
        let config = SimConfig {
            num_runs: 0,
            ..SimConfig::default()
        };
        let report = run_simulation(&config).unwrap();
        assert_eq!(report.num_runs, 0);
        assert_eq!(report.mean_dps, 0.0);
    }
}
