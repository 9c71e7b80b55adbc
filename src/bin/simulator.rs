//! Quest Battle Headless Simulator
//!
//! Runs seeded battles without any client attached and reports damage, kill
//! and tag statistics for balance analysis. Uses the same engine as live and
//! offline play.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --config FILE     TOML SimConfig (flags below override it)
//!   --rules FILE      TOML RuleSet for a data-driven class
//!   --class NAME      warrior | mage | rogue
//!   --runs N          Number of battles (children of one parent seed)
//!   --seed N          Parent RNG seed
//!   --duration SECS   Simulated seconds per battle
//!   --events          Stream one battle's event records as JSON lines
//!   --json            Print the report as JSON
//!   --quiet           Only the final summary line

use clap::Parser;
use quest_battle::battle::{BattleConfig, BattleSimulator};
use quest_battle::core::error::SimError;
use quest_battle::profession::{Profession, RuleSet};
use quest_battle::simulator::{run_simulation, SimConfig};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "simulator")]
#[command(about = "Run seeded idle battles and report balance statistics")]
struct Args {
    /// Base configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data-driven class rules (TOML); overrides --class
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Built-in class
    #[arg(long, value_parser = parse_profession)]
    class: Option<Profession>,

    #[arg(long)]
    runs: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    duration: Option<f64>,

    /// Character level used for generated enemies
    #[arg(long)]
    level: Option<u32>,

    /// Stream a single battle's event records instead of a batch report
    #[arg(long)]
    events: bool,

    #[arg(long)]
    json: bool,

    #[arg(long, short = 'q')]
    quiet: bool,
}

fn parse_profession(name: &str) -> Result<Profession, String> {
    Profession::from_name(name).ok_or_else(|| format!("unknown class `{name}`"))
}

fn build_config(args: &Args) -> Result<SimConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_path(path)?,
        None => SimConfig::default(),
    };
    if let Some(profession) = &args.class {
        config.profession = profession.clone();
    }
    if let Some(path) = &args.rules {
        let rules: RuleSet = toml::from_str(&fs::read_to_string(path)?)?;
        config.profession = Profession::Scripted(rules);
    }
    if let Some(runs) = args.runs {
        config.num_runs = runs;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(duration) = args.duration {
        config.duration_seconds = duration;
    }
    if let Some(level) = args.level {
        config.level = level;
    }
    Ok(config)
}

fn stream_events(config: &SimConfig) -> Result<(), SimError> {
    let battle = BattleConfig::new(config.profession.clone(), config.seed)
        .with_stats(config.stats())
        .with_segment_seconds(config.segment_seconds)
        .with_revives(config.revives);
    let battle = match &config.encounter {
        Some(spec) => battle.with_encounter(spec.clone()),
        None => battle,
    };

    let mut running = BattleSimulator::create_running_battle(&battle, config.duration_seconds)?;
    while !running.is_finished() {
        for event in running.advance(1.0) {
            println!("{}", event.to_json()?);
        }
    }
    let result = running.finish();
    eprintln!(
        "damage={} dps={:.1} kills={} end={:.1}s {:?}",
        result.total_damage(),
        result.dps(),
        result.kills,
        result.end_time,
        result.termination
    );
    Ok(())
}

fn run(args: &Args) -> Result<(), SimError> {
    let config = build_config(args)?;

    if args.events {
        return stream_events(&config);
    }

    let report = run_simulation(&config)?;
    if args.json {
        println!("{}", report.to_json()?);
    } else if args.quiet {
        println!("{}", report.summary_line());
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quest_battle=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
