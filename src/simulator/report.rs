//! Simulation report generation.

use super::config::SimConfig;
use crate::battle::Termination;
use crate::core::error::SimError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of one simulated battle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStats {
    pub seed: u64,
    pub total_damage: u64,
    pub dps: f64,
    pub kills: u32,
    pub kill_time: Option<f64>,
    pub termination: Termination,
    pub end_time: f64,
    pub tags: BTreeMap<String, u64>,
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub profession: String,
    pub duration_seconds: f64,

    // DPS distribution
    pub mean_dps: f64,
    pub min_dps: f64,
    pub max_dps: f64,

    pub avg_total_damage: f64,
    pub avg_kills: f64,
    pub runs_died: u32,
    pub runs_cleared: u32,
    /// Mean time to the first group clear, over runs that cleared one.
    pub avg_first_clear: Option<f64>,

    /// Mean count per run of every tag seen.
    pub tag_averages: BTreeMap<String, f64>,

    pub runs: Vec<RunStats>,
}

impl SimReport {
    pub fn from_runs(config: &SimConfig, runs: Vec<RunStats>) -> Self {
        let num_runs = runs.len() as u32;
        let n = num_runs.max(1) as f64;

        let mean_dps = runs.iter().map(|r| r.dps).sum::<f64>() / n;
        let min_dps = runs.iter().map(|r| r.dps).reduce(f64::min).unwrap_or(0.0);
        let max_dps = runs.iter().map(|r| r.dps).reduce(f64::max).unwrap_or(0.0);
        let avg_total_damage = runs.iter().map(|r| r.total_damage as f64).sum::<f64>() / n;
        let avg_kills = runs.iter().map(|r| r.kills as f64).sum::<f64>() / n;

        let count = |termination: Termination| {
            runs.iter().filter(|r| r.termination == termination).count() as u32
        };
        let runs_died = count(Termination::CharacterDied);
        let runs_cleared = count(Termination::EncounterCleared);

        let clear_times: Vec<f64> = runs.iter().filter_map(|r| r.kill_time).collect();
        let avg_first_clear = (!clear_times.is_empty())
            .then(|| clear_times.iter().sum::<f64>() / clear_times.len() as f64);

        let mut tag_averages = BTreeMap::new();
        for run in &runs {
            for (tag, count) in &run.tags {
                *tag_averages.entry(tag.clone()).or_insert(0.0) += *count as f64 / n;
            }
        }

        Self {
            num_runs,
            profession: config.profession.name().to_string(),
            duration_seconds: config.duration_seconds,
            mean_dps,
            min_dps,
            max_dps,
            avg_total_damage,
            avg_kills,
            runs_died,
            runs_cleared,
            avg_first_clear,
            tag_averages,
            runs,
        }
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    BATTLE SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} x {:.0}s as {}\n\n",
            self.num_runs, self.duration_seconds, self.profession
        ));

        report.push_str("── DAMAGE ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Mean DPS:          {:.1}\n", self.mean_dps));
        report.push_str(&format!("  Min DPS:           {:.1}\n", self.min_dps));
        report.push_str(&format!("  Max DPS:           {:.1}\n", self.max_dps));
        report.push_str(&format!(
            "  Avg Total Damage:  {:.0}\n\n",
            self.avg_total_damage
        ));

        report.push_str("── OUTCOMES ─────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Kills:         {:.1}\n", self.avg_kills));
        report.push_str(&format!("  Runs Died:         {}\n", self.runs_died));
        report.push_str(&format!("  Runs Cleared:      {}\n", self.runs_cleared));
        match self.avg_first_clear {
            Some(t) => report.push_str(&format!("  Avg First Clear:   {:.1}s\n\n", t)),
            None => report.push_str("  Avg First Clear:   -\n\n"),
        }

        report.push_str("── TAGS (per run) ───────────────────────────────────────────────\n");
        for (tag, avg) in &self.tag_averages {
            report.push_str(&format!("  {:<32} {:>8.1}\n", tag, avg));
        }

        report
    }

    /// One-line summary for quiet output.
    pub fn summary_line(&self) -> String {
        format!(
            "{} runs={} dps={:.1} (min {:.1}, max {:.1}) kills={:.1} died={}",
            self.profession,
            self.num_runs,
            self.mean_dps,
            self.min_dps,
            self.max_dps,
            self.avg_kills,
            self.runs_died
        )
    }
}
