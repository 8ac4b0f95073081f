use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::SimulationConfig;
use crate::sim::{EpisodeSummary, RunReport};

/// Run-level statistics over the finished episodes.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub policy: String,
    pub seed: u64,
    pub dt: f64,
    pub episodes: usize,
    pub ticks: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub mean_reward: f64,
    pub best_reward: f64,
    pub mean_steps: f64,
    pub per_episode: Vec<EpisodeSummary>,
}

impl RunSummary {
    pub fn from_report(policy: &str, config: &SimulationConfig, report: &RunReport) -> Self {
        let n = report.episodes.len();
        let best_reward = report
            .episodes
            .iter()
            .map(|e| e.total_reward)
            .fold(f64::NEG_INFINITY, f64::max);
        let mean_steps = if n == 0 {
            0.0
        } else {
            report.episodes.iter().map(|e| e.steps as f64).sum::<f64>() / n as f64
        };

        RunSummary {
            policy: policy.to_string(),
            seed: config.agent.seed,
            dt: config.sim.dt,
            episodes: n,
            ticks: report.ticks.len(),
            wins: report.episodes.iter().filter(|e| e.is_win()).count(),
            win_rate: report.win_rate(),
            mean_reward: report.mean_reward(),
            best_reward: if n == 0 { 0.0 } else { best_reward },
            mean_steps,
            per_episode: report.episodes.clone(),
        }
    }
}

/// Write the run summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &RunSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)
}

/// Write run summary JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, summary: &RunSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(index: u64, outcome: &str, total_reward: f64) -> EpisodeSummary {
        EpisodeSummary {
            index,
            steps: 100 * index,
            total_reward,
            outcome: outcome.into(),
            initial_distance: 30.0,
            final_distance: 0.5,
        }
    }

    fn report() -> RunReport {
        RunReport {
            episodes: vec![episode(1, "win", 120.0), episode(2, "crash", -15.0)],
            ..Default::default()
        }
    }

    #[test]
    fn summary_aggregates_episodes() {
        let s = RunSummary::from_report("hover", &SimulationConfig::default(), &report());
        assert_eq!(s.episodes, 2);
        assert_eq!(s.wins, 1);
        assert!((s.win_rate - 0.5).abs() < 1e-12);
        assert!((s.mean_reward - 52.5).abs() < 1e-12);
        assert!((s.best_reward - 120.0).abs() < 1e-12);
        assert!((s.mean_steps - 150.0).abs() < 1e-12);
    }

    #[test]
    fn empty_report_is_all_zero() {
        let s = RunSummary::from_report("hover", &SimulationConfig::default(), &RunReport::default());
        assert_eq!(s.best_reward, 0.0);
        assert_eq!(s.mean_steps, 0.0);
    }

    #[test]
    fn json_output_is_valid() {
        let s = RunSummary::from_report("waypoint", &SimulationConfig::default(), &report());
        let mut buf = Vec::new();
        write_summary(&mut buf, &s).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["policy"], "waypoint");
        assert_eq!(value["per_episode"][1]["outcome"], "crash");
        assert_eq!(value["wins"], 1);
    }
}
