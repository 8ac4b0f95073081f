use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use drone_agent::config::{load_config, SimulationConfig};
use drone_agent::control::{HoverPolicy, Policy, WaypointPolicy};
use drone_agent::io::{write_summary_file, write_ticks_file, RunSummary};
use drone_agent::sim::{EventKind, Simulation};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyKind {
    /// Neutral sticks.
    Hover,
    /// Scripted PID pilot flying at the active target.
    Waypoint,
}

/// Headless episode runner for the quadrotor agent.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML configuration; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of episodes to run.
    #[arg(long, default_value_t = 5)]
    episodes: usize,

    #[arg(long, value_enum, default_value_t = PolicyKind::Waypoint)]
    policy: PolicyKind,

    /// Overrides `agent.seed`.
    #[arg(long)]
    seed: Option<u64>,

    /// Per-tick telemetry output.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// JSON run summary output.
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.agent.seed = seed;
    }
    info!(dt = cfg.sim.dt, seed = cfg.agent.seed, targets = cfg.targets.len(), "Config loaded");

    let mut policy: Box<dyn Policy> = match args.policy {
        PolicyKind::Hover => Box::new(HoverPolicy),
        PolicyKind::Waypoint => Box::new(WaypointPolicy::new(cfg.sim.dt)),
    };

    // -----------------------------------------------------------------------
    // Run episodes
    // -----------------------------------------------------------------------
    let mut sim = Simulation::new(&cfg)?;
    let report = sim.run_episodes(policy.as_mut(), args.episodes)?;
    let summary = RunSummary::from_report(policy.name(), &cfg, &report);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    let drone = sim.agent.drone();
    println!();
    println!("====================================================================");
    println!("  DRONE AGENT RUN | policy: {}", summary.policy);
    println!("====================================================================");
    println!();
    println!("  Setup");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Airframe:      {:>10}      Engines:      {:>8}",
        drone.name,
        drone.engine_count()
    );
    println!(
        "  Mass:          {:>8.3} kg    dt:           {:>8.3} s",
        drone.mass, cfg.sim.dt
    );
    println!(
        "  Targets:       {:>8}       Obstacles:    {:>8}",
        cfg.targets.len(),
        cfg.obstacles.len()
    );
    println!(
        "  Seed:          {:>8}       Step limit:   {:>8}",
        cfg.agent.seed, cfg.agent.max_episode_steps
    );
    println!();

    println!("  Episodes");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>4}  {:>10}  {:>7}  {:>10}  {:>9}  {:>9}",
        "#", "target", "steps", "reward", "d0 (m)", "d (m)"
    );
    println!("  {}", "─".repeat(60));
    for e in &report.episodes {
        let target = report
            .events
            .iter()
            .find_map(|ev| match &ev.kind {
                EventKind::EpisodeStart { target } if ev.episode == e.index => target.clone(),
                _ => None,
            })
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:>4}  {:>10}  {:>7}  {:>10.2}  {:>9.2}  {:>9.2}  {}",
            e.index,
            target,
            e.steps,
            e.total_reward,
            e.initial_distance,
            e.final_distance,
            e.outcome.to_uppercase()
        );
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Episodes:      {:>8}       Wins:         {:>8} ({:.0}%)",
        summary.episodes,
        summary.wins,
        summary.win_rate * 100.0
    );
    println!(
        "  Mean reward:   {:>8.2}       Best reward:  {:>8.2}",
        summary.mean_reward, summary.best_reward
    );
    println!("  Mean length:   {:>8.1} steps", summary.mean_steps);
    println!();
    println!("  Simulation: {} ticks, {:.1} s simulated", summary.ticks, sim.time());
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        write_ticks_file(path, &report.ticks)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), rows = report.ticks.len(), "Telemetry written");
    }
    if let Some(path) = &args.summary {
        write_summary_file(path, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "Summary written");
    }
    Ok(())
}
