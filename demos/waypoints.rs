use drone_agent::config::{ObstacleConfig, SimulationConfig, TargetConfig};
use drone_agent::control::WaypointPolicy;
use drone_agent::io::{write_summary, RunSummary};
use drone_agent::sim::{EventKind, Simulation};

/// Scripted pilot against a ring of targets with a pylon in the middle of
/// the field; prints the event log and the JSON summary.
fn main() -> anyhow::Result<()> {
    let mut cfg = SimulationConfig::default();
    cfg.agent.max_episode_steps = 3000;
    cfg.targets = (0..6)
        .map(|i| {
            let a = i as f64 * std::f64::consts::TAU / 6.0;
            TargetConfig {
                name: format!("wp{}", i),
                position: [25.0 * a.cos(), 25.0 * a.sin(), 62.0 + i as f64],
            }
        })
        .collect();
    cfg.obstacles.push(ObstacleConfig {
        name: "pylon".into(),
        center: [12.0, 12.0, 64.0],
        radius: 2.0,
    });

    let mut sim = Simulation::new(&cfg)?;
    let mut policy = WaypointPolicy::new(cfg.sim.dt);
    let report = sim.run_episodes(&mut policy, 6)?;

    println!("Events");
    for ev in &report.events {
        let what = match &ev.kind {
            EventKind::EpisodeStart { target } => {
                format!("start -> {}", target.as_deref().unwrap_or("none"))
            }
            EventKind::Contact { with } => format!("contact with {}", with),
            EventKind::Finished(t) => format!("finished: {}", t.label()),
            EventKind::Truncated => "truncated".into(),
        };
        println!("  t={:>7.2}s  ep={:>2}  step={:>5}  {}", ev.time, ev.episode, ev.step, what);
    }

    let summary = RunSummary::from_report("waypoint", &cfg, &report);
    write_summary(&mut std::io::stdout(), &summary)?;
    Ok(())
}
