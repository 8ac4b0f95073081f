use drone_agent::agent::{Action, Observation};
use drone_agent::config::SimulationConfig;
use drone_agent::control::Policy;
use drone_agent::sim::Simulation;

/// Bang-bang pilot: full cyclic toward whichever body axis the target
/// lies along, throttle on the vertical offset sign.
struct BangBangPolicy {
    deadband: f32,
}

impl Policy for BangBangPolicy {
    fn act(&mut self, obs: &Observation) -> Action {
        let rel = obs.normalized_relative_target();
        let bang = |v: f32| if v.abs() < self.deadband { 0.0 } else { v.signum() };
        Action::new(bang(rel.x), -bang(rel.y), -bang(rel.y), bang(rel.z))
    }

    fn name(&self) -> &str {
        "BangBang"
    }
}

fn main() -> anyhow::Result<()> {
    let mut cfg = SimulationConfig::default();
    cfg.agent.max_episode_steps = 2000;
    cfg.agent.seed = 7;

    let mut policy = BangBangPolicy { deadband: 0.1 };
    let mut sim = Simulation::new(&cfg)?;

    println!("Running 4 episodes with {} policy...", policy.name());
    let report = sim.run_episodes(&mut policy, 4)?;

    for e in &report.episodes {
        println!(
            "  Episode {:>2}: {:<14} steps={:>5}  reward={:>9.2}",
            e.index, e.outcome, e.steps, e.total_reward
        );
    }
    println!("  Win rate: {:.0}%", report.win_rate() * 100.0);
    Ok(())
}
