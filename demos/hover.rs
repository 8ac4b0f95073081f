use drone_agent::config::SimulationConfig;
use drone_agent::control::HoverPolicy;
use drone_agent::dynamics::RigidBody;
use drone_agent::sim::Simulation;

/// Neutral sticks for ten seconds: the engines alone should hold the
/// start altitude while the reward drifts with the time penalty.
fn main() -> anyhow::Result<()> {
    let mut cfg = SimulationConfig::default();
    cfg.agent.max_episode_steps = 500;

    let mut sim = Simulation::new(&cfg)?;
    let mut policy = HoverPolicy;

    println!("{:>6}  {:>8}  {:>8}  {:>10}", "t (s)", "alt (m)", "dist (m)", "reward");
    for i in 0..500 {
        let tick = sim.step(&mut policy)?;
        if i % 50 == 0 {
            println!(
                "{:>6.2}  {:>8.3}  {:>8.3}  {:>10.4}",
                tick.time, tick.pos.z, tick.distance, tick.cumulative_reward
            );
        }
    }
    println!("Final altitude: {:.3} m", sim.body.state().altitude());
    Ok(())
}
