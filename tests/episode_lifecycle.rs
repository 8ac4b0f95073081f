use nalgebra::{UnitQuaternion, Vector3};

use drone_agent::agent::{Action, AgentPhase, DroneAgent, TickSignals};
use drone_agent::config::{SimulationConfig, StartConfig, TargetConfig};
use drone_agent::control::{HeuristicPolicy, HoverPolicy, KeyState, Policy};
use drone_agent::dynamics::{PhysicalState, Pose, RigidBody};
use drone_agent::episode::Termination;
use drone_agent::feedback::NullFeedback;
use drone_agent::sim::Simulation;
use drone_agent::vehicle::presets;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Body that only records what the agent asks of it.
#[derive(Default)]
struct ScriptedBody {
    state: PhysicalState,
    forces: Vec<Vector3<f64>>,
    rotations: Vec<UnitQuaternion<f64>>,
    teleports: usize,
}

impl RigidBody for ScriptedBody {
    fn state(&self) -> PhysicalState {
        self.state.clone()
    }
    fn mass(&self) -> f64 {
        0.454
    }
    fn gravity(&self) -> f64 {
        9.81
    }
    fn add_force(&mut self, force: Vector3<f64>) {
        self.forces.push(force);
    }
    fn move_rotation(&mut self, rotation: UnitQuaternion<f64>) {
        self.rotations.push(rotation);
    }
    fn teleport(&mut self, pose: &Pose) {
        self.state = PhysicalState::at_rest(pose);
        self.teleports += 1;
    }
    fn integrate(&mut self, _dt: f64) {}
}

fn four_targets() -> SimulationConfig {
    let mut cfg = SimulationConfig::default();
    cfg.agent.max_episode_steps = 40;
    cfg.agent.seed = 11;
    cfg
}

#[test]
fn same_seed_same_run() {
    let cfg = four_targets();
    let run = |cfg: &SimulationConfig| {
        let mut sim = Simulation::new(cfg).unwrap();
        sim.run_episodes(&mut HoverPolicy, 6).unwrap()
    };
    let a = run(&cfg);
    let b = run(&cfg);
    assert_eq!(a.episodes, b.episodes);
    assert_eq!(a.ticks.len(), b.ticks.len());
}

#[test]
fn agent_drives_any_rigid_body() {
    let mut cfg = four_targets();
    cfg.targets = vec![TargetConfig { name: "t".into(), position: [0.0, 20.0, 65.0] }];
    let mut agent =
        DroneAgent::from_parts(&cfg, presets::quad_x(), NullFeedback, ChaCha8Rng::seed_from_u64(1));
    let mut body = ScriptedBody::default();

    agent.begin_episode(&mut body);
    assert_eq!(body.teleports, 1);
    assert!((body.state.pos.z - 65.0).abs() < 1e-12);

    agent.apply_action(Action::new(0.0, 0.0, 0.0, 1.0), &mut body, 0.02).unwrap();
    assert_eq!(body.forces.len(), 4);
    assert_eq!(body.rotations.len(), 1);
    let total: Vector3<f64> = body.forces.iter().sum();
    assert!((total.z - (0.454 * 9.81 + 4.0)).abs() < 1e-9);
}

#[test]
fn keyboard_stop_ends_episode_with_penalty() {
    let mut cfg = four_targets();
    cfg.start = Some(StartConfig { position: [0.0, 0.0, 65.0], yaw_deg: 90.0 });
    let mut sim = Simulation::new(&cfg).unwrap();
    let mut pilot = HeuristicPolicy::default();

    for _ in 0..5 {
        sim.step(&mut pilot).unwrap();
    }
    pilot.set_keys(KeyState { y: true, ..Default::default() });
    let tick = sim.step(&mut pilot).unwrap();

    assert_eq!(tick.termination, Some(Termination::Manual));
    assert_eq!(tick.reward, -100.0);
    assert!(pilot.wants_termination());
    let report = sim.report();
    assert_eq!(report.episodes[0].outcome, "manual");
    assert_eq!(report.episodes[0].steps, 6);
}

#[test]
fn collision_signal_beats_target_reached() {
    let mut cfg = four_targets();
    cfg.targets = vec![TargetConfig { name: "near".into(), position: [0.2, 0.0, 65.0] }];
    cfg.agent.auto_reset = false;
    let mut agent = DroneAgent::new(&cfg, presets::quad_x());
    let mut body = cfg.drone.build_body();
    agent.begin_episode(&mut body);

    let r = agent
        .evaluate(&mut body, TickSignals { collision: true, manual_termination: true })
        .unwrap();
    assert_eq!(r.termination, Some(Termination::Crash));
    assert_eq!(r.reward, cfg.reward.collision_penalty);
    assert_eq!(agent.phase(), AgentPhase::Terminal);
}

#[test]
fn episodes_cycle_through_configured_targets() {
    let cfg = four_targets();
    let mut sim = Simulation::new(&cfg).unwrap();
    let report = sim.run_episodes(&mut HoverPolicy, 20).unwrap();
    assert_eq!(report.episodes.len(), 20);
    // Every default target sits 30 m from the start.
    assert!(report
        .episodes
        .iter()
        .all(|e| (e.initial_distance - 30.0).abs() < 1e-9));
}
