use nalgebra::Vector3;
use serde::Serialize;
use tracing::debug;

use crate::agent::{Action, AgentPhase, DroneAgent, StepResult, TickSignals};
use crate::config::SimulationConfig;
use crate::control::Policy;
use crate::dynamics::{RigidBody, SimpleBody};
use crate::error::DroneError;
use crate::episode::Termination;
use crate::feedback::{EpisodeFeedback, Trail};
use super::event::{detectors_from_config, EventDetector, EventKind, SimEvent};

use rand::Rng;
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One fixed tick, after reward evaluation.
#[derive(Debug, Clone)]
pub struct TickRecord {
    pub time: f64,
    pub episode: u64,
    pub step: u64,
    pub pos: Vector3<f64>,
    pub vel: Vector3<f64>,
    pub omega: Vector3<f64>,
    pub up_z: f64,
    pub action: Action,
    pub distance: f64,
    pub reward: f64,
    pub cumulative_reward: f64,
    pub termination: Option<Termination>,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub index: u64,
    pub steps: u64,
    pub total_reward: f64,
    /// `win`, `crash`, `out_of_bounds`, `manual` or `truncated`.
    pub outcome: String,
    pub initial_distance: f64,
    pub final_distance: f64,
}

impl EpisodeSummary {
    pub fn is_win(&self) -> bool {
        self.outcome == Termination::Win.label()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub ticks: Vec<TickRecord>,
    pub events: Vec<SimEvent>,
    pub episodes: Vec<EpisodeSummary>,
}

impl RunReport {
    pub fn win_rate(&self) -> f64 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        self.episodes.iter().filter(|e| e.is_win()).count() as f64 / self.episodes.len() as f64
    }

    pub fn mean_reward(&self) -> f64 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        self.episodes.iter().map(|e| e.total_reward).sum::<f64>() / self.episodes.len() as f64
    }
}

// ---------------------------------------------------------------------------
// Fixed-step driver
// ---------------------------------------------------------------------------

/// Owns the body, the agent and the contact detectors, and runs the
/// observe / act / integrate / evaluate cycle at a fixed step.
pub struct Simulation<F: EpisodeFeedback = Trail, R: Rng = ChaCha8Rng> {
    pub agent: DroneAgent<F, R>,
    pub body: SimpleBody,
    detectors: Vec<Box<dyn EventDetector>>,
    dt: f64,
    max_steps: u64,
    time: f64,
    ticks: u64,
    report: RunReport,
}

impl Simulation {
    /// Validate `config` and wire body, drone, agent and detectors from it.
    pub fn new(config: &SimulationConfig) -> Result<Self, DroneError> {
        config.validate()?;
        let agent = DroneAgent::new(config, config.drone.build_drone());
        Ok(Self::from_parts(config, agent, config.drone.build_body()))
    }
}

impl<F: EpisodeFeedback, R: Rng> Simulation<F, R> {
    pub fn from_parts(config: &SimulationConfig, agent: DroneAgent<F, R>, body: SimpleBody) -> Self {
        Self {
            agent,
            body,
            detectors: detectors_from_config(config),
            dt: config.sim.dt,
            max_steps: config.sim.max_steps,
            time: 0.0,
            ticks: 0,
            report: RunReport::default(),
        }
    }

    pub fn with_detector(mut self, detector: impl EventDetector + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Advance one fixed tick with `policy` in the pilot seat. Starts an
    /// episode first if none is active.
    pub fn step(&mut self, policy: &mut dyn Policy) -> Result<TickRecord, DroneError> {
        if self.agent.phase() != AgentPhase::Active {
            self.agent.begin_episode(&mut self.body);
            self.push_start_event();
        }

        if policy.wants_trail_reset() {
            self.agent.feedback_mut().reset_trail();
        }

        let prev = self.body.state();
        let obs = self.agent.collect_observations(&prev);
        let action = policy.act(&obs);
        self.agent.apply_action(action, &mut self.body, self.dt)?;

        self.body.integrate(self.dt);
        self.time += self.dt;
        self.ticks += 1;
        let current = self.body.state();

        let contacts: Vec<EventKind> = self
            .detectors
            .iter_mut()
            .filter_map(|d| d.check(&prev, &current))
            .collect();
        let collision = !contacts.is_empty();
        for kind in contacts {
            debug!(time = self.time, event = ?kind, "Contact");
            self.push_event(kind);
        }
        let signals = TickSignals { collision, manual_termination: policy.wants_termination() };

        let result = self.agent.evaluate(&mut self.body, signals)?;
        let record = TickRecord {
            time: self.time,
            episode: result.episode,
            step: result.step,
            pos: current.pos,
            vel: current.vel,
            omega: current.omega,
            up_z: current.up().z,
            action,
            distance: result.distance,
            reward: result.reward,
            cumulative_reward: result.cumulative_reward,
            termination: result.termination,
            truncated: result.truncated,
        };
        self.report.ticks.push(record.clone());

        if result.done() {
            self.finish_episode(&result);
            policy.reset();
            if self.agent.phase() == AgentPhase::Active {
                self.push_start_event();
            }
        }
        Ok(record)
    }

    /// Run until `episodes` have finished or the tick budget is spent.
    pub fn run_episodes(
        &mut self,
        policy: &mut dyn Policy,
        episodes: usize,
    ) -> Result<RunReport, DroneError> {
        let target = self.report.episodes.len() + episodes;
        while self.report.episodes.len() < target && self.ticks < self.max_steps {
            self.step(policy)?;
        }
        Ok(std::mem::take(&mut self.report))
    }

    fn finish_episode(&mut self, result: &StepResult) {
        let kind = match result.termination {
            Some(t) => EventKind::Finished(t),
            None => EventKind::Truncated,
        };
        self.push_event_at(result.episode, result.step, kind);

        let initial_distance = self
            .agent
            .last_finished()
            .map_or(0.0, |e| e.initial_distance);
        self.report.episodes.push(EpisodeSummary {
            index: result.episode,
            steps: result.step,
            total_reward: result.cumulative_reward,
            outcome: result.termination.map_or("truncated", |t| t.label()).to_string(),
            initial_distance,
            final_distance: result.distance,
        });
    }

    fn push_start_event(&mut self) {
        let target = self.agent.current_target().map(|t| t.name.clone());
        self.push_event(EventKind::EpisodeStart { target });
    }

    fn push_event(&mut self, kind: EventKind) {
        let ep = self.agent.episode();
        let (episode, step) = (ep.index, ep.steps);
        self.push_event_at(episode, step, kind);
    }

    fn push_event_at(&mut self, episode: u64, step: u64, kind: EventKind) {
        self.report.events.push(SimEvent { time: self.time, episode, step, kind });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
