//! The agent orchestrator: observation collection, action application,
//! reward evaluation and episode lifecycle for one drone.
//!
//! A driver calls, once per fixed tick:
//!
//! ```text
//! obs    = agent.collect_observations(&body.state())
//! action = policy.act(&obs)
//! agent.apply_action(action, &mut body, dt)
//! body.integrate(dt)
//! result = agent.evaluate(&mut body, signals)   // resets on termination
//! ```

pub mod lifecycle;
pub mod observation;

pub use lifecycle::{AgentPhase, LifecycleEvent};
pub use observation::{Action, Observation, ACTION_SIZE, OBS_SIZE};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::config::{AgentConfig, SimulationConfig};
use crate::control::{AttitudeDecoder, Command};
use crate::dynamics::{PhysicalState, RigidBody};
use crate::episode::{EpisodeManager, EpisodeState, Target, Termination};
use crate::error::AgentError;
use crate::feedback::{EpisodeFeedback, Trail, VisualState};
use crate::reward::{RewardBreakdown, RewardShaper};
use crate::vehicle::Drone;

/// External signals raised during the tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSignals {
    /// Contact reported by the physics side after integration.
    pub collision: bool,
    /// Operator asked to end the episode.
    pub manual_termination: bool,
}

/// What the learner receives after each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Observation of the post-step state (before any reset).
    pub observation: Observation,
    pub reward: f64,
    pub cumulative_reward: f64,
    pub termination: Option<Termination>,
    /// Episode interrupted by the step limit.
    pub truncated: bool,
    pub breakdown: RewardBreakdown,
    pub distance: f64,
    pub episode: u64,
    pub step: u64,
}

impl StepResult {
    pub fn done(&self) -> bool {
        self.termination.is_some() || self.truncated
    }
}

/// Drone agent. Generic over the cosmetic feedback sink and the random
/// source used for target selection.
pub struct DroneAgent<F: EpisodeFeedback = Trail, R: Rng = ChaCha8Rng> {
    config: AgentConfig,
    phase: AgentPhase,
    drone: Drone,
    command: Command,
    decoder: AttitudeDecoder,
    shaper: RewardShaper,
    manager: EpisodeManager,
    episode: EpisodeState,
    last_finished: Option<EpisodeState>,
    feedback: F,
    rng: R,
}

impl DroneAgent<Trail, ChaCha8Rng> {
    /// Agent wired from a run configuration, seeded from `agent.seed`.
    pub fn new(config: &SimulationConfig, drone: Drone) -> Self {
        Self::from_parts(
            config,
            drone,
            Trail::new(config.sim.trail_samples),
            ChaCha8Rng::seed_from_u64(config.agent.seed),
        )
    }
}

impl<F: EpisodeFeedback, R: Rng> DroneAgent<F, R> {
    pub fn from_parts(config: &SimulationConfig, drone: Drone, feedback: F, rng: R) -> Self {
        Self::with_targets(config, drone, config.build_targets(), feedback, rng)
    }

    pub fn with_targets(
        config: &SimulationConfig,
        drone: Drone,
        targets: Vec<Target>,
        feedback: F,
        rng: R,
    ) -> Self {
        if drone.engines.is_empty() {
            warn!(drone = %drone.name, "Drone has no engines; it will not produce thrust");
        }
        Self {
            config: config.agent.clone(),
            phase: AgentPhase::Idle,
            drone,
            command: Command::default(),
            decoder: AttitudeDecoder::new(&config.agent),
            shaper: RewardShaper::new(config.reward.clone()),
            manager: EpisodeManager::new(config.start_pose(), targets),
            episode: EpisodeState::default(),
            last_finished: None,
            feedback,
            rng,
        }
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    pub fn episode(&self) -> &EpisodeState {
        &self.episode
    }

    /// The most recently finished episode, as it was at termination.
    pub fn last_finished(&self) -> Option<&EpisodeState> {
        self.last_finished.as_ref()
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn drone(&self) -> &Drone {
        &self.drone
    }

    pub fn manager(&self) -> &EpisodeManager {
        &self.manager
    }

    pub fn current_target(&self) -> Option<&Target> {
        self.manager.current_target()
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    pub fn reward_shaper(&self) -> &RewardShaper {
        &self.shaper
    }

    /// Reset the world and start a new episode.
    pub fn begin_episode(&mut self, body: &mut dyn RigidBody) {
        self.manager
            .reset(body, &mut self.episode, &mut self.rng, &mut self.feedback);

        let (_, _, yaw) = body.state().quat.euler_angles();
        self.decoder.reset(yaw.to_degrees());
        self.command = Command::default();
        self.phase = self.phase.transition(LifecycleEvent::Begin);
    }

    pub fn collect_observations(&self, state: &PhysicalState) -> Observation {
        Observation::build(state, self.current_target().map(|t| &t.position))
    }

    /// Decode `action` into the command surface and commanded attitude, and
    /// push every engine's force into the body.
    pub fn apply_action(
        &mut self,
        mut action: Action,
        body: &mut dyn RigidBody,
        dt: f64,
    ) -> Result<(), AgentError> {
        self.require_active()?;

        let replaced = action.sanitize();
        if replaced > 0 {
            warn!(replaced, "Non-finite action components replaced with 0");
        }

        self.command.write_action(&action);
        let rotation = self.decoder.update(&action, dt);
        body.move_rotation(rotation);

        let state = body.state();
        let forces = self.drone.engine_forces(&state.quat, body.gravity(), &self.command);
        for force in forces {
            body.add_force(force);
        }
        self.drone.advance_engines();
        Ok(())
    }

    /// Score the post-integration state, then end (and, with `auto_reset`,
    /// restart) the episode when it terminates.
    ///
    /// A collision overrides everything for the tick; a manual stop
    /// overrides the reward shaper.
    pub fn evaluate(
        &mut self,
        body: &mut dyn RigidBody,
        signals: TickSignals,
    ) -> Result<StepResult, AgentError> {
        self.require_active()?;

        let state = body.state();
        self.feedback.record(&state.pos);
        self.episode.reward.begin_step();
        self.episode.steps += 1;

        let target = self.current_target().map(|t| t.position);
        let mut breakdown = RewardBreakdown::default();
        let mut distance = target.map_or(0.0, |t| state.distance_to(&t));

        let termination = if signals.collision {
            info!(episode = self.episode.index, "Crashed");
            let t = self.shaper.collision(&mut self.episode);
            breakdown.terminal = Some(self.shaper.params.collision_penalty);
            Some(t)
        } else if signals.manual_termination {
            let penalty = self.config.manual_termination_penalty;
            info!(episode = self.episode.index, penalty, "Episode manually terminated");
            self.episode.reward.set(penalty);
            breakdown.terminal = Some(penalty);
            Some(Termination::Manual)
        } else {
            let shaped = self.shaper.step(&state, target.as_ref(), &mut self.episode);
            breakdown = shaped.breakdown;
            if target.is_some() {
                distance = shaped.distance;
            }
            shaped.termination
        };

        let truncated = termination.is_none()
            && self.config.max_episode_steps > 0
            && self.episode.steps >= self.config.max_episode_steps;

        let result = StepResult {
            observation: self.collect_observations(&state),
            reward: self.episode.reward.step_reward(),
            cumulative_reward: self.episode.reward.cumulative(),
            termination,
            truncated,
            breakdown,
            distance,
            episode: self.episode.index,
            step: self.episode.steps,
        };

        if result.done() {
            self.finish(termination, truncated);
            if self.config.auto_reset {
                self.begin_episode(body);
            }
        }
        Ok(result)
    }

    /// End the active episode without a reward override (host-side abort).
    pub fn interrupt(&mut self) -> Result<(), AgentError> {
        self.require_active()?;
        self.finish(None, true);
        Ok(())
    }

    fn finish(&mut self, termination: Option<Termination>, truncated: bool) {
        self.episode.termination = termination;
        self.episode.truncated = truncated;

        let visual = match termination {
            Some(Termination::Win) => Some(VisualState::Win),
            Some(Termination::Crash) | Some(Termination::Manual) => Some(VisualState::Lose),
            Some(Termination::OutOfBounds) | None => None,
        };
        if let Some(v) = visual {
            self.feedback.show_outcome(v);
        }

        info!(
            episode = self.episode.index,
            outcome = termination.map_or("truncated", |t| t.label()),
            steps = self.episode.steps,
            reward = self.episode.reward.cumulative(),
            "Episode finished"
        );

        self.last_finished = Some(self.episode.clone());
        self.phase = self.phase.transition(LifecycleEvent::Terminate);
    }

    fn require_active(&self) -> Result<(), AgentError> {
        match self.phase {
            AgentPhase::Active => Ok(()),
            other => Err(AgentError::NotActive(other.label())),
        }
    }
}
