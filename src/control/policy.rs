use crate::agent::observation::{Action, Observation};
use crate::control::input::KeyState;
use crate::control::pid::Pid;

/// Source of actions for the agent.
///
/// The external learner plugs in here; the crate ships a few scripted and
/// human-driven implementations for evaluation and debugging.
pub trait Policy {
    /// Compute the next action from the current observation.
    fn act(&mut self, obs: &Observation) -> Action;

    /// Reset internal state at an episode boundary.
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }

    /// Operator request to end the current episode.
    fn wants_termination(&self) -> bool {
        false
    }

    /// Operator request to clear the flight trail.
    fn wants_trail_reset(&self) -> bool {
        false
    }
}

/// Neutral sticks: the engines alone hold altitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoverPolicy;

impl Policy for HoverPolicy {
    fn act(&mut self, _obs: &Observation) -> Action {
        Action::default()
    }

    fn name(&self) -> &str {
        "hover"
    }
}

/// Keyboard pilot. The host writes `keys` every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPolicy {
    pub keys: KeyState,
}

impl HeuristicPolicy {
    pub fn set_keys(&mut self, keys: KeyState) {
        self.keys = keys;
    }
}

impl Policy for HeuristicPolicy {
    fn act(&mut self, _obs: &Observation) -> Action {
        self.keys.to_action()
    }

    fn name(&self) -> &str {
        "heuristic"
    }

    fn wants_termination(&self) -> bool {
        self.keys.y
    }

    fn wants_trail_reset(&self) -> bool {
        self.keys.r
    }
}

/// Scripted pilot that flies at the current target using one PID per axis
/// on the squashed body-frame target offset.
#[derive(Debug, Clone)]
pub struct WaypointPolicy {
    dt: f64,
    forward: Pid,
    lateral: Pid,
    vertical: Pid,
    pub heading_gain: f64,
}

impl WaypointPolicy {
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            forward: Pid::new(0.8, 0.0, 0.4),
            lateral: Pid::new(0.8, 0.0, 0.4),
            vertical: Pid::new(1.5, 0.05, 0.3),
            heading_gain: 2.0,
        }
    }
}

impl Policy for WaypointPolicy {
    fn act(&mut self, obs: &Observation) -> Action {
        let rel = obs.normalized_relative_target();
        let (x, y, z) = (rel.x as f64, rel.y as f64, rel.z as f64);

        // Nose down to move forward; bank toward a target on the left
        // (negative roll); turn counter-clockwise (negative yaw) toward it.
        let pitch = self.forward.update(x, self.dt);
        let roll = -self.lateral.update(y, self.dt);
        let yaw = -self.heading_gain * y;
        let throttle = self.vertical.update(z, self.dt);

        Action::new(
            pitch.clamp(-1.0, 1.0) as f32,
            roll.clamp(-1.0, 1.0) as f32,
            yaw.clamp(-1.0, 1.0) as f32,
            throttle.clamp(-1.0, 1.0) as f32,
        )
    }

    fn reset(&mut self) {
        self.forward.reset();
        self.lateral.reset();
        self.vertical.reset();
    }

    fn name(&self) -> &str {
        "waypoint"
    }
}
