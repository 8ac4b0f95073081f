//! TOML configuration for a training or evaluation run.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults below, which reproduce the reference quadrotor scene.

use std::path::Path;

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::dynamics::{Pose, SimpleBody, G0};
use crate::episode::Target;
use crate::error::ConfigError;
use crate::vehicle::{presets, Drone, DroneBuilder, EngineSpec};

// ---------------------------------------------------------------------------
// Reward coefficients
// ---------------------------------------------------------------------------

/// Reward shaping coefficients. Fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardParameters {
    pub distance_reward_multiplier: f64,
    pub distance_penalty_multiplier: f64,
    pub reached_target_reward: f64,
    pub collision_penalty: f64,
    pub time_penalty: f64,
    pub out_of_bounds_penalty: f64,
    pub orientation_reward_scale: f64,
    pub angular_velocity_penalty_scale: f64,
    pub velocity_damping_penalty_scale: f64,
    pub alignment_reward_multiplier: f64,
    pub desired_height_min: f64,
    pub desired_height_max: f64,
    pub height_penalty_scale: f64,
    pub height_penalty_exponent: f64,
    /// Distance under which the target counts as reached, m.
    pub target_reached_threshold: f64,
    /// Distance over which the episode ends out of bounds, m.
    pub max_distance_before_penalty: f64,
}

impl Default for RewardParameters {
    fn default() -> Self {
        Self {
            distance_reward_multiplier: 0.5,
            distance_penalty_multiplier: 1.5,
            reached_target_reward: 100.0,
            collision_penalty: -10.0,
            time_penalty: -0.01,
            out_of_bounds_penalty: -5.0,
            orientation_reward_scale: 0.1,
            angular_velocity_penalty_scale: -0.05,
            velocity_damping_penalty_scale: -0.01,
            alignment_reward_multiplier: 0.1,
            desired_height_min: 60.0,
            desired_height_max: 70.0,
            height_penalty_scale: 0.01,
            height_penalty_exponent: 0.05,
            target_reached_threshold: 1.0,
            max_distance_before_penalty: 100.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub min_max_pitch: f64,   // deg at full cyclic
    pub min_max_roll: f64,    // deg at full cyclic
    pub yaw_power: f64,       // deg/s at full pedal
    pub lerp_speed: f64,      // 1/s, attitude smoothing
    pub manual_termination_penalty: f64,
    /// Interrupt the episode after this many ticks; 0 disables.
    pub max_episode_steps: u64,
    /// Begin the next episode as soon as one terminates.
    pub auto_reset: bool,
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            min_max_pitch: 30.0,
            min_max_roll: 30.0,
            yaw_power: 4.0,
            lerp_speed: 2.0,
            manual_termination_penalty: -100.0,
            max_episode_steps: 0,
            auto_reset: true,
            seed: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Airframe
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneConfig {
    pub mass: f64,            // kg
    pub engine_count: usize,
    pub max_power: f64,       // N
    pub prop_spin_rate: f64,  // deg per update
    pub gravity: f64,         // m/s^2
    pub drag: f64,            // 1/s, reference body only
    pub angular_drag: f64,    // 1/s, reference body only
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self {
            mass: 0.454,
            engine_count: 4,
            max_power: 4.0,
            prop_spin_rate: 100.0,
            gravity: G0,
            drag: 0.5,
            angular_drag: 0.05,
        }
    }
}

impl DroneConfig {
    pub fn build_drone(&self) -> Drone {
        let spec = EngineSpec {
            max_power: self.max_power,
            prop_spin_rate: self.prop_spin_rate,
            ..EngineSpec::default()
        };
        if self.engine_count == 4 {
            return presets::quad_x_with(self.mass, spec);
        }
        (0..self.engine_count)
            .fold(DroneBuilder::new("Multirotor").mass(self.mass), |b, i| {
                b.fixed_pitch(format!("engine_{i}"), spec.clone())
            })
            .build()
    }

    pub fn build_body(&self) -> SimpleBody {
        SimpleBody::new(self.mass)
            .with_gravity(self.gravity)
            .with_drag(self.drag, self.angular_drag)
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartConfig {
    pub position: [f64; 3],
    #[serde(default)]
    pub yaw_deg: f64,
}

impl StartConfig {
    pub fn pose(&self) -> Pose {
        Pose::new(
            Vector3::from(self.position),
            UnitQuaternion::from_euler_angles(0.0, 0.0, self.yaw_deg.to_radians()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub name: String,
    pub position: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub name: String,
    pub center: [f64; 3],
    pub radius: f64,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,              // fixed step, s
    /// Hard stop for a run, in ticks across all episodes.
    pub max_steps: u64,
    /// Ground plane altitude; contact below it is a collision.
    pub floor_altitude: Option<f64>,
    /// Samples kept by the trail recorder.
    pub trail_samples: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.02,          // 50 Hz fixed update
            max_steps: 50_000,
            floor_altitude: Some(0.0),
            trail_samples: 1_000,
        }
    }
}

/// Full run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub sim: SimConfig,
    pub agent: AgentConfig,
    pub reward: RewardParameters,
    pub drone: DroneConfig,
    pub start: Option<StartConfig>,
    pub targets: Vec<TargetConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub obstacles: Vec<ObstacleConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let target = |name: &str, x: f64, y: f64| TargetConfig {
            name: name.into(),
            position: [x, y, 65.0],
        };
        Self {
            sim: SimConfig::default(),
            agent: AgentConfig::default(),
            reward: RewardParameters::default(),
            drone: DroneConfig::default(),
            start: Some(StartConfig { position: [0.0, 0.0, 65.0], yaw_deg: 0.0 }),
            targets: vec![
                target("north", 0.0, 30.0),
                target("east", 30.0, 0.0),
                target("south", 0.0, -30.0),
                target("west", -30.0, 0.0),
            ],
            obstacles: vec![],
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: SimulationConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sim.dt > 0.0) {
            return Err(ConfigError::InvalidDt(self.sim.dt));
        }
        if !(self.drone.mass > 0.0) {
            return Err(ConfigError::InvalidMass(self.drone.mass));
        }
        if self.drone.engine_count == 0 {
            return Err(ConfigError::NoEngines);
        }
        let r = &self.reward;
        if r.desired_height_min > r.desired_height_max {
            return Err(ConfigError::InvalidValue {
                field: "reward.desired_height_min".into(),
                message: format!(
                    "{} is above desired_height_max {}",
                    r.desired_height_min, r.desired_height_max
                ),
            });
        }
        if r.target_reached_threshold >= r.max_distance_before_penalty {
            return Err(ConfigError::InvalidValue {
                field: "reward.target_reached_threshold".into(),
                message: "must be below max_distance_before_penalty".into(),
            });
        }
        if let Some(o) = self.obstacles.iter().find(|o| !(o.radius > 0.0)) {
            return Err(ConfigError::InvalidValue {
                field: format!("obstacles.{}.radius", o.name),
                message: "must be > 0".into(),
            });
        }
        Ok(())
    }

    pub fn start_pose(&self) -> Option<Pose> {
        self.start.as_ref().map(StartConfig::pose)
    }

    pub fn build_targets(&self) -> Vec<Target> {
        self.targets
            .iter()
            .map(|t| Target::new(t.name.clone(), Vector3::from(t.position)))
            .collect()
    }
}

/// Read and validate a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<SimulationConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    SimulationConfig::from_toml_str(&text)
}
