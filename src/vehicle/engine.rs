use nalgebra::{UnitQuaternion, Vector3};

use crate::control::Command;

// ---------------------------------------------------------------------------
// Engine actuator model
// ---------------------------------------------------------------------------

/// Per-tick inputs shared by every engine of a drone.
#[derive(Debug, Clone, Copy)]
pub struct EngineContext {
    pub body_rotation: UnitQuaternion<f64>,
    pub mass: f64,            // kg
    pub gravity: f64,         // m/s^2, magnitude
    pub engine_count: usize,  // N, thrust share divisor
}

/// Thrust model of a single engine.
///
/// Implement this for other rotor layouts (tilt-rotor, ducted fan); the
/// agent only ever sees the trait.
pub trait Engine {
    /// Continuous force in the inertial frame.
    fn compute_force(&self, ctx: &EngineContext, cmd: &Command) -> Vector3<f64>;

    /// Per-update cosmetic bookkeeping (propeller spin).
    fn advance(&mut self) {}

    fn name(&self) -> &str {
        "engine"
    }
}

/// Immutable engine parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSpec {
    pub max_power: f64,                  // N of extra thrust at full throttle (shared by N)
    pub mount: UnitQuaternion<f64>,      // engine frame relative to the body
    pub prop_spin_rate: f64,             // deg per update, cosmetic
}

impl Default for EngineSpec {
    fn default() -> Self {
        Self {
            max_power: 4.0,
            mount: UnitQuaternion::identity(),
            prop_spin_rate: 100.0,
        }
    }
}

/// Fixed-pitch rotor pushing along its own up axis.
///
/// Thrust always carries the drone's weight plus a tilt compensation, so
/// tilted engines produce net lateral force while throttle commands climb
/// or descent.
#[derive(Debug, Clone)]
pub struct FixedPitchEngine {
    pub name: String,
    pub spec: EngineSpec,
    prop_angle: f64, // deg
}

impl FixedPitchEngine {
    pub fn new(name: impl Into<String>, spec: EngineSpec) -> Self {
        Self { name: name.into(), spec, prop_angle: 0.0 }
    }

    pub fn prop_angle(&self) -> f64 {
        self.prop_angle
    }

    /// Engine up axis in the inertial frame. Never degenerate: the mount
    /// is a unit quaternion.
    pub fn up(&self, body_rotation: &UnitQuaternion<f64>) -> Vector3<f64> {
        body_rotation * self.spec.mount * Vector3::z()
    }
}

/// Thrust for one engine of `engine_count`, along `engine_up`.
///
/// `tilt_loss = 1 - |vertical part of engine_up|` is the share of weight
/// the tilted rotor no longer lifts; it is compensated with
/// `gravity * tilt_loss`.
pub fn compute_force(
    engine_up: &Vector3<f64>,
    mass: f64,
    gravity: f64,
    throttle: f64,
    max_power: f64,
    engine_count: usize,
) -> Vector3<f64> {
    let vertical = Vector3::new(0.0, 0.0, engine_up.z);
    let tilt_loss = 1.0 - vertical.norm();
    let compensation = gravity * tilt_loss;
    let magnitude = (mass * gravity + compensation + throttle * max_power) / engine_count as f64;
    engine_up * magnitude
}

impl Engine for FixedPitchEngine {
    fn compute_force(&self, ctx: &EngineContext, cmd: &Command) -> Vector3<f64> {
        compute_force(
            &self.up(&ctx.body_rotation),
            ctx.mass,
            ctx.gravity,
            cmd.throttle(),
            self.spec.max_power,
            ctx.engine_count,
        )
    }

    fn advance(&mut self) {
        self.prop_angle = (self.prop_angle + self.spec.prop_spin_rate).rem_euclid(360.0);
    }

    fn name(&self) -> &str {
        &self.name
    }
}
