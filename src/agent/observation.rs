use nalgebra::Vector3;

use crate::dynamics::PhysicalState;
use crate::error::ValidationError;
use crate::normalization::{sigmoid, DEFAULT_SCALE};

pub const OBS_SIZE: usize = 22;
pub const ACTION_SIZE: usize = 4;

/// Knee of the linear-velocity squashing, m/s.
pub const LINEAR_VELOCITY_SCALE: f64 = 0.25;
/// Knee of the relative-target squashing, m.
pub const RELATIVE_TARGET_SCALE: f64 = 5.0;

/// Bound for the squashed slots after narrowing to `f32`.
const NORMALIZED_LIMIT: f32 = 1.0 - f32::EPSILON;

// ---------------------------------------------------------------------------
// Observation vector
// ---------------------------------------------------------------------------

/// Fixed-layout observation handed to the policy each tick.
///
/// ```text
/// [0..3)   position
/// [3..7)   rotation quaternion (x, y, z, w)
/// [7..10)  linear velocity
/// [10..13) angular velocity
/// [13..16) sigmoid(linear velocity, 0.25)
/// [16..19) sigmoid(angular velocity, 1.0)
/// [19..22) sigmoid(target in body frame, 5.0), zero without a target
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub data: [f32; OBS_SIZE],
}

impl Default for Observation {
    fn default() -> Self {
        Self { data: [0.0; OBS_SIZE] }
    }
}

impl Observation {
    pub fn build(state: &PhysicalState, target: Option<&Vector3<f64>>) -> Self {
        let mut obs = Observation::default();
        let q = state.quat.quaternion();

        obs.put(0, &state.pos);
        obs.data[3] = q.i as f32;
        obs.data[4] = q.j as f32;
        obs.data[5] = q.k as f32;
        obs.data[6] = q.w as f32;
        obs.put(7, &state.vel);
        obs.put(10, &state.omega);
        obs.put_normalized(13, &sigmoid(&state.vel, LINEAR_VELOCITY_SCALE));
        obs.put_normalized(16, &sigmoid(&state.omega, DEFAULT_SCALE));

        if let Some(target) = target {
            let local = state.inverse_transform_point(target);
            obs.put_normalized(19, &sigmoid(&local, RELATIVE_TARGET_SCALE));
        }
        obs
    }

    pub fn from_slice(values: &[f32]) -> Result<Self, ValidationError> {
        let data: [f32; OBS_SIZE] = values.try_into().map_err(|_| {
            ValidationError::ObservationDimMismatch { expected: OBS_SIZE, got: values.len() }
        })?;
        Ok(Self { data })
    }

    fn put(&mut self, offset: usize, v: &Vector3<f64>) {
        for (i, x) in v.iter().enumerate() {
            self.data[offset + i] = *x as f32;
        }
    }

    /// Like `put`, but keeps the value strictly inside (-1, 1) in `f32`.
    fn put_normalized(&mut self, offset: usize, v: &Vector3<f64>) {
        for (i, x) in v.iter().enumerate() {
            self.data[offset + i] = (*x as f32).clamp(-NORMALIZED_LIMIT, NORMALIZED_LIMIT);
        }
    }

    fn get(&self, offset: usize) -> Vector3<f32> {
        Vector3::new(self.data[offset], self.data[offset + 1], self.data[offset + 2])
    }

    pub fn position(&self) -> Vector3<f32> {
        self.get(0)
    }

    pub fn linear_velocity(&self) -> Vector3<f32> {
        self.get(7)
    }

    pub fn angular_velocity(&self) -> Vector3<f32> {
        self.get(10)
    }

    pub fn normalized_linear_velocity(&self) -> Vector3<f32> {
        self.get(13)
    }

    pub fn normalized_angular_velocity(&self) -> Vector3<f32> {
        self.get(16)
    }

    /// Squashed target position in the body frame (x forward, y left, z up).
    pub fn normalized_relative_target(&self) -> Vector3<f32> {
        self.get(19)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

// ---------------------------------------------------------------------------
// Action vector
// ---------------------------------------------------------------------------

/// Continuous policy output `[pitch, roll, yaw, throttle]`, each nominally
/// in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Action {
    pub data: [f32; ACTION_SIZE],
}

impl Action {
    pub fn new(pitch: f32, roll: f32, yaw: f32, throttle: f32) -> Self {
        Self { data: [pitch, roll, yaw, throttle] }
    }

    pub fn from_slice(values: &[f32]) -> Result<Self, ValidationError> {
        let data: [f32; ACTION_SIZE] = values.try_into().map_err(|_| {
            ValidationError::ActionDimMismatch { expected: ACTION_SIZE, got: values.len() }
        })?;
        Ok(Self { data })
    }

    pub fn pitch(&self) -> f32 {
        self.data[0]
    }

    pub fn roll(&self) -> f32 {
        self.data[1]
    }

    pub fn yaw(&self) -> f32 {
        self.data[2]
    }

    pub fn throttle(&self) -> f32 {
        self.data[3]
    }

    /// Replace NaN/Inf components with zero. Returns how many were replaced.
    pub fn sanitize(&mut self) -> usize {
        let mut replaced = 0;
        for x in &mut self.data {
            if !x.is_finite() {
                *x = 0.0;
                replaced += 1;
            }
        }
        replaced
    }
}
