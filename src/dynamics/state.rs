use nalgebra::{UnitQuaternion, Vector3};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.81; // m/s^2, matches the reference scene gravity

// ---------------------------------------------------------------------------
// Rigid-body snapshot
// ---------------------------------------------------------------------------

/// Kinematic snapshot of the drone, read once per tick.
/// Frame: inertial East-North-Up; body x forward, y left, z up.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalState {
    pub pos: Vector3<f64>,              // m
    pub quat: UnitQuaternion<f64>,      // body→inertial rotation
    pub vel: Vector3<f64>,              // m/s, inertial
    pub omega: Vector3<f64>,            // rad/s, inertial
}

impl PhysicalState {
    pub fn at_rest(pose: &Pose) -> Self {
        Self {
            pos: pose.pos,
            quat: pose.quat,
            vel: Vector3::zeros(),
            omega: Vector3::zeros(),
        }
    }

    /// Body up axis (+Z) in the inertial frame.
    pub fn up(&self) -> Vector3<f64> {
        self.quat * Vector3::z()
    }

    /// Body forward axis (+X) in the inertial frame.
    pub fn forward(&self) -> Vector3<f64> {
        self.quat * Vector3::x()
    }

    pub fn altitude(&self) -> f64 {
        self.pos.z
    }

    /// Express an inertial point in the body frame.
    pub fn inverse_transform_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.quat.inverse() * (point - self.pos)
    }

    pub fn distance_to(&self, point: &Vector3<f64>) -> f64 {
        (point - self.pos).norm()
    }
}

impl Default for PhysicalState {
    fn default() -> Self {
        Self::at_rest(&Pose::default())
    }
}

/// Position + orientation, used for start transforms and teleports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub pos: Vector3<f64>,
    pub quat: UnitQuaternion<f64>,
}

impl Pose {
    pub fn new(pos: Vector3<f64>, quat: UnitQuaternion<f64>) -> Self {
        Self { pos, quat }
    }

    pub fn at(pos: Vector3<f64>) -> Self {
        Self { pos, quat: UnitQuaternion::identity() }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vector3::zeros())
    }
}
