use nalgebra::{UnitQuaternion, Vector3};

use crate::dynamics::state::{PhysicalState, Pose, G0};

// ---------------------------------------------------------------------------
// Physics collaborator
// ---------------------------------------------------------------------------

/// The physics engine seen from the agent.
///
/// The agent reads snapshots and writes forces or commanded rotations; it
/// never integrates. `integrate` exists for the simulation driver, which
/// owns the ordering between core logic and physics.
pub trait RigidBody {
    fn state(&self) -> PhysicalState;

    fn mass(&self) -> f64;

    /// Gravity magnitude, m/s^2.
    fn gravity(&self) -> f64;

    /// Continuous force (inertial frame) applied over the next step.
    fn add_force(&mut self, force: Vector3<f64>);

    /// Kinematic rotation target, reached at the next step.
    fn move_rotation(&mut self, rotation: UnitQuaternion<f64>);

    /// Place the body at `pose` with zero linear and angular velocity.
    fn teleport(&mut self, pose: &Pose);

    /// Advance one fixed step.
    fn integrate(&mut self, dt: f64);
}

// ---------------------------------------------------------------------------
// Reference body: point mass + kinematic attitude
// ---------------------------------------------------------------------------

/// Minimal rigid body used for headless episodes.
///
/// Translation: semi-implicit Euler on `a = F/m - g z - drag * v`.
/// Attitude: driven by `move_rotation`; angular velocity is the rotation
/// delta over the step, decayed by `angular_drag` when no target is set.
#[derive(Debug, Clone)]
pub struct SimpleBody {
    state: PhysicalState,
    mass: f64,
    gravity: f64,
    pub drag: f64,           // 1/s
    pub angular_drag: f64,   // 1/s
    force: Vector3<f64>,
    rotation_target: Option<UnitQuaternion<f64>>,
}

impl SimpleBody {
    pub fn new(mass: f64) -> Self {
        Self {
            state: PhysicalState::default(),
            mass,
            gravity: G0,
            drag: 0.0,
            angular_drag: 0.05,
            force: Vector3::zeros(),
            rotation_target: None,
        }
    }

    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_drag(mut self, drag: f64, angular_drag: f64) -> Self {
        self.drag = drag;
        self.angular_drag = angular_drag;
        self
    }

    /// Net force accumulated since the last step.
    pub fn pending_force(&self) -> Vector3<f64> {
        self.force
    }
}

impl RigidBody for SimpleBody {
    fn state(&self) -> PhysicalState {
        self.state.clone()
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn gravity(&self) -> f64 {
        self.gravity
    }

    fn add_force(&mut self, force: Vector3<f64>) {
        self.force += force;
    }

    fn move_rotation(&mut self, rotation: UnitQuaternion<f64>) {
        self.rotation_target = Some(rotation);
    }

    fn teleport(&mut self, pose: &Pose) {
        self.state = PhysicalState::at_rest(pose);
        self.force = Vector3::zeros();
        self.rotation_target = None;
    }

    fn integrate(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        let s = &mut self.state;

        let accel = self.force / self.mass - Vector3::new(0.0, 0.0, self.gravity) - s.vel * self.drag;
        s.vel += accel * dt;
        s.pos += s.vel * dt;

        match self.rotation_target.take() {
            Some(target) => {
                let delta = target * s.quat.inverse();
                s.omega = delta.scaled_axis() / dt;
                s.quat = target;
            }
            None => {
                s.omega *= (1.0 - self.angular_drag * dt).max(0.0);
                s.quat = UnitQuaternion::from_scaled_axis(s.omega * dt) * s.quat;
            }
        }

        self.force = Vector3::zeros();
    }
}
