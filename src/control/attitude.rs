use nalgebra::UnitQuaternion;

use crate::agent::observation::Action;
use crate::config::AgentConfig;

// ---------------------------------------------------------------------------
// Action → commanded attitude
// ---------------------------------------------------------------------------

/// Turns cyclic/pedal actions into a smoothed attitude target.
///
/// Pitch and roll ease toward `action * limit` at `lerp_speed`; yaw is
/// integrated from the pedal rate. Angles are kept in degrees.
#[derive(Debug, Clone)]
pub struct AttitudeDecoder {
    pub min_max_pitch: f64,
    pub min_max_roll: f64,
    pub yaw_power: f64,
    pub lerp_speed: f64,
    pitch: f64,
    roll: f64,
    yaw: f64,
}

impl AttitudeDecoder {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            min_max_pitch: config.min_max_pitch,
            min_max_roll: config.min_max_roll,
            yaw_power: config.yaw_power,
            lerp_speed: config.lerp_speed,
            pitch: 0.0,
            roll: 0.0,
            yaw: 0.0,
        }
    }

    /// Start a new episode from the given heading (deg, ENU).
    pub fn reset(&mut self, yaw_deg: f64) {
        self.pitch = 0.0;
        self.roll = 0.0;
        self.yaw = yaw_deg;
    }

    /// Current (pitch, roll, yaw) in degrees.
    pub fn angles(&self) -> (f64, f64, f64) {
        (self.pitch, self.roll, self.yaw)
    }

    /// Advance the smoothing by `dt` and return the commanded rotation.
    ///
    /// Positive pitch tips the nose down, positive roll banks right and
    /// positive yaw turns clockwise seen from above.
    pub fn update(&mut self, action: &Action, dt: f64) -> UnitQuaternion<f64> {
        let pitch_cmd = action.pitch() as f64 * self.min_max_pitch;
        let roll_cmd = action.roll() as f64 * self.min_max_roll;
        let yaw_rate = action.yaw() as f64 * self.yaw_power;

        let t = (dt * self.lerp_speed).clamp(0.0, 1.0);
        self.yaw = (self.yaw - yaw_rate * dt).rem_euclid(360.0);
        self.pitch = lerp(self.pitch, pitch_cmd, t);
        self.roll = lerp(self.roll, roll_cmd, t);

        self.rotation()
    }

    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(
            self.roll.to_radians(),
            self.pitch.to_radians(),
            self.yaw.to_radians(),
        )
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
