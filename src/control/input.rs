use nalgebra::Vector2;

use crate::agent::observation::Action;

// ---------------------------------------------------------------------------
// Command surface
// ---------------------------------------------------------------------------

/// Latest flight command. One writer per tick (policy path or human path),
/// read by every engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Command {
    cyclic: Vector2<f64>,   // pitch / roll desire
    pedals: f64,            // yaw desire
    throttle: f64,          // nominally [-1, 1], not clamped
}

impl Command {
    pub fn cyclic(&self) -> Vector2<f64> {
        self.cyclic
    }

    pub fn pedals(&self) -> f64 {
        self.pedals
    }

    pub fn throttle(&self) -> f64 {
        self.throttle
    }

    pub fn set_throttle(&mut self, throttle: f64) {
        self.throttle = throttle;
    }

    pub fn set_cyclic(&mut self, cyclic: Vector2<f64>) {
        self.cyclic = cyclic;
    }

    pub fn set_pedals(&mut self, pedals: f64) {
        self.pedals = pedals;
    }

    /// Overwrite every channel from a decoded action.
    pub fn write_action(&mut self, action: &Action) {
        self.cyclic = Vector2::new(action.pitch() as f64, action.roll() as f64);
        self.pedals = action.yaw() as f64;
        self.throttle = action.throttle() as f64;
    }
}

// ---------------------------------------------------------------------------
// Human input
// ---------------------------------------------------------------------------

/// Discrete key states sampled by the host each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub w: bool,
    pub s: bool,
    pub a: bool,
    pub d: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Manual episode termination.
    pub y: bool,
    /// Trail reset.
    pub r: bool,
}

impl KeyState {
    /// Map keys onto the policy action layout. W, A, Left and Up win over
    /// their opposites when both are held.
    pub fn to_action(&self) -> Action {
        Action::new(
            axis(self.w, self.s),
            -axis(self.a, self.d),
            -axis(self.left, self.right),
            axis(self.up, self.down),
        )
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    if positive {
        1.0
    } else if negative {
        -1.0
    } else {
        0.0
    }
}
