use nalgebra::{UnitQuaternion, Vector3};

use crate::control::Command;
use crate::vehicle::engine::{Engine, EngineContext, EngineSpec, FixedPitchEngine};

// ---------------------------------------------------------------------------
// Drone: airframe mass + engine set
// ---------------------------------------------------------------------------

pub struct Drone {
    pub name: String,
    pub mass: f64,                  // kg
    pub engines: Vec<Box<dyn Engine>>,
}

impl std::fmt::Debug for Drone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drone")
            .field("name", &self.name)
            .field("mass", &self.mass)
            .field("engines", &self.engines.iter().map(|e| e.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl Drone {
    pub fn engine_count(&self) -> usize {
        self.engines.len()
    }

    /// Sum of all engine forces for the current attitude and command.
    pub fn total_force(
        &self,
        body_rotation: &UnitQuaternion<f64>,
        gravity: f64,
        cmd: &Command,
    ) -> Vector3<f64> {
        let ctx = EngineContext {
            body_rotation: *body_rotation,
            mass: self.mass,
            gravity,
            engine_count: self.engines.len(),
        };
        self.engines.iter().map(|e| e.compute_force(&ctx, cmd)).sum()
    }

    /// Per-engine forces, in engine order.
    pub fn engine_forces(
        &self,
        body_rotation: &UnitQuaternion<f64>,
        gravity: f64,
        cmd: &Command,
    ) -> Vec<Vector3<f64>> {
        let ctx = EngineContext {
            body_rotation: *body_rotation,
            mass: self.mass,
            gravity,
            engine_count: self.engines.len(),
        };
        self.engines.iter().map(|e| e.compute_force(&ctx, cmd)).collect()
    }

    pub fn advance_engines(&mut self) {
        for engine in &mut self.engines {
            engine.advance();
        }
    }
}

// ---------------------------------------------------------------------------
// Drone builder
// ---------------------------------------------------------------------------

pub struct DroneBuilder {
    name: String,
    mass: f64,
    engines: Vec<Box<dyn Engine>>,
}

impl DroneBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), mass: 0.454, engines: vec![] }
    }

    pub fn mass(mut self, v: f64) -> Self { self.mass = v; self }

    pub fn engine(mut self, engine: impl Engine + 'static) -> Self {
        self.engines.push(Box::new(engine));
        self
    }

    pub fn fixed_pitch(self, name: impl Into<String>, spec: EngineSpec) -> Self {
        self.engine(FixedPitchEngine::new(name, spec))
    }

    pub fn build(self) -> Drone {
        Drone { name: self.name, mass: self.mass, engines: self.engines }
    }
}

// ---------------------------------------------------------------------------
// Preset airframes
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// 454 g quadrotor, four flat-mounted fixed-pitch rotors.
    pub fn quad_x() -> Drone {
        quad_x_with(0.454, EngineSpec::default())
    }

    pub fn quad_x_with(mass: f64, spec: EngineSpec) -> Drone {
        ["front_left", "front_right", "rear_left", "rear_right"]
            .into_iter()
            .fold(DroneBuilder::new("Quad-X").mass(mass), |b, name| {
                b.fixed_pitch(name, spec.clone())
            })
            .build()
    }
}
