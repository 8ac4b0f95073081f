pub mod drone;
pub mod engine;

pub use drone::{presets, Drone, DroneBuilder};
pub use engine::{compute_force, Engine, EngineContext, EngineSpec, FixedPitchEngine};
