pub mod event;
pub mod runner;

pub use event::{detectors_from_config, EventDetector, EventKind, GroundContact, ObstacleContact, SimEvent};
pub use runner::{EpisodeSummary, RunReport, Simulation, TickRecord};
