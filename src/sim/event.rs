use nalgebra::Vector3;

use crate::config::{ObstacleConfig, SimulationConfig};
use crate::dynamics::PhysicalState;
use crate::episode::Termination;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    EpisodeStart { target: Option<String> },
    Contact { with: String },
    Finished(Termination),
    Truncated,
}

/// A discrete event that occurred during a run.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub episode: u64,
    pub step: u64,
    pub kind: EventKind,
}

/// Passive detectors that inspect consecutive states after integration and
/// report contacts.
pub trait EventDetector {
    fn check(&mut self, prev: &PhysicalState, current: &PhysicalState) -> Option<EventKind>;
}

/// Contact with a horizontal floor.
pub struct GroundContact {
    pub altitude: f64,
}

impl GroundContact {
    pub fn new(altitude: f64) -> Self {
        Self { altitude }
    }
}

impl EventDetector for GroundContact {
    fn check(&mut self, _prev: &PhysicalState, current: &PhysicalState) -> Option<EventKind> {
        if current.altitude() <= self.altitude {
            Some(EventKind::Contact { with: "ground".into() })
        } else {
            None
        }
    }
}

/// Contact with a spherical obstacle.
pub struct ObstacleContact {
    pub name: String,
    pub center: Vector3<f64>,
    pub radius: f64,
}

impl ObstacleContact {
    pub fn new(name: impl Into<String>, center: Vector3<f64>, radius: f64) -> Self {
        Self { name: name.into(), center, radius }
    }
}

impl From<&ObstacleConfig> for ObstacleContact {
    fn from(o: &ObstacleConfig) -> Self {
        Self::new(o.name.clone(), Vector3::from(o.center), o.radius)
    }
}

impl EventDetector for ObstacleContact {
    fn check(&mut self, _prev: &PhysicalState, current: &PhysicalState) -> Option<EventKind> {
        if current.distance_to(&self.center) <= self.radius {
            Some(EventKind::Contact { with: self.name.clone() })
        } else {
            None
        }
    }
}

/// Floor plus every configured obstacle.
pub fn detectors_from_config(config: &SimulationConfig) -> Vec<Box<dyn EventDetector>> {
    let mut detectors: Vec<Box<dyn EventDetector>> = Vec::new();
    if let Some(altitude) = config.sim.floor_altitude {
        detectors.push(Box::new(GroundContact::new(altitude)));
    }
    for o in &config.obstacles {
        detectors.push(Box::new(ObstacleContact::from(o)));
    }
    detectors
}
