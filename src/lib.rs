pub mod agent;
pub mod config;
pub mod control;
pub mod dynamics;
pub mod episode;
pub mod error;
pub mod feedback;
pub mod io;
pub mod normalization;
pub mod reward;
pub mod sim;
pub mod vehicle;

pub use agent::{Action, AgentPhase, DroneAgent, Observation, StepResult, TickSignals};
pub use config::{load_config, SimulationConfig};
pub use error::{AgentError, ConfigError, DroneError, ValidationError};
pub use sim::{RunReport, Simulation};
