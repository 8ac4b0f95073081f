use thiserror::Error;

/// Top-level error type for the drone agent.
#[derive(Debug, Error)]
pub enum DroneError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Errors raised while loading or validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid dt: {0} (must be > 0)")]
    InvalidDt(f64),

    #[error("Invalid drone mass: {0} (must be > 0)")]
    InvalidMass(f64),

    #[error("Drone has no engines")]
    NoEngines,

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Lifecycle misuse of the agent orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("No active episode (phase: {0})")]
    NotActive(&'static str),
}

/// Action/observation contract violations from the external learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Action dimension mismatch: expected {expected}, got {got}")]
    ActionDimMismatch { expected: usize, got: usize },

    #[error("Observation dimension mismatch: expected {expected}, got {got}")]
    ObservationDimMismatch { expected: usize, got: usize },
}
