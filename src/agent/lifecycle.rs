// ---------------------------------------------------------------------------
// Episode lifecycle state machine
// ---------------------------------------------------------------------------

/// Where the agent is in its episode lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentPhase {
    /// Initialized, no episode started yet.
    #[default]
    Idle,
    /// Observations, actions and rewards flow every tick.
    Active,
    /// The last episode ended; waiting for the next `Begin`.
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// World reset done, a new episode starts.
    Begin,
    /// Win, crash, out-of-bounds, manual stop or step limit.
    Terminate,
}

impl AgentPhase {
    /// Next phase for `event`. `Begin` restarts from any phase; `Terminate`
    /// only leaves `Active`.
    pub fn transition(self, event: LifecycleEvent) -> AgentPhase {
        match (self, event) {
            (_, LifecycleEvent::Begin) => AgentPhase::Active,
            (AgentPhase::Active, LifecycleEvent::Terminate) => AgentPhase::Terminal,
            (phase, LifecycleEvent::Terminate) => phase,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgentPhase::Idle => "Idle",
            AgentPhase::Active => "Active",
            AgentPhase::Terminal => "Terminal",
        }
    }
}
