use std::collections::VecDeque;

use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Cosmetic collaborators
// ---------------------------------------------------------------------------

/// Win/lose state shown at episode end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    Win,
    Lose,
}

/// Fire-and-forget hooks for trail drawing and outcome display. Nothing the
/// core does depends on these calls.
pub trait EpisodeFeedback {
    fn reset_trail(&mut self) {}

    fn record(&mut self, _position: &Vector3<f64>) {}

    fn show_outcome(&mut self, _state: VisualState) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl EpisodeFeedback for NullFeedback {}

/// Bounded position history plus the last outcome shown.
#[derive(Debug, Clone)]
pub struct Trail {
    capacity: usize,
    points: VecDeque<Vector3<f64>>,
    last_outcome: Option<VisualState>,
    resets: u64,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            points: VecDeque::with_capacity(capacity.max(1)),
            last_outcome: None,
            resets: 0,
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &Vector3<f64>> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_outcome(&self) -> Option<VisualState> {
        self.last_outcome
    }

    pub fn resets(&self) -> u64 {
        self.resets
    }
}

impl EpisodeFeedback for Trail {
    fn reset_trail(&mut self) {
        self.points.clear();
        self.resets += 1;
    }

    fn record(&mut self, position: &Vector3<f64>) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(*position);
    }

    fn show_outcome(&mut self, state: VisualState) {
        self.last_outcome = Some(state);
    }
}
