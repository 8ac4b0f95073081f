pub mod target;

pub use target::{Target, TargetSet};

use rand::Rng;
use tracing::{debug, warn};

use crate::dynamics::{Pose, RigidBody};
use crate::feedback::EpisodeFeedback;
use crate::reward::RewardAccumulator;

// ---------------------------------------------------------------------------
// Episode outcome
// ---------------------------------------------------------------------------

/// Why an episode ended. Mutually exclusive per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Win,
    Crash,
    OutOfBounds,
    Manual,
}

impl Termination {
    pub fn label(&self) -> &'static str {
        match self {
            Termination::Win => "win",
            Termination::Crash => "crash",
            Termination::OutOfBounds => "out_of_bounds",
            Termination::Manual => "manual",
        }
    }
}

// ---------------------------------------------------------------------------
// Per-episode bookkeeping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct EpisodeState {
    pub index: u64,
    pub steps: u64,
    pub initial_distance: f64,
    /// Distance at the end of the last shaped tick.
    pub previous_distance: f64,
    pub reward: RewardAccumulator,
    pub termination: Option<Termination>,
    pub truncated: bool,
}

// ---------------------------------------------------------------------------
// Reset + target selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EpisodeManager {
    start_pose: Option<Pose>,
    targets: TargetSet,
    episodes_started: u64,
}

impl EpisodeManager {
    pub fn new(start_pose: Option<Pose>, targets: Vec<Target>) -> Self {
        Self { start_pose, targets: TargetSet::new(targets), episodes_started: 0 }
    }

    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    pub fn current_target(&self) -> Option<&Target> {
        self.targets.current()
    }

    pub fn start_pose(&self) -> Option<&Pose> {
        self.start_pose.as_ref()
    }

    /// Put the world back at the start of an episode.
    ///
    /// Teleports the body (zero pose when no start is configured), selects
    /// a new target and seeds the distance history with the distance to it.
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        body: &mut dyn RigidBody,
        episode: &mut EpisodeState,
        rng: &mut R,
        feedback: &mut dyn EpisodeFeedback,
    ) {
        let pose = match self.start_pose {
            Some(pose) => pose,
            None => {
                warn!("Start pose is not assigned; using the origin");
                Pose::default()
            }
        };
        body.teleport(&pose);

        self.targets.clear_current();
        self.targets.select_random(rng);

        let distance = match self.targets.current() {
            Some(target) => body.state().distance_to(&target.position),
            None => {
                warn!("No target assigned; initial distance cannot be calculated");
                0.0
            }
        };

        self.episodes_started += 1;
        *episode = EpisodeState {
            index: self.episodes_started,
            initial_distance: distance,
            previous_distance: distance,
            ..EpisodeState::default()
        };

        debug!(
            episode = episode.index,
            target = self.targets.current().map(|t| t.name.as_str()).unwrap_or("none"),
            distance,
            "Episode reset"
        );
        feedback.reset_trail();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::SimpleBody;
    use crate::feedback::Trail;
    use nalgebra::Vector3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn manager(targets: Vec<Target>) -> EpisodeManager {
        EpisodeManager::new(Some(Pose::at(Vector3::new(0.0, 0.0, 65.0))), targets)
    }

    #[test]
    fn reset_seeds_distance_history() {
        let mut mgr = manager(vec![Target::new("a", Vector3::new(30.0, 40.0, 65.0))]);
        let mut body = SimpleBody::new(0.454);
        let mut ep = EpisodeState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        mgr.reset(&mut body, &mut ep, &mut rng, &mut Trail::new(8));

        assert!((ep.initial_distance - 50.0).abs() < 1e-12);
        assert_eq!(ep.previous_distance, ep.initial_distance);
        assert_eq!(mgr.targets().active_count(), 1);
        assert_eq!(ep.index, 1);
    }

    #[test]
    fn reset_zeroes_velocities_and_counters() {
        let mut mgr = manager(vec![Target::new("a", Vector3::new(10.0, 0.0, 65.0))]);
        let mut body = SimpleBody::new(0.454);
        body.add_force(Vector3::new(5.0, 5.0, 5.0));
        body.integrate(0.5);

        let mut ep = EpisodeState { steps: 99, ..EpisodeState::default() };
        ep.reward.add(3.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        mgr.reset(&mut body, &mut ep, &mut rng, &mut Trail::new(8));

        let s = body.state();
        assert_eq!(s.vel, Vector3::zeros());
        assert_eq!(s.omega, Vector3::zeros());
        assert_eq!(s.pos, Vector3::new(0.0, 0.0, 65.0));
        assert_eq!(ep.steps, 0);
        assert_eq!(ep.reward.cumulative(), 0.0);
    }

    #[test]
    fn missing_targets_give_zero_distance() {
        let mut mgr = manager(vec![]);
        let mut body = SimpleBody::new(0.454);
        let mut ep = EpisodeState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        mgr.reset(&mut body, &mut ep, &mut rng, &mut Trail::new(8));

        assert!(mgr.current_target().is_none());
        assert_eq!(ep.initial_distance, 0.0);
        assert_eq!(ep.previous_distance, 0.0);
        assert_eq!(mgr.targets().active_count(), 0);
    }

    #[test]
    fn missing_start_pose_falls_back_to_origin() {
        let mut mgr = EpisodeManager::new(None, vec![Target::new("a", Vector3::new(3.0, 4.0, 0.0))]);
        let mut body = SimpleBody::new(0.454);
        body.teleport(&Pose::at(Vector3::new(9.0, 9.0, 9.0)));
        let mut ep = EpisodeState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        mgr.reset(&mut body, &mut ep, &mut rng, &mut Trail::new(8));

        assert_eq!(body.state().pos, Vector3::zeros());
        assert!((ep.initial_distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn reset_clears_trail() {
        let mut mgr = manager(vec![Target::new("a", Vector3::new(10.0, 0.0, 65.0))]);
        let mut body = SimpleBody::new(0.454);
        let mut trail = Trail::new(8);
        trail.record(&Vector3::zeros());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        mgr.reset(&mut body, &mut EpisodeState::default(), &mut rng, &mut trail);
        assert!(trail.is_empty());
    }

    #[test]
    fn termination_labels() {
        assert_eq!(Termination::OutOfBounds.label(), "out_of_bounds");
        assert_eq!(Termination::Win.label(), "win");
    }
}
