use nalgebra::Vector3;

use crate::config::RewardParameters;
use crate::dynamics::PhysicalState;
use crate::episode::{EpisodeState, Termination};

/// Exponent argument at which the height penalty saturates. Keeps
/// `exp()` finite for any altitude.
pub const MAX_HEIGHT_PENALTY_EXPONENT: f64 = 60.0;

// ---------------------------------------------------------------------------
// Step / cumulative reward bookkeeping
// ---------------------------------------------------------------------------

/// Reward for the current step plus the episode total.
///
/// `add` accumulates into the step; `set` replaces whatever the step has
/// collected so far, and the cumulative total follows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RewardAccumulator {
    step: f64,
    cumulative: f64,
}

impl RewardAccumulator {
    pub fn begin_step(&mut self) {
        self.step = 0.0;
    }

    pub fn add(&mut self, reward: f64) {
        self.step += reward;
        self.cumulative += reward;
    }

    pub fn set(&mut self, reward: f64) {
        self.cumulative += reward - self.step;
        self.step = reward;
    }

    pub fn step_reward(&self) -> f64 {
        self.step
    }

    pub fn cumulative(&self) -> f64 {
        self.cumulative
    }
}

/// Individual shaping terms of one tick, for telemetry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RewardBreakdown {
    pub distance: f64,
    pub time: f64,
    pub orientation: f64,
    pub velocity: f64,
    pub angular_velocity: f64,
    pub alignment: f64,
    pub height: f64,
    /// Absolute reward that replaced the shaping sum, if any.
    pub terminal: Option<f64>,
}

impl RewardBreakdown {
    pub fn shaping_sum(&self) -> f64 {
        self.distance
            + self.time
            + self.orientation
            + self.velocity
            + self.angular_velocity
            + self.alignment
    }
}

/// Outcome of one shaped tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShapedStep {
    pub termination: Option<Termination>,
    pub breakdown: RewardBreakdown,
    pub distance: f64,
}

// ---------------------------------------------------------------------------
// Reward shaper
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RewardShaper {
    pub params: RewardParameters,
}

impl RewardShaper {
    pub fn new(params: RewardParameters) -> Self {
        Self { params }
    }

    /// Shape one tick into `episode.reward` and decide termination.
    ///
    /// Terminal rewards replace the shaping sum of the tick; the height-band
    /// penalty is evaluated afterwards and still adds. `previous_distance`
    /// is updated exactly once, on every path. Without a target nothing is
    /// added and the episode never terminates here.
    pub fn step(
        &self,
        state: &PhysicalState,
        target: Option<&Vector3<f64>>,
        episode: &mut EpisodeState,
    ) -> ShapedStep {
        let Some(target) = target else {
            return ShapedStep::default();
        };
        let p = &self.params;
        let acc = &mut episode.reward;
        let mut b = RewardBreakdown::default();

        let distance = state.distance_to(target);

        // Distance shaping: closing and opening are weighted differently.
        let reduction = episode.previous_distance - distance;
        b.distance = if reduction > 0.0 {
            reduction * p.distance_reward_multiplier
        } else {
            reduction * p.distance_penalty_multiplier
        };
        acc.add(b.distance);

        b.time = p.time_penalty;
        acc.add(b.time);

        b.orientation = state.up().z * p.orientation_reward_scale;
        acc.add(b.orientation);

        b.velocity = state.vel.norm() * p.velocity_damping_penalty_scale;
        acc.add(b.velocity);

        b.angular_velocity = state.omega.norm() * p.angular_velocity_penalty_scale;
        acc.add(b.angular_velocity);

        let to_target = target - state.pos;
        let direction = to_target.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros);
        b.alignment = state.forward().dot(&direction) * p.alignment_reward_multiplier;
        acc.add(b.alignment);

        let termination = if distance < p.target_reached_threshold {
            acc.set(p.reached_target_reward);
            b.terminal = Some(p.reached_target_reward);
            Some(Termination::Win)
        } else if distance > p.max_distance_before_penalty {
            acc.set(p.out_of_bounds_penalty);
            b.terminal = Some(p.out_of_bounds_penalty);
            Some(Termination::OutOfBounds)
        } else {
            None
        };

        b.height = height_penalty(state.altitude(), p);
        acc.add(b.height);

        episode.previous_distance = distance;

        ShapedStep { termination, breakdown: b, distance }
    }

    /// Crash override: replaces the tick's reward, no shaping terms apply.
    pub fn collision(&self, episode: &mut EpisodeState) -> Termination {
        episode.reward.set(self.params.collision_penalty);
        Termination::Crash
    }
}

/// `-scale * exp(exponent * deviation)` outside the desired band, 0 inside.
pub fn height_penalty(altitude: f64, p: &RewardParameters) -> f64 {
    let deviation = if altitude < p.desired_height_min {
        p.desired_height_min - altitude
    } else if altitude > p.desired_height_max {
        altitude - p.desired_height_max
    } else {
        return 0.0;
    };
    let exponent = (p.height_penalty_exponent * deviation).min(MAX_HEIGHT_PENALTY_EXPONENT);
    -p.height_penalty_scale * exponent.exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::Pose;
    use nalgebra::UnitQuaternion;

    /// Only the term under test is non-zero.
    fn isolated() -> RewardParameters {
        RewardParameters {
            distance_reward_multiplier: 0.0,
            distance_penalty_multiplier: 0.0,
            reached_target_reward: 100.0,
            collision_penalty: -10.0,
            time_penalty: 0.0,
            out_of_bounds_penalty: -5.0,
            orientation_reward_scale: 0.0,
            angular_velocity_penalty_scale: 0.0,
            velocity_damping_penalty_scale: 0.0,
            alignment_reward_multiplier: 0.0,
            desired_height_min: -1e9,
            desired_height_max: 1e9,
            height_penalty_scale: 0.0,
            height_penalty_exponent: 0.0,
            target_reached_threshold: 1.0,
            max_distance_before_penalty: 100.0,
        }
    }

    fn state_at(x: f64) -> PhysicalState {
        PhysicalState::at_rest(&Pose::at(Vector3::new(x, 0.0, 65.0)))
    }

    fn episode(previous: f64) -> EpisodeState {
        EpisodeState { previous_distance: previous, initial_distance: previous, ..Default::default() }
    }

    fn target() -> Vector3<f64> {
        Vector3::new(0.0, 0.0, 65.0)
    }

    #[test]
    fn closing_distance_is_rewarded() {
        let shaper = RewardShaper::new(RewardParameters { distance_reward_multiplier: 0.5, ..isolated() });
        let mut ep = episode(10.0);
        let out = shaper.step(&state_at(8.0), Some(&target()), &mut ep);
        assert!((out.breakdown.distance - 1.0).abs() < 1e-12);
        assert!((ep.reward.step_reward() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn opening_distance_is_penalised_steeper() {
        let shaper = RewardShaper::new(RewardParameters { distance_penalty_multiplier: 1.5, ..isolated() });
        let mut ep = episode(10.0);
        let out = shaper.step(&state_at(12.0), Some(&target()), &mut ep);
        assert!((out.breakdown.distance + 3.0).abs() < 1e-12);
    }

    #[test]
    fn previous_distance_updates_once_per_tick() {
        let shaper = RewardShaper::new(RewardParameters { distance_penalty_multiplier: 1.5, ..isolated() });
        let mut ep = episode(10.0);
        shaper.step(&state_at(12.0), Some(&target()), &mut ep);
        assert_eq!(ep.previous_distance, 12.0);

        // Same state again: no movement, no distance penalty the second time.
        ep.reward.begin_step();
        let out = shaper.step(&state_at(12.0), Some(&target()), &mut ep);
        assert_eq!(out.breakdown.distance, 0.0);
        assert_eq!(ep.previous_distance, 12.0);
    }

    #[test]
    fn previous_distance_updates_on_terminal_ticks() {
        let shaper = RewardShaper::new(isolated());
        let mut ep = episode(2.0);
        shaper.step(&state_at(0.5), Some(&target()), &mut ep);
        assert_eq!(ep.previous_distance, 0.5);

        let mut ep = episode(99.0);
        shaper.step(&state_at(150.0), Some(&target()), &mut ep);
        assert_eq!(ep.previous_distance, 150.0);
    }

    #[test]
    fn reaching_target_wins_once() {
        let shaper = RewardShaper::new(RewardParameters::default());
        let mut ep = episode(2.0);
        let state = state_at(0.5);
        let out = shaper.step(&state, Some(&target()), &mut ep);
        assert_eq!(out.termination, Some(Termination::Win));
        assert_eq!(out.breakdown.terminal, Some(100.0));
        // In the height band, so the terminal reward is the whole step.
        assert!((ep.reward.step_reward() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn terminal_tick_overrides_shaping_terms() {
        // Shaping terms are replaced, not summed with the terminal bonus.
        let shaper = RewardShaper::new(RewardParameters {
            distance_reward_multiplier: 10.0,
            time_penalty: -1.0,
            ..isolated()
        });
        let mut ep = episode(5.0);
        let out = shaper.step(&state_at(0.5), Some(&target()), &mut ep);
        assert!(out.breakdown.shaping_sum().abs() > 1.0);
        assert!((ep.reward.step_reward() - 100.0).abs() < 1e-12);
        assert!((ep.reward.cumulative() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn height_penalty_still_applies_after_terminal_override() {
        let shaper = RewardShaper::new(RewardParameters {
            desired_height_min: 80.0,
            desired_height_max: 90.0,
            height_penalty_scale: 1.0,
            height_penalty_exponent: 0.0,
            ..isolated()
        });
        let mut ep = episode(2.0);
        shaper.step(&state_at(0.5), Some(&target()), &mut ep);
        assert!((ep.reward.step_reward() - 99.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_bounds_terminates() {
        let shaper = RewardShaper::new(RewardParameters::default());
        let mut ep = episode(99.0);
        let out = shaper.step(&state_at(101.0), Some(&target()), &mut ep);
        assert_eq!(out.termination, Some(Termination::OutOfBounds));
        assert!((ep.reward.step_reward() + 5.0).abs() < 1e-12);
    }

    #[test]
    fn reached_threshold_is_strict() {
        let shaper = RewardShaper::new(RewardParameters::default());
        let mut ep = episode(2.0);
        let out = shaper.step(&state_at(1.0), Some(&target()), &mut ep);
        assert_eq!(out.distance, 1.0);
        assert_eq!(out.termination, None);
        assert_eq!(out.breakdown.terminal, None);
    }

    #[test]
    fn out_of_bounds_threshold_is_strict() {
        let shaper = RewardShaper::new(RewardParameters::default());
        let mut ep = episode(99.0);
        let out = shaper.step(&state_at(100.0), Some(&target()), &mut ep);
        assert_eq!(out.distance, 100.0);
        assert_eq!(out.termination, None);
        assert_eq!(out.breakdown.terminal, None);
    }

    #[test]
    fn in_range_does_not_terminate() {
        let shaper = RewardShaper::new(RewardParameters::default());
        let mut ep = episode(50.0);
        let out = shaper.step(&state_at(50.0), Some(&target()), &mut ep);
        assert_eq!(out.termination, None);
    }

    #[test]
    fn no_target_contributes_nothing() {
        let shaper = RewardShaper::new(RewardParameters::default());
        let mut ep = episode(10.0);
        let out = shaper.step(&state_at(500.0), None, &mut ep);
        assert_eq!(out.termination, None);
        assert_eq!(ep.reward.step_reward(), 0.0);
        assert_eq!(ep.previous_distance, 10.0);
    }

    #[test]
    fn orientation_tracks_up_axis() {
        let shaper = RewardShaper::new(RewardParameters { orientation_reward_scale: 1.0, ..isolated() });
        let mut level = state_at(50.0);
        let mut ep = episode(50.0);
        assert!((shaper.step(&level, Some(&target()), &mut ep).breakdown.orientation - 1.0).abs() < 1e-12);

        level.quat = UnitQuaternion::from_euler_angles(std::f64::consts::PI, 0.0, 0.0);
        let mut ep = episode(50.0);
        assert!((shaper.step(&level, Some(&target()), &mut ep).breakdown.orientation + 1.0).abs() < 1e-12);
    }

    #[test]
    fn speed_and_spin_are_penalised() {
        let shaper = RewardShaper::new(RewardParameters {
            velocity_damping_penalty_scale: -0.01,
            angular_velocity_penalty_scale: -0.05,
            ..isolated()
        });
        let mut s = state_at(50.0);
        s.vel = Vector3::new(3.0, 4.0, 0.0);
        s.omega = Vector3::new(0.0, 0.0, 2.0);
        let mut ep = episode(50.0);
        let b = shaper.step(&s, Some(&target()), &mut ep).breakdown;
        assert!((b.velocity + 0.05).abs() < 1e-12);
        assert!((b.angular_velocity + 0.1).abs() < 1e-12);
    }

    #[test]
    fn alignment_rewards_facing_target() {
        let shaper = RewardShaper::new(RewardParameters { alignment_reward_multiplier: 0.1, ..isolated() });
        // Drone at +x facing +x: target is behind.
        let mut ep = episode(50.0);
        let b = shaper.step(&state_at(50.0), Some(&target()), &mut ep).breakdown;
        assert!((b.alignment + 0.1).abs() < 1e-12);

        let mut facing = state_at(-50.0);
        facing.quat = UnitQuaternion::identity();
        let mut ep = episode(50.0);
        let b = shaper.step(&facing, Some(&target()), &mut ep).breakdown;
        assert!((b.alignment - 0.1).abs() < 1e-12);
    }

    #[test]
    fn height_penalty_zero_inside_band() {
        let p = RewardParameters::default();
        for h in [60.0, 65.0, 70.0] {
            assert_eq!(height_penalty(h, &p), 0.0);
        }
    }

    #[test]
    fn height_penalty_grows_outside_band() {
        let p = RewardParameters::default();
        let mut prev = 0.0;
        for h in [59.0, 50.0, 30.0, 0.0] {
            let pen = height_penalty(h, &p);
            assert!(pen < prev, "h={h}: {pen} !< {prev}");
            prev = pen;
        }
        let mut prev = 0.0;
        for h in [71.0, 80.0, 120.0] {
            let pen = height_penalty(h, &p);
            assert!(pen < prev);
            prev = pen;
        }
    }

    #[test]
    fn height_penalty_stays_finite() {
        let p = RewardParameters { height_penalty_exponent: 10.0, ..RewardParameters::default() };
        let pen = height_penalty(1e12, &p);
        assert!(pen.is_finite());
        assert!(pen < 0.0);
    }

    #[test]
    fn collision_overrides_step() {
        let shaper = RewardShaper::new(RewardParameters::default());
        let mut ep = episode(10.0);
        ep.reward.add(4.0);
        let t = shaper.collision(&mut ep);
        assert_eq!(t, Termination::Crash);
        assert_eq!(ep.reward.step_reward(), -10.0);
        assert_eq!(ep.reward.cumulative(), -10.0);
    }

    #[test]
    fn accumulator_set_corrects_cumulative() {
        let mut acc = RewardAccumulator::default();
        acc.add(1.0);
        acc.begin_step();
        acc.add(2.0);
        acc.set(5.0);
        assert_eq!(acc.step_reward(), 5.0);
        assert_eq!(acc.cumulative(), 6.0);
    }
}
