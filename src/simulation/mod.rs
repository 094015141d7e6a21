use nalgebra::{Point2, Vector2};
use std::f64::consts::PI;
use std::time::{Duration, Instant};

pub mod lane;
pub mod physics;
pub mod road;
pub mod vehicle;

pub use lane::*;
pub use physics::*;
pub use road::*;
pub use vehicle::*;

pub type Vec2 = Vector2<f64>;
pub type Point = Point2<f64>;

/// Wrap an angle into (-pi, pi]. Angles already in range come back unchanged.
pub fn wrap_to_pi(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Reward and wall-clock statistics for the current episode.
#[derive(Debug)]
pub struct EpisodeTracker {
    rewards: Vec<f64>,
    step_times: Vec<Duration>,
    current_step_start: Option<Instant>,
}

impl EpisodeTracker {
    pub fn new() -> Self {
        Self {
            rewards: Vec::new(),
            step_times: Vec::new(),
            current_step_start: None,
        }
    }

    pub fn start_step(&mut self) {
        self.current_step_start = Some(Instant::now());
    }

    pub fn end_step(&mut self, reward: f64) {
        if let Some(start) = self.current_step_start.take() {
            self.step_times.push(start.elapsed());
        }
        self.rewards.push(reward);
    }

    pub fn steps(&self) -> usize {
        self.rewards.len()
    }

    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().sum()
    }

    pub fn mean_reward(&self) -> f64 {
        if self.rewards.is_empty() {
            return 0.0;
        }
        self.total_reward() / self.rewards.len() as f64
    }

    pub fn min_reward(&self) -> Option<f64> {
        self.rewards.iter().copied().reduce(f64::min)
    }

    pub fn average_step_time(&self) -> Duration {
        if self.step_times.is_empty() {
            return Duration::ZERO;
        }

        let total: Duration = self.step_times.iter().sum();
        total / self.step_times.len() as u32
    }

    pub fn steps_per_second(&self) -> f64 {
        let average = self.average_step_time();
        if average.is_zero() {
            return 0.0;
        }
        1.0 / average.as_secs_f64()
    }
}

impl Default for EpisodeTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_in_range_angles_bit_identical() {
        for angle in [0.0, 1.0, -1.0, PI, -PI + 1e-12, 3.0] {
            assert_eq!(wrap_to_pi(angle).to_bits(), angle.to_bits());
        }
    }

    #[test]
    fn wrap_folds_out_of_range_angles() {
        assert_eq!(wrap_to_pi(-PI), PI);
        assert!((wrap_to_pi(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((wrap_to_pi(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert!((wrap_to_pi(20.0) - (20.0 - 6.0 * PI)).abs() < 1e-12);
    }

    #[test]
    fn tracker_summarises_rewards() {
        let mut tracker = EpisodeTracker::new();
        assert_eq!(tracker.min_reward(), None);
        assert_eq!(tracker.mean_reward(), 0.0);

        for reward in [1.0, 0.5, 0.75] {
            tracker.start_step();
            tracker.end_step(reward);
        }

        assert_eq!(tracker.steps(), 3);
        assert_eq!(tracker.total_reward(), 2.25);
        assert_eq!(tracker.mean_reward(), 0.75);
        assert_eq!(tracker.min_reward(), Some(0.5));
    }
}
