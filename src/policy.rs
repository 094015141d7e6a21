use crate::env::ActionSpace;
use crate::simulation::{wrap_to_pi, Lane, Vehicle};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Chooses the next normalized steering action from the ego state.
pub trait Policy {
    fn act(&mut self, vehicle: &Vehicle, lane: &Lane) -> f64;
    fn get_name(&self) -> &'static str;
}

/// Always steers straight.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePolicy;

impl Policy for IdlePolicy {
    fn act(&mut self, _vehicle: &Vehicle, _lane: &Lane) -> f64 {
        0.0
    }

    fn get_name(&self) -> &'static str {
        "idle"
    }
}

/// Uniform samples from the action space.
pub struct RandomPolicy {
    space: ActionSpace,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(space: ActionSpace, seed: Option<u64>) -> Self {
        let rng = if let Some(seed) = seed {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };

        Self { space, rng }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _vehicle: &Vehicle, _lane: &Lane) -> f64 {
        self.space.sample(&mut self.rng)
    }

    fn get_name(&self) -> &'static str {
        "random"
    }
}

/// Stanley steering: heading error plus a cross-track term measured at the
/// front axle.
#[derive(Debug, Clone, Copy)]
pub struct StanleyPolicy {
    /// Cross-track gain [1/s]
    pub gain: f64,
    /// Steering angle mapped to a full-scale action [rad]
    pub steering_range: f64,
    /// Keeps the cross-track term finite at standstill [m/s]
    pub softening_speed: f64,
}

impl StanleyPolicy {
    pub fn new(steering_range: f64) -> Self {
        Self {
            gain: 0.5,
            steering_range,
            softening_speed: 1.0,
        }
    }

    pub fn steering_angle(&self, vehicle: &Vehicle, lane: &Lane) -> f64 {
        let state = &vehicle.state;
        let front_axle = state.position + state.direction() * vehicle.model.wheelbase;
        let (s, lateral) = lane.local_coordinates(&front_axle);

        let heading_error = wrap_to_pi(lane.heading_at(s) - state.heading);
        let cross_track = (-self.gain * lateral).atan2(state.speed.abs() + self.softening_speed);
        heading_error + cross_track
    }
}

impl Policy for StanleyPolicy {
    fn act(&mut self, vehicle: &Vehicle, lane: &Lane) -> f64 {
        ActionSpace::normalized().clip(self.steering_angle(vehicle, lane) / self.steering_range)
    }

    fn get_name(&self) -> &'static str {
        "stanley"
    }
}
