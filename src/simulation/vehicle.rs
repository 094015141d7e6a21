use super::{LaneIndex, Point, Vec2};
use nalgebra::Vector2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleId(pub usize);

/// Physical state advanced by the bicycle integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    pub position: Point,
    /// Wrapped into (-pi, pi]
    pub heading: f64,
    /// Signed, negative when reversing
    pub speed: f64,
    /// Steering angle currently applied at the front wheels
    pub steering: f64,
}

impl VehicleState {
    pub fn new(position: Point, heading: f64, speed: f64) -> Self {
        Self {
            position,
            heading,
            speed,
            steering: 0.0,
        }
    }

    pub fn direction(&self) -> Vec2 {
        Vector2::new(self.heading.cos(), self.heading.sin())
    }

    pub fn velocity(&self) -> Vec2 {
        self.direction() * self.speed
    }
}

/// Low level input held constant across integrator sub-steps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Command {
    pub acceleration: f64,
    pub steering: f64,
}

/// Kinematic bicycle parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BicycleModel {
    pub wheelbase: f64,
    /// Zero applies steering commands instantly
    pub steering_time_constant: f64,
}

impl Default for BicycleModel {
    fn default() -> Self {
        Self {
            wheelbase: 5.0,
            steering_time_constant: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub state: VehicleState,
    pub model: BicycleModel,
    pub command: Command,
    /// Lane used for reward and termination queries, never for dynamics
    pub lane_index: LaneIndex,
}

impl Vehicle {
    pub fn new(
        id: VehicleId,
        lane_index: LaneIndex,
        state: VehicleState,
        model: BicycleModel,
    ) -> Self {
        Self {
            id,
            state,
            model,
            command: Command::default(),
            lane_index,
        }
    }

    /// Hold `command` until the next call.
    pub fn act(&mut self, command: Command) {
        self.command = command;
    }

    pub fn position(&self) -> Point {
        self.state.position
    }
}
