use super::{wrap_to_pi, BicycleModel, Command, Point, Road, VehicleState};
use crate::config::TaskConfig;
use nalgebra::Vector2;

/// Fixed-step integrator driving every vehicle on a road.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsEngine {
    dt: f64,
    substeps: u32,
}

impl PhysicsEngine {
    pub fn new(dt: f64, substeps: u32) -> Self {
        Self { dt, substeps }
    }

    pub fn from_config(task: &TaskConfig) -> Self {
        Self::new(task.simulation_dt(), task.substeps())
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn substeps(&self) -> u32 {
        self.substeps
    }

    /// Duration covered by one call to [`PhysicsEngine::simulate`].
    pub fn tick_duration(&self) -> f64 {
        self.dt * self.substeps as f64
    }

    /// Advance every vehicle by a single sub-step, each under its held command.
    pub fn update(&self, road: &mut Road) {
        for vehicle in &mut road.vehicles {
            let update =
                calculate_update(&vehicle.state, &vehicle.command, &vehicle.model, self.dt);
            update.apply(&mut vehicle.state);
        }
    }

    /// Run all sub-steps that make up one policy decision.
    pub fn simulate(&self, road: &mut Road) {
        for _ in 0..self.substeps {
            self.update(road);
        }
    }
}

/// Advance `state` by exactly `dt` with forward Euler on the kinematic
/// bicycle equations.
///
/// Steering is used as given. Callers keep it away from +-pi/2 where
/// `tan` diverges.
pub fn step(state: &mut VehicleState, command: &Command, model: &BicycleModel, dt: f64) {
    calculate_update(state, command, model, dt).apply(state);
}

fn calculate_update(
    state: &VehicleState,
    command: &Command,
    model: &BicycleModel,
    dt: f64,
) -> VehicleUpdate {
    let steering = if model.steering_time_constant > 0.0 {
        let blend = 1.0 - (-dt / model.steering_time_constant).exp();
        state.steering + (command.steering - state.steering) * blend
    } else {
        command.steering
    };

    let speed = state.speed;
    let heading = state.heading;

    let position = state.position + Vector2::new(heading.cos(), heading.sin()) * (speed * dt);
    let yaw_rate = speed * steering.tan() / model.wheelbase;

    VehicleUpdate {
        position,
        heading: wrap_to_pi(heading + yaw_rate * dt),
        speed: speed + command.acceleration * dt,
        steering,
    }
}

#[derive(Debug, Clone)]
struct VehicleUpdate {
    position: Point,
    heading: f64,
    speed: f64,
    steering: f64,
}

impl VehicleUpdate {
    fn apply(self, state: &mut VehicleState) {
        state.position = self.position;
        state.heading = self.heading;
        state.speed = self.speed;
        state.steering = self.steering;
    }
}
