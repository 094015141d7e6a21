use super::{ActionSpace, EnvError, Environment, KinematicsEncoder, ObservationEncoder, Transition};
use crate::config::{LaneKeepingConfig, Validate};
use crate::simulation::{
    wrap_to_pi, Command, Lane, LaneIndex, PhysicsEngine, Road, RoadNetwork, Vehicle, VehicleId,
    VehicleState,
};
use log::{debug, info, trace};
use std::collections::HashMap;

/// `1 - (lateral / width)^2`: 1.0 on the centerline, unbounded below.
pub fn lane_keeping_reward(lateral: f64, width: f64) -> f64 {
    1.0 - (lateral / width).powi(2)
}

struct Episode {
    road: Road,
    ego: VehicleId,
    physics: PhysicsEngine,
    time: f64,
    steps: u64,
}

enum EpisodeState {
    Idle,
    Running(Episode),
}

/// Steer a bicycle-model vehicle along a sinusoidal lane.
///
/// Each [`step`](Environment::step) scales the normalized action into a
/// steering angle, holds it for `simulation_frequency / policy_frequency`
/// integrator sub-steps and rewards the final lateral offset. Episodes never
/// terminate on their own.
pub struct LaneKeepingEnv<E: ObservationEncoder = KinematicsEncoder> {
    config: LaneKeepingConfig,
    encoder: E,
    state: EpisodeState,
}

impl LaneKeepingEnv<KinematicsEncoder> {
    pub fn new(config: LaneKeepingConfig) -> Self {
        Self::with_encoder(config, KinematicsEncoder)
    }
}

impl Default for LaneKeepingEnv<KinematicsEncoder> {
    fn default() -> Self {
        Self::new(LaneKeepingConfig::default())
    }
}

impl<E: ObservationEncoder> LaneKeepingEnv<E> {
    pub fn with_encoder(config: LaneKeepingConfig, encoder: E) -> Self {
        Self {
            config,
            encoder,
            state: EpisodeState::Idle,
        }
    }

    pub fn config(&self) -> &LaneKeepingConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect at the next reset.
    pub fn configure(&mut self, config: LaneKeepingConfig) {
        self.config = config;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, EpisodeState::Running(_))
    }

    pub fn road(&self) -> Option<&Road> {
        self.episode().map(|episode| &episode.road)
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        let episode = self.episode()?;
        episode.road.get_vehicle(episode.ego)
    }

    pub fn ego_lane(&self) -> Option<&Lane> {
        let episode = self.episode()?;
        episode.road.vehicle_lane(episode.ego)
    }

    /// Simulated seconds since the last reset.
    pub fn time(&self) -> f64 {
        self.episode().map_or(0.0, |episode| episode.time)
    }

    pub fn steps(&self) -> u64 {
        self.episode().map_or(0, |episode| episode.steps)
    }

    pub fn observe(&self) -> Option<E::Observation> {
        let episode = self.episode()?;
        Some(self.encoder.observe(&episode.road, episode.ego))
    }

    fn episode(&self) -> Option<&Episode> {
        match &self.state {
            EpisodeState::Running(episode) => Some(episode),
            EpisodeState::Idle => None,
        }
    }

    fn make_road(&self) -> Road {
        let lane_config = &self.config.road.lane;
        let mut network = RoadNetwork::new();
        network.add_lane(&lane_config.origin, &lane_config.destination, lane_config.build().into());
        Road::new(network)
    }

    fn make_vehicles(&self, road: &mut Road) -> Result<VehicleId, EnvError> {
        let lane_config = &self.config.road.lane;
        let vehicle_config = &self.config.vehicle;

        let lane_index =
            LaneIndex::new(lane_config.origin.as_str(), lane_config.destination.as_str(), 0);
        let lane = road
            .network
            .get_lane(&lane_index)
            .ok_or_else(|| EnvError::UnknownLane(lane_index.clone()))?;

        let state = VehicleState::new(
            lane.position(vehicle_config.initial_longitudinal, vehicle_config.initial_lateral),
            wrap_to_pi(vehicle_config.initial_heading),
            vehicle_config.initial_speed,
        );

        let id = road.next_vehicle_id();
        Ok(road.add_vehicle(Vehicle::new(id, lane_index, state, vehicle_config.model())))
    }

    fn reward(episode: &Episode) -> Result<f64, EnvError> {
        let vehicle = episode
            .road
            .get_vehicle(episode.ego)
            .ok_or(EnvError::EpisodeNotStarted)?;
        let lane = episode
            .road
            .network
            .get_lane(&vehicle.lane_index)
            .ok_or_else(|| EnvError::UnknownLane(vehicle.lane_index.clone()))?;

        let (_, lateral) = lane.local_coordinates(&vehicle.state.position);
        Ok(lane_keeping_reward(lateral, lane.width()))
    }

    fn is_terminal(&self) -> bool {
        // Leaving the lane does not end the episode
        false
    }
}

impl<E: ObservationEncoder> Environment for LaneKeepingEnv<E> {
    type Observation = E::Observation;

    fn reset(&mut self) -> Result<E::Observation, EnvError> {
        self.config.validate()?;

        let mut road = self.make_road();
        let ego = self.make_vehicles(&mut road)?;
        let physics = PhysicsEngine::from_config(&self.config.task);

        info!(
            "Episode reset: {} Hz policy, {} sub-steps of {:.4}s, ego at s={:.1}m",
            self.config.task.policy_frequency,
            physics.substeps(),
            physics.dt(),
            self.config.vehicle.initial_longitudinal
        );

        let observation = self.encoder.observe(&road, ego);
        self.state = EpisodeState::Running(Episode {
            road,
            ego,
            physics,
            time: 0.0,
            steps: 0,
        });

        Ok(observation)
    }

    fn step(&mut self, action: f64) -> Result<Transition<E::Observation>, EnvError> {
        let steering_range = self.config.task.steering_range;
        if !self.action_space().contains(action) {
            trace!("Action {} outside the normalized range is applied as is", action);
        }

        let episode = match &mut self.state {
            EpisodeState::Running(episode) => episode,
            EpisodeState::Idle => return Err(EnvError::EpisodeNotStarted),
        };

        let command = Command {
            acceleration: 0.0,
            steering: action * steering_range,
        };
        let ego = episode
            .road
            .get_vehicle_mut(episode.ego)
            .ok_or(EnvError::EpisodeNotStarted)?;
        ego.act(command);

        episode.physics.simulate(&mut episode.road);
        episode.time += episode.physics.tick_duration();
        episode.steps += 1;

        let reward = Self::reward(episode)?;
        let observation = self.encoder.observe(&episode.road, episode.ego);

        debug!(
            "Step {}: t={:.2}s steering={:.3}rad reward={:.4}",
            episode.steps, episode.time, command.steering, reward
        );

        Ok(Transition {
            observation,
            reward,
            terminal: self.is_terminal(),
            info: HashMap::new(),
        })
    }

    fn action_space(&self) -> ActionSpace {
        ActionSpace::normalized()
    }

    fn get_name(&self) -> &'static str {
        "lane-keeping"
    }
}
