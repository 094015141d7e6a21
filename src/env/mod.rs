use crate::config::ConfigError;
use crate::simulation::LaneIndex;
use std::collections::HashMap;
use thiserror::Error;

pub mod lane_keeping;
pub mod observation;
pub mod spaces;

pub use lane_keeping::*;
pub use observation::*;
pub use spaces::*;

/// Episodic reset/step interface a decision maker drives.
pub trait Environment {
    type Observation;

    fn reset(&mut self) -> Result<Self::Observation, EnvError>;
    fn step(&mut self, action: f64) -> Result<Transition<Self::Observation>, EnvError>;
    fn action_space(&self) -> ActionSpace;
    fn get_name(&self) -> &'static str;
}

/// Outcome of a single policy decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<O> {
    pub observation: O,
    pub reward: f64,
    pub terminal: bool,
    pub info: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Step called before the first reset")]
    EpisodeNotStarted,
    #[error("Vehicle is assigned to unknown lane {0}")]
    UnknownLane(LaneIndex),
}
