use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub mod road;
pub mod task;
pub mod vehicle;

pub use road::*;
pub use task::*;
pub use vehicle::*;

/// Everything needed to rebuild a lane keeping episode from scratch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LaneKeepingConfig {
    pub task: TaskConfig,
    pub road: RoadConfig,
    pub vehicle: VehicleConfig,
}

impl LaneKeepingConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LaneKeepingConfig = toml::from_str(content)?;

        // Validate configurations
        config.validate()?;

        Ok(config)
    }
}

impl Validate for LaneKeepingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.task.validate()?;
        self.road.validate()?;
        self.vehicle.validate()
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Contract violations detected while setting up an episode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(
        "Simulation frequency {simulation} Hz must be a positive integer multiple \
         of policy frequency {policy} Hz"
    )]
    FrequencyMismatch { simulation: u32, policy: u32 },
    #[error("Lane width must be positive, got {0}")]
    NonPositiveWidth(f64),
    #[error("Lane start and end points must differ")]
    DegenerateLane,
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, expected: "finite", value })
    }
}
