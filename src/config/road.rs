use super::{ensure_finite, ConfigError, Validate};
use crate::simulation::{LineType, Point, SineLane};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RoadConfig {
    pub lane: SineLaneConfig,
}

/// Generating parameters of the single sinusoidal lane the task is played on.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SineLaneConfig {
    pub origin: String,
    pub destination: String,
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub amplitude: f64,
    /// Angular frequency of the centerline along the lane [rad/m]
    pub pulsation: f64,
    pub phase: f64,
    pub width: f64,
    /// Left and right markings
    pub line_types: [LineType; 2],
}

impl Default for SineLaneConfig {
    fn default() -> Self {
        Self {
            origin: "a".to_string(),
            destination: "b".to_string(),
            start: [0.0, 0.0],
            end: [500.0, 0.0],
            amplitude: 5.0,
            pulsation: 2.0 * PI / 50.0,
            phase: 0.0,
            width: 10.0,
            line_types: [LineType::Striped, LineType::Striped],
        }
    }
}

impl SineLaneConfig {
    pub fn build(&self) -> SineLane {
        SineLane::new(
            Point::new(self.start[0], self.start[1]),
            Point::new(self.end[0], self.end[1]),
            self.amplitude,
            self.pulsation,
            self.phase,
            self.width,
            self.line_types,
        )
    }
}

impl Validate for RoadConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let lane = &self.lane;

        for value in lane.start.iter().chain(lane.end.iter()) {
            ensure_finite("lane endpoint", *value)?;
        }
        if lane.start == lane.end {
            return Err(ConfigError::DegenerateLane);
        }

        ensure_finite("width", lane.width)?;
        if lane.width <= 0.0 {
            return Err(ConfigError::NonPositiveWidth(lane.width));
        }

        ensure_finite("amplitude", lane.amplitude)?;
        ensure_finite("pulsation", lane.pulsation)?;
        ensure_finite("phase", lane.phase)?;
        if lane.amplitude < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "amplitude",
                expected: "non-negative",
                value: lane.amplitude,
            });
        }
        if lane.pulsation < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "pulsation",
                expected: "non-negative",
                value: lane.pulsation,
            });
        }

        Ok(())
    }
}
