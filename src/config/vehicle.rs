use super::{ensure_finite, ConfigError, Validate};
use crate::simulation::BicycleModel;
use serde::{Deserialize, Serialize};

/// Ego vehicle placement and bicycle parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Longitudinal offset along the lane at reset [m]
    pub initial_longitudinal: f64,
    /// Lateral offset from the centerline at reset [m]
    pub initial_lateral: f64,
    /// World-frame heading at reset [rad], independent of the lane tangent
    pub initial_heading: f64,
    /// Speed at reset [m/s]
    pub initial_speed: f64,
    /// Distance between front and rear axles [m]
    pub wheelbase: f64,
    /// First-order steering lag [s], zero applies commands instantly
    pub steering_time_constant: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            initial_longitudinal: 30.0,
            initial_lateral: 0.0,
            initial_heading: 0.0,
            initial_speed: 5.0,
            wheelbase: 5.0,
            steering_time_constant: 0.0,
        }
    }
}

impl VehicleConfig {
    pub fn model(&self) -> BicycleModel {
        BicycleModel {
            wheelbase: self.wheelbase,
            steering_time_constant: self.steering_time_constant,
        }
    }
}

impl Validate for VehicleConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("initial_longitudinal", self.initial_longitudinal)?;
        ensure_finite("initial_lateral", self.initial_lateral)?;
        ensure_finite("initial_heading", self.initial_heading)?;
        ensure_finite("initial_speed", self.initial_speed)?;
        ensure_finite("wheelbase", self.wheelbase)?;
        ensure_finite("steering_time_constant", self.steering_time_constant)?;

        if self.wheelbase <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "wheelbase",
                expected: "positive",
                value: self.wheelbase,
            });
        }

        if self.steering_time_constant < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "steering_time_constant",
                expected: "non-negative",
                value: self.steering_time_constant,
            });
        }

        Ok(())
    }
}
