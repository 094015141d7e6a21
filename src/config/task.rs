use super::{ensure_finite, ConfigError, Validate};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Decision cadence of the lane keeping task.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Rate at which the policy supplies a new action [Hz]
    pub policy_frequency: u32,
    /// Rate at which the integrator advances the vehicles [Hz]
    pub simulation_frequency: u32,
    /// Steering angle produced by a full-scale action [rad]
    pub steering_range: f64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            policy_frequency: 10,
            simulation_frequency: 20,
            steering_range: PI / 3.0,
        }
    }
}

impl TaskConfig {
    /// Integrator sub-steps run for every policy decision.
    pub fn substeps(&self) -> u32 {
        if self.policy_frequency == 0 {
            return 0;
        }
        self.simulation_frequency / self.policy_frequency
    }

    /// Duration of a single integrator sub-step [s].
    pub fn simulation_dt(&self) -> f64 {
        1.0 / self.simulation_frequency as f64
    }
}

impl Validate for TaskConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.policy_frequency == 0
            || self.simulation_frequency == 0
            || self.simulation_frequency % self.policy_frequency != 0
        {
            return Err(ConfigError::FrequencyMismatch {
                simulation: self.simulation_frequency,
                policy: self.policy_frequency,
            });
        }

        ensure_finite("steering_range", self.steering_range)?;
        // tan() blows up at a right angle
        if self.steering_range <= 0.0 || self.steering_range >= FRAC_PI_2 {
            return Err(ConfigError::OutOfRange {
                field: "steering_range",
                expected: "in (0, pi/2)",
                value: self.steering_range,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substeps_follow_frequency_ratio() {
        let config =
            TaskConfig { policy_frequency: 10, simulation_frequency: 50, ..Default::default() };
        assert_eq!(config.substeps(), 5);
        assert_eq!(config.simulation_dt(), 0.02);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_multiple_frequencies() {
        let config =
            TaskConfig { policy_frequency: 10, simulation_frequency: 15, ..Default::default() };
        assert_eq!(
            config.validate(),
            Err(ConfigError::FrequencyMismatch { simulation: 15, policy: 10 })
        );

        let config = TaskConfig { policy_frequency: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = TaskConfig { simulation_frequency: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_singular_steering_range() {
        let config = TaskConfig { steering_range: FRAC_PI_2, ..Default::default() };
        assert!(config.validate().is_err());

        let config = TaskConfig { steering_range: 0.0, ..Default::default() };
        assert!(config.validate().is_err());
    }
}
