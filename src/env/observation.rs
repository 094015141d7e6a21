use crate::simulation::{Road, VehicleId};

/// Turns the road contents into whatever a policy consumes.
pub trait ObservationEncoder {
    type Observation: Clone + std::fmt::Debug + PartialEq;

    fn observe(&self, road: &Road, ego: VehicleId) -> Self::Observation;
}

/// Kinematic features of one vehicle, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleFeatures {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub heading: f64,
    /// Progress along the assigned lane
    pub longitudinal: f64,
    /// Signed offset from the assigned lane centerline
    pub lateral: f64,
}

/// One row per vehicle, ego first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KinematicsObservation {
    pub vehicles: Vec<VehicleFeatures>,
}

impl KinematicsObservation {
    pub fn ego(&self) -> Option<&VehicleFeatures> {
        self.vehicles.first()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KinematicsEncoder;

impl ObservationEncoder for KinematicsEncoder {
    type Observation = KinematicsObservation;

    fn observe(&self, road: &Road, ego: VehicleId) -> KinematicsObservation {
        let ego_first = road
            .get_vehicle(ego)
            .into_iter()
            .chain(road.vehicles.iter().filter(|v| v.id != ego));

        let vehicles = ego_first
            .map(|vehicle| {
                let state = &vehicle.state;
                let velocity = state.velocity();
                let (longitudinal, lateral) = road
                    .network
                    .get_lane(&vehicle.lane_index)
                    .map(|lane| lane.local_coordinates(&state.position))
                    .unwrap_or((f64::NAN, f64::NAN));

                VehicleFeatures {
                    x: state.position.x,
                    y: state.position.y,
                    vx: velocity.x,
                    vy: velocity.y,
                    heading: state.heading,
                    longitudinal,
                    lateral,
                }
            })
            .collect();

        KinematicsObservation { vehicles }
    }
}
