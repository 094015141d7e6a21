use super::{Lane, Point, Vehicle, VehicleId};
use std::collections::BTreeMap;
use std::fmt;

/// Identifies a lane as `(origin, destination, index)` in a [`RoadNetwork`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaneIndex {
    pub origin: String,
    pub destination: String,
    pub index: usize,
}

impl LaneIndex {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>, index: usize) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            index,
        }
    }
}

impl fmt::Display for LaneIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} -> {}, {})", self.origin, self.destination, self.index)
    }
}

/// Lanes keyed by the pair of named nodes they connect. Parallel lanes on
/// the same edge are told apart by their index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoadNetwork {
    graph: BTreeMap<String, BTreeMap<String, Vec<Lane>>>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lane to the `origin -> destination` edge and return its index.
    pub fn add_lane(&mut self, origin: &str, destination: &str, lane: Lane) -> LaneIndex {
        let lanes = self
            .graph
            .entry(origin.to_string())
            .or_default()
            .entry(destination.to_string())
            .or_default();
        lanes.push(lane);

        LaneIndex::new(origin, destination, lanes.len() - 1)
    }

    pub fn get_lane(&self, index: &LaneIndex) -> Option<&Lane> {
        self.graph
            .get(&index.origin)?
            .get(&index.destination)?
            .get(index.index)
    }

    pub fn lanes(&self) -> impl Iterator<Item = (LaneIndex, &Lane)> + '_ {
        self.graph.iter().flat_map(|(origin, destinations)| {
            destinations.iter().flat_map(move |(destination, lanes)| {
                lanes
                    .iter()
                    .enumerate()
                    .map(move |(i, lane)| {
                        (LaneIndex::new(origin.as_str(), destination.as_str(), i), lane)
                    })
            })
        })
    }

    pub fn lane_count(&self) -> usize {
        self.lanes().count()
    }

    /// Lane whose [`Lane::distance`] to `point` is smallest.
    pub fn closest_lane_index(&self, point: &Point) -> Option<LaneIndex> {
        self.lanes()
            .map(|(index, lane)| (index, lane.distance(point)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, _)| index)
    }
}

/// The network plus the vehicles driving on it for one episode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Road {
    pub network: RoadNetwork,
    pub vehicles: Vec<Vehicle>,
}

impl Road {
    pub fn new(network: RoadNetwork) -> Self {
        Self {
            network,
            vehicles: Vec::new(),
        }
    }

    pub fn next_vehicle_id(&self) -> VehicleId {
        VehicleId(self.vehicles.len())
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> VehicleId {
        let id = vehicle.id;
        self.vehicles.push(vehicle);
        id
    }

    pub fn get_vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn get_vehicle_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.id == id)
    }

    /// Lane a vehicle is evaluated against.
    pub fn vehicle_lane(&self, id: VehicleId) -> Option<&Lane> {
        let vehicle = self.get_vehicle(id)?;
        self.network.get_lane(&vehicle.lane_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{BicycleModel, LineType, StraightLane, VehicleState};

    fn straight(y: f64) -> Lane {
        let (start, end) = (Point::new(0.0, y), Point::new(100.0, y));
        StraightLane::new(start, end, 4.0, [LineType::Striped; 2]).into()
    }

    #[test]
    fn lookup_is_total_for_inserted_lanes() {
        let mut network = RoadNetwork::new();
        let first = network.add_lane("a", "b", straight(0.0));
        let second = network.add_lane("a", "b", straight(4.0));
        let other = network.add_lane("b", "c", straight(-20.0));

        assert_eq!(first, LaneIndex::new("a", "b", 0));
        assert_eq!(second, LaneIndex::new("a", "b", 1));
        assert_eq!(other, LaneIndex::new("b", "c", 0));

        for index in [&first, &second, &other] {
            assert!(network.get_lane(index).is_some(), "missing {}", index);
        }
        assert_eq!(network.get_lane(&second), Some(&straight(4.0)));
        assert!(network.get_lane(&LaneIndex::new("a", "b", 2)).is_none());
        assert!(network.get_lane(&LaneIndex::new("c", "a", 0)).is_none());
        assert_eq!(network.lane_count(), 3);
    }

    #[test]
    fn closest_lane_uses_lateral_distance() {
        let mut network = RoadNetwork::new();
        network.add_lane("a", "b", straight(0.0));
        network.add_lane("a", "b", straight(4.0));

        let upper = network.closest_lane_index(&Point::new(50.0, 3.1));
        assert_eq!(upper, Some(LaneIndex::new("a", "b", 1)));
        let lower = network.closest_lane_index(&Point::new(50.0, 0.4));
        assert_eq!(lower, Some(LaneIndex::new("a", "b", 0)));
        assert_eq!(RoadNetwork::new().closest_lane_index(&Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn vehicles_resolve_their_lane() {
        let mut network = RoadNetwork::new();
        let lane_index = network.add_lane("a", "b", straight(0.0));
        let mut road = Road::new(network);

        let id = road.next_vehicle_id();
        let state = VehicleState::new(Point::new(10.0, 0.0), 0.0, 5.0);
        road.add_vehicle(Vehicle::new(id, lane_index, state, BicycleModel::default()));

        assert_eq!(road.vehicle_lane(id), Some(&straight(0.0)));
        assert!(road.vehicle_lane(VehicleId(7)).is_none());
        assert_eq!(road.next_vehicle_id(), VehicleId(1));
    }
}
