//! Vehicle samples and the registry tracking them between cycles

use hashbrown::HashMap;
use log::trace;

use crate::loading::parser::split_lane_ref;
use crate::loading::records::VehicleRecord;
use crate::model::NetworkModel;
use crate::{EdgeIdx, Error, Seconds};

/// Position sample of one vehicle at one timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub vehicle_id: String,
    pub vehicle_type: String,
    pub edge_id: String,
    /// Full lane reference, `<edge id>_<lane index>`
    pub lane_id: String,
    /// Meters along the lane
    pub pos: f64,
    /// m/s
    pub speed: f64,
    pub time: Seconds,
}

impl Entry {
    /// # Errors
    ///
    /// Returns an error if the lane reference cannot be split into an edge id
    pub fn from_record(record: &VehicleRecord, time: Seconds) -> Result<Self, Error> {
        let (edge_id, _) = split_lane_ref(&record.lane)?;
        Ok(Self {
            vehicle_id: record.id.clone(),
            vehicle_type: record.vehicle_type.clone(),
            edge_id: edge_id.to_string(),
            lane_id: record.lane.clone(),
            pos: record.pos,
            speed: record.speed,
            time,
        })
    }
}

/// Every sample sharing one timestamp
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimestepBatch {
    pub time: Seconds,
    pub entries: Vec<Entry>,
}

impl TimestepBatch {
    pub fn new(time: Seconds, entries: Vec<Entry>) -> Self {
        Self { time, entries }
    }
}

/// What a vehicle did between the previous cycle and this one
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Movement {
    Entered { edge: EdgeIdx, distance: f64 },
    Left { edge: EdgeIdx },
    Changed { from: EdgeIdx, to: EdgeIdx, distance: f64 },
    Stayed { edge: EdgeIdx, distance: f64 },
    /// Neither sample lies on the network
    Outside,
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: String,
    pub vehicle_type: String,
    /// Sample the previous cycle ended with
    pub last: Option<Entry>,
    /// Latest sample of the running cycle
    pub newest: Option<Entry>,
}

impl Vehicle {
    fn new(entry: Entry) -> Self {
        Self {
            id: entry.vehicle_id.clone(),
            vehicle_type: entry.vehicle_type.clone(),
            last: None,
            newest: Some(entry),
        }
    }

    /// Classify the vehicle against the network. Distances across an edge
    /// change are approximated from the newest speed; on the same edge the
    /// position delta is exact.
    pub(crate) fn classify(&self, model: &NetworkModel, time_diff: Seconds) -> Movement {
        let last = on_network(model, self.last.as_ref());
        let newest = on_network(model, self.newest.as_ref());

        match (last, newest) {
            (None, None) => Movement::Outside,
            (None, Some((edge, entry))) => Movement::Entered {
                edge,
                distance: entry.speed * time_diff,
            },
            (Some((edge, _)), None) => Movement::Left { edge },
            (Some((from, _)), Some((to, entry))) if from != to => Movement::Changed {
                from,
                to,
                distance: entry.speed * time_diff,
            },
            (Some((edge, previous)), Some((_, entry))) => Movement::Stayed {
                edge,
                distance: entry.pos - previous.pos,
            },
        }
    }

    /// Promote the newest sample; `false` when the vehicle was not seen
    /// during the cycle
    fn advance(&mut self) -> bool {
        match self.newest.take() {
            Some(entry) => {
                self.last = Some(entry);
                true
            }
            None => false,
        }
    }
}

fn on_network<'e>(model: &NetworkModel, entry: Option<&'e Entry>) -> Option<(EdgeIdx, &'e Entry)> {
    let entry = entry?;
    model.edge_idx(&entry.edge_id).map(|edge| (edge, entry))
}

/// Registry of the vehicles seen during the recent cycles
#[derive(Debug, Clone, Default)]
pub struct VehicleTracker {
    vehicles: HashMap<String, Vehicle>,
}

impl VehicleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sample. A vehicle already known keeps its `last` sample,
    /// only `newest` is replaced.
    pub fn read_entry(&mut self, entry: Entry) {
        match self.vehicles.get_mut(&entry.vehicle_id) {
            Some(vehicle) => vehicle.newest = Some(entry),
            None => {
                self.vehicles
                    .insert(entry.vehicle_id.clone(), Vehicle::new(entry));
            }
        }
    }

    /// Apply every vehicle's movement to the edge counters of `model`
    pub(crate) fn update_counters(&self, model: &mut NetworkModel, time_diff: Seconds) {
        for vehicle in self.vehicles.values() {
            let movement = vehicle.classify(model, time_diff);
            trace!("Vehicle {}: {:?}", vehicle.id, movement);

            match movement {
                Movement::Entered { edge, distance } => model.edges[edge].update_entered(distance),
                Movement::Left { edge } => model.edges[edge].update_left(),
                Movement::Changed { from, to, distance } => {
                    model.edges[to].update_entered(distance);
                    model.edges[from].update_left();
                }
                Movement::Stayed { edge, distance } => model.edges[edge].update_moved(distance),
                Movement::Outside => {}
            }
        }
    }

    /// Drop vehicles without a sample this cycle, promote the rest
    pub fn update_vehicles(&mut self) {
        let before = self.vehicles.len();
        self.vehicles.retain(|_, vehicle| vehicle.advance());
        trace!("Evicted {} vehicles", before - self.vehicles.len());
    }

    pub fn get(&self, vehicle_id: &str) -> Option<&Vehicle> {
        self.vehicles.get(vehicle_id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}
