//! Road network components - junctions, edges and lanes

use std::collections::BTreeSet;

use geo::{Centroid, LineString, Point};

use crate::loading::parser::{edge_id_of_lane, parse_shape};
use crate::loading::records::{EdgeRecord, JunctionRecord, LaneRecord};
use crate::model::systems::{Counters, Moe, System, SystemKind};
use crate::{Error, Seconds};

/// Network junction, either an intersection or a plain node
#[derive(Debug, Clone)]
pub struct Junction {
    pub id: String,
    pub junction_type: String,
    /// Ids of the internal edges crossing the junction, sorted
    pub internal_edges: Vec<String>,
}

impl Junction {
    pub(crate) fn from_record(record: &JunctionRecord) -> Self {
        let internal_edges: BTreeSet<&str> = record
            .int_lanes
            .split_whitespace()
            .map(edge_id_of_lane)
            .filter(|id| !id.is_empty())
            .collect();

        Self {
            id: record.id.clone(),
            junction_type: record.junction_type.clone(),
            internal_edges: internal_edges.into_iter().map(str::to_string).collect(),
        }
    }

    /// Pure lane connector artifacts, kept out of the junction registry
    pub(crate) fn is_internal_record(record: &JunctionRecord) -> bool {
        record.junction_type == "internal"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeFunction {
    Normal,
    Internal,
    Other(String),
}

impl EdgeFunction {
    fn from_record(function: Option<&str>) -> Self {
        match function {
            None | Some("normal") => EdgeFunction::Normal,
            Some("internal") => EdgeFunction::Internal,
            Some(other) => EdgeFunction::Other(other.to_string()),
        }
    }
}

/// Single lane of an edge
#[derive(Debug, Clone)]
pub struct Lane {
    pub id: String,
    pub index: u32,
    /// m/s
    pub speed: f64,
    /// meters
    pub length: f64,
    pub shape: LineString<f64>,
}

impl Lane {
    fn from_record(record: &LaneRecord) -> Result<Self, Error> {
        Ok(Self {
            id: record.id.clone(),
            index: record.index,
            speed: record.speed,
            length: record.length,
            shape: parse_shape(&record.shape)?,
        })
    }
}

/// Directed road segment
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: String,
    pub function: EdgeFunction,
    /// Road type such as `highway.primary`, absent for non-normal edges
    pub edge_type: Option<String>,
    pub from_id: Option<String>,
    pub to_id: Option<String>,
    pub lanes: Vec<Lane>,
    /// Free-flow speed, the slowest lane, m/s
    pub flow_speed: f64,
    pub(crate) counters: Counters,
}

impl Edge {
    pub(crate) fn from_record(record: &EdgeRecord) -> Result<Self, Error> {
        let lanes = record
            .lanes
            .iter()
            .map(Lane::from_record)
            .collect::<Result<Vec<_>, _>>()?;

        let flow_speed = lanes
            .iter()
            .map(|lane| lane.speed)
            .min_by(f64::total_cmp)
            .ok_or_else(|| Error::ModelError(format!("Edge {} has no lanes", record.id)))?;

        if !(flow_speed > 0.0) {
            return Err(Error::ModelError(format!(
                "Edge {} has non-positive free-flow speed {flow_speed}",
                record.id
            )));
        }

        let function = EdgeFunction::from_record(record.function.as_deref());
        let (edge_type, from_id, to_id) = if function == EdgeFunction::Normal {
            let from_id = record.from.clone().ok_or_else(|| {
                Error::ModelError(format!("Edge {} has no source junction", record.id))
            })?;
            let to_id = record.to.clone().ok_or_else(|| {
                Error::ModelError(format!("Edge {} has no target junction", record.id))
            })?;
            (record.edge_type.clone(), Some(from_id), Some(to_id))
        } else {
            (None, None, None)
        };

        Ok(Self {
            id: record.id.clone(),
            function,
            edge_type,
            from_id,
            to_id,
            lanes,
            flow_speed,
            counters: Counters::default(),
        })
    }

    pub fn is_normal(&self) -> bool {
        self.function == EdgeFunction::Normal
    }

    /// Length of the first lane, meters
    pub fn length(&self) -> f64 {
        self.lanes.first().map_or(0.0, |lane| lane.length)
    }

    /// Shape of the first lane
    pub fn shape(&self) -> Option<&LineString<f64>> {
        self.lanes.first().map(|lane| &lane.shape)
    }

    pub fn center(&self) -> Option<Point<f64>> {
        self.shape().and_then(Centroid::centroid)
    }

    pub(crate) fn update_entered(&mut self, distance: f64) {
        self.counters.v_current += 1;
        self.counters.v_visited += 1;
        self.counters.total_dist += distance;
    }

    pub(crate) fn update_moved(&mut self, distance: f64) {
        self.counters.total_dist += distance;
    }

    /// A departure without a matching arrival leaves the count at zero
    pub(crate) fn update_left(&mut self) {
        self.counters.v_current = self.counters.v_current.saturating_sub(1);
    }

    /// Floors the cycle distance at `min_speed` per present vehicle, derives
    /// the free-flow time and consumes the cycle distance.
    pub(crate) fn compute_metrics(&mut self, time_diff: Seconds, min_speed: f64) -> Moe {
        let floor = f64::from(self.counters.v_current) * min_speed * time_diff;
        let total_dist = std::mem::take(&mut self.counters.total_dist).max(floor);
        self.counters.total_ideal_time = total_dist / self.flow_speed;
        self.counters.moe(time_diff)
    }
}

impl System for Edge {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SystemKind {
        SystemKind::Edge
    }

    fn counters(&self) -> &Counters {
        &self.counters
    }

    fn reset_counters(&mut self) {
        self.counters.total_dist = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_close, lane_record};

    fn edge_record(speeds: &[f64]) -> EdgeRecord {
        EdgeRecord {
            id: "e".to_string(),
            function: None,
            edge_type: Some("highway.primary".to_string()),
            from: Some("A".to_string()),
            to: Some("B".to_string()),
            lanes: speeds
                .iter()
                .enumerate()
                .map(|(i, &speed)| lane_record(&format!("e_{i}"), speed, 100.0))
                .collect(),
        }
    }

    #[test]
    fn flow_speed_is_slowest_lane() {
        let edge = Edge::from_record(&edge_record(&[13.9, 8.3, 11.0])).unwrap();
        assert_close(edge.flow_speed, 8.3);
        assert_close(edge.length(), 100.0);
        assert_eq!(edge.lanes.len(), 3);
        assert!(edge.is_normal());
    }

    #[test]
    fn center_is_midpoint_of_first_lane() {
        let edge = Edge::from_record(&edge_record(&[10.0, 10.0])).unwrap();
        let center = edge.center().unwrap();
        assert_close(center.x(), 50.0);
        assert_close(center.y(), 0.0);
    }

    #[test]
    fn edge_without_lanes_fails() {
        let err = Edge::from_record(&edge_record(&[])).unwrap_err();
        assert!(matches!(err, Error::ModelError(_)));
    }

    #[test]
    fn stalled_lane_fails() {
        let err = Edge::from_record(&edge_record(&[0.0])).unwrap_err();
        assert!(matches!(err, Error::ModelError(_)));
    }

    #[test]
    fn internal_edge_drops_endpoints() {
        let mut record = edge_record(&[5.0]);
        record.function = Some("internal".to_string());
        let edge = Edge::from_record(&record).unwrap();
        assert_eq!(edge.function, EdgeFunction::Internal);
        assert!(!edge.is_normal());
        assert!(edge.from_id.is_none() && edge.to_id.is_none() && edge.edge_type.is_none());
    }

    #[test]
    fn junction_internal_edges_from_lanes() {
        let junction = Junction::from_record(&JunctionRecord {
            id: "J1".to_string(),
            junction_type: "priority".to_string(),
            int_lanes: ":J1_1_0 :J1_0_0 :J1_0_1".to_string(),
        });
        assert_eq!(junction.internal_edges, vec![":J1_0", ":J1_1"]);
    }

    #[test]
    fn one_vehicle_cycle_metrics() {
        let mut edge = Edge::from_record(&edge_record(&[10.0])).unwrap();
        edge.update_entered(0.0);
        edge.compute_metrics(2.0, 1.0);
        edge.update_moved(15.0);

        let moe = edge.compute_metrics(2.0, 1.0);
        assert_close(edge.counters().total_ideal_time, 1.5);
        assert_close(moe.throughput, 0.5);
        assert_close(moe.total_delay, 0.5);
        assert_close(moe.pit, 1.0);
        assert_close(moe.dpt, 0.5);
        assert_close(moe.tti, 2.0 / 1.5);
        assert_close(edge.counters().total_dist, 0.0);
    }

    #[test]
    fn stalled_traffic_uses_floor_speed() {
        let mut edge = Edge::from_record(&edge_record(&[10.0])).unwrap();
        edge.update_entered(0.5);
        edge.update_entered(0.5);
        let moe = edge.compute_metrics(4.0, 1.0);
        // floor: 2 vehicles * 1 m/s * 4 s = 8 m
        assert_close(edge.counters().total_ideal_time, 0.8);
        assert_close(moe.tti, 8.0 / 0.8);
    }

    #[test]
    fn spurious_departure_keeps_count_non_negative() {
        let mut edge = Edge::from_record(&edge_record(&[10.0])).unwrap();
        edge.update_left();
        assert_eq!(edge.counters().v_current, 0);
    }
}
