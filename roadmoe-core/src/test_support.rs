//! Small hand written networks for unit tests

use hashbrown::HashSet;

use crate::loading::records::{EdgeRecord, JunctionRecord, LaneRecord, NetworkRecords};
use crate::{Error, ModelConfig, NetworkModel};

pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(crate) fn lane_record(id: &str, speed: f64, length: f64) -> LaneRecord {
    LaneRecord {
        id: id.to_string(),
        index: 0,
        speed,
        length,
        shape: format!("0,0 {length},0"),
    }
}

/// Builder for network records; junctions referenced by edges but never
/// declared are added as plain `priority` junctions without internal lanes.
#[derive(Default)]
pub(crate) struct Fixture {
    edges: Vec<EdgeRecord>,
    junctions: Vec<JunctionRecord>,
    config: ModelConfig,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    pub(crate) fn junction(mut self, id: &str, int_lanes: &[&str]) -> Self {
        self.junctions.push(JunctionRecord {
            id: id.to_string(),
            junction_type: "priority".to_string(),
            int_lanes: int_lanes.join(" "),
        });
        self
    }

    pub(crate) fn internal_junction(mut self, id: &str) -> Self {
        self.junctions.push(JunctionRecord {
            id: id.to_string(),
            junction_type: "internal".to_string(),
            int_lanes: String::new(),
        });
        self
    }

    pub(crate) fn edge(self, id: &str, from: &str, to: &str) -> Self {
        self.typed_edge(id, from, to, "highway.primary")
    }

    pub(crate) fn typed_edge(mut self, id: &str, from: &str, to: &str, edge_type: &str) -> Self {
        self.edges.push(EdgeRecord {
            id: id.to_string(),
            function: None,
            edge_type: Some(edge_type.to_string()),
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            lanes: vec![lane_record(&format!("{id}_0"), 10.0, 100.0)],
        });
        self
    }

    pub(crate) fn edge_with_speed(
        mut self,
        id: &str,
        from: &str,
        to: &str,
        speed: f64,
        length: f64,
    ) -> Self {
        self = self.edge(id, from, to);
        if let Some(edge) = self.edges.last_mut() {
            edge.lanes = vec![lane_record(&format!("{id}_0"), speed, length)];
        }
        self
    }

    pub(crate) fn edge_with_shape(mut self, id: &str, from: &str, to: &str, shape: &str) -> Self {
        self = self.edge(id, from, to);
        if let Some(edge) = self.edges.last_mut() {
            edge.lanes[0].shape = shape.to_string();
        }
        self
    }

    pub(crate) fn internal_edge(mut self, id: &str) -> Self {
        self.edges.push(EdgeRecord {
            id: id.to_string(),
            function: Some("internal".to_string()),
            edge_type: None,
            from: None,
            to: None,
            lanes: vec![lane_record(&format!("{id}_0"), 5.0, 10.0)],
        });
        self
    }

    pub(crate) fn records(&self) -> NetworkRecords {
        let mut junctions = self.junctions.clone();
        let mut declared: HashSet<String> = junctions.iter().map(|j| j.id.clone()).collect();
        for edge in &self.edges {
            for id in [&edge.from, &edge.to].into_iter().flatten() {
                if declared.insert(id.clone()) {
                    junctions.push(JunctionRecord {
                        id: id.clone(),
                        junction_type: "priority".to_string(),
                        int_lanes: String::new(),
                    });
                }
            }
        }
        NetworkRecords {
            edges: self.edges.clone(),
            junctions,
        }
    }

    pub(crate) fn try_build(&self) -> Result<NetworkModel, Error> {
        NetworkModel::from_records(&self.records(), &self.config)
    }

    pub(crate) fn build(&self) -> NetworkModel {
        self.try_build().unwrap()
    }
}
