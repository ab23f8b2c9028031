use serde::{Deserialize, Serialize};

/// Edge as it appears in a network description
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EdgeRecord {
    pub id: String,
    /// `normal` when absent; `internal` for lane connectors inside junctions
    pub function: Option<String>,
    #[serde(rename = "type")]
    pub edge_type: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub lanes: Vec<LaneRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LaneRecord {
    pub id: String,
    pub index: u32,
    /// m/s
    pub speed: f64,
    /// meters
    pub length: f64,
    /// Space separated `x,y` pairs
    pub shape: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct JunctionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub junction_type: String,
    /// Space separated ids of the lanes inside the junction
    #[serde(rename = "intLanes")]
    pub int_lanes: String,
}

/// Complete topology of a network
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkRecords {
    pub edges: Vec<EdgeRecord>,
    pub junctions: Vec<JunctionRecord>,
}

/// One vehicle position sample inside a timestep
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct VehicleRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    /// `<edge id>_<lane index>`
    pub lane: String,
    /// meters along the lane
    pub pos: f64,
    /// m/s
    pub speed: f64,
}
