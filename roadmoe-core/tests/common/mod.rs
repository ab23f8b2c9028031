#![allow(dead_code)]

use roadmoe_core::loading::{EdgeRecord, JunctionRecord, LaneRecord, NetworkRecords};

pub fn edge(id: &str, from: &str, to: &str, speed: f64, length: f64) -> EdgeRecord {
    EdgeRecord {
        id: id.to_string(),
        function: None,
        edge_type: Some("highway.primary".to_string()),
        from: Some(from.to_string()),
        to: Some(to.to_string()),
        lanes: vec![lane(&format!("{id}_0"), speed, length)],
    }
}

pub fn internal_edge(id: &str, speed: f64, length: f64) -> EdgeRecord {
    EdgeRecord {
        id: id.to_string(),
        function: Some("internal".to_string()),
        edge_type: None,
        from: None,
        to: None,
        lanes: vec![lane(&format!("{id}_0"), speed, length)],
    }
}

pub fn lane(id: &str, speed: f64, length: f64) -> LaneRecord {
    LaneRecord {
        id: id.to_string(),
        index: 0,
        speed,
        length,
        shape: format!("0,0 {length},0"),
    }
}

pub fn junction(id: &str, junction_type: &str, int_lanes: &str) -> JunctionRecord {
    JunctionRecord {
        id: id.to_string(),
        junction_type: junction_type.to_string(),
        int_lanes: int_lanes.to_string(),
    }
}

/// Four arms meeting at junction C: traffic enters from N and S and leaves
/// towards E and W. `:C_0` and `:C_1` are the lane connectors inside C.
pub fn crossing() -> NetworkRecords {
    NetworkRecords {
        edges: vec![
            edge("n_in", "N", "C", 10.0, 100.0),
            edge("s_in", "S", "C", 10.0, 100.0),
            edge("c_e", "C", "E", 10.0, 100.0),
            edge("c_w", "C", "W", 10.0, 100.0),
            internal_edge(":C_0", 8.0, 12.0),
            internal_edge(":C_1", 8.0, 12.0),
        ],
        junctions: vec![
            junction("C", "traffic_light", ":C_0_0 :C_1_0"),
            junction(":C_0_0", "internal", ""),
            junction("N", "dead_end", ""),
            junction("S", "dead_end", ""),
            junction("E", "dead_end", ""),
            junction("W", "dead_end", ""),
        ],
    }
}

/// One vehicle crossing C from north to east, sampled every second
pub const NORTH_EAST_FCD: &str = "time,id,type,lane,pos,speed
0.0,v1,car,n_in_0,0.0,10.0
1.0,v1,car,n_in_0,10.0,10.0
2.0,v1,car,:C_0_0,2.0,8.0
3.0,v1,car,c_e_0,5.0,10.0
4.0,v1,car,c_e_0,15.0,10.0
";

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
