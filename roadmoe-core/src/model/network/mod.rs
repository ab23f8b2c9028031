//! Road network topology: junctions, edges, lanes and the junction graph

pub mod components;
pub mod graph;
mod network_model;
mod to_geojson;

pub use components::{Edge, EdgeFunction, Junction, Lane};
pub use graph::RoadGraph;
pub use network_model::{Adjacency, NetworkModel, NetworkSummary};
pub use to_geojson::rescale;
