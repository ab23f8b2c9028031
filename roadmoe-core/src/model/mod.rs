//! Data model of the analyzed road network
//!
//! Contains the topology registries and the counter carrying systems built on them.

pub mod network;
pub mod systems;

pub use network::{Adjacency, Edge, EdgeFunction, Junction, Lane, NetworkModel, NetworkSummary};
pub use systems::{
    AggregateSystem, Counters, Group, Moe, PathSystem, Section, System, SystemKind,
};
