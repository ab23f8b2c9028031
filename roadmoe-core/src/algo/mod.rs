//! Topology algorithms run once while the network model is built

mod paths;
mod sections;

pub(crate) use paths::build_path_systems;
pub(crate) use sections::partition_sections;
