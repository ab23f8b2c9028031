//! Thin adapters turning topology and trajectory files into the records
//! consumed by the network model and the analyzer.

pub mod fcd;
mod network;
pub mod parser;
pub mod records;

pub use fcd::FcdReader;
pub use network::{load_network_model, read_network_records};
pub use records::{EdgeRecord, JunctionRecord, LaneRecord, NetworkRecords, VehicleRecord};
