//! Traffic performance measures from the Highway Capacity Manual (HCM)
//! for simulated or observed road networks.
//!
//! The crate builds a [`NetworkModel`] out of already parsed topology records,
//! partitions it into sections and enumerates entrance-to-exit paths, then
//! feeds a time ordered stream of vehicle positions through [`MoeAnalyzer`]
//! which emits percent incomplete trips, throughput, total delay, delay per
//! trip and travel time index for every edge, section, path and group.

mod algo;
pub mod analysis;
pub mod config;
mod error;
pub mod loading;
pub mod model;
pub mod prelude;

#[cfg(test)]
pub(crate) mod test_support;

pub use analysis::{
    AnalyzerState, CycleMetrics, Entry, MemorySink, MetricRecord, MetricSink, MoeAnalyzer,
    RunSummary, TimestepBatch,
};
pub use config::{AnalyzerConfig, Config, ModelConfig};
pub use error::Error;
pub use model::{Counters, Moe, NetworkModel, SystemKind};

/// Index of an edge in the network model's edge registry
pub type EdgeIdx = usize;
/// Index of a junction in the network model's junction registry
pub type JunctionIdx = usize;
/// Index of a section produced by the partitioner
pub type SectionIdx = usize;
/// Simulation time, seconds
pub type Seconds = f64;
