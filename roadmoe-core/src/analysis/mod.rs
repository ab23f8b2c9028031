//! Streaming analysis of vehicle positions against a [`crate::NetworkModel`]

mod analyzer;
mod sink;
mod vehicle;

pub use analyzer::{AnalyzerState, MoeAnalyzer, RunSummary};
pub use sink::{CsvSink, CycleMetrics, MemorySink, MetricRecord, MetricSink};
pub use vehicle::{Entry, TimestepBatch, Vehicle, VehicleTracker};
