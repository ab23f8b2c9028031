// Re-export key components
pub use crate::analysis::{
    AnalyzerState, CsvSink, CycleMetrics, Entry, MemorySink, MetricRecord, MetricSink,
    MoeAnalyzer, RunSummary, TimestepBatch,
};
pub use crate::config::{AnalyzerConfig, Config, ModelConfig};
pub use crate::loading::{FcdReader, NetworkRecords, load_network_model, read_network_records};
pub use crate::model::{
    AggregateSystem, Counters, Edge, Group, Junction, Moe, NetworkModel, NetworkSummary,
    PathSystem, Section, System, SystemKind,
};
pub use crate::model::network::rescale;

// Core index and time types
pub use crate::EdgeIdx;
pub use crate::Error;
pub use crate::JunctionIdx;
pub use crate::SectionIdx;
pub use crate::Seconds;
