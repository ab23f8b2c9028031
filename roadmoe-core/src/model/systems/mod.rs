//! Counter and metric contract shared by edges, sections, paths and groups

mod aggregate;
mod metrics;

use std::fmt;

use serde::Serialize;

pub use aggregate::{AggregateSystem, Group, PathSystem, Section};
pub use metrics::{Counters, Moe};

/// Kind of system a metric record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
    Edge,
    Section,
    Path,
    Group,
}

impl SystemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SystemKind::Edge => "edge",
            SystemKind::Section => "section",
            SystemKind::Path => "path",
            SystemKind::Group => "group",
        }
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that keeps vehicle counters and reports HCM measures
pub trait System {
    fn id(&self) -> &str;
    fn kind(&self) -> SystemKind;
    fn counters(&self) -> &Counters;
    /// Clear cycle scoped accumulation; vehicles present stay counted
    fn reset_counters(&mut self);
}
