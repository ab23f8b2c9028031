//! Metric records and the collaborators receiving them

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::model::{Moe, System, SystemKind};
use crate::{Error, Seconds};

/// Measures of one system for one cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    /// Cycle boundary the measures belong to
    pub timestamp: Seconds,
    pub kind: SystemKind,
    pub system_id: String,
    pub moe: Moe,
}

impl MetricRecord {
    pub fn new<S: System + ?Sized>(timestamp: Seconds, system: &S, moe: Moe) -> Self {
        Self {
            timestamp,
            kind: system.kind(),
            system_id: system.id().to_string(),
            moe,
        }
    }
}

/// Every record emitted at one cycle boundary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleMetrics {
    pub timestamp: Seconds,
    pub records: Vec<MetricRecord>,
}

impl CycleMetrics {
    pub fn of_kind(&self, kind: SystemKind) -> impl Iterator<Item = &MetricRecord> + '_ {
        self.records.iter().filter(move |record| record.kind == kind)
    }

    pub fn get(&self, kind: SystemKind, system_id: &str) -> Option<&MetricRecord> {
        self.records
            .iter()
            .find(|record| record.kind == kind && record.system_id == system_id)
    }
}

/// Destination of the cycle metrics, e.g. a database or a file
pub trait MetricSink {
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be stored
    fn store(&mut self, metrics: &CycleMetrics) -> Result<(), Error>;
}

/// Keeps every cycle in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub cycles: Vec<CycleMetrics>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of one system across all stored cycles
    pub fn history<'a>(
        &'a self,
        kind: SystemKind,
        system_id: &'a str,
    ) -> impl Iterator<Item = &'a MetricRecord> + 'a {
        self.cycles
            .iter()
            .filter_map(move |cycle| cycle.get(kind, system_id))
    }
}

impl MetricSink for MemorySink {
    fn store(&mut self, metrics: &CycleMetrics) -> Result<(), Error> {
        self.cycles.push(metrics.clone());
        Ok(())
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    timestamp: Seconds,
    kind: SystemKind,
    system_id: &'a str,
    pit: f64,
    throughput: f64,
    total_delay: f64,
    dpt: f64,
    tti: f64,
}

impl<'a> From<&'a MetricRecord> for CsvRow<'a> {
    fn from(record: &'a MetricRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            kind: record.kind,
            system_id: &record.system_id,
            pit: record.moe.pit,
            throughput: record.moe.throughput,
            total_delay: record.moe.total_delay,
            dpt: record.moe.dpt,
            tti: record.moe.tti,
        }
    }
}

/// Writes one CSV row per record:
/// `timestamp,kind,system_id,pit,throughput,total_delay,dpt,tti`
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    /// # Errors
    ///
    /// Returns an error if the file cannot be created
    pub fn create(path: &Path) -> Result<Self, Error> {
        let file = File::create(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to create metrics file '{}': {}", path.display(), e),
            )
        })?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    /// # Errors
    ///
    /// Returns an error if buffered rows cannot be flushed
    pub fn into_inner(self) -> Result<W, Error> {
        self.writer
            .into_inner()
            .map_err(|e| Error::IoError(e.into_error()))
    }
}

impl<W: Write> MetricSink for CsvSink<W> {
    fn store(&mut self, metrics: &CycleMetrics) -> Result<(), Error> {
        for record in &metrics.records {
            self.writer.serialize(CsvRow::from(record))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
