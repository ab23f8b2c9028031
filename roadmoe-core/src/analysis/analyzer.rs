use log::{debug, info};

use super::sink::{CycleMetrics, MetricSink};
use super::vehicle::{TimestepBatch, VehicleTracker};
use crate::{AnalyzerConfig, Error, NetworkModel, Seconds};

/// Lifecycle of a [`MoeAnalyzer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerState {
    /// No cycle completed yet, so there is no baseline to measure against
    AwaitingFirstCycle,
    Running,
    /// The source is exhausted; further batches are rejected
    Drained,
}

/// Totals of one [`MoeAnalyzer::run`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub batches: usize,
    pub cycles: usize,
    pub records: usize,
    /// Boundary the next cycle would have started from
    pub last_cycle: Seconds,
}

/// Streaming computation of HCM measures.
///
/// Batches must arrive in non-decreasing time order. Whenever a batch lies a
/// full `calculation_rate` past the last cycle boundary, vehicle movements
/// are applied to the edge counters, every system is evaluated and the
/// records are emitted keyed by that boundary, which then advances by one
/// `calculation_rate`.
#[derive(Debug)]
pub struct MoeAnalyzer<'m> {
    model: &'m mut NetworkModel,
    config: AnalyzerConfig,
    tracker: VehicleTracker,
    last_cycle: Seconds,
    last_time: Option<Seconds>,
    state: AnalyzerState,
}

impl<'m> MoeAnalyzer<'m> {
    /// # Errors
    ///
    /// Returns an error if the configuration holds invalid values
    pub fn new(model: &'m mut NetworkModel, config: AnalyzerConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            model,
            last_cycle: config.start_time,
            config,
            tracker: VehicleTracker::new(),
            last_time: None,
            state: AnalyzerState::AwaitingFirstCycle,
        })
    }

    pub fn state(&self) -> AnalyzerState {
        self.state
    }

    pub fn model(&self) -> &NetworkModel {
        self.model
    }

    pub fn tracker(&self) -> &VehicleTracker {
        &self.tracker
    }

    /// Boundary the running cycle is measured from
    pub fn last_cycle(&self) -> Seconds {
        self.last_cycle
    }

    /// Feed one timestep; returns the cycle's records when it completes one
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is older than the previous one or the
    /// analyzer has been drained
    pub fn process_batch(&mut self, batch: TimestepBatch) -> Result<Option<CycleMetrics>, Error> {
        if self.state == AnalyzerState::Drained {
            return Err(Error::InvalidData(format!(
                "Batch at {} arrived after the analyzer was drained",
                batch.time
            )));
        }
        if let Some(previous) = self.last_time {
            if batch.time < previous {
                return Err(Error::OutOfOrder {
                    previous,
                    time: batch.time,
                });
            }
        }
        self.last_time = Some(batch.time);

        for entry in batch.entries {
            self.tracker.read_entry(entry);
        }

        let time_diff = batch.time - self.last_cycle;
        if time_diff < self.config.calculation_rate {
            return Ok(None);
        }
        Ok(Some(self.complete_cycle(time_diff)))
    }

    fn complete_cycle(&mut self, time_diff: Seconds) -> CycleMetrics {
        self.tracker.update_counters(self.model, time_diff);

        let timestamp = self.last_cycle;
        let records = if self.state == AnalyzerState::AwaitingFirstCycle {
            self.state = AnalyzerState::Running;
            self.model.default_metrics(timestamp)
        } else {
            self.model
                .compute_metrics(time_diff, self.config.min_speed, timestamp)
        };

        self.model.reset_counters();
        self.tracker.update_vehicles();
        self.last_cycle += self.config.calculation_rate;

        debug!(
            "Cycle {timestamp}: {} records, {} vehicles tracked",
            records.len(),
            self.tracker.len()
        );
        CycleMetrics { timestamp, records }
    }

    /// Consume `source` to the end, handing every completed cycle to `sink`
    ///
    /// # Errors
    ///
    /// Returns the first error of the source, of a batch or of the sink
    pub fn run<I, S>(&mut self, source: I, sink: &mut S) -> Result<RunSummary, Error>
    where
        I: IntoIterator<Item = Result<TimestepBatch, Error>>,
        S: MetricSink + ?Sized,
    {
        info!(
            "Analyzing {} systems every {} s",
            self.model.system_count(),
            self.config.calculation_rate
        );
        let mut summary = RunSummary::default();

        for batch in source {
            summary.batches += 1;
            if let Some(metrics) = self.process_batch(batch?)? {
                summary.cycles += 1;
                summary.records += metrics.records.len();
                sink.store(&metrics)?;
            }
        }

        self.finish();
        summary.last_cycle = self.last_cycle;
        info!(
            "Analysis finished: {} batches, {} cycles, {} records",
            summary.batches, summary.cycles, summary.records
        );
        Ok(summary)
    }

    /// Mark the source as exhausted
    pub fn finish(&mut self) {
        self.state = AnalyzerState::Drained;
    }
}
