//! Floating car data (FCD) in CSV form, one row per vehicle sample:
//! `time,id,type,lane,pos,speed`. Consecutive rows sharing a timestamp
//! form one [`TimestepBatch`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::records::VehicleRecord;
use crate::analysis::{Entry, TimestepBatch};
use crate::{Error, Seconds};

#[derive(Debug, Deserialize)]
struct FcdRow {
    time: Seconds,
    id: String,
    #[serde(rename = "type", default)]
    vehicle_type: String,
    lane: String,
    pos: f64,
    speed: f64,
}

impl FcdRow {
    fn into_entry(self) -> Result<Entry, Error> {
        let record = VehicleRecord {
            id: self.id,
            vehicle_type: self.vehicle_type,
            lane: self.lane,
            pos: self.pos,
            speed: self.speed,
        };
        Entry::from_record(&record, self.time)
    }
}

/// Pull iterator over timestep batches of an FCD file
///
/// Batches come out in file order; a timestamp lower than the previous one
/// ends the stream with [`Error::OutOfOrder`].
pub struct FcdReader<R: Read> {
    rows: csv::DeserializeRecordsIntoIter<R, FcdRow>,
    pending: Option<FcdRow>,
    last_time: Option<Seconds>,
    failed: bool,
}

impl FcdReader<File> {
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to open FCD file '{}': {}", path.display(), e),
            )
        })?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> FcdReader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            rows: csv::Reader::from_reader(reader).into_deserialize(),
            pending: None,
            last_time: None,
            failed: false,
        }
    }

    fn next_row(&mut self) -> Option<Result<FcdRow, Error>> {
        self.pending
            .take()
            .map(Ok)
            .or_else(|| self.rows.next().map(|row| row.map_err(Error::from)))
    }

    #[allow(clippy::float_cmp)]
    fn read_batch(&mut self) -> Option<Result<TimestepBatch, Error>> {
        let first = match self.next_row()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e)),
        };
        let time = first.time;

        if let Some(previous) = self.last_time {
            if time < previous {
                return Some(Err(Error::OutOfOrder { previous, time }));
            }
        }

        let mut entries = Vec::new();
        let mut row = first;
        loop {
            match row.into_entry() {
                Ok(entry) => entries.push(entry),
                Err(e) => return Some(Err(e)),
            }
            row = match self.rows.next() {
                None => break,
                Some(Err(e)) => return Some(Err(e.into())),
                Some(Ok(next)) if next.time == time => next,
                Some(Ok(next)) => {
                    self.pending = Some(next);
                    break;
                }
            };
        }

        self.last_time = Some(time);
        Some(Ok(TimestepBatch { time, entries }))
    }
}

impl<R: Read> Iterator for FcdReader<R> {
    type Item = Result<TimestepBatch, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let batch = self.read_batch();
        if matches!(batch, Some(Err(_))) {
            self.failed = true;
        }
        batch
    }
}
