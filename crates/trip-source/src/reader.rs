//! Streaming reader for the trip event CSV.

use crate::error::SourceError;
use bench_core::TripEvent;
use csv::StringRecord;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Columns of the trip dataset, in file order.
pub const TRIP_COLUMNS: [&str; 5] = ["event_id", "trip_id", "timestamp", "latitude", "longitude"];

/// Reads trip events row by row.
///
/// The header row is skipped. Every data row must have exactly the five
/// columns of [`TRIP_COLUMNS`]; values are not parsed.
pub struct TripEventReader<R: Read> {
    reader: csv::Reader<R>,
    record: StringRecord,
    done: bool,
}

impl<R: Read> TripEventReader<R> {
    pub fn new(reader: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        Self {
            reader,
            record: StringRecord::new(),
            done: false,
        }
    }

    fn read_event(&mut self) -> Result<Option<TripEvent>, SourceError> {
        if !self.reader.read_record(&mut self.record)? {
            return Ok(None);
        }

        if self.record.len() != TRIP_COLUMNS.len() {
            return Err(SourceError::MalformedRow {
                line: self.record.position().map(|p| p.line()).unwrap_or(0),
                expected: TRIP_COLUMNS.len(),
                found: self.record.len(),
            });
        }

        let field = |i: usize| self.record.get(i).unwrap_or_default().to_string();
        Ok(Some(TripEvent {
            event_id: field(0),
            trip_id: field(1),
            timestamp: field(2),
            latitude: field(3),
            longitude: field(4),
        }))
    }
}

impl<R: Read> Iterator for TripEventReader<R> {
    type Item = Result<TripEvent, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Open a trip dataset file.
pub fn open_trip_file<P: AsRef<Path>>(
    path: P,
) -> Result<TripEventReader<BufReader<File>>, SourceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SourceError::io(path, e))?;
    Ok(TripEventReader::new(BufReader::new(file)))
}
