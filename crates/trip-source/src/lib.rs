//! Trip dataset and reference pool readers for spatial-bench.
//!
//! - [`TripEventReader`] streams raw trip events from a CSV file
//! - [`BatchSource`] groups the stream into fixed-size insert batches
//! - [`distinct_trip_ids`] collects the trip id sampling pool for query runs
//! - [`load_pois`] / [`load_localities`] load the read-only reference pools
//!
//! Malformed rows are fatal. The dataset is a controlled benchmark fixture,
//! so there is no per-row recovery.

pub mod batch;
mod error;
pub mod reader;
pub mod reference;

pub use batch::{distinct_trip_ids, BatchSource};
pub use error::SourceError;
pub use reader::{open_trip_file, TripEventReader, TRIP_COLUMNS};
pub use reference::{load_localities, load_pois, parse_localities};
