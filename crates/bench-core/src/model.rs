//! Dataset and reference pool records.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;

/// One raw movement observation of a trip.
///
/// Fields are kept as the text found in the dataset. They are only ever
/// interpolated into statement text, so parsing them would cost CPU per row
/// for no benefit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripEvent {
    /// Event identifier (UUID).
    pub event_id: String,
    /// Trip identifier (UUID), shared by all events of one trip.
    pub trip_id: String,
    /// ISO 8601 timestamp.
    pub timestamp: String,
    pub latitude: String,
    pub longitude: String,
}

impl TripEvent {
    pub fn new(
        event_id: impl Into<String>,
        trip_id: impl Into<String>,
        timestamp: impl Into<String>,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            trip_id: trip_id.into(),
            timestamp: timestamp.into(),
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }
}

/// Ordered group of trip events handed to one insert worker.
pub type Batch = Vec<TripEvent>;

/// Point of interest from the reference pool.
///
/// Coordinates stay textual so no precision is lost compared to the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poi {
    pub id: String,
    pub name: String,
    pub category: String,
    pub longitude: String,
    pub latitude: String,
}

/// Locality (district) from the reference pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locality {
    pub id: String,
    pub name: String,
    /// GeoJSON geometry fragment, kept verbatim.
    pub geometry: Box<RawValue>,
}

impl Locality {
    /// Length of the raw geometry text, used when logging.
    pub fn geometry_len(&self) -> usize {
        self.geometry.get().len()
    }
}

impl fmt::Display for Locality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Locality(id={}, name={}, len(geometry)={})",
            self.id,
            self.name,
            self.geometry_len()
        )
    }
}
