//! Query parameter sets and the template field vocabulary.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named parameter that can be substituted into a query template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    StartTime,
    EndTime,
    Timestamp,
    TripID,
    POIID,
    DistrictName,
    DistrictID,
    Radius,
    Limit,
}

impl Field {
    /// Every field of the vocabulary, in declaration order.
    pub const ALL: [Field; 9] = [
        Field::StartTime,
        Field::EndTime,
        Field::Timestamp,
        Field::TripID,
        Field::POIID,
        Field::DistrictName,
        Field::DistrictID,
        Field::Radius,
        Field::Limit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::StartTime => "StartTime",
            Field::EndTime => "EndTime",
            Field::Timestamp => "Timestamp",
            Field::TripID => "TripID",
            Field::POIID => "POIID",
            Field::DistrictName => "DistrictName",
            Field::DistrictID => "DistrictID",
            Field::Radius => "Radius",
            Field::Limit => "Limit",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a name is not part of the field vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "StartTime" => Ok(Field::StartTime),
            "EndTime" => Ok(Field::EndTime),
            "Timestamp" => Ok(Field::Timestamp),
            "TripID" => Ok(Field::TripID),
            "POIID" => Ok(Field::POIID),
            "DistrictName" => Ok(Field::DistrictName),
            // Localities are districts in the Berlin dataset
            "DistrictID" | "LocalityId" => Ok(Field::DistrictID),
            "Radius" => Ok(Field::Radius),
            "Limit" => Ok(Field::Limit),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Fully populated parameter set for one query instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFields {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
    /// Search radius in meters.
    pub radius: f64,
    pub limit: u64,
    pub poi_id: String,
    pub district_id: String,
    pub district_name: String,
    pub trip_id: String,
}

impl QueryFields {
    /// Placeholder values used to check templates before any data is loaded.
    pub fn sample() -> Self {
        let start_time = DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default();
        Self {
            start_time,
            end_time: start_time + chrono::Duration::hours(1),
            timestamp: start_time,
            radius: 100.0,
            limit: 10,
            poi_id: "test-poi-id".to_string(),
            district_id: "test-district-id".to_string(),
            district_name: "TestDistrict".to_string(),
            trip_id: "test-trip-id".to_string(),
        }
    }

    /// Text substituted for `field` in a template.
    ///
    /// Templates quote text fields themselves (`'{{TripID}}'`), so single
    /// quotes inside the value are doubled.
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::StartTime => format_time(&self.start_time),
            Field::EndTime => format_time(&self.end_time),
            Field::Timestamp => format_time(&self.timestamp),
            Field::TripID => escape_text(&self.trip_id),
            Field::POIID => escape_text(&self.poi_id),
            Field::DistrictName => escape_text(&self.district_name),
            Field::DistrictID => escape_text(&self.district_id),
            Field::Radius => self.radius.to_string(),
            Field::Limit => self.limit.to_string(),
        }
    }
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn escape_text(value: &str) -> String {
    value.replace('\'', "''")
}
