//! Bounds for generated query parameters.

use chrono::{DateTime, Utc};

/// 2025-01-01T00:00:00Z
const DEFAULT_MIN_TIME: i64 = 1_735_689_600;
/// 2025-12-31T23:59:59Z
const DEFAULT_MAX_TIME: i64 = 1_767_225_599;

/// Value ranges the [`FieldGenerator`](crate::FieldGenerator) draws from.
///
/// The defaults cover the calendar year of the e-scooter dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Earliest generated time.
    pub min_time: DateTime<Utc>,
    /// Latest generated time (exclusive upper bound for offsets).
    pub max_time: DateTime<Utc>,
    /// Shortest time window in seconds.
    pub min_duration_secs: u64,
    /// Longest time window in seconds (exclusive).
    pub max_duration_secs: u64,
    /// Smallest search radius in meters.
    pub min_radius: f64,
    /// Largest search radius in meters (exclusive).
    pub max_radius: f64,
    /// Largest result limit (inclusive, smallest is 1).
    pub max_limit: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_time: DateTime::from_timestamp(DEFAULT_MIN_TIME, 0).unwrap_or_default(),
            max_time: DateTime::from_timestamp(DEFAULT_MAX_TIME, 0).unwrap_or_default(),
            min_duration_secs: 60,
            max_duration_secs: 3600,
            min_radius: 50.0,
            max_radius: 2000.0,
            max_limit: 100,
        }
    }
}

impl GeneratorConfig {
    /// Seconds between `min_time` and `max_time`, or `None` when the bounds are inverted.
    pub fn time_span_secs(&self) -> Option<u64> {
        let span = self.max_time.timestamp() - self.min_time.timestamp();
        u64::try_from(span).ok()
    }
}
