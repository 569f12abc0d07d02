//! Seeded query field generation.

use crate::config::GeneratorConfig;
use bench_core::{Locality, Poi, QueryFields};
use chrono::Duration;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Error type for generator construction.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A reference pool has nothing to pick from
    #[error("Reference pool '{0}' is empty")]
    EmptyPool(&'static str),

    /// Time bounds cannot fit the longest time window
    #[error("Time bounds span {span_secs}s, which leaves no room for windows of up to {max_duration_secs}s")]
    TimeBoundsTooNarrow { span_secs: i64, max_duration_secs: u64 },

    /// Duration bounds are empty or inverted
    #[error("Invalid duration bounds: [{min}s, {max}s)")]
    InvalidDuration { min: u64, max: u64 },

    /// Radius bounds are empty or inverted
    #[error("Invalid radius bounds: [{min}, {max})")]
    InvalidRadius { min: f64, max: f64 },

    /// Limit upper bound below 1
    #[error("Invalid limit bound: {0}")]
    InvalidLimit(u64),
}

/// Derive the RNG seed for one query index.
///
/// The base seed and index are hashed together (little-endian, in that order)
/// and the first eight digest bytes are read as a little-endian `u64`.
pub fn derive_seed(base_seed: u64, query_index: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base_seed.to_le_bytes());
    hasher.update(query_index.to_le_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Generator that produces deterministic query parameters.
///
/// Reference pools are held behind `Arc` so the generator can be cloned into
/// the feeding task without copying the pools.
#[derive(Debug, Clone)]
pub struct FieldGenerator {
    base_seed: u64,
    config: GeneratorConfig,
    /// Seconds between the configured time bounds
    span_secs: u64,
    pois: Arc<[Poi]>,
    localities: Arc<[Locality]>,
    trip_ids: Arc<[String]>,
}

impl FieldGenerator {
    /// Create a generator, validating the bounds and pools up front.
    pub fn new(
        base_seed: u64,
        config: GeneratorConfig,
        pois: impl Into<Arc<[Poi]>>,
        localities: impl Into<Arc<[Locality]>>,
        trip_ids: impl Into<Arc<[String]>>,
    ) -> Result<Self, GeneratorError> {
        let pois = pois.into();
        let localities = localities.into();
        let trip_ids = trip_ids.into();

        if pois.is_empty() {
            return Err(GeneratorError::EmptyPool("pois"));
        }
        if localities.is_empty() {
            return Err(GeneratorError::EmptyPool("localities"));
        }
        if trip_ids.is_empty() {
            return Err(GeneratorError::EmptyPool("trip_ids"));
        }

        if config.min_duration_secs >= config.max_duration_secs {
            return Err(GeneratorError::InvalidDuration {
                min: config.min_duration_secs,
                max: config.max_duration_secs,
            });
        }
        if config.min_radius.is_nan() || config.max_radius.is_nan() || config.min_radius >= config.max_radius {
            return Err(GeneratorError::InvalidRadius {
                min: config.min_radius,
                max: config.max_radius,
            });
        }
        if config.max_limit == 0 {
            return Err(GeneratorError::InvalidLimit(config.max_limit));
        }

        let span_secs = match config.time_span_secs() {
            Some(span) if span > config.max_duration_secs => span,
            _ => {
                return Err(GeneratorError::TimeBoundsTooNarrow {
                    span_secs: config.max_time.timestamp() - config.min_time.timestamp(),
                    max_duration_secs: config.max_duration_secs,
                })
            }
        };

        Ok(Self {
            base_seed,
            config,
            span_secs,
            pois,
            localities,
            trip_ids,
        })
    }

    /// Generate all query fields for a specific query index.
    ///
    /// The draw order and the ChaCha12 stream are part of the output
    /// contract: changing either changes every generated value for a seed.
    pub fn generate(&self, query_index: u64) -> QueryFields {
        let mut rng = ChaCha12Rng::seed_from_u64(derive_seed(self.base_seed, query_index));
        let config = &self.config;

        // Leave room after the start for the longest window
        let start_offset = rng.gen_range(0..self.span_secs - config.max_duration_secs);
        let start_time = config.min_time + seconds(start_offset);

        let duration = rng.gen_range(config.min_duration_secs..config.max_duration_secs);
        let end_time = start_time + seconds(duration);

        let timestamp_offset = rng.gen_range(0..self.span_secs);
        let timestamp = config.min_time + seconds(timestamp_offset);

        let radius =
            config.min_radius + rng.gen::<f64>() * (config.max_radius - config.min_radius);

        let limit = rng.gen_range(1..=config.max_limit);

        let poi = &self.pois[rng.gen_range(0..self.pois.len())];
        let locality = &self.localities[rng.gen_range(0..self.localities.len())];
        let trip_id = &self.trip_ids[rng.gen_range(0..self.trip_ids.len())];

        QueryFields {
            start_time,
            end_time,
            timestamp,
            radius,
            limit,
            poi_id: poi.id.clone(),
            district_id: locality.id.clone(),
            district_name: locality.name.clone(),
            trip_id: trip_id.clone(),
        }
    }

    /// Get the base seed.
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Get the configured bounds.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

fn seconds(secs: u64) -> Duration {
    // Offsets are bounded by the configured span, which fits in an i64
    Duration::seconds(secs as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use serde_json::value::RawValue;
    use std::collections::HashSet;

    fn pois() -> Vec<Poi> {
        ["poi-0001", "poi-0002"]
            .iter()
            .map(|id| Poi {
                id: id.to_string(),
                name: format!("Name of {id}"),
                category: "cafe".to_string(),
                longitude: "13.4".to_string(),
                latitude: "52.5".to_string(),
            })
            .collect()
    }

    fn localities() -> Vec<Locality> {
        [("1", "Mitte"), ("2", "Pankow")]
            .iter()
            .map(|(id, name)| Locality {
                id: id.to_string(),
                name: name.to_string(),
                geometry: RawValue::from_string("{}".to_string()).unwrap(),
            })
            .collect()
    }

    fn trips() -> Vec<String> {
        vec!["trip-a".to_string(), "trip-b".to_string(), "trip-c".to_string()]
    }

    fn generator(seed: u64) -> FieldGenerator {
        FieldGenerator::new(seed, GeneratorConfig::default(), pois(), localities(), trips())
            .unwrap()
    }

    #[test]
    fn test_deterministic_generation() {
        let gen1 = generator(42);
        let gen2 = generator(42);

        for index in [0, 1, 17, 1_000_000] {
            assert_eq!(gen1.generate(index), gen2.generate(index));
            assert_eq!(gen1.generate(index), gen1.generate(index));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        assert_ne!(generator(42).generate(0), generator(43).generate(0));
    }

    #[test]
    fn test_derived_seeds_are_distinct() {
        let seeds: HashSet<u64> = (0..10_000).map(|i| derive_seed(42, i)).collect();
        assert_eq!(seeds.len(), 10_000);
    }

    #[test]
    fn test_derive_seed_is_order_sensitive() {
        assert_ne!(derive_seed(1, 2), derive_seed(2, 1));
    }

    #[test]
    fn test_time_window_within_bounds() {
        let generator = generator(7);
        let config = GeneratorConfig::default();

        for index in 0..2_000 {
            let fields = generator.generate(index);
            let window = (fields.end_time - fields.start_time).num_seconds();

            assert!(fields.start_time < fields.end_time);
            assert!(window >= config.min_duration_secs as i64);
            assert!(window < config.max_duration_secs as i64);
            assert!(fields.start_time >= config.min_time);
            assert!(fields.end_time <= config.max_time);
            assert!(fields.timestamp >= config.min_time && fields.timestamp < config.max_time);
            assert!(fields.radius >= 50.0 && fields.radius < 2000.0);
            assert!((1..=100).contains(&fields.limit));
        }
    }

    #[test]
    fn test_picks_cover_pools() {
        let generator = generator(42);
        let mut pois = HashSet::new();
        let mut districts = HashSet::new();
        let mut trips = HashSet::new();

        for index in 0..200 {
            let fields = generator.generate(index);
            pois.insert(fields.poi_id);
            districts.insert((fields.district_id, fields.district_name));
            trips.insert(fields.trip_id);
        }

        assert_eq!(pois.len(), 2);
        assert_eq!(districts.len(), 2);
        assert_eq!(trips.len(), 3);
    }

    #[test]
    fn test_empty_pool_rejected() {
        let result = FieldGenerator::new(
            42,
            GeneratorConfig::default(),
            Vec::<Poi>::new(),
            localities(),
            trips(),
        );
        assert!(matches!(result, Err(GeneratorError::EmptyPool("pois"))));
    }

    #[test]
    fn test_narrow_time_bounds_rejected() {
        let min_time = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let config = GeneratorConfig {
            min_time,
            max_time: min_time + Duration::seconds(3600),
            ..GeneratorConfig::default()
        };

        let result = FieldGenerator::new(42, config, pois(), localities(), trips());
        assert!(matches!(
            result,
            Err(GeneratorError::TimeBoundsTooNarrow {
                span_secs: 3600,
                max_duration_secs: 3600
            })
        ));
    }

    #[test]
    fn test_smallest_valid_time_bounds() {
        let min_time = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let config = GeneratorConfig {
            min_time,
            max_time: min_time + Duration::seconds(3601),
            ..GeneratorConfig::default()
        };

        let generator = FieldGenerator::new(42, config, pois(), localities(), trips()).unwrap();
        let fields = generator.generate(3);
        assert_eq!(fields.start_time, min_time);
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let config = GeneratorConfig {
            min_duration_secs: 60,
            max_duration_secs: 60,
            ..GeneratorConfig::default()
        };

        let result = FieldGenerator::new(42, config, pois(), localities(), trips());
        assert!(matches!(
            result,
            Err(GeneratorError::InvalidDuration { min: 60, max: 60 })
        ));
    }
}
