//! Golden-value check for the field generator.
//!
//! Any implementation of the generator must reproduce this exact value for
//! seed 42 and query index 0 over the fixed pools below, drawing from a
//! ChaCha12 stream seeded with `seed_from_u64`. A change here means
//! benchmark runs are no longer comparable with earlier results.

use bench_core::{Field, Locality, Poi, QueryFields};
use chrono::{TimeZone, Utc};
use query_generator::{derive_seed, FieldGenerator, GeneratorConfig};
use serde_json::value::RawValue;

fn poi(id: &str) -> Poi {
    Poi {
        id: id.to_string(),
        name: "Golden".to_string(),
        category: "test".to_string(),
        longitude: "13.40".to_string(),
        latitude: "52.52".to_string(),
    }
}

fn locality(id: &str, name: &str) -> Locality {
    Locality {
        id: id.to_string(),
        name: name.to_string(),
        geometry: RawValue::from_string(r#"{"type":"Point","coordinates":[0,0]}"#.to_string())
            .unwrap(),
    }
}

fn golden_generator() -> FieldGenerator {
    FieldGenerator::new(
        42,
        GeneratorConfig::default(),
        vec![poi("poi-0001"), poi("poi-0002")],
        vec![locality("1", "Mitte"), locality("2", "Pankow")],
        vec![
            "trip-a".to_string(),
            "trip-b".to_string(),
            "trip-c".to_string(),
        ],
    )
    .unwrap()
}

#[test]
fn test_golden_derived_seed() {
    assert_eq!(derive_seed(42, 0), 18_325_140_140_735_790_510);
    assert_eq!(derive_seed(42, 1), 936_818_002_525_049_801);
}

#[test]
fn test_golden_fields_seed_42_index_0() {
    let expected = QueryFields {
        start_time: Utc.with_ymd_and_hms(2025, 6, 1, 14, 16, 6).unwrap(),
        end_time: Utc.with_ymd_and_hms(2025, 6, 1, 14, 41, 52).unwrap(),
        timestamp: Utc.with_ymd_and_hms(2025, 2, 2, 9, 3, 45).unwrap(),
        radius: 1475.847917908663,
        limit: 47,
        poi_id: "poi-0001".to_string(),
        district_id: "1".to_string(),
        district_name: "Mitte".to_string(),
        trip_id: "trip-b".to_string(),
    };

    assert_eq!(golden_generator().generate(0), expected);
}

#[test]
fn test_golden_fields_seed_42_index_1() {
    let generator = golden_generator();
    let fields = generator.generate(1);

    assert_eq!(fields.value(Field::StartTime), "2025-08-23T08:52:56Z");
    assert_ne!(fields, generator.generate(0));
    assert_eq!(fields, golden_generator().generate(1));
}
