mod common;

use bench_core::{DbTarget, Locality, Poi};
use bench_runner::{dialect_for, seed_reference_data, BenchError};
use common::StubConnector;
use serde_json::value::RawValue;

fn pois() -> Vec<Poi> {
    vec![
        Poi {
            id: "p1".to_string(),
            name: "Café am Neuen See".to_string(),
            category: "cafe".to_string(),
            longitude: "13.3440".to_string(),
            latitude: "52.5100".to_string(),
        },
        Poi {
            id: "p2".to_string(),
            name: "Zum Schusterjungen's".to_string(),
            category: "restaurant".to_string(),
            longitude: "13.4120".to_string(),
            latitude: "52.5400".to_string(),
        },
    ]
}

fn localities() -> Vec<Locality> {
    ["Mitte", "Pankow"]
        .iter()
        .enumerate()
        .map(|(i, name)| Locality {
            id: format!("{:02}", i + 1),
            name: name.to_string(),
            geometry: RawValue::from_string(
                r#"{"type":"Polygon","coordinates":[[[13.3,52.5],[13.4,52.5],[13.4,52.6],[13.3,52.5]]]}"#
                    .to_string(),
            )
            .unwrap(),
        })
        .collect()
}

#[tokio::test]
async fn test_seed_mobilitydb() {
    let connector = StubConnector::new();
    let dialect = dialect_for(DbTarget::MobilityDb);

    let report = seed_reference_data(&connector, dialect.as_ref(), &pois(), &localities())
        .await
        .unwrap();

    assert_eq!(report.pois, 2);
    assert_eq!(report.localities, 2);

    let statements = connector.statements();
    assert_eq!(statements.len(), 4);
    assert!(statements[0].starts_with("INSERT INTO pois"));
    assert!(statements[1].contains("'Zum Schusterjungen''s'"));
    assert!(statements[2].starts_with("INSERT INTO districts"));
    assert!(statements[3].contains("'Pankow'"));
}

#[tokio::test]
async fn test_seed_failure_is_fatal() {
    let connector = StubConnector {
        reject: Some("'p2'".to_string()),
        ..Default::default()
    };
    let dialect = dialect_for(DbTarget::CrateDb);

    let result = seed_reference_data(&connector, dialect.as_ref(), &pois(), &localities()).await;

    match result {
        Err(BenchError::Seed { record, .. }) => assert_eq!(record, "POI p2"),
        other => panic!("Expected seed error, got {other:?}"),
    }
    // Localities are not attempted after a POI failure
    assert_eq!(connector.statements().len(), 2);
}

#[tokio::test]
async fn test_seed_connect_failure() {
    let connector = StubConnector {
        max_connections: Some(0),
        ..Default::default()
    };
    let dialect = dialect_for(DbTarget::CrateDb);

    let result = seed_reference_data(&connector, dialect.as_ref(), &pois(), &localities()).await;
    assert!(matches!(result, Err(BenchError::Db(_))));
}
