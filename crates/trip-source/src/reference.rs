//! Loaders for the read-only reference pools.

use crate::error::SourceError;
use bench_core::{Locality, Poi};
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

const POI_COLUMNS: usize = 5;

/// Load points of interest from a CSV file.
///
/// Expected columns: `id, name, category, longitude, latitude`, with a header row.
pub fn load_pois<P: AsRef<Path>>(path: P) -> Result<Vec<Poi>, SourceError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|e| SourceError::io(path, e))?;
    let pois = read_pois(std::io::BufReader::new(file))?;
    debug!(path = %path.display(), count = pois.len(), "Loaded POIs");
    Ok(pois)
}

fn read_pois<R: std::io::Read>(reader: R) -> Result<Vec<Poi>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut pois = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() != POI_COLUMNS {
            return Err(SourceError::MalformedRow {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: POI_COLUMNS,
                found: record.len(),
            });
        }
        pois.push(Poi {
            id: record[0].to_string(),
            name: record[1].to_string(),
            category: record[2].to_string(),
            longitude: record[3].to_string(),
            latitude: record[4].to_string(),
        });
    }
    Ok(pois)
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Map<String, Value>,
    geometry: Box<RawValue>,
}

/// Load localities from a GeoJSON `FeatureCollection` file.
///
/// Every feature needs `district_id` and `name` properties; the geometry is
/// kept as raw GeoJSON text.
pub fn load_localities<P: AsRef<Path>>(path: P) -> Result<Vec<Locality>, SourceError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
    let localities = parse_localities(&content)?;
    debug!(path = %path.display(), count = localities.len(), "Loaded localities");
    Ok(localities)
}

/// Parse localities from GeoJSON text.
pub fn parse_localities(geojson: &str) -> Result<Vec<Locality>, SourceError> {
    let collection: FeatureCollection = serde_json::from_str(geojson)?;

    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            Ok(Locality {
                id: string_property(&feature.properties, "district_id", index)?,
                name: string_property(&feature.properties, "name", index)?,
                geometry: feature.geometry,
            })
        })
        .collect()
}

fn string_property(
    properties: &Map<String, Value>,
    property: &'static str,
    feature: usize,
) -> Result<String, SourceError> {
    match properties.get(property) {
        Some(Value::String(s)) => Ok(s.clone()),
        // Some exports write numeric district ids
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(SourceError::MissingProperty { feature, property }),
    }
}
