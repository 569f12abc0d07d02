//! Per-database SQL rendering.
//!
//! Trip events and reference records are interpolated as literals. The
//! dataset is a controlled fixture, so the only escaping applied is doubling
//! single quotes in text values.

use bench_core::{DbTarget, Locality, Poi, QueryFields, TripEvent};
use query_templates::{QueryTemplate, TemplateError};
use std::fmt::Write;
use std::sync::Arc;

/// Table receiving trip events.
pub const EVENTS_TABLE: &str = "escooter_events";

/// SQL rendering for one benchmark target.
///
/// Selected once at startup with [`dialect_for`] and shared by all workers.
pub trait Dialect: Send + Sync {
    fn target(&self) -> DbTarget;

    /// Single-row insert of one trip event.
    fn render_insert(&self, event: &TripEvent) -> String;

    /// One statement inserting the whole batch through array unnesting.
    fn render_bulk_insert(&self, batch: &[TripEvent]) -> String;

    /// Render a query template. Templates are already dialect specific, so
    /// the default only substitutes fields.
    fn render_query(
        &self,
        template: &QueryTemplate,
        fields: &QueryFields,
    ) -> Result<String, TemplateError> {
        template.render(fields)
    }

    fn render_poi_insert(&self, poi: &Poi) -> String;

    fn render_locality_insert(&self, locality: &Locality) -> String;
}

/// Dialect for `target`.
pub fn dialect_for(target: DbTarget) -> Arc<dyn Dialect> {
    match target {
        DbTarget::CrateDb => Arc::new(CrateDb),
        DbTarget::MobilityDb => Arc::new(MobilityDb),
    }
}

/// Quote `value` as an SQL string literal, doubling embedded single quotes.
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

fn quoted_list<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for (i, value) in values.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&quote_literal(value));
    }
    out
}

fn raw_list<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for (i, value) in values.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(value);
    }
    out
}

/// CrateDB: `geo_point` arrays and `UNNEST` with positional `colN` columns.
///
/// Points are written `[latitude, longitude]`, the layout the benchmark
/// schema and query templates were built around.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrateDb;

impl Dialect for CrateDb {
    fn target(&self) -> DbTarget {
        DbTarget::CrateDb
    }

    fn render_insert(&self, event: &TripEvent) -> String {
        format!(
            "INSERT INTO {EVENTS_TABLE} (event_id, trip_id, timestamp, geo_point) \
             VALUES ({}, {}, {}, [{}, {}])",
            quote_literal(&event.event_id),
            quote_literal(&event.trip_id),
            quote_literal(&event.timestamp),
            event.latitude,
            event.longitude,
        )
    }

    fn render_bulk_insert(&self, batch: &[TripEvent]) -> String {
        let mut sql = format!(
            "INSERT INTO {EVENTS_TABLE} (event_id, trip_id, timestamp, geo_point) \
             SELECT col1, col2, col3, [col4, col5] FROM UNNEST("
        );
        let _ = write!(
            sql,
            "[{}], [{}], [{}], [{}], [{}])",
            quoted_list(batch.iter().map(|e| e.event_id.as_str())),
            quoted_list(batch.iter().map(|e| e.trip_id.as_str())),
            quoted_list(batch.iter().map(|e| e.timestamp.as_str())),
            raw_list(batch.iter().map(|e| e.latitude.as_str())),
            raw_list(batch.iter().map(|e| e.longitude.as_str())),
        );
        sql
    }

    fn render_poi_insert(&self, poi: &Poi) -> String {
        format!(
            "INSERT INTO pois (poi_id, name, category, geo_point) VALUES ({}, {}, {}, [{}, {}])",
            quote_literal(&poi.id),
            quote_literal(&poi.name),
            quote_literal(&poi.category),
            poi.latitude,
            poi.longitude,
        )
    }

    fn render_locality_insert(&self, locality: &Locality) -> String {
        format!(
            "INSERT INTO districts (district_id, name, geo_shape) VALUES ({}, {}, CAST({} AS OBJECT))",
            quote_literal(&locality.id),
            quote_literal(&locality.name),
            quote_literal(locality.geometry.get()),
        )
    }
}

/// MobilityDB: PostGIS geometries and `tgeompoint` temporal points.
#[derive(Debug, Clone, Copy, Default)]
pub struct MobilityDb;

impl Dialect for MobilityDb {
    fn target(&self) -> DbTarget {
        DbTarget::MobilityDb
    }

    fn render_insert(&self, event: &TripEvent) -> String {
        let point = format!(
            "Point({} {})@{}",
            event.longitude, event.latitude, event.timestamp
        );
        format!(
            "INSERT INTO {EVENTS_TABLE} (event_id, trip_id, timestamp, location) \
             VALUES ({}, {}, {}, tgeompoint {})",
            quote_literal(&event.event_id),
            quote_literal(&event.trip_id),
            quote_literal(&event.timestamp),
            quote_literal(&point),
        )
    }

    fn render_bulk_insert(&self, batch: &[TripEvent]) -> String {
        let mut sql = format!(
            "INSERT INTO {EVENTS_TABLE} (event_id, trip_id, timestamp, location) \
             SELECT u.event_id, u.trip_id, u.ts::timestamptz, \
             ('Point(' || u.lon || ' ' || u.lat || ')@' || u.ts)::tgeompoint FROM UNNEST("
        );
        let _ = write!(
            sql,
            "ARRAY[{}]::text[], ARRAY[{}]::text[], ARRAY[{}]::text[], ARRAY[{}]::text[], ARRAY[{}]::text[]) \
             AS u(event_id, trip_id, ts, lat, lon)",
            quoted_list(batch.iter().map(|e| e.event_id.as_str())),
            quoted_list(batch.iter().map(|e| e.trip_id.as_str())),
            quoted_list(batch.iter().map(|e| e.timestamp.as_str())),
            quoted_list(batch.iter().map(|e| e.latitude.as_str())),
            quoted_list(batch.iter().map(|e| e.longitude.as_str())),
        );
        sql
    }

    fn render_poi_insert(&self, poi: &Poi) -> String {
        format!(
            "INSERT INTO pois (poi_id, name, category, geom) \
             VALUES ({}, {}, {}, ST_SetSRID(ST_MakePoint({}, {}), 4326))",
            quote_literal(&poi.id),
            quote_literal(&poi.name),
            quote_literal(&poi.category),
            poi.longitude,
            poi.latitude,
        )
    }

    fn render_locality_insert(&self, locality: &Locality) -> String {
        format!(
            "INSERT INTO districts (district_id, name, geom) VALUES ({}, {}, ST_GeomFromGeoJSON({}))",
            quote_literal(&locality.id),
            quote_literal(&locality.name),
            quote_literal(locality.geometry.get()),
        )
    }
}
