//! Reference data seeding.
//!
//! Loads the POI and locality pools into the target store so query templates
//! have something to join against. Schema creation is not done here.

use crate::connection::Connector;
use crate::dialect::Dialect;
use crate::error::BenchError;
use bench_core::{Locality, Poi};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Rows written by [`seed_reference_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub pois: usize,
    pub localities: usize,
    pub elapsed: Duration,
}

/// Insert every POI and locality over one connection.
///
/// Each pool is sent as one pipelined request. Any failed row aborts seeding.
pub async fn seed_reference_data(
    connector: &dyn Connector,
    dialect: &dyn Dialect,
    pois: &[Poi],
    localities: &[Locality],
) -> Result<SeedReport, BenchError> {
    let start = Instant::now();
    let mut connection = connector.connect().await?;
    info!(target = %dialect.target(), pois = pois.len(), localities = localities.len(), "Seeding reference data");

    let statements: Vec<String> = pois.iter().map(|p| dialect.render_poi_insert(p)).collect();
    let results = connection.execute_pipelined(&statements).await;
    for (poi, result) in pois.iter().zip(results) {
        result.map_err(|source| BenchError::Seed {
            record: format!("POI {}", poi.id),
            source,
        })?;
    }
    info!(count = pois.len(), elapsed = ?start.elapsed(), "Inserted all POIs");

    let statements: Vec<String> = localities
        .iter()
        .map(|l| dialect.render_locality_insert(l))
        .collect();
    let results = connection.execute_pipelined(&statements).await;
    for (locality, result) in localities.iter().zip(results) {
        result.map_err(|source| BenchError::Seed {
            record: locality.to_string(),
            source,
        })?;
        debug!(%locality, "Inserted locality");
    }
    info!(count = localities.len(), elapsed = ?start.elapsed(), "Inserted all localities");

    Ok(SeedReport {
        pois: pois.len(),
        localities: localities.len(),
        elapsed: start.elapsed(),
    })
}
