//! Reference data seeding command.

use crate::{DbOpts, ReferenceOpts};
use anyhow::Context;
use bench_runner::{dialect_for, seed_reference_data, PgConnector};
use clap::Parser;
use tracing::info;
use trip_source::{load_localities, load_pois};

#[derive(Parser, Clone, Debug)]
pub struct SeedArgs {
    #[command(flatten)]
    pub db: DbOpts,

    #[command(flatten)]
    pub reference: ReferenceOpts,
}

/// Insert the POI and district pools into the target database.
pub async fn run_seed(args: SeedArgs) -> anyhow::Result<()> {
    let pois = load_pois(&args.reference.pois)
        .with_context(|| format!("Failed to load POIs: {}", args.reference.pois.display()))?;
    let localities = load_localities(&args.reference.districts).with_context(|| {
        format!(
            "Failed to load districts: {}",
            args.reference.districts.display()
        )
    })?;

    let connector = PgConnector::new(args.db.connection_string());
    let dialect = dialect_for(args.db.target());
    let report = seed_reference_data(&connector, dialect.as_ref(), &pois, &localities)
        .await
        .context("Reference data seeding failed")?;

    info!(
        pois = report.pois,
        localities = report.localities,
        elapsed = ?report.elapsed,
        "Reference data seeded"
    );
    Ok(())
}
