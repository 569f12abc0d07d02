//! Query benchmark command.

use super::{arm_deadline, create_result_log, finish_result_log};
use crate::{DbOpts, ReferenceOpts, RunOpts};
use anyhow::Context;
use bench_runner::{dialect_for, InsertStrategy, Orchestrator, PgConnector};
use clap::Parser;
use query_generator::{FieldGenerator, GeneratorConfig};
use query_templates::TemplateCatalog;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use trip_source::{distinct_trip_ids, load_localities, load_pois, open_trip_file};

#[derive(Parser, Clone, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub db: DbOpts,

    #[command(flatten)]
    pub run: RunOpts,

    #[command(flatten)]
    pub reference: ReferenceOpts,

    /// CSV file with trip events, used for the trip id pool
    #[arg(
        long,
        default_value = "../dataset-generator/output/escooter-trips-small.csv",
        env = "BENCH_TRIPS"
    )]
    pub trips: PathBuf,

    /// YAML query template catalog (simple or complex workload)
    #[arg(long, env = "BENCH_TEMPLATES")]
    pub templates: PathBuf,

    /// Queries executed per worker
    #[arg(long, default_value = "100", env = "BENCH_QUERIES_PER_WORKER")]
    pub queries_per_worker: u64,

    /// Base seed for query parameter generation
    #[arg(long, default_value = "42", env = "BENCH_SEED")]
    pub seed: u64,

    /// Execute every template once against the database before the run
    #[arg(long)]
    pub validate_live: bool,
}

/// Run the query benchmark.
pub async fn run_query(args: QueryArgs, cancel: CancellationToken) -> anyhow::Result<()> {
    let target = args.db.target();

    let pois = load_pois(&args.reference.pois)
        .with_context(|| format!("Failed to load POIs: {}", args.reference.pois.display()))?;
    let localities = load_localities(&args.reference.districts).with_context(|| {
        format!(
            "Failed to load districts: {}",
            args.reference.districts.display()
        )
    })?;
    let events = open_trip_file(&args.trips)
        .with_context(|| format!("Failed to open trips file: {}", args.trips.display()))?;
    let trip_ids = distinct_trip_ids(events).context("Failed to read trip ids")?;
    info!(
        pois = pois.len(),
        localities = localities.len(),
        trips = trip_ids.len(),
        "Loaded reference pools"
    );

    let catalog = TemplateCatalog::from_file(&args.templates, target).with_context(|| {
        format!("Failed to load templates: {}", args.templates.display())
    })?;
    info!(count = catalog.len(), "Loaded query templates");

    let generator = FieldGenerator::new(
        args.seed,
        GeneratorConfig::default(),
        pois,
        localities,
        trip_ids,
    )?;
    let total_queries = args.run.workers as u64 * args.queries_per_worker;
    let result_log = create_result_log(&args.run.result_log)?;

    let orchestrator = Orchestrator::new(
        Arc::new(PgConnector::new(args.db.connection_string())),
        dialect_for(target),
        args.run.run_config(InsertStrategy::default(), args.validate_live),
    )
    .with_cancellation(cancel.clone());
    arm_deadline(&cancel, args.run.max_duration);

    let (report, result_log) = orchestrator
        .run_queries(
            Arc::new(generator),
            Arc::new(catalog),
            total_queries,
            result_log,
        )
        .await
        .context("Query benchmark failed")?;
    finish_result_log(result_log, &args.run.result_log)?;

    println!("{}", report.format_table());
    Ok(())
}
