//! Insert benchmark command.

use super::{arm_deadline, create_result_log, finish_result_log};
use crate::{DbOpts, RunOpts, StrategyArg};
use anyhow::Context;
use bench_runner::{dialect_for, Orchestrator, PgConnector};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use trip_source::{open_trip_file, BatchSource};

#[derive(Parser, Clone, Debug)]
pub struct InsertArgs {
    #[command(flatten)]
    pub db: DbOpts,

    #[command(flatten)]
    pub run: RunOpts,

    /// CSV file with trip events (event_id, trip_id, timestamp, latitude, longitude)
    #[arg(
        long,
        default_value = "../dataset-generator/output/escooter-trips-small.csv",
        env = "BENCH_TRIPS"
    )]
    pub trips: PathBuf,

    /// Trip events per insert job
    #[arg(long, default_value = "100", env = "BENCH_BATCH_SIZE")]
    pub batch_size: usize,

    /// How each batch is written
    #[arg(long, value_enum, default_value = "bulk", env = "BENCH_INSERT_STRATEGY")]
    pub insert_strategy: StrategyArg,
}

/// Run the insert benchmark.
pub async fn run_insert(args: InsertArgs, cancel: CancellationToken) -> anyhow::Result<()> {
    let target = args.db.target();
    let events = open_trip_file(&args.trips)
        .with_context(|| format!("Failed to open trips file: {}", args.trips.display()))?;
    let batches = BatchSource::new(events, args.batch_size)?;
    let result_log = create_result_log(&args.run.result_log)?;

    let orchestrator = Orchestrator::new(
        Arc::new(PgConnector::new(args.db.connection_string())),
        dialect_for(target),
        args.run.run_config(args.insert_strategy.into(), false),
    )
    .with_cancellation(cancel.clone());
    arm_deadline(&cancel, args.run.max_duration);

    let (report, result_log) = orchestrator
        .run_inserts(batches, result_log)
        .await
        .context("Insert benchmark failed")?;
    finish_result_log(result_log, &args.run.result_log)?;

    println!("{}", report.format_table());
    Ok(())
}
