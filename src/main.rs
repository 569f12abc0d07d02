//! Command-line interface for spatial-bench
//!
//! # Usage Examples
//!
//! ```bash
//! # Load POIs and districts into CrateDB
//! spatial-bench seed --db cratedb
//!
//! # Insert benchmark, bulk strategy, 100 workers
//! spatial-bench insert --db cratedb --batch-size 500
//!
//! # Query benchmark against MobilityDB, stop after 10 minutes
//! spatial-bench query --db mobilitydb \
//!   --templates schemas/complex-read-queries.yaml \
//!   --queries-per-worker 1000 --max-duration 10m
//!
//! # Check a template catalog without running it
//! spatial-bench validate --db mobilitydb --templates schemas/simple-read-queries.yaml
//! ```

use clap::{Parser, Subcommand};
use spatial_bench::commands::insert::{run_insert, InsertArgs};
use spatial_bench::commands::query::{run_query, QueryArgs};
use spatial_bench::commands::seed::{run_seed, SeedArgs};
use spatial_bench::commands::validate::{run_validate, ValidateArgs};
use spatial_bench::logging::init_tracing;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Parser)]
#[command(name = "spatial-bench")]
#[command(about = "Load generator comparing CrateDB and MobilityDB on e-scooter trip data")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    log_debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream trip events into the target database
    Insert(InsertArgs),
    /// Run templated spatial queries against the target database
    Query(QueryArgs),
    /// Load the POI and district reference data
    Seed(SeedArgs),
    /// Check that a template catalog renders (and optionally executes)
    Validate(ValidateArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_debug, cli.log_json)?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, finishing in-flight jobs");
                cancel.cancel();
            }
        });
    }

    match cli.command {
        Commands::Insert(args) => run_insert(args, cancel).await,
        Commands::Query(args) => run_query(args, cancel).await,
        Commands::Seed(args) => run_seed(args).await,
        Commands::Validate(args) => run_validate(args).await,
    }
}
