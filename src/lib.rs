//! spatial-bench library
//!
//! Command-line options and command handlers for the spatial-bench load
//! generator. The benchmark engine itself lives in the workspace crates:
//!
//! - `bench_core` - shared data model
//! - `query_generator` - deterministic query parameters
//! - `query_templates` - YAML template catalogs
//! - `trip_source` - dataset and reference pool readers
//! - `bench_runner` - workers, collector and orchestrator
//!
//! # CLI Usage
//!
//! ```bash
//! # Seed POIs and districts
//! spatial-bench seed --db cratedb
//!
//! # Insert benchmark with 50 workers and pipelined inserts
//! spatial-bench insert --db mobilitydb --workers 50 --insert-strategy pipelined
//!
//! # Query benchmark
//! spatial-bench query --db cratedb --templates schemas/simple-read-queries.yaml
//! ```

use bench_core::DbTarget;
use bench_runner::{default_queue_capacity, ConnectPolicy, InsertStrategy, RunConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

pub mod commands;
pub mod config;
pub mod logging;

/// Benchmark target on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    #[value(name = "cratedb")]
    CrateDb,
    #[value(name = "mobilitydb")]
    MobilityDb,
}

impl From<TargetArg> for DbTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::CrateDb => DbTarget::CrateDb,
            TargetArg::MobilityDb => DbTarget::MobilityDb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// One INSERT per event, pipelined
    Pipelined,
    /// One UNNEST-based INSERT per batch
    Bulk,
}

impl From<StrategyArg> for InsertStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Pipelined => InsertStrategy::Pipelined,
            StrategyArg::Bulk => InsertStrategy::Bulk,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConnectPolicyArg {
    /// Abort the run if any worker fails to connect
    Abort,
    /// Run with the workers that did connect
    Degrade,
}

impl From<ConnectPolicyArg> for ConnectPolicy {
    fn from(arg: ConnectPolicyArg) -> Self {
        match arg {
            ConnectPolicyArg::Abort => ConnectPolicy::Abort,
            ConnectPolicyArg::Degrade => ConnectPolicy::Degrade,
        }
    }
}

/// Database connection options.
#[derive(Parser, Clone, Debug)]
pub struct DbOpts {
    /// Target database
    #[arg(long, value_enum, default_value = "cratedb", env = "BENCH_DB")]
    pub db: TargetArg,

    /// Connection string (defaults to the local instance of the target)
    #[arg(long, env = "BENCH_CONNECTION_STRING")]
    pub connection_string: Option<String>,
}

impl DbOpts {
    pub fn target(&self) -> DbTarget {
        self.db.into()
    }

    pub fn connection_string(&self) -> String {
        self.connection_string
            .clone()
            .unwrap_or_else(|| self.target().default_connection_string().to_string())
    }
}

/// Reference pool files.
#[derive(Parser, Clone, Debug)]
pub struct ReferenceOpts {
    /// CSV file with points of interest
    #[arg(
        long,
        default_value = "../dataset-generator/output/berlin-pois.csv",
        env = "BENCH_POIS"
    )]
    pub pois: PathBuf,

    /// GeoJSON file with districts
    #[arg(
        long,
        default_value = "../dataset-generator/output/berlin-districts.geojson",
        env = "BENCH_DISTRICTS"
    )]
    pub districts: PathBuf,
}

/// Worker pool and run options shared by the benchmark commands.
#[derive(Parser, Clone, Debug)]
pub struct RunOpts {
    /// Number of concurrent workers, each with its own connection
    #[arg(long, default_value = "100", env = "BENCH_WORKERS")]
    pub workers: usize,

    /// Job queue capacity (default: 4 x available CPUs)
    #[arg(long, env = "BENCH_QUEUE_CAPACITY")]
    pub queue_capacity: Option<usize>,

    /// Log progress every N dispatched jobs (0 disables)
    #[arg(long, default_value = "10000")]
    pub progress_interval: u64,

    /// What to do when a worker cannot connect
    #[arg(long, value_enum, default_value = "abort", env = "BENCH_CONNECT_POLICY")]
    pub connect_policy: ConnectPolicyArg,

    /// CSV file receiving one row per executed operation
    #[arg(long, default_value = "results.csv", env = "BENCH_RESULT_LOG")]
    pub result_log: PathBuf,

    /// Stop dispatching after this long (e.g. "300", "30m", "2h")
    #[arg(long, value_parser = config::parse_duration)]
    pub max_duration: Option<Duration>,
}

impl RunOpts {
    pub fn run_config(&self, strategy: InsertStrategy, validate_live: bool) -> RunConfig {
        RunConfig {
            workers: self.workers,
            queue_capacity: self.queue_capacity.unwrap_or_else(default_queue_capacity),
            progress_interval: self.progress_interval,
            connect_policy: self.connect_policy.into(),
            strategy,
            validate_live,
        }
    }
}
