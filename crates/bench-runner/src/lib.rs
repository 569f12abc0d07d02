//! Concurrent benchmark engine for spatial-bench.
//!
//! - [`Orchestrator`] starts a fixed pool of [`Worker`]s, waits until every
//!   worker holds a database connection, then feeds jobs through a bounded
//!   queue so the dataset reader cannot run ahead of the workers.
//! - Each worker executes insert batches or rendered queries over its own
//!   [`Connection`] and reports one [`OutcomeEvent`] per job.
//! - The [`EventCollector`] writes every event to a CSV result log in arrival
//!   order and accumulates a [`CollectorSummary`].
//! - SQL text for each target comes from a [`Dialect`].
//!
//! Failed operations are counted, never retried. Cancellation lets in-flight
//! jobs finish and leaves queued jobs unexecuted.

pub mod collector;
pub mod connection;
pub mod dialect;
mod error;
pub mod event;
pub mod job;
pub mod orchestrator;
pub mod report;
pub mod seed;
pub mod validation;
pub mod worker;

pub use collector::{CollectorSummary, EventCollector};
pub use connection::{Connection, Connector, PgConnector};
pub use dialect::{dialect_for, CrateDb, Dialect, MobilityDb};
pub use error::{BenchError, DbError};
pub use event::{InsertOutcome, OutcomeEvent, QueryOutcome, ResultRecord, Timing};
pub use job::{InsertStrategy, Job, JobType, QueryJob};
pub use orchestrator::{default_queue_capacity, ConnectPolicy, Orchestrator, RunConfig};
pub use report::RunReport;
pub use seed::{seed_reference_data, SeedReport};
pub use validation::{validate_templates, validate_templates_live};
pub use worker::{Worker, WorkerSettings, WorkerState, WorkerTally};
