//! Error types for the benchmark runner.

use query_generator::GeneratorError;
use query_templates::TemplateError;
use thiserror::Error;
use trip_source::SourceError;

/// Errors reported by a database connection.
#[derive(Error, Debug)]
pub enum DbError {
    /// PostgreSQL wire protocol error.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// Connection could not be established.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A statement was rejected.
    #[error("Statement failed: {0}")]
    Statement(String),
}

/// Fatal errors that abort a benchmark run.
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Dataset error: {0}")]
    Source(#[from] SourceError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// A worker could not connect and the run does not tolerate it.
    #[error("Worker {worker_id} failed to connect: {source}")]
    Connect {
        worker_id: usize,
        #[source]
        source: DbError,
    },

    /// No worker managed to connect.
    #[error("No worker could connect to the database")]
    NoWorkers,

    /// Reference data seeding failed.
    #[error("Failed to seed {record}: {source}")]
    Seed {
        record: String,
        #[source]
        source: DbError,
    },

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Result log error: {0}")]
    ResultLog(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A background task panicked or was aborted.
    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(String),
}
