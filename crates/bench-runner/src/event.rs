//! Outcome events emitted by workers and the result log record.

use crate::job::{InsertStrategy, JobType};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Log target for per-operation events.
pub const EVENT_TARGET: &str = "spatial_bench::events";

/// Timing of one job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Time spent in the database call only.
    pub duration: Duration,
    /// Time the worker waited for this job since its previous job finished.
    pub waited: Duration,
}

/// Result of one insert batch.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOutcome {
    pub worker_id: usize,
    pub strategy: InsertStrategy,
    pub batch_size: usize,
    pub inserted: u64,
    pub failed: u64,
    pub timing: Timing,
    pub error: Option<String>,
}

impl InsertOutcome {
    pub fn success(&self) -> bool {
        self.failed == 0 && self.error.is_none()
    }
}

/// Result of one query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub worker_id: usize,
    pub query_index: u64,
    pub template: String,
    pub rows: u64,
    pub success: bool,
    pub timing: Timing,
    pub error: Option<String>,
}

/// Outcome of exactly one executed job.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeEvent {
    Insert(InsertOutcome),
    Query(QueryOutcome),
}

impl OutcomeEvent {
    pub fn worker_id(&self) -> usize {
        match self {
            OutcomeEvent::Insert(o) => o.worker_id,
            OutcomeEvent::Query(o) => o.worker_id,
        }
    }

    pub fn job_type(&self) -> JobType {
        match self {
            OutcomeEvent::Insert(_) => JobType::Insert,
            OutcomeEvent::Query(_) => JobType::Query,
        }
    }

    pub fn success(&self) -> bool {
        match self {
            OutcomeEvent::Insert(o) => o.success(),
            OutcomeEvent::Query(o) => o.success,
        }
    }

    pub fn timing(&self) -> &Timing {
        match self {
            OutcomeEvent::Insert(o) => &o.timing,
            OutcomeEvent::Query(o) => &o.timing,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OutcomeEvent::Insert(o) => o.error.as_deref(),
            OutcomeEvent::Query(o) => o.error.as_deref(),
        }
    }

    /// Flatten into the result log row.
    pub fn to_record(&self) -> ResultRecord {
        let timing = self.timing();
        let (operation, rows, inserted, failed) = match self {
            OutcomeEvent::Insert(o) => (o.strategy.to_string(), None, Some(o.inserted), Some(o.failed)),
            OutcomeEvent::Query(o) => (o.template.clone(), Some(o.rows), None, None),
        };

        ResultRecord {
            worker_id: self.worker_id(),
            job_type: self.job_type(),
            operation,
            duration_ms: millis(timing.duration),
            waited_ms: millis(timing.waited),
            started_at: timing.started_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            finished_at: timing.finished_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            success: self.success(),
            rows,
            inserted,
            failed,
            error: self.error().map(str::to_string),
        }
    }

    /// Emit the event to the operational log.
    pub fn log(&self) {
        let timing = self.timing();
        match self {
            OutcomeEvent::Insert(o) => info!(
                target: EVENT_TARGET,
                worker_id = o.worker_id,
                job_type = "insert",
                strategy = %o.strategy,
                batch_size = o.batch_size,
                duration_ms = millis(timing.duration),
                waited_ms = millis(timing.waited),
                inserted = o.inserted,
                failed = o.failed,
                success = o.success(),
                error = o.error.as_deref(),
                "Worker finished insert"
            ),
            OutcomeEvent::Query(o) => info!(
                target: EVENT_TARGET,
                worker_id = o.worker_id,
                job_type = "query",
                template = %o.template,
                query_index = o.query_index,
                duration_ms = millis(timing.duration),
                waited_ms = millis(timing.waited),
                rows = o.rows,
                success = o.success,
                error = o.error.as_deref(),
                "Worker finished query"
            ),
        }
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_micros() as f64 / 1000.0
}

/// One row of the CSV result log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub worker_id: usize,
    pub job_type: JobType,
    /// Insert strategy or query template name.
    pub operation: String,
    pub duration_ms: f64,
    pub waited_ms: f64,
    pub started_at: String,
    pub finished_at: String,
    pub success: bool,
    /// Result rows of a query.
    pub rows: Option<u64>,
    pub inserted: Option<u64>,
    pub failed: Option<u64>,
    pub error: Option<String>,
}
