//! Benchmark workers.
//!
//! A worker owns one connection and runs
//! `Connecting -> Ready -> (Executing -> Idle)* -> Draining -> Stopped`.
//! The `Connecting` step happens in the orchestrator, which only builds a
//! [`Worker`] once its connection is established.

use crate::connection::Connection;
use crate::dialect::Dialect;
use crate::event::{InsertOutcome, OutcomeEvent, QueryOutcome, Timing};
use crate::job::{InsertStrategy, Job, QueryJob};
use bench_core::Batch;
use chrono::Utc;
use query_templates::TemplateCatalog;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Lifecycle state of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Connecting,
    Ready,
    Executing,
    Idle,
    Draining,
    Stopped,
}

/// Per-worker counters, handed to the orchestrator when the worker exits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerTally {
    pub worker_id: usize,
    /// Jobs executed.
    pub jobs: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub rows_inserted: u64,
    pub rows_failed: u64,
    /// Rows returned by queries.
    pub query_rows: u64,
}

impl WorkerTally {
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Default::default()
        }
    }

    pub fn record(&mut self, event: &OutcomeEvent) {
        self.jobs += 1;
        if event.success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        match event {
            OutcomeEvent::Insert(o) => {
                self.rows_inserted += o.inserted;
                self.rows_failed += o.failed;
            }
            OutcomeEvent::Query(o) => self.query_rows += o.rows,
        }
    }

    /// Add another tally's counters into this one.
    pub fn merge(&mut self, other: &WorkerTally) {
        self.jobs += other.jobs;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.rows_inserted += other.rows_inserted;
        self.rows_failed += other.rows_failed;
        self.query_rows += other.query_rows;
    }
}

/// Settings shared by every worker of a run.
#[derive(Clone)]
pub struct WorkerSettings {
    pub dialect: Arc<dyn Dialect>,
    pub strategy: InsertStrategy,
    /// Required for query jobs.
    pub catalog: Option<Arc<TemplateCatalog>>,
}

pub struct Worker {
    id: usize,
    connection: Box<dyn Connection>,
    settings: WorkerSettings,
    events: mpsc::Sender<OutcomeEvent>,
    state: WorkerState,
    tally: WorkerTally,
}

impl Worker {
    /// Build a connected worker.
    pub fn new(
        id: usize,
        connection: Box<dyn Connection>,
        settings: WorkerSettings,
        events: mpsc::Sender<OutcomeEvent>,
    ) -> Self {
        Self {
            id,
            connection,
            settings,
            events,
            state: WorkerState::Ready,
            tally: WorkerTally::new(id),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Pull jobs until the queue is closed and drained or `cancel` fires.
    ///
    /// A job that is already executing when `cancel` fires runs to completion.
    pub async fn run(
        mut self,
        jobs: async_channel::Receiver<Job>,
        cancel: CancellationToken,
    ) -> WorkerTally {
        info!("Worker started");
        let mut last_finished = Instant::now();

        loop {
            self.state = WorkerState::Idle;
            let job = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Worker stopping because the run was cancelled");
                    break;
                }
                job = jobs.recv() => match job {
                    Ok(job) => job,
                    Err(_) => {
                        self.state = WorkerState::Draining;
                        break;
                    }
                },
            };

            let waited = last_finished.elapsed();
            self.state = WorkerState::Executing;
            let event = self.execute(job, waited).await;
            self.tally.record(&event);
            last_finished = Instant::now();

            if self.events.send(event).await.is_err() {
                warn!("Event collector is gone, stopping worker");
                break;
            }
        }

        self.state = WorkerState::Stopped;
        info!(
            jobs = self.tally.jobs,
            succeeded = self.tally.succeeded,
            failed = self.tally.failed,
            "Worker finished"
        );
        self.tally
    }

    async fn execute(&mut self, job: Job, waited: Duration) -> OutcomeEvent {
        match job {
            Job::Insert(batch) => OutcomeEvent::Insert(self.insert(batch, waited).await),
            Job::Query(job) => OutcomeEvent::Query(self.query(job, waited).await),
        }
    }

    async fn insert(&mut self, batch: Batch, waited: Duration) -> InsertOutcome {
        let batch_size = batch.len();
        let strategy = self.settings.strategy;
        debug!(batch_size, %strategy, "Inserting batch");

        let (inserted, failed, error, timing) = match strategy {
            InsertStrategy::Pipelined => {
                let statements: Vec<String> = batch
                    .iter()
                    .map(|event| self.settings.dialect.render_insert(event))
                    .collect();

                let started_at = Utc::now();
                let start = Instant::now();
                let results = self.connection.execute_pipelined(&statements).await;
                let timing = finish(started_at, start, waited);

                let mut inserted = 0;
                let mut error = None;
                for result in results {
                    match result {
                        Ok(_) => inserted += 1,
                        Err(e) => {
                            error.get_or_insert_with(|| e.to_string());
                        }
                    }
                }
                (inserted, batch_size as u64 - inserted, error, timing)
            }
            InsertStrategy::Bulk => {
                let statement = self.settings.dialect.render_bulk_insert(&batch);

                let started_at = Utc::now();
                let start = Instant::now();
                let result = self.connection.execute(&statement).await;
                let timing = finish(started_at, start, waited);

                match result {
                    Ok(affected) => {
                        let inserted = affected.min(batch_size as u64);
                        (inserted, batch_size as u64 - inserted, None, timing)
                    }
                    Err(e) => (0, batch_size as u64, Some(e.to_string()), timing),
                }
            }
        };

        InsertOutcome {
            worker_id: self.id,
            strategy,
            batch_size,
            inserted,
            failed,
            timing,
            error,
        }
    }

    async fn query(&mut self, job: QueryJob, waited: Duration) -> QueryOutcome {
        let mut outcome = QueryOutcome {
            worker_id: self.id,
            query_index: job.query_index,
            template: job.template,
            rows: 0,
            success: false,
            timing: finish(Utc::now(), Instant::now(), waited),
            error: None,
        };

        let statement = match self.render(&outcome.template, &job.fields) {
            Ok(statement) => statement,
            Err(message) => {
                outcome.error = Some(message);
                return outcome;
            }
        };
        debug!(template = %outcome.template, query_index = job.query_index, "Executing query");

        let started_at = Utc::now();
        let start = Instant::now();
        let result = self.connection.query(&statement).await;
        outcome.timing = finish(started_at, start, waited);

        match result {
            Ok(rows) => {
                outcome.rows = rows;
                outcome.success = true;
            }
            Err(e) => outcome.error = Some(e.to_string()),
        }
        outcome
    }

    fn render(&self, template: &str, fields: &bench_core::QueryFields) -> Result<String, String> {
        let catalog = self
            .settings
            .catalog
            .as_ref()
            .ok_or_else(|| "No template catalog configured".to_string())?;
        let template = catalog.get(template).map_err(|e| e.to_string())?;
        self.settings
            .dialect
            .render_query(template, fields)
            .map_err(|e| e.to_string())
    }
}

fn finish(started_at: chrono::DateTime<Utc>, start: Instant, waited: Duration) -> Timing {
    Timing {
        started_at,
        finished_at: Utc::now(),
        duration: start.elapsed(),
        waited,
    }
}
