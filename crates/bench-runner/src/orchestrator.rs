//! Run orchestration.
//!
//! ```text
//!  start workers ──► ready barrier ──► validate templates ──► feed jobs
//!                                                               │
//!                     bounded job queue (backpressure) ◄────────┘
//!                                 │
//!                 worker 1 … worker N (one connection each)
//!                                 │
//!                     event channel ──► collector ──► result log
//! ```

use crate::collector::EventCollector;
use crate::connection::Connector;
use crate::dialect::Dialect;
use crate::error::{BenchError, DbError};
use crate::event::OutcomeEvent;
use crate::job::{InsertStrategy, Job, JobType, QueryJob};
use crate::report::RunReport;
use crate::validation::{validate_templates, validate_templates_live};
use crate::worker::{Worker, WorkerSettings, WorkerState, WorkerTally};
use bench_core::{Batch, QueryFields};
use query_generator::FieldGenerator;
use query_templates::TemplateCatalog;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};
use trip_source::SourceError;

/// Default number of jobs between feeder progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Job queue capacity: a small multiple of the available parallelism.
pub fn default_queue_capacity() -> usize {
    num_cpus::get() * 4
}

/// What to do when some workers fail to connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectPolicy {
    /// Abort the run.
    #[default]
    Abort,
    /// Continue with the workers that connected.
    Degrade,
}

/// Settings of one benchmark run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub workers: usize,
    pub queue_capacity: usize,
    /// Zero disables progress logging.
    pub progress_interval: u64,
    pub connect_policy: ConnectPolicy,
    pub strategy: InsertStrategy,
    /// Also execute every template once before a query run.
    pub validate_live: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: 100,
            queue_capacity: default_queue_capacity(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            connect_policy: ConnectPolicy::Abort,
            strategy: InsertStrategy::Bulk,
            validate_live: false,
        }
    }
}

/// Connect result a worker reports to the ready barrier.
type ReadySignal = Result<usize, (usize, DbError)>;

/// Drives a worker pool through one insert or query run.
pub struct Orchestrator {
    connector: Arc<dyn Connector>,
    dialect: Arc<dyn Dialect>,
    config: RunConfig,
    cancel: CancellationToken,
}

impl Orchestrator {
    pub fn new(connector: Arc<dyn Connector>, dialect: Arc<dyn Dialect>, config: RunConfig) -> Self {
        Self {
            connector,
            dialect,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an external cancellation token, e.g. one triggered by Ctrl-C.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Insert every batch of `batches`.
    ///
    /// The result log is written as CSV to `result_log`, which is handed back
    /// with the report.
    pub async fn run_inserts<I, W>(
        &self,
        batches: I,
        result_log: W,
    ) -> Result<(RunReport, W), BenchError>
    where
        I: Iterator<Item = Result<Batch, SourceError>> + Send + 'static,
        W: Write + Send + 'static,
    {
        info!(
            target = %self.dialect.target(),
            workers = self.config.workers,
            strategy = %self.config.strategy,
            "Starting insert benchmark"
        );
        let settings = WorkerSettings {
            dialect: self.dialect.clone(),
            strategy: self.config.strategy,
            catalog: None,
        };
        let jobs = batches.map(|batch| batch.map(Job::Insert).map_err(BenchError::from));

        self.run(JobType::Insert, settings, jobs, None, result_log).await
    }

    /// Run `total_queries` generated queries.
    ///
    /// Query `i` uses the fields generated for index `i` and the catalog
    /// template at position `i mod len`.
    pub async fn run_queries<W>(
        &self,
        generator: Arc<FieldGenerator>,
        catalog: Arc<TemplateCatalog>,
        total_queries: u64,
        result_log: W,
    ) -> Result<(RunReport, W), BenchError>
    where
        W: Write + Send + 'static,
    {
        if catalog.target() != self.dialect.target() {
            return Err(BenchError::Config(format!(
                "Templates were loaded for {} but the run targets {}",
                catalog.target(),
                self.dialect.target()
            )));
        }
        info!(
            target = %self.dialect.target(),
            workers = self.config.workers,
            total_queries,
            seed = generator.base_seed(),
            templates = catalog.len(),
            "Starting query benchmark"
        );

        let settings = WorkerSettings {
            dialect: self.dialect.clone(),
            strategy: self.config.strategy,
            catalog: Some(catalog.clone()),
        };
        let sample = generator.generate(0);
        let job_catalog = catalog.clone();
        let jobs = (0..total_queries).map(move |query_index| {
            Ok::<_, BenchError>(Job::Query(QueryJob {
                query_index,
                template: job_catalog.for_index(query_index).name().to_string(),
                fields: generator.generate(query_index),
            }))
        });

        self.run(JobType::Query, settings, jobs, Some((catalog, sample)), result_log)
            .await
    }

    async fn run<J, W>(
        &self,
        mode: JobType,
        settings: WorkerSettings,
        jobs: J,
        validation: Option<(Arc<TemplateCatalog>, QueryFields)>,
        result_log: W,
    ) -> Result<(RunReport, W), BenchError>
    where
        J: Iterator<Item = Result<Job, BenchError>> + Send + 'static,
        W: Write + Send + 'static,
    {
        let workers = self.config.workers;
        if workers == 0 {
            return Err(BenchError::Config("At least one worker is required".into()));
        }

        // Fatal errors cancel this run without touching the caller's token
        let run_cancel = self.cancel.child_token();

        let (events_tx, collector) = EventCollector::channel(result_log);
        let collector = collector.spawn(info_span!("collector"));

        let (jobs_tx, jobs_rx) = async_channel::bounded(self.config.queue_capacity.max(1));
        let (ready_tx, mut ready_rx) = mpsc::channel::<ReadySignal>(workers);

        let handles: Vec<_> = (1..=workers)
            .map(|id| {
                spawn_worker(
                    id,
                    self.connector.clone(),
                    settings.clone(),
                    events_tx.clone(),
                    jobs_rx.clone(),
                    run_cancel.clone(),
                    ready_tx.clone(),
                )
            })
            .collect();
        drop(ready_tx);
        drop(jobs_rx);
        info!(workers, "Started worker tasks");

        // Ready barrier: ends once every worker has reported
        let mut connected = 0;
        let mut connect_failure = None;
        loop {
            tokio::select! {
                biased;
                _ = run_cancel.cancelled() => break,
                signal = ready_rx.recv() => match signal {
                    Some(Ok(_)) => connected += 1,
                    Some(Err((worker_id, e))) => {
                        error!(worker_id, error = %e, "Worker unable to connect to database");
                        connect_failure.get_or_insert((worker_id, e));
                    }
                    None => break,
                },
            }
        }
        info!(connected, requested = workers, "Workers ready");

        let mut setup = match (connect_failure, self.config.connect_policy) {
            (Some((worker_id, source)), ConnectPolicy::Abort) => {
                Err(BenchError::Connect { worker_id, source })
            }
            (Some(_), ConnectPolicy::Degrade) => {
                warn!(connected, requested = workers, "Continuing with reduced concurrency");
                Ok(())
            }
            (None, _) => Ok(()),
        };
        if setup.is_ok() && connected == 0 && !run_cancel.is_cancelled() {
            setup = Err(BenchError::NoWorkers);
        }
        if setup.is_ok() && !run_cancel.is_cancelled() {
            if let Some((catalog, sample)) = &validation {
                setup = self.validate(catalog, sample).await;
            }
        }

        let started = Instant::now();
        let mut dispatched = 0;
        let mut fatal = setup.err();

        if fatal.is_none() && !run_cancel.is_cancelled() {
            // Closing the queue wakes a feeder blocked on a full queue
            let watcher = {
                let queue = jobs_tx.clone();
                let cancel = run_cancel.clone();
                tokio::spawn(async move {
                    cancel.cancelled().await;
                    queue.close();
                })
            };
            let feeder = {
                let queue = jobs_tx.clone();
                let cancel = run_cancel.clone();
                let interval = self.config.progress_interval;
                let span = info_span!("feeder");
                tokio::task::spawn_blocking(move || {
                    span.in_scope(|| feed_jobs(jobs, &queue, &cancel, interval))
                })
            };

            match feeder.await {
                Ok(Ok(count)) => dispatched = count,
                Ok(Err(e)) => fatal = Some(e),
                Err(e) => fatal = Some(e.into()),
            }
            watcher.abort();
        }

        if fatal.is_some() {
            // In-flight jobs finish, queued ones are dropped
            run_cancel.cancel();
        }

        // Drain: close the queue, join workers, then the collector
        jobs_tx.close();
        let mut totals = WorkerTally::default();
        for handle in handles {
            if let Some(tally) = handle.await? {
                totals.merge(&tally);
            }
        }
        let elapsed = if dispatched > 0 {
            started.elapsed()
        } else {
            Duration::ZERO
        };
        drop(events_tx);
        let (summary, writer) = collector.await??;

        if let Some(e) = fatal {
            return Err(e);
        }
        if summary.events != totals.jobs {
            warn!(events = summary.events, jobs = totals.jobs, "Event count does not match executed jobs");
        }

        let report = RunReport {
            mode,
            target: self.dialect.target(),
            strategy: (mode == JobType::Insert).then_some(self.config.strategy),
            workers_requested: workers,
            workers_connected: connected,
            jobs_dispatched: dispatched,
            totals,
            events_logged: summary.events,
            elapsed,
            cancelled: self.cancel.is_cancelled(),
        };
        report.log();
        Ok((report, writer))
    }

    async fn validate(
        &self,
        catalog: &TemplateCatalog,
        sample: &QueryFields,
    ) -> Result<(), BenchError> {
        validate_templates(catalog, sample)?;
        if self.config.validate_live {
            let mut connection = self.connector.connect().await?;
            validate_templates_live(connection.as_mut(), self.dialect.as_ref(), catalog, sample)
                .await?;
        }
        Ok(())
    }
}

fn spawn_worker(
    id: usize,
    connector: Arc<dyn Connector>,
    settings: WorkerSettings,
    events: mpsc::Sender<OutcomeEvent>,
    jobs: async_channel::Receiver<Job>,
    cancel: CancellationToken,
    ready: mpsc::Sender<ReadySignal>,
) -> JoinHandle<Option<WorkerTally>> {
    tokio::spawn(
        async move {
            debug!(state = ?WorkerState::Connecting, "Worker connecting");
            let connection = tokio::select! {
                biased;
                _ = cancel.cancelled() => return None,
                result = connector.connect() => result,
            };

            match connection {
                Ok(connection) => {
                    info!("Worker connected to database");
                    let _ = ready.send(Ok(id)).await;
                    drop(ready);
                    let worker = Worker::new(id, connection, settings, events);
                    Some(worker.run(jobs, cancel).await)
                }
                Err(e) => {
                    let _ = ready.send(Err((id, e))).await;
                    None
                }
            }
        }
        .instrument(info_span!("worker", id)),
    )
}

/// Push jobs into the queue until the source is exhausted, the queue is
/// closed, or the run is cancelled. Returns the number of jobs dispatched.
fn feed_jobs<J>(
    jobs: J,
    queue: &async_channel::Sender<Job>,
    cancel: &CancellationToken,
    progress_interval: u64,
) -> Result<u64, BenchError>
where
    J: Iterator<Item = Result<Job, BenchError>>,
{
    let start = Instant::now();
    let mut dispatched = 0u64;

    for job in jobs {
        if cancel.is_cancelled() {
            break;
        }
        if queue.send_blocking(job?).is_err() {
            break;
        }
        dispatched += 1;
        if progress_interval > 0 && dispatched % progress_interval == 0 {
            info!(dispatched, elapsed = ?start.elapsed(), "Jobs dispatched");
        }
    }

    if cancel.is_cancelled() {
        info!(dispatched, "Stopped dispatching jobs because the run was cancelled");
    } else {
        info!(dispatched, elapsed = ?start.elapsed(), "All jobs dispatched");
    }
    Ok(dispatched)
}
