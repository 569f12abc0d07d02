//! Event collector: single consumer of all worker outcome events.

use crate::error::BenchError;
use crate::event::OutcomeEvent;
use std::io::Write;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, Span};

/// Capacity of the event channel between workers and the collector.
pub const EVENT_BUFFER: usize = 4096;

/// Aggregate counters over every collected event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectorSummary {
    pub events: u64,
    pub insert_events: u64,
    pub query_events: u64,
    pub successful: u64,
    pub failed: u64,
    pub rows_inserted: u64,
    pub rows_failed: u64,
    pub query_rows: u64,
}

impl CollectorSummary {
    fn record(&mut self, event: &OutcomeEvent) {
        self.events += 1;
        if event.success() {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        match event {
            OutcomeEvent::Insert(o) => {
                self.insert_events += 1;
                self.rows_inserted += o.inserted;
                self.rows_failed += o.failed;
            }
            OutcomeEvent::Query(o) => {
                self.query_events += 1;
                self.query_rows += o.rows;
            }
        }
    }
}

/// Writes every outcome event to a CSV result log in arrival order and
/// mirrors it to the operational log.
pub struct EventCollector<W: Write> {
    events: mpsc::Receiver<OutcomeEvent>,
    writer: csv::Writer<W>,
    summary: CollectorSummary,
}

impl<W: Write + Send + 'static> EventCollector<W> {
    /// Create the event channel and its collector.
    pub fn channel(result_log: W) -> (mpsc::Sender<OutcomeEvent>, Self) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        (tx, Self::new(rx, result_log))
    }

    pub fn new(events: mpsc::Receiver<OutcomeEvent>, result_log: W) -> Self {
        Self {
            events,
            writer: csv::Writer::from_writer(result_log),
            summary: CollectorSummary::default(),
        }
    }

    /// Drain events until every sender is dropped, then flush the log.
    ///
    /// Returns the summary and the underlying writer.
    pub fn run(mut self) -> Result<(CollectorSummary, W), BenchError> {
        while let Some(event) = self.events.blocking_recv() {
            self.collect(&event)?;
        }
        self.finish()
    }

    /// Async variant of [`run`](Self::run).
    pub async fn run_async(mut self) -> Result<(CollectorSummary, W), BenchError> {
        while let Some(event) = self.events.recv().await {
            self.collect(&event)?;
        }
        self.finish()
    }

    /// Run on the blocking pool, since the result log is synchronous I/O.
    pub fn spawn(self, span: Span) -> JoinHandle<Result<(CollectorSummary, W), BenchError>> {
        tokio::task::spawn_blocking(move || span.in_scope(|| self.run()))
    }

    fn collect(&mut self, event: &OutcomeEvent) -> Result<(), BenchError> {
        self.writer.serialize(event.to_record())?;
        event.log();
        self.summary.record(event);
        Ok(())
    }

    fn finish(mut self) -> Result<(CollectorSummary, W), BenchError> {
        self.writer.flush()?;
        let writer = self.writer.into_inner().map_err(|e| e.into_error())?;
        info!(
            events = self.summary.events,
            successful = self.summary.successful,
            failed = self.summary.failed,
            "Event collector drained"
        );
        Ok((self.summary, writer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{InsertOutcome, QueryOutcome, ResultRecord, Timing};
    use crate::job::InsertStrategy;
    use chrono::Utc;
    use std::time::Duration;

    fn timing() -> Timing {
        let now = Utc::now();
        Timing {
            started_at: now,
            finished_at: now,
            duration: Duration::from_millis(1),
            waited: Duration::ZERO,
        }
    }

    fn insert(worker_id: usize, inserted: u64, failed: u64) -> OutcomeEvent {
        OutcomeEvent::Insert(InsertOutcome {
            worker_id,
            strategy: InsertStrategy::Bulk,
            batch_size: (inserted + failed) as usize,
            inserted,
            failed,
            timing: timing(),
            error: None,
        })
    }

    #[tokio::test]
    async fn test_collects_in_arrival_order() {
        let (tx, collector) = EventCollector::channel(Vec::new());
        let handle = collector.spawn(Span::none());

        tx.send(insert(3, 2, 0)).await.unwrap();
        tx.send(insert(1, 1, 1)).await.unwrap();
        tx.send(OutcomeEvent::Query(QueryOutcome {
            worker_id: 2,
            query_index: 0,
            template: "q".to_string(),
            rows: 7,
            success: true,
            timing: timing(),
            error: None,
        }))
        .await
        .unwrap();
        drop(tx);

        let (summary, log) = handle.await.unwrap().unwrap();

        assert_eq!(summary.events, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.rows_inserted, 3);
        assert_eq!(summary.rows_failed, 1);
        assert_eq!(summary.query_rows, 7);

        let mut reader = csv::Reader::from_reader(log.as_slice());
        let workers: Vec<usize> = reader
            .deserialize::<ResultRecord>()
            .map(|r| r.unwrap().worker_id)
            .collect();
        assert_eq!(workers, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_empty_run() {
        let (tx, collector) = EventCollector::channel(Vec::new());
        drop(tx);
        let (summary, log) = collector.run_async().await.unwrap();

        assert_eq!(summary, CollectorSummary::default());
        assert!(log.is_empty());
    }
}
