//! Run summary and its table rendering.

use crate::job::{InsertStrategy, JobType};
use crate::worker::WorkerTally;
use bench_core::DbTarget;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use std::time::Duration;
use tracing::info;

/// Summary of one benchmark run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: JobType,
    pub target: DbTarget,
    /// Insert strategy, for insert runs.
    pub strategy: Option<InsertStrategy>,
    pub workers_requested: usize,
    pub workers_connected: usize,
    /// Jobs pushed into the queue.
    pub jobs_dispatched: u64,
    /// Counters combined from every worker.
    pub totals: WorkerTally,
    /// Rows written to the result log.
    pub events_logged: u64,
    pub elapsed: Duration,
    pub cancelled: bool,
}

impl RunReport {
    /// Executed jobs per second of wall time.
    pub fn jobs_per_second(&self) -> f64 {
        per_second(self.totals.jobs, self.elapsed)
    }

    /// Inserted rows per second of wall time.
    pub fn rows_per_second(&self) -> f64 {
        per_second(self.totals.rows_inserted, self.elapsed)
    }

    /// Whether every dispatched job was executed and accounted for.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.totals.succeeded + self.totals.failed == self.jobs_dispatched
    }

    /// Emit the summary to the operational log.
    pub fn log(&self) {
        info!(
            mode = %self.mode,
            target = %self.target,
            workers = self.workers_connected,
            jobs_dispatched = self.jobs_dispatched,
            jobs_executed = self.totals.jobs,
            succeeded = self.totals.succeeded,
            failed = self.totals.failed,
            rows_inserted = self.totals.rows_inserted,
            rows_failed = self.totals.rows_failed,
            query_rows = self.totals.query_rows,
            elapsed_secs = self.elapsed.as_secs_f64(),
            cancelled = self.cancelled,
            "Benchmark run finished"
        );
    }

    /// Render the summary as a table.
    pub fn format_table(&self) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Metric", "Value"]);

        let mode = match self.strategy {
            Some(strategy) => format!("{} ({strategy})", self.mode),
            None => self.mode.to_string(),
        };
        table.add_row(vec![Cell::new("Mode"), Cell::new(mode)]);
        table.add_row(vec![Cell::new("Target"), Cell::new(self.target)]);
        table.add_row(vec![
            Cell::new("Workers"),
            Cell::new(format!(
                "{}/{}",
                self.workers_connected, self.workers_requested
            )),
        ]);
        table.add_row(vec![
            Cell::new("Jobs dispatched"),
            Cell::new(format_number(self.jobs_dispatched)),
        ]);
        table.add_row(vec![
            Cell::new("Jobs succeeded"),
            Cell::new(format_number(self.totals.succeeded)).fg(Color::Green),
        ]);
        let failed = Cell::new(format_number(self.totals.failed));
        table.add_row(vec![
            Cell::new("Jobs failed"),
            if self.totals.failed > 0 {
                failed.fg(Color::Red)
            } else {
                failed
            },
        ]);

        match self.mode {
            JobType::Insert => {
                table.add_row(vec![
                    Cell::new("Rows inserted"),
                    Cell::new(format_number(self.totals.rows_inserted)),
                ]);
                table.add_row(vec![
                    Cell::new("Rows failed"),
                    Cell::new(format_number(self.totals.rows_failed)),
                ]);
                table.add_row(vec![
                    Cell::new("Rows/sec"),
                    Cell::new(format!("{:.1}", self.rows_per_second())),
                ]);
            }
            JobType::Query => {
                table.add_row(vec![
                    Cell::new("Rows returned"),
                    Cell::new(format_number(self.totals.query_rows)),
                ]);
            }
        }

        table.add_row(vec![
            Cell::new("Jobs/sec"),
            Cell::new(format!("{:.1}", self.jobs_per_second())),
        ]);
        table.add_row(vec![
            Cell::new("Elapsed"),
            Cell::new(format_duration(self.elapsed.as_secs_f64())),
        ]);
        if self.cancelled {
            table.add_row(vec![
                Cell::new("Status"),
                Cell::new("CANCELLED").fg(Color::Yellow),
            ]);
        }

        table.to_string()
    }
}

fn per_second(count: u64, elapsed: Duration) -> f64 {
    if elapsed.as_secs_f64() > 0.0 {
        count as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    }
}

fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{secs:.1}s")
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        format!("{}m {:02.0}s", mins as u64, secs - mins * 60.0)
    } else {
        let hours = (secs / 3600.0).floor();
        let mins = ((secs - hours * 3600.0) / 60.0).floor();
        format!("{}h {:02}m", hours as u64, mins as u64)
    }
}

/// Format a count with thousands separators.
fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport {
            mode: JobType::Insert,
            target: DbTarget::CrateDb,
            strategy: Some(InsertStrategy::Bulk),
            workers_requested: 4,
            workers_connected: 4,
            jobs_dispatched: 1200,
            totals: WorkerTally {
                worker_id: 0,
                jobs: 1200,
                succeeded: 1199,
                failed: 1,
                rows_inserted: 119_950,
                rows_failed: 50,
                query_rows: 0,
            },
            events_logged: 1200,
            elapsed: Duration::from_secs(10),
            cancelled: false,
        }
    }

    #[test]
    fn test_throughput() {
        let report = report();
        assert_eq!(report.jobs_per_second(), 120.0);
        assert_eq!(report.rows_per_second(), 11_995.0);
        assert!(report.is_complete());
    }

    #[test]
    fn test_cancelled_run_is_incomplete() {
        let mut report = report();
        report.cancelled = true;
        assert!(!report.is_complete());
    }

    #[test]
    fn test_format_table() {
        let table = report().format_table();
        assert!(table.contains("insert (bulk)"));
        assert!(table.contains("1,199"));
        assert!(table.contains("119,950"));
        assert!(table.contains("10.0s"));
        assert!(!table.contains("CANCELLED"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(5.0), "5.0s");
        assert_eq!(format_duration(125.0), "2m 05s");
        assert_eq!(format_duration(7260.0), "2h 01m");
    }
}
