//! Units of work handed to workers.

use bench_core::{Batch, QueryFields};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How insert batches are sent to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertStrategy {
    /// One statement per event, sent as a single pipelined request.
    Pipelined,
    /// One statement for the whole batch using array unnesting.
    #[default]
    Bulk,
}

impl fmt::Display for InsertStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertStrategy::Pipelined => write!(f, "pipelined"),
            InsertStrategy::Bulk => write!(f, "bulk"),
        }
    }
}

/// Kind of job, as written to the result log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Insert,
    Query,
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobType::Insert => write!(f, "insert"),
            JobType::Query => write!(f, "query"),
        }
    }
}

/// One query instance: a template name and its generated parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryJob {
    pub query_index: u64,
    pub template: String,
    pub fields: QueryFields,
}

/// Work item on the job queue. Ownership moves to the receiving worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    Insert(Batch),
    Query(QueryJob),
}

impl Job {
    pub fn job_type(&self) -> JobType {
        match self {
            Job::Insert(_) => JobType::Insert,
            Job::Query(_) => JobType::Query,
        }
    }
}
