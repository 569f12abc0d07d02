//! Core types for the spatial-bench load generator.
//!
//! This crate provides the data model shared by every other crate in the
//! workspace:
//!
//! - [`TripEvent`] / [`Batch`] - raw movement observations read from the dataset
//! - [`Poi`] / [`Locality`] - read-only reference pools used for query parameters
//! - [`QueryFields`] / [`Field`] - one generated parameter set and the template vocabulary
//! - [`DbTarget`] - the database being benchmarked
//!
//! # Architecture
//!
//! ```text
//! bench-core (this crate)
//!    │
//!    ├─── query-generator  (produces QueryFields from reference pools)
//!    ├─── query-templates  (renders QueryFields into SQL text)
//!    ├─── trip-source      (reads TripEvents, POIs and localities)
//!    └─── bench-runner     (workers, collector, orchestrator)
//! ```

pub mod fields;
pub mod model;
pub mod target;

pub use fields::{Field, QueryFields, UnknownField};
pub use model::{Batch, Locality, Poi, TripEvent};
pub use target::DbTarget;
