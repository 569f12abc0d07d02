//! Deterministic query parameter generator for spatial-bench.
//!
//! This crate provides the [`FieldGenerator`] which produces one
//! [`QueryFields`](bench_core::QueryFields) value per query index. The output
//! is a pure function of the base seed, the query index, the
//! [`GeneratorConfig`] and the reference pools, so two benchmark runs against
//! different databases issue exactly the same queries.
//!
//! # Architecture
//!
//! ```text
//! (base seed, query index)
//!        │
//!        ▼  SHA-256, first 8 bytes
//!   derived seed
//!        │
//!        ▼
//! ┌─────────────────┐
//! │  ChaCha12Rng    │  fixed draw order:
//! │                 │  start, duration, timestamp, radius,
//! │                 │  limit, POI, locality, trip
//! └────────┬────────┘
//!          ▼
//!     QueryFields
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use query_generator::{FieldGenerator, GeneratorConfig};
//!
//! let generator = FieldGenerator::new(42, GeneratorConfig::default(), pois, localities, trip_ids)?;
//! let fields = generator.generate(0);
//! assert_eq!(fields, generator.generate(0));
//! ```

pub mod config;
pub mod generator;

pub use config::GeneratorConfig;
pub use generator::{derive_seed, FieldGenerator, GeneratorError};
