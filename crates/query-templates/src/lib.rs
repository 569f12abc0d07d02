//! Query templates for spatial-bench.
//!
//! A template set is a YAML catalog where every query carries one SQL text per
//! target database. Placeholders are written `{{FieldName}}` and must name a
//! [`Field`](bench_core::Field) of the vocabulary.
//!
//! ```yaml
//! queries:
//!   - name: trip_points
//!     description: All points of one trip
//!     cratedb_sql: SELECT * FROM escooter_events WHERE trip_id = '{{TripID}}'
//!     mobilitydb_sql: SELECT * FROM escooter_events WHERE trip_id = '{{TripID}}'
//! ```
//!
//! Templates are parsed when the catalog is loaded, so a reference to an
//! unknown field is rejected before a benchmark starts. Rendering never emits
//! placeholder text: a field the record cannot supply is an error.

pub mod catalog;
mod error;
pub mod template;

pub use catalog::TemplateCatalog;
pub use error::TemplateError;
pub use template::{FieldValues, QueryTemplate};
