//! # Observation Log: Append-Only Field History
//!
//! An accumulator object for time-series style data: a fixed set of typed,
//! named scalar fields that the owner mutates freely, one fixed derivation
//! that computes a field from two others, and an ordered history of
//! snapshots captured by explicit `record()` calls.
//!
//! ## Design Principles
//!
//! - **Append-only**: rows are never removed, reordered, or mutated
//! - **Uniform rows**: every row carries the same fields in declared order
//! - **Fail loudly**: unset inputs and changed schemas are errors, not
//!   sentinel values silently written into the table
//!
//! ## Example Usage
//!
//! ```rust
//! use observation_log::{Derivation, ObservationLog, Schema, Value};
//!
//! let schema = Schema::builder()
//!     .integer("time")
//!     .float("variable1")
//!     .float("variable2")
//!     .build()?;
//! let mut log = ObservationLog::builder(schema)
//!     .derivation(Derivation::sum("derived_sum", "variable1", "variable2"))
//!     .build()?;
//!
//! for t in 0..10 {
//!     log.set("time", Value::Integer(t))?;
//!     log.set("variable1", Value::Float(t as f64))?;
//!     log.set("variable2", Value::Float(1.0))?;
//!     log.derive()?;
//!     log.record()?;
//! }
//!
//! let batch = log.history().to_record_batch()?;
//! assert_eq!(batch.num_rows(), 10);
//! # Ok::<(), observation_log::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod derive;
pub mod error;
pub mod history;
pub mod log;
pub mod logging;
pub mod schema;
pub mod table;

pub use derive::{DeriveOp, Derivation};
pub use error::{Error, Result};
pub use history::{History, Row, RowView};
pub use log::{LogState, ObservationLog, ObservationLogBuilder};
pub use schema::{FieldDef, FieldType, Schema, SchemaBuilder, Value};
