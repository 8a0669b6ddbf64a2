//! # tracesql
//!
//! An embeddable analytical query engine for recorded performance-trace data.
//! Traces are loaded as a read-only event table (named spans with durations,
//! iteration indices and benchmark attribution) and queried through a small
//! declarative SQL surface. A module system — the trace SQL standard library —
//! lets a library define derived tables and scalar functions over the base
//! event table, such as the JetStream 3 benchmark-scoring module
//! `chrome.jetstream_3`.
//!
//! ## Features
//!
//! - **Read-Only Event Store**: columnar span table, immutable after load
//! - **Module Catalog**: dotted-name modules activated per query with
//!   `INCLUDE MODULE`, resolved with dependency-cycle detection
//! - **Derived Tables**: declarative view definitions (projection, renaming,
//!   filtering, ordering) evaluated over base and derived tables
//! - **Benchmark Scoring**: JetStream-family inverse-duration subtest scores
//!   combined by geometric mean, reproducing golden fixtures bit-for-bit
//! - **Typed Results**: ordered rowsets with named, typed columns and
//!   byte-stable CSV / JSON rendering
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tracesql::{Event, EventStore, ModuleRegistry, TraceExecutionEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = EventStore::load(vec![Event {
//!         id: 0,
//!         name: "Air".to_string(),
//!         top_level_name: "Air".to_string(),
//!         iteration: 0,
//!         subtest: "First".to_string(),
//!         duration: 30_374_000,
//!     }]);
//!
//!     let engine = TraceExecutionEngine::new(store, ModuleRegistry::with_stdlib());
//!     let result = engine.execute(
//!         "INCLUDE MODULE chrome.jetstream_3;
//!          SELECT name, dur FROM chrome_jetstream_3_measure ORDER BY name;",
//!     )?;
//!     println!("{}", result.to_csv());
//!     Ok(())
//! }
//! ```

pub mod tracesql;

// Re-export the main API at the crate root
pub use tracesql::sql::error::{SqlError, SqlResult};
pub use tracesql::sql::execution::types::{Column, DataType, FieldValue, RowSet};
pub use tracesql::sql::execution::TraceExecutionEngine;
pub use tracesql::sql::module::{Module, ModuleRegistry, TableDef};
pub use tracesql::sql::parser::TraceSqlParser;
pub use tracesql::store::{Event, EventStore};
