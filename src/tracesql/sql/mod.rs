// Trace SQL module for tracesql
// Provides the declarative query surface over loaded trace data

pub mod ast;
pub mod context;
pub mod error;
pub mod execution;
pub mod module;
pub mod output;
pub mod parser;

// Re-export main API
pub use ast::TraceQuery;
pub use context::QueryContext;
pub use error::SqlError;
pub use execution::types::{FieldValue, RowSet};
pub use execution::TraceExecutionEngine;
pub use module::ModuleRegistry;
pub use parser::TraceSqlParser;

// Version and feature info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const FEATURES: &[&str] = &[
    "include_module",    // INCLUDE MODULE <dotted.name> query-scoped activation
    "derived_tables",    // module-defined views over the base event table
    "scalar_functions",  // zero-argument module functions, e.g. chrome_jetstream_3_score()
    "benchmark_scoring", // JetStream-family geometric-mean scoring
    "order_by",          // multi-column ORDER BY with stable ties
    "format_function",   // printf-style format('%.5f', x)
    "csv_output",        // golden-fixture CSV rendering
    "json_output",       // structured JSON rendering
];
