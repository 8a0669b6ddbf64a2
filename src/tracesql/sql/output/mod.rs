//! Result rendering.
//!
//! Serializes a [`RowSet`](crate::tracesql::sql::execution::types::RowSet)
//! into the consumer-facing textual forms:
//!
//! - [`csv`] - golden-fixture CSV (quoted headers and strings, bare numbers)
//! - [`json`] - structured JSON via serde (`{"columns": [...], "rows": [...]}`)

pub mod csv;
pub mod json;
