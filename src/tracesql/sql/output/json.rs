//! JSON rendering.
//!
//! Serializes a rowset as `{"columns": [{"name": ..., "type": ...}],
//! "rows": [[...], ...]}` through the custom serde implementations on
//! [`RowSet`](crate::tracesql::sql::execution::types::RowSet) and
//! `FieldValue`. Arrays keep declared column order, so output is
//! byte-stable across runs.

use crate::tracesql::sql::error::SqlError;
use crate::tracesql::sql::execution::types::RowSet;

/// Renders a rowset as compact JSON text
pub fn render(rowset: &RowSet) -> Result<String, SqlError> {
    serde_json::to_string(rowset)
        .map_err(|e| SqlError::data_error(format!("JSON serialization failed: {}", e), None))
}
