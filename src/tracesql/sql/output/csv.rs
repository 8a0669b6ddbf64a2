//! CSV rendering in the diff-test fixture format.
//!
//! Every header name is double-quoted; string values are double-quoted
//! with `""` escaping; integers, floats and booleans render bare; NULL
//! renders as `"[NULL]"`. Each line, including the last, ends with a
//! newline, so byte-for-byte comparison against golden blocks is stable.

use crate::tracesql::sql::execution::types::{FieldValue, RowSet};

/// Renders a rowset as CSV text
pub fn render(rowset: &RowSet) -> String {
    let mut output = String::new();

    let header: Vec<String> = rowset
        .columns
        .iter()
        .map(|column| quote(&column.name))
        .collect();
    output.push_str(&header.join(","));
    output.push('\n');

    for row in &rowset.rows {
        let cells: Vec<String> = row.iter().map(render_value).collect();
        output.push_str(&cells.join(","));
        output.push('\n');
    }
    output
}

fn render_value(value: &FieldValue) -> String {
    match value {
        FieldValue::String(s) => quote(s),
        FieldValue::Null => "\"[NULL]\"".to_string(),
        other => other.to_string(),
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}
