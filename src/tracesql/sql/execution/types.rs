//! Core trace SQL data types.
//!
//! This module contains the fundamental data types used throughout the
//! query engine:
//! - [`FieldValue`] - the value type system for query evaluation
//! - [`DataType`] - declared column types
//! - [`RowSet`] - the materialized relation format (named, typed columns
//!   plus row-major values), used both for derived tables and final results

use crate::tracesql::sql::error::SqlError;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::fmt;

/// A value in a query result field
///
/// This enum represents all supported data types in the trace execution
/// engine. Trace data only needs scalars: span attribution is strings, and
/// durations/iterations are 64-bit integers; scores are 64-bit floats.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Boolean value (true/false)
    Boolean(bool),
    /// SQL NULL value
    Null,
}

impl FieldValue {
    /// The declared type this value satisfies; NULL satisfies any type.
    pub fn data_type(&self) -> DataType {
        match self {
            FieldValue::Integer(_) => DataType::Integer,
            FieldValue::Float(_) => DataType::Float,
            FieldValue::String(_) => DataType::String,
            FieldValue::Boolean(_) => DataType::Boolean,
            FieldValue::Null => DataType::Null,
        }
    }

    /// Human-readable type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Integer(_) => "INTEGER",
            FieldValue::Float(_) => "FLOAT",
            FieldValue::String(_) => "STRING",
            FieldValue::Boolean(_) => "BOOLEAN",
            FieldValue::Null => "NULL",
        }
    }
}

/// Display implementation for FieldValue for clean string formatting
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "NULL"),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Custom Serialize implementation for FieldValue
///
/// Serializes scalars directly without an intermediate `serde_json::Value`
/// allocation: integers as JSON numbers, floats as JSON numbers, strings as
/// JSON strings, NULL as JSON null.
impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldValue::Integer(i) => serializer.serialize_i64(*i),
            FieldValue::Float(v) => serializer.serialize_f64(*v),
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Boolean(b) => serializer.serialize_bool(*b),
            FieldValue::Null => serializer.serialize_none(),
        }
    }
}

/// Declared column types for query output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Float,
    String,
    Boolean,
    /// Unknown type: a column whose values were all NULL
    Null,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Integer => "INTEGER",
            DataType::Float => "FLOAT",
            DataType::String => "STRING",
            DataType::Boolean => "BOOLEAN",
            DataType::Null => "NULL",
        };
        write!(f, "{}", name)
    }
}

impl Serialize for DataType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// A named, typed output column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Column {
            name: name.into(),
            data_type,
        }
    }
}

/// A materialized relation: ordered rows of named, typed columns.
///
/// `RowSet` is used both for derived tables during evaluation and as the
/// final result handed to the caller. Every value is checked against its
/// column's declared type at construction, so a `RowSet` is internally
/// consistent by the time anything reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<FieldValue>>,
}

impl RowSet {
    /// Creates an empty rowset with pre-declared column types.
    pub fn new(columns: Vec<Column>) -> Self {
        RowSet {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a rowset from column names and rows, inferring each column's
    /// declared type from its first non-NULL value and validating every
    /// other value against it.
    ///
    /// Fails with `TypeMismatchError` when a value disagrees with the
    /// declared column type, and with `SchemaError` when a row's width
    /// differs from the header.
    pub fn from_rows(
        names: Vec<String>,
        rows: Vec<Vec<FieldValue>>,
    ) -> Result<Self, SqlError> {
        let mut types = vec![DataType::Null; names.len()];
        for row in &rows {
            if row.len() != names.len() {
                return Err(SqlError::schema_error(
                    format!(
                        "Row width {} does not match column count {}",
                        row.len(),
                        names.len()
                    ),
                    None,
                ));
            }
            for (index, value) in row.iter().enumerate() {
                let value_type = value.data_type();
                if value_type == DataType::Null {
                    continue;
                }
                if types[index] == DataType::Null {
                    types[index] = value_type;
                } else if types[index] != value_type {
                    return Err(SqlError::type_mismatch_error(
                        types[index].to_string(),
                        value_type.to_string(),
                        Some(value.to_string()),
                    ));
                }
            }
        }

        let columns = names
            .into_iter()
            .zip(types)
            .map(|(name, data_type)| Column { name, data_type })
            .collect();
        Ok(RowSet { columns, rows })
    }

    /// Index of a named column, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the rowset holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow one row together with the column header
    pub fn row(&self, index: usize) -> RowRef<'_> {
        RowRef {
            columns: &self.columns,
            values: &self.rows[index],
        }
    }

    /// Renders the rowset as golden-fixture CSV
    pub fn to_csv(&self) -> String {
        crate::tracesql::sql::output::csv::render(self)
    }

    /// Renders the rowset as structured JSON
    pub fn to_json(&self) -> Result<String, SqlError> {
        crate::tracesql::sql::output::json::render(self)
    }
}

impl Serialize for RowSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("columns", &self.columns)?;
        map.serialize_entry("rows", &RowsSerializer(&self.rows))?;
        map.end()
    }
}

/// Serializes rows as arrays-of-arrays, preserving column order
struct RowsSerializer<'a>(&'a [Vec<FieldValue>]);

impl Serialize for RowsSerializer<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for row in self.0 {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

/// A borrowed view of one row against its column header.
///
/// Expression evaluation resolves column references through this view.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    pub columns: &'a [Column],
    pub values: &'a [FieldValue],
}

impl<'a> RowRef<'a> {
    /// An empty row for FROM-less scalar selects
    pub fn empty() -> RowRef<'static> {
        RowRef {
            columns: &[],
            values: &[],
        }
    }

    /// Looks up a column value by name
    pub fn get(&self, name: &str) -> Option<&'a FieldValue> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .map(|index| &self.values[index])
    }
}
