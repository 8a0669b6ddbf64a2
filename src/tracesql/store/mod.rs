//! Read-only event store for recorded trace spans.
//!
//! The store holds the base `event` table: one row per measured span with
//! its benchmark attribution (`name`, `top_level_name`), iteration index,
//! subtest label and duration in nanoseconds. Events are immutable once
//! loaded; every query scans the same columnar snapshot, so independent
//! queries can run in parallel against a shared store.

use crate::tracesql::sql::error::SqlError;
use crate::tracesql::sql::execution::types::{Column, DataType, FieldValue, RowSet};
use log::debug;
use serde::{Deserialize, Serialize};

/// Name of the base table exposed by every event store
pub const EVENT_TABLE: &str = "event";

/// A recorded span: a named interval with a duration, belonging to a
/// benchmark iteration.
///
/// `duration` is in nanoseconds. `(name, iteration, subtest)` need not be
/// unique within a `top_level_name` — a single iteration can carry several
/// subtest labels (e.g. `WSL-mainRun` and `WSL-stdlib` both at iteration 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Stable row identifier
    pub id: i64,
    /// Benchmark name, e.g. `3d-cube-SP`
    pub name: String,
    /// Benchmark suite/category grouping the named subtests, e.g. `Sunspider`
    pub top_level_name: String,
    /// Zero-based iteration index
    pub iteration: i64,
    /// Subtest label, e.g. `First` / `Worst` / `Average`
    pub subtest: String,
    /// Measured duration in nanoseconds
    pub duration: i64,
}

/// Columnar, read-only table of trace events.
///
/// Loading materializes one vector per column; scans rebuild row views on
/// demand. The store never mutates after `load`, which is what makes
/// concurrent `&self` querying safe.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    ids: Vec<i64>,
    names: Vec<String>,
    top_level_names: Vec<String>,
    iterations: Vec<i64>,
    subtests: Vec<String>,
    durations: Vec<i64>,
}

impl EventStore {
    /// Loads a sequence of events into a columnar snapshot.
    pub fn load(events: Vec<Event>) -> Self {
        let mut store = EventStore {
            ids: Vec::with_capacity(events.len()),
            names: Vec::with_capacity(events.len()),
            top_level_names: Vec::with_capacity(events.len()),
            iterations: Vec::with_capacity(events.len()),
            subtests: Vec::with_capacity(events.len()),
            durations: Vec::with_capacity(events.len()),
        };
        for event in events {
            store.ids.push(event.id);
            store.names.push(event.name);
            store.top_level_names.push(event.top_level_name);
            store.iterations.push(event.iteration);
            store.subtests.push(event.subtest);
            store.durations.push(event.duration);
        }
        debug!("Loaded event store with {} events", store.len());
        store
    }

    /// Loads events from a JSON array of event objects.
    pub fn from_json(json: &str) -> Result<Self, SqlError> {
        let events: Vec<Event> = serde_json::from_str(json)
            .map_err(|e| SqlError::data_error(format!("Invalid event JSON: {}", e), None))?;
        Ok(Self::load(events))
    }

    /// Number of loaded events
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when no events are loaded
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Declared schema of the base event table
    pub fn schema() -> Vec<Column> {
        vec![
            Column::new("id", DataType::Integer),
            Column::new("name", DataType::String),
            Column::new("top_level_name", DataType::String),
            Column::new("iteration", DataType::Integer),
            Column::new("subtest", DataType::String),
            Column::new("duration", DataType::Integer),
        ]
    }

    /// Scans a named table into a rowset.
    ///
    /// Only the base `event` table lives in the store; any other name fails
    /// with `SchemaError` (derived tables are resolved by the query context,
    /// not here).
    pub fn scan(&self, table_name: &str) -> Result<RowSet, SqlError> {
        if table_name != EVENT_TABLE {
            return Err(SqlError::schema_error(
                format!("Unknown table '{}'", table_name),
                None,
            ));
        }

        let rows = (0..self.len())
            .map(|i| {
                vec![
                    FieldValue::Integer(self.ids[i]),
                    FieldValue::String(self.names[i].clone()),
                    FieldValue::String(self.top_level_names[i].clone()),
                    FieldValue::Integer(self.iterations[i]),
                    FieldValue::String(self.subtests[i].clone()),
                    FieldValue::Integer(self.durations[i]),
                ]
            })
            .collect();

        Ok(RowSet {
            columns: Self::schema(),
            rows,
        })
    }
}
