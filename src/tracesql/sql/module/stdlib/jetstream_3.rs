//! The `chrome.jetstream_3` module.
//!
//! Derives JetStream 3 benchmark metrics from a recorded browser trace:
//!
//! - `chrome_jetstream_3_measure` — one row per measured subtest span:
//!   `name, top_level_name, iteration, subtest, dur`
//! - `chrome_jetstream_3_benchmark_score` — one score per top-level
//!   benchmark suite: `top_level_name, score`
//! - `chrome_jetstream_3_score()` — the overall run score
//!
//! The measure table is a plain projection of the base event table (with
//! `duration` renamed to `dur`); the score relations are native builders
//! on top of it, since geometric-mean scoring needs the aggregation
//! engine rather than relational operators.

use crate::tracesql::sql::ast::SelectStatement;
use crate::tracesql::sql::context::QueryContext;
use crate::tracesql::sql::error::SqlError;
use crate::tracesql::sql::execution::aggregation::ScoreEngine;
use crate::tracesql::sql::execution::types::{Column, DataType, FieldValue, RowSet};
use crate::tracesql::sql::module::{Module, TableDef};
use crate::tracesql::store::EVENT_TABLE;
use std::sync::Arc;

/// Qualified module name used with `INCLUDE MODULE`
pub const MODULE_NAME: &str = "chrome.jetstream_3";
/// Per-span measurement table
pub const MEASURE_TABLE: &str = "chrome_jetstream_3_measure";
/// Per-suite score table
pub const BENCHMARK_SCORE_TABLE: &str = "chrome_jetstream_3_benchmark_score";
/// Overall-score scalar function
pub const SCORE_FUNCTION: &str = "chrome_jetstream_3_score";

/// Builds the module definition
pub fn module() -> Module {
    Module::new(MODULE_NAME)
        .with_table(MEASURE_TABLE, TableDef::Select(measure_definition()))
        .with_table(
            BENCHMARK_SCORE_TABLE,
            TableDef::Native(Arc::new(benchmark_score_table)),
        )
        .with_function(SCORE_FUNCTION, Arc::new(total_score))
}

fn measure_definition() -> SelectStatement {
    SelectStatement::projection(
        EVENT_TABLE,
        &[
            ("name", None),
            ("top_level_name", None),
            ("iteration", None),
            ("subtest", None),
            ("duration", Some("dur")),
        ],
    )
}

fn benchmark_score_table(ctx: &QueryContext) -> Result<RowSet, SqlError> {
    let measure = ctx.table(MEASURE_TABLE)?;
    let scores = ScoreEngine::benchmark_scores(&measure)?;

    let mut rowset = RowSet::new(vec![
        Column::new("top_level_name", DataType::String),
        Column::new("score", DataType::Float),
    ]);
    for (top_level_name, score) in scores {
        rowset
            .rows
            .push(vec![FieldValue::String(top_level_name), FieldValue::Float(score)]);
    }
    Ok(rowset)
}

fn total_score(ctx: &QueryContext) -> Result<FieldValue, SqlError> {
    let measure = ctx.table(MEASURE_TABLE)?;
    Ok(FieldValue::Float(ScoreEngine::total_score(&measure)?))
}
