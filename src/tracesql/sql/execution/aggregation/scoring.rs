//! JetStream-family benchmark scoring.
//!
//! Scores are computed from a measure rowset with columns
//! `name, top_level_name, subtest, dur` (duration in nanoseconds):
//!
//! 1. Per benchmark `name`, each distinct subtest label gets a measured
//!    time: the mean duration of its rows — except the `Average` label,
//!    whose time is the mean over *all* of the benchmark's non-`First`
//!    rows (JetStream folds the worst iterations into the average).
//! 2. Subtest score = 5000 ms divided by the measured time in ms; shorter
//!    runs score higher.
//! 3. Per `top_level_name`, the score is the geometric mean of all the
//!    group's `(name, subtest)` scores; the overall score is the
//!    unweighted geometric mean of the per-top-level scores.
//!
//! Groups live in `BTreeMap`s and logarithm accumulation walks them in
//! byte-wise key order, so scores are invariant to input row order.
//! A zero or negative duration anywhere fails the query with `DataError`
//! before any score is produced.

use crate::tracesql::sql::error::SqlError;
use crate::tracesql::sql::execution::aggregation::functions::AggregateFunctions;
use crate::tracesql::sql::execution::types::{FieldValue, RowSet};
use log::debug;
use std::collections::BTreeMap;

/// JetStream reference time: subtest score = 5000 / measured time in ms,
/// so a subtest finishing in exactly 5000 ms scores 1.0.
pub const REFERENCE_TIME_MS: f64 = 5000.0;

const NANOS_PER_MS: f64 = 1_000_000.0;
const FIRST_LABEL: &str = "First";
const AVERAGE_LABEL: &str = "Average";

/// Per-benchmark duration samples, split by subtest label
#[derive(Default)]
struct BenchmarkSamples {
    top_level_name: String,
    by_label: BTreeMap<String, Vec<i64>>,
    non_first: Vec<i64>,
}

/// Computes benchmark and overall scores from a measure rowset
pub struct ScoreEngine;

impl ScoreEngine {
    /// One score per `top_level_name`, sorted by group name.
    pub fn benchmark_scores(measure: &RowSet) -> Result<Vec<(String, f64)>, SqlError> {
        let benchmarks = Self::collect_samples(measure)?;

        // (name, subtest) scores per top-level group, pushed in sorted
        // benchmark/label order for deterministic log accumulation
        let mut group_scores: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (name, samples) in &benchmarks {
            for (label, durations) in &samples.by_label {
                let durations = if label == AVERAGE_LABEL {
                    &samples.non_first
                } else {
                    durations
                };
                let time_ms = AggregateFunctions::mean(durations)? / NANOS_PER_MS;
                let score = REFERENCE_TIME_MS / time_ms;
                debug!("Subtest score {}/{}: {}", name, label, score);
                group_scores
                    .entry(samples.top_level_name.clone())
                    .or_default()
                    .push(score);
            }
        }

        let mut scores = Vec::with_capacity(group_scores.len());
        for (top_level_name, subtest_scores) in group_scores {
            let score = AggregateFunctions::geometric_mean(&subtest_scores)?;
            scores.push((top_level_name, score));
        }
        Ok(scores)
    }

    /// Single overall score: the geometric mean of the per-top-level
    /// scores.
    pub fn total_score(measure: &RowSet) -> Result<f64, SqlError> {
        let scores = Self::benchmark_scores(measure)?;
        let values: Vec<f64> = scores.into_iter().map(|(_, score)| score).collect();
        AggregateFunctions::geometric_mean(&values)
    }

    fn collect_samples(
        measure: &RowSet,
    ) -> Result<BTreeMap<String, BenchmarkSamples>, SqlError> {
        let name_index = Self::required_column(measure, "name")?;
        let top_level_index = Self::required_column(measure, "top_level_name")?;
        let subtest_index = Self::required_column(measure, "subtest")?;
        let dur_index = Self::required_column(measure, "dur")?;

        let mut benchmarks: BTreeMap<String, BenchmarkSamples> = BTreeMap::new();
        for row in &measure.rows {
            let name = Self::string_value(&row[name_index], "name")?;
            let top_level_name = Self::string_value(&row[top_level_index], "top_level_name")?;
            let subtest = Self::string_value(&row[subtest_index], "subtest")?;
            let duration = Self::integer_value(&row[dur_index], "dur")?;

            if duration <= 0 {
                return Err(SqlError::data_error(
                    format!("Span duration must be positive for '{}'", name),
                    Some(duration.to_string()),
                ));
            }

            let samples = benchmarks.entry(name.to_string()).or_default();
            if samples.top_level_name.is_empty() {
                samples.top_level_name = top_level_name.to_string();
            }
            samples
                .by_label
                .entry(subtest.to_string())
                .or_default()
                .push(duration);
            if subtest != FIRST_LABEL {
                samples.non_first.push(duration);
            }
        }
        Ok(benchmarks)
    }

    fn required_column(measure: &RowSet, name: &str) -> Result<usize, SqlError> {
        measure.column_index(name).ok_or_else(|| {
            SqlError::schema_error(
                "Measure table is missing a required column",
                Some(name.to_string()),
            )
        })
    }

    fn string_value<'a>(value: &'a FieldValue, column: &str) -> Result<&'a str, SqlError> {
        match value {
            FieldValue::String(s) => Ok(s),
            other => Err(SqlError::type_mismatch_error(
                "STRING",
                other.type_name(),
                Some(format!("{} in column '{}'", other, column)),
            )),
        }
    }

    fn integer_value(value: &FieldValue, column: &str) -> Result<i64, SqlError> {
        match value {
            FieldValue::Integer(i) => Ok(*i),
            other => Err(SqlError::type_mismatch_error(
                "INTEGER",
                other.type_name(),
                Some(format!("{} in column '{}'", other, column)),
            )),
        }
    }
}
