//! Aggregate function primitives for benchmark scoring.
//!
//! Durations are summed in integer arithmetic before the single conversion
//! to floating point, which keeps group means exactly independent of row
//! order. Geometric means accumulate logarithms in caller-provided order;
//! the scoring engine always feeds them sorted.

use crate::tracesql::sql::error::SqlError;

/// Utilities for aggregate computation
pub struct AggregateFunctions;

impl AggregateFunctions {
    /// Arithmetic mean of integer durations.
    ///
    /// Fails with `DataError` on an empty group or on integer overflow of
    /// the sum (a trace long enough to overflow i64 nanoseconds is broken
    /// input, not a workload).
    pub fn mean(durations: &[i64]) -> Result<f64, SqlError> {
        if durations.is_empty() {
            return Err(SqlError::data_error("Mean of an empty group", None));
        }
        let mut total: i64 = 0;
        for duration in durations {
            total = total.checked_add(*duration).ok_or_else(|| {
                SqlError::data_error("Duration sum overflow", Some(duration.to_string()))
            })?;
        }
        Ok(total as f64 / durations.len() as f64)
    }

    /// Geometric mean of strictly positive values, computed as
    /// `exp(mean(ln(x)))`.
    ///
    /// Fails with `DataError` on an empty input or on any value that is not
    /// a strictly positive finite number — the combination must never leak
    /// `inf`/`NaN` into query output.
    pub fn geometric_mean(values: &[f64]) -> Result<f64, SqlError> {
        if values.is_empty() {
            return Err(SqlError::data_error(
                "Geometric mean of an empty group",
                None,
            ));
        }
        let mut log_sum = 0.0;
        for value in values {
            if !(value.is_finite() && *value > 0.0) {
                return Err(SqlError::data_error(
                    "Geometric mean requires strictly positive finite values",
                    Some(value.to_string()),
                ));
            }
            log_sum += value.ln();
        }
        Ok((log_sum / values.len() as f64).exp())
    }
}
