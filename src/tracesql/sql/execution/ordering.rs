//! ORDER BY sorting.
//!
//! Sorts a materialized rowset by its ORDER BY expressions. Sort keys are
//! evaluated once per row up front (so evaluation errors surface before any
//! reordering happens), key columns are type-checked pairwise, and the sort
//! itself is stable — equal keys preserve their source order, which is what
//! makes query output deterministic for ties.
//!
//! Comparison is per column type: integers numerically, floats by IEEE-754
//! total order, strings byte-wise (BINARY collation), booleans false-first,
//! NULL smallest. Integers and floats compare cross-type numerically.

use crate::tracesql::sql::ast::{OrderByExpr, OrderDirection};
use crate::tracesql::sql::context::QueryContext;
use crate::tracesql::sql::error::SqlError;
use crate::tracesql::sql::execution::expression::ExpressionEvaluator;
use crate::tracesql::sql::execution::types::{DataType, FieldValue, RowRef, RowSet};
use std::cmp::Ordering;

/// Processor for ORDER BY sorting operations
pub struct OrderProcessor;

impl OrderProcessor {
    /// Sorts the rowset in place according to the ORDER BY expressions.
    pub fn process(
        rowset: &mut RowSet,
        order_by: &[OrderByExpr],
        ctx: &QueryContext,
    ) -> Result<(), SqlError> {
        if order_by.is_empty() || rowset.rows.len() < 2 {
            return Ok(());
        }

        // Evaluate all sort keys before reordering anything
        let mut keys = Vec::with_capacity(rowset.rows.len());
        for values in &rowset.rows {
            let row = RowRef {
                columns: &rowset.columns,
                values,
            };
            let key = order_by
                .iter()
                .map(|item| ExpressionEvaluator::evaluate(&item.expr, &row, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            keys.push(key);
        }
        Self::check_key_types(&keys)?;

        let rows = std::mem::take(&mut rowset.rows);
        let mut keyed: Vec<(Vec<FieldValue>, Vec<FieldValue>)> =
            keys.into_iter().zip(rows).collect();
        keyed.sort_by(|(a, _), (b, _)| Self::compare_keys(a, b, order_by));
        rowset.rows = keyed.into_iter().map(|(_, row)| row).collect();
        Ok(())
    }

    /// Every key column must hold a single non-NULL type across all rows;
    /// mixed-type keys would have no defined sort order.
    fn check_key_types(keys: &[Vec<FieldValue>]) -> Result<(), SqlError> {
        let width = keys.first().map(|k| k.len()).unwrap_or(0);
        for position in 0..width {
            let mut seen = DataType::Null;
            for key in keys {
                let value_type = key[position].data_type();
                if value_type == DataType::Null {
                    continue;
                }
                let comparable = seen == DataType::Null
                    || seen == value_type
                    || (Self::is_numeric(seen) && Self::is_numeric(value_type));
                if !comparable {
                    return Err(SqlError::type_mismatch_error(
                        seen.to_string(),
                        value_type.to_string(),
                        Some(key[position].to_string()),
                    ));
                }
                if seen == DataType::Null {
                    seen = value_type;
                }
            }
        }
        Ok(())
    }

    fn is_numeric(data_type: DataType) -> bool {
        matches!(data_type, DataType::Integer | DataType::Float)
    }

    fn compare_keys(
        left: &[FieldValue],
        right: &[FieldValue],
        order_by: &[OrderByExpr],
    ) -> Ordering {
        for (index, item) in order_by.iter().enumerate() {
            let comparison = Self::compare_values(&left[index], &right[index]);
            if comparison != Ordering::Equal {
                return match item.direction {
                    OrderDirection::Asc => comparison,
                    OrderDirection::Desc => comparison.reverse(),
                };
            }
        }
        Ordering::Equal
    }

    /// Compare two values of a validated key column
    pub fn compare_values(left: &FieldValue, right: &FieldValue) -> Ordering {
        use FieldValue::*;

        match (left, right) {
            // NULL sorts smallest
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,

            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)),

            // Byte-wise string ordering (BINARY collation)
            (String(a), String(b)) => a.cmp(b),
            (Boolean(a), Boolean(b)) => a.cmp(b),

            // Unreachable after check_key_types; keep ties stable
            _ => Ordering::Equal,
        }
    }
}
