//! View/macro evaluator.
//!
//! Expands a derived-table definition into a materialized rowset for the
//! current query: the source relation is resolved (base `event` table,
//! another derived table, or a native builder), rows are filtered by the
//! WHERE predicate, projected through the select expressions (with `AS`
//! renaming), ordered, and truncated.
//!
//! Evaluation is recursive — a view's FROM clause may name another derived
//! table — and carries an explicit resolution stack so a self-referential
//! view chain fails with `CyclicDependencyError` instead of recursing
//! forever. All evaluation is deterministic: output order depends only on
//! source order, the predicate, and ORDER BY, never on hash-map iteration.

use crate::tracesql::sql::ast::{Expr, SelectField, SelectStatement};
use crate::tracesql::sql::context::QueryContext;
use crate::tracesql::sql::error::SqlError;
use crate::tracesql::sql::execution::expression::ExpressionEvaluator;
use crate::tracesql::sql::execution::ordering::OrderProcessor;
use crate::tracesql::sql::execution::types::{RowRef, RowSet};
use crate::tracesql::sql::module::TableDef;
use crate::tracesql::store::EVENT_TABLE;
use log::debug;

/// Evaluates derived-table definitions and SELECT statements against a
/// query context
pub struct ViewEvaluator;

impl ViewEvaluator {
    /// Materializes a base or derived table by name.
    ///
    /// The base `event` table scans the store directly; derived names
    /// resolve through the query scope's included modules. Unknown names
    /// fail with `SchemaError`.
    pub fn materialize(ctx: &QueryContext, table_name: &str) -> Result<RowSet, SqlError> {
        Self::materialize_with_stack(ctx, table_name, &mut Vec::new())
    }

    /// Executes a top-level SELECT statement.
    pub fn run_select(ctx: &QueryContext, stmt: &SelectStatement) -> Result<RowSet, SqlError> {
        Self::select_with_stack(ctx, stmt, &mut Vec::new())
    }

    fn materialize_with_stack(
        ctx: &QueryContext,
        table_name: &str,
        stack: &mut Vec<String>,
    ) -> Result<RowSet, SqlError> {
        if table_name == EVENT_TABLE {
            return ctx.store().scan(table_name);
        }

        let def = ctx.table_def(table_name).ok_or_else(|| {
            SqlError::schema_error(format!("Unknown table '{}'", table_name), None)
        })?;

        if stack.iter().any(|name| name == table_name) {
            let mut chain = stack.clone();
            chain.push(table_name.to_string());
            return Err(SqlError::cyclic_dependency_error(chain));
        }

        stack.push(table_name.to_string());
        let result = match def {
            TableDef::Select(stmt) => Self::select_with_stack(ctx, stmt, stack),
            TableDef::Native(build) => build(ctx),
        };
        stack.pop();

        if let Ok(rowset) = &result {
            debug!(
                "Materialized derived table '{}' ({} rows)",
                table_name,
                rowset.len()
            );
        }
        result
    }

    fn select_with_stack(
        ctx: &QueryContext,
        stmt: &SelectStatement,
        stack: &mut Vec<String>,
    ) -> Result<RowSet, SqlError> {
        let mut result = match &stmt.from {
            Some(table_name) => {
                let source = Self::materialize_with_stack(ctx, table_name, stack)?;
                let (names, exprs) = Self::output_fields(stmt, Some(&source))?;

                let mut rows = Vec::new();
                for values in &source.rows {
                    let row = RowRef {
                        columns: &source.columns,
                        values,
                    };
                    if let Some(predicate) = &stmt.where_clause {
                        if !ExpressionEvaluator::evaluate_predicate(predicate, &row, ctx)? {
                            continue;
                        }
                    }
                    let projected = exprs
                        .iter()
                        .map(|expr| ExpressionEvaluator::evaluate(expr, &row, ctx))
                        .collect::<Result<Vec<_>, _>>()?;
                    rows.push(projected);
                }
                RowSet::from_rows(names, rows)?
            }
            None => {
                // FROM-less select: a single row of scalar expressions
                let (names, exprs) = Self::output_fields(stmt, None)?;
                let row = exprs
                    .iter()
                    .map(|expr| ExpressionEvaluator::evaluate(expr, &RowRef::empty(), ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                RowSet::from_rows(names, vec![row])?
            }
        };

        if let Some(order_by) = &stmt.order_by {
            OrderProcessor::process(&mut result, order_by, ctx)?;
        }
        if let Some(limit) = stmt.limit {
            result.rows.truncate(limit as usize);
        }
        Ok(result)
    }

    /// Expands the select list into output column names and the expression
    /// evaluated for each.
    fn output_fields(
        stmt: &SelectStatement,
        source: Option<&RowSet>,
    ) -> Result<(Vec<String>, Vec<Expr>), SqlError> {
        let mut names = Vec::new();
        let mut exprs = Vec::new();

        for (index, field) in stmt.fields.iter().enumerate() {
            match field {
                SelectField::Wildcard => {
                    let source = source.ok_or_else(|| {
                        SqlError::schema_error("SELECT * requires a FROM table", None)
                    })?;
                    for column in &source.columns {
                        names.push(column.name.clone());
                        exprs.push(Expr::Column(column.name.clone()));
                    }
                }
                SelectField::Expression { expr, alias } => {
                    let name = match alias {
                        Some(alias) => alias.clone(),
                        None => match expr {
                            Expr::Column(column) => column.clone(),
                            Expr::Function { name, .. } => name.clone(),
                            _ => format!("column_{}", index + 1),
                        },
                    };
                    names.push(name);
                    exprs.push(expr.clone());
                }
            }
        }

        Ok((names, exprs))
    }
}
