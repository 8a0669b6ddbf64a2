//! Expression evaluator for trace SQL expressions.
//!
//! Implements the core expression evaluation logic that processes AST
//! expressions against row views: column references, literals, arithmetic
//! and comparison operators, logical connectives, and function calls
//! (built-ins plus module scalar functions resolved through the query
//! context).
//!
//! NULL handling follows SQL conventions where they matter here: NULL
//! propagates through arithmetic and comparisons, and a NULL predicate
//! result filters the row out.

use crate::tracesql::sql::ast::{BinaryOperator, Expr, LiteralValue, UnaryOperator};
use crate::tracesql::sql::context::QueryContext;
use crate::tracesql::sql::error::SqlError;
use crate::tracesql::sql::execution::expression::functions::BuiltinFunctions;
use crate::tracesql::sql::execution::types::{FieldValue, RowRef};

/// Main expression evaluator that handles all expression types
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    /// Evaluates an expression against a row, resolving functions through
    /// the query context.
    pub fn evaluate(
        expr: &Expr,
        row: &RowRef<'_>,
        ctx: &QueryContext,
    ) -> Result<FieldValue, SqlError> {
        match expr {
            Expr::Column(name) => row.get(name).cloned().ok_or_else(|| {
                SqlError::schema_error("Unknown column", Some(name.clone()))
            }),
            Expr::Literal(literal) => Ok(Self::literal_value(literal)),
            Expr::BinaryOp { left, op, right } => {
                let left = Self::evaluate(left, row, ctx)?;
                let right = Self::evaluate(right, row, ctx)?;
                Self::evaluate_binary(&left, op, &right)
            }
            Expr::UnaryOp { op, expr } => {
                let value = Self::evaluate(expr, row, ctx)?;
                Self::evaluate_unary(op, &value)
            }
            Expr::Function { name, args } => {
                BuiltinFunctions::evaluate_function_by_name(name, args, row, ctx)
            }
        }
    }

    /// Evaluates a WHERE predicate: TRUE keeps the row, FALSE and NULL
    /// drop it, anything non-boolean is a type mismatch.
    pub fn evaluate_predicate(
        expr: &Expr,
        row: &RowRef<'_>,
        ctx: &QueryContext,
    ) -> Result<bool, SqlError> {
        match Self::evaluate(expr, row, ctx)? {
            FieldValue::Boolean(keep) => Ok(keep),
            FieldValue::Null => Ok(false),
            other => Err(SqlError::type_mismatch_error(
                "BOOLEAN",
                other.type_name(),
                Some(other.to_string()),
            )),
        }
    }

    fn literal_value(literal: &LiteralValue) -> FieldValue {
        match literal {
            LiteralValue::String(s) => FieldValue::String(s.clone()),
            LiteralValue::Integer(i) => FieldValue::Integer(*i),
            LiteralValue::Float(f) => FieldValue::Float(*f),
            LiteralValue::Boolean(b) => FieldValue::Boolean(*b),
            LiteralValue::Null => FieldValue::Null,
        }
    }

    fn evaluate_binary(
        left: &FieldValue,
        op: &BinaryOperator,
        right: &FieldValue,
    ) -> Result<FieldValue, SqlError> {
        use BinaryOperator::*;

        match op {
            And | Or => {
                let left = Self::to_bool(left)?;
                let right = Self::to_bool(right)?;
                let result = match op {
                    And => left && right,
                    _ => left || right,
                };
                Ok(FieldValue::Boolean(result))
            }
            Add | Subtract | Multiply | Divide => Self::evaluate_arithmetic(left, op, right),
            Equal | NotEqual | LessThan | LessThanOrEqual | GreaterThan
            | GreaterThanOrEqual => Self::evaluate_comparison(left, op, right),
        }
    }

    fn evaluate_unary(op: &UnaryOperator, value: &FieldValue) -> Result<FieldValue, SqlError> {
        match (op, value) {
            (_, FieldValue::Null) => Ok(FieldValue::Null),
            (UnaryOperator::Not, FieldValue::Boolean(b)) => Ok(FieldValue::Boolean(!b)),
            (UnaryOperator::Not, other) => Err(SqlError::type_mismatch_error(
                "BOOLEAN",
                other.type_name(),
                Some(other.to_string()),
            )),
            (UnaryOperator::Minus, FieldValue::Integer(i)) => {
                i.checked_neg().map(FieldValue::Integer).ok_or_else(|| {
                    SqlError::data_error("Integer overflow in negation", Some(i.to_string()))
                })
            }
            (UnaryOperator::Minus, FieldValue::Float(f)) => Ok(FieldValue::Float(-f)),
            (UnaryOperator::Minus, other) => Err(SqlError::type_mismatch_error(
                "INTEGER or FLOAT",
                other.type_name(),
                Some(other.to_string()),
            )),
        }
    }

    fn evaluate_arithmetic(
        left: &FieldValue,
        op: &BinaryOperator,
        right: &FieldValue,
    ) -> Result<FieldValue, SqlError> {
        use BinaryOperator::*;
        use FieldValue::*;

        match (left, right) {
            (Null, _) | (_, Null) => Ok(Null),
            (Integer(a), Integer(b)) => match op {
                Add => a.checked_add(*b).map(Integer).ok_or_else(|| {
                    SqlError::data_error("Integer overflow in addition", None)
                }),
                Subtract => a.checked_sub(*b).map(Integer).ok_or_else(|| {
                    SqlError::data_error("Integer overflow in subtraction", None)
                }),
                Multiply => a.checked_mul(*b).map(Integer).ok_or_else(|| {
                    SqlError::data_error("Integer overflow in multiplication", None)
                }),
                _ => {
                    if *b == 0 {
                        Err(SqlError::data_error("Division by zero", None))
                    } else {
                        Ok(Integer(a / b))
                    }
                }
            },
            (Integer(_), Float(_)) | (Float(_), Integer(_)) | (Float(_), Float(_)) => {
                let a = Self::as_f64(left);
                let b = Self::as_f64(right);
                let result = match op {
                    Add => a + b,
                    Subtract => a - b,
                    Multiply => a * b,
                    _ => {
                        if b == 0.0 {
                            return Err(SqlError::data_error("Division by zero", None));
                        }
                        a / b
                    }
                };
                if result.is_finite() {
                    Ok(Float(result))
                } else {
                    Err(SqlError::data_error(
                        "Non-finite arithmetic result",
                        Some(result.to_string()),
                    ))
                }
            }
            _ => Err(SqlError::type_mismatch_error(
                "INTEGER or FLOAT",
                format!("{} and {}", left.type_name(), right.type_name()),
                None,
            )),
        }
    }

    fn evaluate_comparison(
        left: &FieldValue,
        op: &BinaryOperator,
        right: &FieldValue,
    ) -> Result<FieldValue, SqlError> {
        use BinaryOperator::*;
        use std::cmp::Ordering;

        let ordering = match (left, right) {
            (FieldValue::Null, _) | (_, FieldValue::Null) => return Ok(FieldValue::Null),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.total_cmp(b),
            (FieldValue::Integer(a), FieldValue::Float(b)) => (*a as f64).total_cmp(b),
            (FieldValue::Float(a), FieldValue::Integer(b)) => a.total_cmp(&(*b as f64)),
            (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
            _ => {
                return Err(SqlError::type_mismatch_error(
                    left.type_name(),
                    right.type_name(),
                    Some(right.to_string()),
                ))
            }
        };

        let result = match op {
            Equal => ordering == Ordering::Equal,
            NotEqual => ordering != Ordering::Equal,
            LessThan => ordering == Ordering::Less,
            LessThanOrEqual => ordering != Ordering::Greater,
            GreaterThan => ordering == Ordering::Greater,
            _ => ordering != Ordering::Less,
        };
        Ok(FieldValue::Boolean(result))
    }

    fn to_bool(value: &FieldValue) -> Result<bool, SqlError> {
        match value {
            FieldValue::Boolean(b) => Ok(*b),
            FieldValue::Null => Ok(false),
            other => Err(SqlError::type_mismatch_error(
                "BOOLEAN",
                other.type_name(),
                Some(other.to_string()),
            )),
        }
    }

    fn as_f64(value: &FieldValue) -> f64 {
        match value {
            FieldValue::Integer(i) => *i as f64,
            FieldValue::Float(f) => *f,
            _ => 0.0,
        }
    }
}
