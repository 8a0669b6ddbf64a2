//! Built-in scalar function implementations.
//!
//! The engine ships one built-in, SQLite-compatible `format()` (printf
//! subset: `%s`, `%d`, `%.Nf`, `%%`), and dispatches every other function
//! name to the scalar functions of the modules included in the current
//! query scope. Module scalar functions take no arguments and aggregate
//! over the whole dataset, e.g. `chrome_jetstream_3_score()`.

use crate::tracesql::sql::ast::Expr;
use crate::tracesql::sql::context::QueryContext;
use crate::tracesql::sql::error::SqlError;
use crate::tracesql::sql::execution::expression::evaluator::ExpressionEvaluator;
use crate::tracesql::sql::execution::types::{FieldValue, RowRef};

/// Provides built-in scalar function implementations
pub struct BuiltinFunctions;

impl BuiltinFunctions {
    /// Evaluates a function by name with arguments.
    ///
    /// Built-ins are matched case-insensitively; unmatched names resolve
    /// against the query scope's module scalar functions and fail with
    /// `NotFoundError` when no included module provides them.
    pub fn evaluate_function_by_name(
        name: &str,
        args: &[Expr],
        row: &RowRef<'_>,
        ctx: &QueryContext,
    ) -> Result<FieldValue, SqlError> {
        match name.to_uppercase().as_str() {
            "FORMAT" => Self::format_function(args, row, ctx),
            _ => Self::evaluate_module_function(name, args, ctx),
        }
    }

    fn evaluate_module_function(
        name: &str,
        args: &[Expr],
        ctx: &QueryContext,
    ) -> Result<FieldValue, SqlError> {
        let function = ctx.scalar_function(name).ok_or_else(|| {
            SqlError::not_found_error(name, "No included module defines this function")
        })?;
        if !args.is_empty() {
            return Err(SqlError::data_error(
                format!(
                    "Function '{}' takes no arguments, {} provided",
                    name,
                    args.len()
                ),
                None,
            ));
        }
        function(ctx)
    }

    /// `format(fmt, args...)` — printf-style string formatting.
    ///
    /// Supported conversions: `%s` (display), `%d` (integer),
    /// `%f` / `%.Nf` (fixed-precision float, default 6 digits), `%%`.
    /// Fixed-precision rendering uses Rust's `{:.N}` formatting, which is
    /// round-half-to-even on the exact binary double — the behavior the
    /// golden score fixtures were produced with.
    fn format_function(
        args: &[Expr],
        row: &RowRef<'_>,
        ctx: &QueryContext,
    ) -> Result<FieldValue, SqlError> {
        if args.is_empty() {
            return Err(SqlError::data_error(
                "FORMAT requires a format string argument",
                None,
            ));
        }

        let template = match ExpressionEvaluator::evaluate(&args[0], row, ctx)? {
            FieldValue::String(s) => s,
            other => {
                return Err(SqlError::type_mismatch_error(
                    "STRING",
                    other.type_name(),
                    Some(other.to_string()),
                ))
            }
        };

        let mut values = Vec::with_capacity(args.len() - 1);
        for arg in &args[1..] {
            values.push(ExpressionEvaluator::evaluate(arg, row, ctx)?);
        }

        let mut output = String::with_capacity(template.len());
        let mut next_arg = 0;
        let mut chars = template.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch != '%' {
                output.push(ch);
                continue;
            }
            if let Some(&'%') = chars.peek() {
                chars.next();
                output.push('%');
                continue;
            }

            // Optional precision: %.Nf
            let mut precision = None;
            if let Some(&'.') = chars.peek() {
                chars.next();
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        digits.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                precision = Some(digits.parse::<usize>().map_err(|_| {
                    SqlError::data_error(
                        format!("Invalid precision in format string '{}'", template),
                        None,
                    )
                })?);
            }

            let conversion = chars.next().ok_or_else(|| {
                SqlError::data_error(
                    format!("Incomplete conversion in format string '{}'", template),
                    None,
                )
            })?;
            let value = values.get(next_arg).ok_or_else(|| {
                SqlError::data_error(
                    format!("Too few arguments for format string '{}'", template),
                    None,
                )
            })?;
            next_arg += 1;

            match conversion {
                'f' => {
                    let number = match value {
                        FieldValue::Integer(i) => *i as f64,
                        FieldValue::Float(f) => *f,
                        other => {
                            return Err(SqlError::type_mismatch_error(
                                "INTEGER or FLOAT",
                                other.type_name(),
                                Some(other.to_string()),
                            ))
                        }
                    };
                    let precision = precision.unwrap_or(6);
                    output.push_str(&format!("{:.*}", precision, number));
                }
                'd' => {
                    let number = match value {
                        FieldValue::Integer(i) => *i,
                        FieldValue::Float(f) => *f as i64,
                        other => {
                            return Err(SqlError::type_mismatch_error(
                                "INTEGER",
                                other.type_name(),
                                Some(other.to_string()),
                            ))
                        }
                    };
                    output.push_str(&number.to_string());
                }
                's' => {
                    output.push_str(&value.to_string());
                }
                other => {
                    return Err(SqlError::data_error(
                        format!("Unsupported conversion '%{}'", other),
                        None,
                    ))
                }
            }
        }

        Ok(FieldValue::String(output))
    }
}
