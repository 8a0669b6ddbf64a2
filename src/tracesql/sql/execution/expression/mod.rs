//! Expression evaluation for trace SQL queries.
//!
//! The main interface:
//!
//! - [`ExpressionEvaluator`] - evaluates AST expressions against a row view
//! - [`BuiltinFunctions`] - built-in scalar functions such as `format()`

pub mod evaluator;
pub mod functions;

pub use self::evaluator::ExpressionEvaluator;
pub use self::functions::BuiltinFunctions;
