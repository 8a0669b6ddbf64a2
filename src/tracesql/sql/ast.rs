/*!
# Trace SQL Abstract Syntax Tree (AST)

This module defines the Abstract Syntax Tree for the trace query surface:
`INCLUDE MODULE` statements that activate a standard-library module for the
current query, followed by a `SELECT` over the base event table, a derived
table, or no table at all (scalar-function selects).

## Example Queries

```sql
-- Measure rows of a benchmark run, in stable fixture order
INCLUDE MODULE chrome.jetstream_3;
SELECT name, top_level_name, iteration, subtest, dur
FROM chrome_jetstream_3_measure
ORDER BY name, iteration, subtest;

-- Whole-dataset aggregate via a module scalar function, no FROM clause
INCLUDE MODULE chrome.jetstream_3;
SELECT format('%.5f', chrome_jetstream_3_score()) AS score;
```

## Architecture

The AST is designed to be:
- **Immutable**: all nodes are plain data, safe to share across threads
- **Composable**: module view definitions reuse the same `SelectStatement`
  shape as top-level queries
- **Type-Safe**: full Rust type checking throughout
*/

/// Root AST node for a single trace SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceQuery {
    /// `INCLUDE MODULE <dotted.name>;` — makes a registered module's derived
    /// tables and scalar functions visible for the remainder of the query
    /// script. Scope is query-local, never process-wide.
    IncludeModule {
        /// Qualified dotted module name, e.g. `chrome.jetstream_3`
        name: String,
    },
    /// A `SELECT` statement producing the query's result rowset.
    Select(SelectStatement),
}

/// A `SELECT` statement over a base or derived table.
///
/// The same shape serves top-level queries and module view definitions,
/// so a derived table is simply a named, pre-bound `SelectStatement`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Fields to select (columns, expressions, wildcard)
    pub fields: Vec<SelectField>,
    /// Source table name; `None` for single-row scalar selects
    pub from: Option<String>,
    /// Optional WHERE clause for row filtering
    pub where_clause: Option<Expr>,
    /// Optional ORDER BY for result ordering, applied after projection
    pub order_by: Option<Vec<OrderByExpr>>,
    /// Optional LIMIT for result set size control
    pub limit: Option<u64>,
}

/// Field selection in a SELECT clause
#[derive(Debug, Clone, PartialEq)]
pub enum SelectField {
    /// Expression with optional alias: `expr [AS alias]`
    Expression { expr: Expr, alias: Option<String> },
    /// Wildcard selection: `*`
    Wildcard,
}

/// ORDER BY expression with direction
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub direction: OrderDirection,
}

/// Sort direction for ORDER BY
#[derive(Debug, Clone, PartialEq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// Expressions for projections and WHERE clauses
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference
    Column(String),
    /// Literal values
    Literal(LiteralValue),
    /// Binary operations: `expr op expr`
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    /// Unary operations: `op expr`
    UnaryOp { op: UnaryOperator, expr: Box<Expr> },
    /// Function calls: `func_name(args...)`; module scalar functions take
    /// no arguments and aggregate over the whole dataset
    Function { name: String, args: Vec<Expr> },
}

/// Literal values in trace SQL
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

/// Binary operators
#[derive(Debug, Clone, PartialEq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,

    // Logical
    And,
    Or,
}

/// Unary operators
#[derive(Debug, Clone, PartialEq)]
pub enum UnaryOperator {
    Not,
    Minus,
}

impl SelectStatement {
    /// Convenience constructor for programmatic view definitions:
    /// projects the given columns from `table` with no filter or ordering.
    pub fn projection(table: impl Into<String>, columns: &[(&str, Option<&str>)]) -> Self {
        SelectStatement {
            fields: columns
                .iter()
                .map(|(column, alias)| SelectField::Expression {
                    expr: Expr::Column((*column).to_string()),
                    alias: alias.map(|a| a.to_string()),
                })
                .collect(),
            from: Some(table.into()),
            where_clause: None,
            order_by: None,
            limit: None,
        }
    }
}
