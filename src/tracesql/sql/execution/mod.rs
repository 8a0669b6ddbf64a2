/*!
# Trace SQL Execution Engine

This module implements the execution engine for trace SQL query scripts.
It processes parsed AST statements against the loaded event store: the
`INCLUDE MODULE` statements build up the query-local scope, and the final
`SELECT` is evaluated through the view evaluator into a typed rowset.

## Architecture

Execution is synchronous and single-threaded per query; a query is a pure
function of the loaded store plus the registered modules. The engine holds
both behind `&self`, so independent queries may run concurrently from
multiple threads against one engine — per-query state lives entirely in the
[`QueryContext`](crate::tracesql::sql::context::QueryContext).

## Supported Operations

- `INCLUDE MODULE <dotted.name>` — query-scoped module activation
- `SELECT` with projection/renaming, optional FROM (base or derived
  table), WHERE filtering, multi-column ORDER BY, and LIMIT
- Scalar module functions over the whole dataset, e.g.
  `chrome_jetstream_3_score()`
*/

pub mod aggregation;
pub mod expression;
pub mod ordering;
pub mod types;
pub mod view;

use crate::tracesql::sql::ast::TraceQuery;
use crate::tracesql::sql::context::QueryContext;
use crate::tracesql::sql::error::SqlError;
use crate::tracesql::sql::module::ModuleRegistry;
use crate::tracesql::sql::parser::TraceSqlParser;
use crate::tracesql::store::EventStore;
use log::debug;
use self::types::RowSet;
use self::view::ViewEvaluator;

/// Query execution engine over a loaded event store and module registry.
///
/// # Examples
///
/// ```rust,no_run
/// use tracesql::{EventStore, ModuleRegistry, TraceExecutionEngine};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let engine = TraceExecutionEngine::new(
///         EventStore::load(Vec::new()),
///         ModuleRegistry::with_stdlib(),
///     );
///     let result = engine.execute("SELECT * FROM event;")?;
///     assert!(result.is_empty());
///     Ok(())
/// }
/// ```
pub struct TraceExecutionEngine {
    store: EventStore,
    registry: ModuleRegistry,
    parser: TraceSqlParser,
}

impl TraceExecutionEngine {
    /// Creates an engine over a loaded store and a registered module
    /// catalog. Both are read-only from here on.
    pub fn new(store: EventStore, registry: ModuleRegistry) -> Self {
        TraceExecutionEngine {
            store,
            registry,
            parser: TraceSqlParser::new(),
        }
    }

    /// The event store this engine queries
    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// The module registry this engine resolves includes against
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Parses and executes a query script, returning the ordered, typed
    /// result rowset.
    ///
    /// A script is any number of `INCLUDE MODULE` statements followed by
    /// exactly one `SELECT`. On failure no rows are returned — there are
    /// no partial results.
    pub fn execute(&self, sql: &str) -> Result<RowSet, SqlError> {
        debug!("Executing query script: {}", sql.trim());
        let statements = self.parser.parse_script(sql)?;
        self.execute_statements(&statements)
    }

    /// Executes pre-parsed statements against a fresh query context.
    pub fn execute_statements(&self, statements: &[TraceQuery]) -> Result<RowSet, SqlError> {
        let mut ctx = QueryContext::new(&self.store, &self.registry);
        let mut result = None;

        for statement in statements {
            match statement {
                TraceQuery::IncludeModule { name } => {
                    if result.is_some() {
                        return Err(SqlError::parse_error(
                            "INCLUDE MODULE must precede the SELECT statement",
                            None,
                        ));
                    }
                    ctx.include(name)?;
                }
                TraceQuery::Select(select) => {
                    if result.is_some() {
                        return Err(SqlError::parse_error(
                            "Query script must contain a single SELECT statement",
                            None,
                        ));
                    }
                    result = Some(ViewEvaluator::run_select(&ctx, select)?);
                }
            }
        }

        result.ok_or_else(|| {
            SqlError::parse_error("Query script contains no SELECT statement", None)
        })
    }
}

pub use self::types::{Column, DataType, FieldValue};
