/*!
# Module Catalog

A module is a named bundle of derived-table and scalar-function definitions
loadable by dotted name (e.g. `chrome.jetstream_3`). Modules are registered
once into a [`ModuleRegistry`] and activated per query with
`INCLUDE MODULE`, which copies their definitions into the query-local
context — registry state is never mutated by a query, so concurrent queries
including different modules do not interfere.

Definitions are a tagged-variant catalog: a derived table is either a
declarative [`SelectStatement`] bound against base/derived tables, or a
native builder for relations (such as benchmark score tables) that need the
aggregation engine rather than plain relational operators.

Modules may require other modules; requirements are resolved transitively
at include time, and a dependency cycle fails resolution with
`CyclicDependencyError`.
*/

use crate::tracesql::sql::ast::SelectStatement;
use crate::tracesql::sql::context::QueryContext;
use crate::tracesql::sql::error::SqlError;
use crate::tracesql::sql::execution::types::{FieldValue, RowSet};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

pub mod stdlib;

/// Native builder for a derived table that plain relational operators
/// cannot express
pub type NativeTableFn =
    Arc<dyn Fn(&QueryContext) -> Result<RowSet, SqlError> + Send + Sync>;

/// A zero-argument scalar function aggregating over the whole dataset
pub type ScalarFn =
    Arc<dyn Fn(&QueryContext) -> Result<FieldValue, SqlError> + Send + Sync>;

/// Definition of a derived table
#[derive(Clone)]
pub enum TableDef {
    /// Declarative view: a SELECT evaluated over base/derived tables
    Select(SelectStatement),
    /// Native builder producing the relation directly
    Native(NativeTableFn),
}

impl fmt::Debug for TableDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableDef::Select(stmt) => f.debug_tuple("Select").field(stmt).finish(),
            TableDef::Native(_) => f.debug_tuple("Native").field(&"<fn>").finish(),
        }
    }
}

/// A named bundle of derived tables and scalar functions.
///
/// Built with the fluent constructors and registered into a
/// [`ModuleRegistry`]:
///
/// ```rust
/// use tracesql::tracesql::sql::ast::SelectStatement;
/// use tracesql::tracesql::sql::module::{Module, TableDef};
///
/// let module = Module::new("demo.latency")
///     .with_table(
///         "demo_latency_measure",
///         TableDef::Select(SelectStatement::projection(
///             "event",
///             &[("name", None), ("duration", Some("dur"))],
///         )),
///     );
/// assert_eq!(module.name(), "demo.latency");
/// ```
#[derive(Clone)]
pub struct Module {
    name: String,
    requires: Vec<String>,
    tables: Vec<(String, TableDef)>,
    functions: Vec<(String, ScalarFn)>,
}

impl Module {
    /// Creates an empty module with the given qualified dotted name
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            requires: Vec::new(),
            tables: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Declares a dependency on another module, resolved transitively at
    /// include time
    pub fn requires(mut self, module_name: impl Into<String>) -> Self {
        self.requires.push(module_name.into());
        self
    }

    /// Adds a derived-table definition
    pub fn with_table(mut self, table_name: impl Into<String>, def: TableDef) -> Self {
        self.tables.push((table_name.into(), def));
        self
    }

    /// Adds a scalar-function definition
    pub fn with_function(mut self, function_name: impl Into<String>, func: ScalarFn) -> Self {
        self.functions.push((function_name.into(), func));
        self
    }

    /// Qualified dotted module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of modules this module requires
    pub fn required_modules(&self) -> &[String] {
        &self.requires
    }

    /// Looks up a derived-table definition by name
    pub fn table(&self, table_name: &str) -> Option<&TableDef> {
        self.tables
            .iter()
            .find(|(name, _)| name == table_name)
            .map(|(_, def)| def)
    }

    /// Looks up a scalar function by name
    pub fn function(&self, function_name: &str) -> Option<&ScalarFn> {
        self.functions
            .iter()
            .find(|(name, _)| name == function_name)
            .map(|(_, func)| func)
    }

    /// Names of the derived tables this module defines, in definition order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|(name, _)| name.as_str())
    }

    /// Names of the scalar functions this module defines, in definition order
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|(name, _)| name.as_str())
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .field("tables", &self.tables.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .field(
                "functions",
                &self.functions.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Catalog of registered modules, resolved by dotted name.
///
/// Registration is expected to complete before querying begins; the
/// registry is read-only during query execution and safe to share across
/// worker threads.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Module>,
}

impl ModuleRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        ModuleRegistry {
            modules: HashMap::new(),
        }
    }

    /// Creates a registry preloaded with the trace SQL standard library
    pub fn with_stdlib() -> Self {
        let mut registry = ModuleRegistry::new();
        stdlib::install(&mut registry);
        registry
    }

    /// Registers a module under its qualified name.
    ///
    /// Re-registering a name replaces the previous definition.
    pub fn register(&mut self, module: Module) {
        debug!("Registering module '{}'", module.name());
        if self
            .modules
            .insert(module.name().to_string(), module)
            .is_some()
        {
            warn!("Module registration replaced an existing definition");
        }
    }

    /// Resolves a module by name, without touching its dependencies
    pub fn resolve(&self, name: &str) -> Result<&Module, SqlError> {
        self.modules
            .get(name)
            .ok_or_else(|| SqlError::not_found_error(name, "Module is not registered"))
    }

    /// Resolves a module and its transitive dependencies, dependencies
    /// first.
    ///
    /// Fails with `NotFoundError` when a name is unregistered and with
    /// `CyclicDependencyError` when the requirement graph contains a cycle;
    /// the error carries the chain that closed the cycle.
    pub fn resolve_with_dependencies(&self, name: &str) -> Result<Vec<&Module>, SqlError> {
        let mut ordered = Vec::new();
        let mut visiting = Vec::new();
        let mut done = HashSet::new();
        self.visit(name, &mut visiting, &mut done, &mut ordered)?;
        Ok(ordered)
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// True when no modules are registered
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn visit<'a>(
        &'a self,
        name: &str,
        visiting: &mut Vec<String>,
        done: &mut HashSet<String>,
        ordered: &mut Vec<&'a Module>,
    ) -> Result<(), SqlError> {
        if done.contains(name) {
            return Ok(());
        }
        if visiting.iter().any(|n| n == name) {
            let mut chain = visiting.clone();
            chain.push(name.to_string());
            return Err(SqlError::cyclic_dependency_error(chain));
        }

        let module = self.resolve(name)?;
        visiting.push(name.to_string());
        for dep in module.required_modules() {
            self.visit(dep, visiting, done, ordered)?;
        }
        visiting.pop();
        done.insert(name.to_string());
        ordered.push(module);
        Ok(())
    }
}
