//! Query-local evaluation context.
//!
//! `INCLUDE MODULE` has a global-looking surface but query-local semantics:
//! each query carries its own context binding the shared, read-only event
//! store and module registry to the set of modules included so far. Two
//! concurrent queries including different modules therefore never observe
//! each other's definitions.

use crate::tracesql::sql::error::SqlError;
use crate::tracesql::sql::execution::types::RowSet;
use crate::tracesql::sql::execution::view::ViewEvaluator;
use crate::tracesql::sql::module::{Module, ModuleRegistry, ScalarFn, TableDef};
use crate::tracesql::store::EventStore;
use log::debug;

/// Per-query scope: the store and registry being queried plus the modules
/// activated by `INCLUDE MODULE`, in activation order.
pub struct QueryContext<'a> {
    store: &'a EventStore,
    registry: &'a ModuleRegistry,
    included: Vec<&'a Module>,
}

impl<'a> QueryContext<'a> {
    /// Creates a fresh context with no modules included
    pub fn new(store: &'a EventStore, registry: &'a ModuleRegistry) -> Self {
        QueryContext {
            store,
            registry,
            included: Vec::new(),
        }
    }

    /// The event store this query reads from
    pub fn store(&self) -> &'a EventStore {
        self.store
    }

    /// Activates a module and its transitive requirements for this query.
    ///
    /// Requirements are included dependencies-first; including a module
    /// twice is a no-op. Fails with `NotFoundError` for unregistered names
    /// and `CyclicDependencyError` for requirement cycles.
    pub fn include(&mut self, name: &str) -> Result<(), SqlError> {
        for module in self.registry.resolve_with_dependencies(name)? {
            if !self.is_included(module.name()) {
                debug!("Including module '{}' into query scope", module.name());
                self.included.push(module);
            }
        }
        Ok(())
    }

    /// True when a module is visible in this query's scope
    pub fn is_included(&self, name: &str) -> bool {
        self.included.iter().any(|m| m.name() == name)
    }

    /// Resolves a derived-table definition from the included modules,
    /// earliest inclusion winning
    pub fn table_def(&self, table_name: &str) -> Option<&'a TableDef> {
        self.included.iter().find_map(|m| m.table(table_name))
    }

    /// Resolves a scalar function from the included modules
    pub fn scalar_function(&self, function_name: &str) -> Option<&'a ScalarFn> {
        self.included.iter().find_map(|m| m.function(function_name))
    }

    /// Materializes a base or derived table by name for this query
    pub fn table(&self, table_name: &str) -> Result<RowSet, SqlError> {
        ViewEvaluator::materialize(self, table_name)
    }
}
