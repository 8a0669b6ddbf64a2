//! Trace SQL standard library.
//!
//! Built-in modules shipped with the engine, installed into a registry by
//! [`ModuleRegistry::with_stdlib`](crate::tracesql::sql::module::ModuleRegistry::with_stdlib).

use crate::tracesql::sql::module::ModuleRegistry;

pub mod jetstream_3;

/// Registers every standard-library module
pub fn install(registry: &mut ModuleRegistry) {
    registry.register(jetstream_3::module());
}
