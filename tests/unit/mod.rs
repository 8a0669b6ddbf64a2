// Event store tests - base table loading and scanning
pub mod store;
// SQL tests - parser, module catalog and execution tests
pub mod sql;
