//! Aggregation engine for trace SQL queries.
//!
//! This module computes the grouped statistics behind benchmark scoring:
//!
//! - [`AggregateFunctions`] - numeric aggregate primitives (arithmetic and
//!   geometric means)
//! - [`ScoreEngine`] - the JetStream-family scoring pipeline over a
//!   measure rowset
//!
//! All aggregation is deterministic: groups are held in ordered maps and
//! floating-point accumulation happens in a fixed, sorted order, so a
//! reordered copy of the same input rows produces bit-identical scores.

pub mod functions;
pub mod scoring;

pub use self::functions::AggregateFunctions;
pub use self::scoring::{ScoreEngine, REFERENCE_TIME_MS};
