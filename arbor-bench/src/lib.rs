//! Performance benchmarks for arbor
//!
//! Criterion.rs benchmarks for the dispatch path: handler lookup, ancestor
//! bubbling, exit/entry chains and history restore.

pub mod fixtures;

pub use fixtures::{BenchEvent, LADDER, LadderState, TOGGLE, ToggleState};
