// src/dag/mod.rs

//! Recipe steps and the dependency graph that owns them.
//!
//! - [`step`] holds a single step and its lifecycle transitions.
//! - [`graph`] owns all steps, answers readiness queries, and strips
//!   satisfied dependencies.
//! - [`validate`] rejects duplicate ids, unknown dependencies and cycles
//!   before a graph is constructed.

pub mod graph;
pub mod step;
pub mod validate;

pub use graph::{CriticalPath, DependencyGraph};
pub use step::Step;
