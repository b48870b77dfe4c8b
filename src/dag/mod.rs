// src/dag/mod.rs

//! Task dependency graph.
//!
//! - [`task`] holds a single task and its resolution methods.
//! - [`graph`] owns all tasks of a document and the dependents index.
//! - [`matrix`] expands variant and env matrices into node sub-labels.
//! - [`reduce`] runs cycle detection and transitive reduction.

pub mod graph;
pub mod matrix;
pub mod reduce;
pub mod task;

pub use graph::{GraphOptions, TaskGraph};
pub use matrix::{EnvMatrix, MatrixItem};
pub use task::Task;
