use std::collections::BTreeMap;
use std::fmt;

/// Internal task identifier (config key with the task suffix stripped).
pub type TaskName = String;

/// Flattened environment: variable name to string value.
///
/// A `BTreeMap` keeps every iteration over variables sorted, which the DOT
/// output relies on for byte-identical runs.
pub type Env = BTreeMap<String, String>;

/// Which matrix of a task a [`Diagnostic::MalformedMatrixShape`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixField {
    /// The task-level `matrix:` list of variants.
    Variants,
    /// The `env.matrix:` list of environment tuples.
    Env,
}

impl fmt::Display for MatrixField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixField::Variants => f.write_str("matrix"),
            MatrixField::Env => f.write_str("env.matrix"),
        }
    }
}

/// Non-fatal problem found while building or rendering a graph.
///
/// These never abort a run; they are logged as warnings and handed back to
/// the caller alongside the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// More nodes than palette colours. `first_task` is the first node drawn
    /// with the fallback colour.
    PaletteExhausted { first_task: TaskName },
    /// A matrix was present but was not a list of mappings; it is ignored.
    MalformedMatrixShape { task: TaskName, field: MatrixField },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::PaletteExhausted { first_task } => write!(
                f,
                "colour palette exhausted at task '{first_task}'; using fallback colour"
            ),
            Diagnostic::MalformedMatrixShape { task, field } => write!(
                f,
                "task '{task}': `{field}` is not a list of mappings; ignoring it"
            ),
        }
    }
}
