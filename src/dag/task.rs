// src/dag/task.rs

//! A single CI task as it takes part in the dependency graph.

use serde_yaml::Value;
use tracing::warn;

use crate::config::model::RawTask;
use crate::dag::graph::TaskGraph;
use crate::dag::matrix::{
    self, EnvMatrix, MatrixItem, Shape, env_from_value, parse_env_matrix, parse_variant_matrix,
};
use crate::errors::Result;
use crate::types::{Diagnostic, Env, MatrixField, TaskName};

/// Key suffixes that mark a top-level entry as a task definition.
pub const TASK_SUFFIXES: &[&str] = &["_task", "_docker_builder"];

/// Keys that define a task without carrying a name of their own.
pub const PLACEHOLDER_KEYS: &[&str] = &["task", "docker_builder"];

/// Whether a top-level configuration key defines a task.
pub fn is_task_key(key: &str) -> bool {
    PLACEHOLDER_KEYS.contains(&key)
        || TASK_SUFFIXES
            .iter()
            .any(|suffix| key.len() > suffix.len() && key.ends_with(suffix))
}

/// Strip the task marker from a configuration key (`lint_task` -> `lint`).
///
/// Placeholder keys are returned unchanged.
pub fn strip_task_suffix(key: &str) -> &str {
    TASK_SUFFIXES
        .iter()
        .find_map(|suffix| key.strip_suffix(suffix).filter(|s| !s.is_empty()))
        .unwrap_or(key)
}

/// One task of a CI configuration.
///
/// A task only knows its own identifiers and the raw `depends_on` strings.
/// Anything that needs other tasks takes the owning [`TaskGraph`].
#[derive(Debug, Clone)]
pub struct Task {
    key: String,
    name: TaskName,
    display_name: Option<String>,
    alias: Option<String>,
    depends_on: Vec<String>,
    env: Env,
    variant_matrix: Vec<MatrixItem>,
    env_matrix: EnvMatrix,
}

impl Task {
    /// Build a task from its configuration key and raw YAML value.
    ///
    /// Matrix shape problems are pushed to `diagnostics`; the offending
    /// matrix is then treated as absent.
    pub fn from_config(
        key: &str,
        value: &Value,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Self> {
        // `lint_task:` with nothing under it is a task with no settings.
        let raw: RawTask = if value.is_null() {
            RawTask::default()
        } else {
            serde_yaml::from_value(value.clone())?
        };
        Ok(Self::from_raw(key, raw, diagnostics))
    }

    pub fn from_raw(key: &str, raw: RawTask, diagnostics: &mut Vec<Diagnostic>) -> Self {
        let name = if PLACEHOLDER_KEYS.contains(&key) {
            raw.alias
                .clone()
                .or_else(|| raw.name.clone())
                .unwrap_or_else(|| key.to_string())
        } else {
            strip_task_suffix(key).to_string()
        };

        let variant_matrix = match parse_variant_matrix(raw.matrix.as_ref()) {
            Shape::Parsed(items) => items,
            Shape::Absent => Vec::new(),
            Shape::Malformed => {
                warn!(task = %name, field = %MatrixField::Variants, "ignoring malformed matrix");
                diagnostics.push(Diagnostic::MalformedMatrixShape {
                    task: name.clone(),
                    field: MatrixField::Variants,
                });
                Vec::new()
            }
        };

        let env_matrix = match parse_env_matrix(raw.env.as_ref()) {
            Shape::Parsed(matrix) => matrix,
            Shape::Absent => EnvMatrix::None,
            Shape::Malformed => {
                warn!(task = %name, field = %MatrixField::Env, "ignoring malformed matrix");
                diagnostics.push(Diagnostic::MalformedMatrixShape {
                    task: name.clone(),
                    field: MatrixField::Env,
                });
                EnvMatrix::None
            }
        };

        Self {
            key: key.to_string(),
            name,
            display_name: raw.name,
            alias: raw.alias,
            depends_on: raw.depends_on.map(|d| d.into_vec()).unwrap_or_default(),
            env: env_from_value(raw.env.as_ref()),
            variant_matrix,
            env_matrix,
        }
    }

    /// The configuration key this task was read from.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Internal name: the configuration key without its task suffix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configured `name:` if any, else [`Task::name`].
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// `depends_on` entries exactly as written.
    pub fn raw_depends_on(&self) -> &[String] {
        &self.depends_on
    }

    /// Task-level env, without its `matrix`.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// A task with no dependencies is a traversal root.
    pub fn is_start_node(&self) -> bool {
        self.depends_on.is_empty()
    }

    /// Resolve `depends_on` against `graph`.
    pub fn depends_on<'g>(&self, graph: &'g TaskGraph) -> Result<Vec<&'g Task>> {
        self.depends_on
            .iter()
            .map(|dep| graph.find(dep).map_err(|e| e.referred_by(&self.name)))
            .collect()
    }

    /// Tasks that list this one in `depends_on`, by name or by alias.
    pub fn depended_on_by<'g>(&self, graph: &'g TaskGraph) -> Result<Vec<&'g Task>> {
        graph
            .dependents_of(&self.name)
            .iter()
            .map(|name| graph.find(name))
            .collect()
    }

    /// One expanded name per variant-matrix entry, in document order.
    pub fn subtask_labels(&self, graph: &TaskGraph) -> Vec<String> {
        self.variant_matrix
            .iter()
            .map(|item| {
                let env = matrix::merge_env(&[graph.env(), &self.env, &item.env]);
                matrix::expand_name(
                    item.name.as_deref(),
                    self.display_name.as_deref(),
                    Some(&self.name),
                    &env,
                )
            })
            .collect()
    }

    /// One `VAR: v1, v2` line per env-matrix variable, sorted by variable.
    pub fn env_matrix_labels(&self) -> Vec<String> {
        matrix::env_matrix_lines(&self.env_matrix)
    }

    /// Display name with document and task env substituted.
    pub fn expanded_display_name(&self, graph: &TaskGraph) -> String {
        let env = matrix::merge_env(&[graph.env(), &self.env]);
        matrix::expand_name(None, self.display_name.as_deref(), Some(&self.name), &env)
    }
}
