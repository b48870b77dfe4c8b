// src/dag/matrix.rs

//! Matrix parsing and name substitution.
//!
//! Matrices never create graph nodes. They only contribute sub-labels: one
//! line per variant of the task-level `matrix:` and one line per variable of
//! the `env.matrix:` tuples.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};

use crate::config::model::scalar_text;
use crate::types::Env;

/// Base name used when nothing else is available.
pub const UNNAMED: &str = "?";

/// Number of substitution rounds. One extra round resolves a value that
/// itself references another variable; anything deeper stays verbatim.
const SUBSTITUTION_PASSES: usize = 2;

static BRACED_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("braced variable pattern is valid")
});

static BARE_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Z_][A-Z0-9_]*)").expect("bare variable pattern is valid"));

/// One entry of a task's variant `matrix:`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixItem {
    /// The item's own `name:` override.
    pub name: Option<String>,
    /// The item's own `env:` overrides.
    pub env: Env,
}

/// `env.matrix:` of a task, checked once at parse time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnvMatrix {
    #[default]
    None,
    /// One flattened env per matrix entry, in document order.
    Tuples(Vec<Env>),
}

/// Result of parsing something that should be a list of mappings.
#[derive(Debug)]
pub(crate) enum Shape<T> {
    Absent,
    Parsed(T),
    Malformed,
}

/// Stringify a YAML scalar the way it would appear in an environment.
///
/// Sequences, mappings and tagged values have no env representation.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

/// Flatten an env mapping, skipping `matrix` and non-scalar values.
pub(crate) fn env_from_mapping(mapping: &Mapping) -> Env {
    mapping
        .iter()
        .filter_map(|(key, value)| {
            let key = key.as_str()?;
            if key == "matrix" {
                return None;
            }
            Some((key.to_string(), scalar_to_string(value)?))
        })
        .collect()
}

/// Flatten an optional `env:` value. Anything but a mapping yields an empty env.
pub(crate) fn env_from_value(value: Option<&Value>) -> Env {
    match value {
        Some(Value::Mapping(mapping)) => env_from_mapping(mapping),
        _ => Env::new(),
    }
}

fn sequence_of_mappings(value: &Value) -> Option<Vec<&Mapping>> {
    value
        .as_sequence()?
        .iter()
        .map(|item| item.as_mapping())
        .collect()
}

pub(crate) fn parse_variant_matrix(value: Option<&Value>) -> Shape<Vec<MatrixItem>> {
    let Some(value) = value else {
        return Shape::Absent;
    };
    let Some(items) = sequence_of_mappings(value) else {
        return Shape::Malformed;
    };

    let items = items
        .into_iter()
        .map(|item| MatrixItem {
            name: item.get("name").and_then(scalar_text),
            env: env_from_value(item.get("env")),
        })
        .collect();
    Shape::Parsed(items)
}

pub(crate) fn parse_env_matrix(env: Option<&Value>) -> Shape<EnvMatrix> {
    let Some(matrix) = env.and_then(|env| env.get("matrix")) else {
        return Shape::Absent;
    };
    match sequence_of_mappings(matrix) {
        Some(tuples) => Shape::Parsed(EnvMatrix::Tuples(
            tuples.into_iter().map(env_from_mapping).collect(),
        )),
        None => Shape::Malformed,
    }
}

/// Overlay env layers in order; later layers replace earlier keys.
pub fn merge_env(layers: &[&Env]) -> Env {
    let mut merged = Env::new();
    for layer in layers {
        merged.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}

fn replace_vars(pattern: &Regex, text: &str, env: &Env) -> String {
    pattern
        .replace_all(text, |caps: &Captures<'_>| match env.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Substitute `${VAR}` and `$VAR` references from `env`.
///
/// Unknown variables keep their original token text.
pub fn substitute(text: &str, env: &Env) -> String {
    let mut out = text.to_string();
    for _ in 0..SUBSTITUTION_PASSES {
        out = replace_vars(&BRACED_VAR, &out, env);
        out = replace_vars(&BARE_VAR, &out, env);
    }
    out
}

/// Pick the base name for a label and expand it.
///
/// Precedence: matrix item name, then the task's configured name, then the
/// task's internal name, then [`UNNAMED`].
pub fn expand_name(
    item_name: Option<&str>,
    task_name: Option<&str>,
    internal_name: Option<&str>,
    env: &Env,
) -> String {
    let base = item_name
        .or(task_name)
        .or(internal_name.filter(|n| !n.is_empty()))
        .unwrap_or(UNNAMED);
    substitute(base, env)
}

/// One `VAR: v1, v2` line per variable seen in any tuple, sorted by name.
///
/// Values follow tuple order; tuples lacking the variable are skipped.
pub fn env_matrix_lines(matrix: &EnvMatrix) -> Vec<String> {
    let EnvMatrix::Tuples(tuples) = matrix else {
        return Vec::new();
    };

    let vars: BTreeSet<&str> = tuples
        .iter()
        .flat_map(|tuple| tuple.keys().map(|k| k.as_str()))
        .collect();

    vars.into_iter()
        .map(|var| {
            let values: Vec<&str> = tuples
                .iter()
                .filter_map(|tuple| tuple.get(var).map(|v| v.as_str()))
                .collect();
            format!("{}: {}", var, values.join(", "))
        })
        .collect()
}
