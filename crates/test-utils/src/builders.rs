#![allow(dead_code)]

use cigraph::dag::{GraphOptions, TaskGraph};
use serde_yaml::{Mapping, Value};

fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

fn env_mapping(pairs: &[(&str, &str)]) -> Value {
    let mut env = Mapping::new();
    for (k, v) in pairs {
        env.insert(string(k), string(v));
    }
    Value::Mapping(env)
}

/// Builder for a CI configuration document (the parsed YAML value).
pub struct DocumentBuilder {
    doc: Mapping,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self { doc: Mapping::new() }
    }

    /// Add a task under the given top-level key, e.g. `"lint_task"`.
    pub fn with_task(mut self, key: &str, task: Value) -> Self {
        self.doc.insert(string(key), task);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.doc.insert(string("name"), string(name));
        self
    }

    /// Document-level env variable.
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        let env = self
            .doc
            .entry(string("env"))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if let Value::Mapping(env) = env {
            env.insert(string(key), string(value));
        }
        self
    }

    pub fn build(self) -> Value {
        Value::Mapping(self.doc)
    }

    /// Build the document and the graph with default options.
    pub fn graph(self) -> TaskGraph {
        TaskGraph::from_document(&self.build(), &GraphOptions::default())
            .expect("Failed to build valid task graph from builder")
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one task entry.
pub struct TaskBuilder {
    task: Mapping,
}

impl TaskBuilder {
    pub fn new() -> Self {
        Self { task: Mapping::new() }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.task.insert(string("name"), string(name));
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.task.insert(string("alias"), string(alias));
        self
    }

    pub fn depends_on(mut self, dep: &str) -> Self {
        let deps = self
            .task
            .entry(string("depends_on"))
            .or_insert_with(|| Value::Sequence(Vec::new()));
        if let Value::Sequence(deps) = deps {
            deps.push(string(dep));
        }
        self
    }

    /// Task-level env variable.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        let env = self.env_mut();
        env.insert(string(key), string(value));
        self
    }

    /// Append one tuple to `env.matrix`.
    pub fn env_matrix_tuple(mut self, pairs: &[(&str, &str)]) -> Self {
        let tuple = env_mapping(pairs);
        let env = self.env_mut();
        let matrix = env
            .entry(string("matrix"))
            .or_insert_with(|| Value::Sequence(Vec::new()));
        if let Value::Sequence(matrix) = matrix {
            matrix.push(tuple);
        }
        self
    }

    /// Append one variant to `matrix`, with an optional name and env overrides.
    pub fn variant(mut self, name: Option<&str>, env: &[(&str, &str)]) -> Self {
        let mut item = Mapping::new();
        if let Some(name) = name {
            item.insert(string("name"), string(name));
        }
        if !env.is_empty() {
            item.insert(string("env"), env_mapping(env));
        }
        let matrix = self
            .task
            .entry(string("matrix"))
            .or_insert_with(|| Value::Sequence(Vec::new()));
        if let Value::Sequence(matrix) = matrix {
            matrix.push(Value::Mapping(item));
        }
        self
    }

    /// Set an arbitrary field, e.g. a deliberately malformed matrix.
    pub fn raw(mut self, key: &str, value: Value) -> Self {
        self.task.insert(string(key), value);
        self
    }

    pub fn build(self) -> Value {
        Value::Mapping(self.task)
    }

    fn env_mut(&mut self) -> &mut Mapping {
        let env = self
            .task
            .entry(string("env"))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if !env.is_mapping() {
            *env = Value::Mapping(Mapping::new());
        }
        match env {
            Value::Mapping(env) => env,
            _ => unreachable!("env was just made a mapping"),
        }
    }
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}
