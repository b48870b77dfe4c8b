// src/dag/graph.rs

use std::collections::{BTreeSet, HashMap};

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::config::model::RawDocument;
use crate::dag::matrix::env_from_value;
use crate::dag::reduce;
use crate::dag::task::{Task, is_task_key};
use crate::errors::{CigraphError, Result};
use crate::types::{Diagnostic, Env, TaskName};

/// Options that change how a [`TaskGraph`] is built.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOptions {
    /// Fail with [`CigraphError::DagCycle`] instead of warning on a cycle.
    pub reject_cycles: bool,
}

/// All tasks of one CI document plus the reverse dependency index.
///
/// Built once by [`TaskGraph::from_document`] and immutable afterwards.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    name: Option<String>,
    env: Env,
    /// Sorted by task name.
    tasks: Vec<Task>,
    /// Position of each task in `tasks`, keyed by name.
    by_name: HashMap<TaskName, usize>,
    /// Direct dependents of each task, sorted by name.
    dependents: HashMap<TaskName, Vec<TaskName>>,
    diagnostics: Vec<Diagnostic>,
}

impl TaskGraph {
    /// Build a graph from a parsed CI document.
    ///
    /// An empty document yields an empty graph. Fails if the document is not
    /// a mapping, if two tasks share a name, or if any `depends_on` entry
    /// does not resolve to exactly one task.
    pub fn from_document(doc: &Value, options: &GraphOptions) -> Result<Self> {
        let empty = Mapping::new();
        let mapping = match doc {
            Value::Mapping(mapping) => mapping,
            Value::Null => &empty,
            _ => {
                return Err(CigraphError::ConfigError(
                    "CI configuration must be a mapping".to_string(),
                ));
            }
        };

        let raw_doc: RawDocument = serde_yaml::from_value(Value::Mapping(mapping.clone()))?;
        let mut diagnostics = Vec::new();
        let mut tasks = Vec::new();

        for (key, value) in mapping.iter() {
            let Some(key) = key.as_str() else {
                continue;
            };
            if !is_task_key(key) {
                continue;
            }
            tasks.push(Task::from_config(key, value, &mut diagnostics)?);
        }

        Self::from_tasks(
            raw_doc.name,
            env_from_value(raw_doc.env.as_ref()),
            tasks,
            diagnostics,
            options,
        )
    }

    /// Build a graph from already parsed tasks.
    pub fn from_tasks(
        name: Option<String>,
        env: Env,
        mut tasks: Vec<Task>,
        diagnostics: Vec<Diagnostic>,
        options: &GraphOptions,
    ) -> Result<Self> {
        tasks.sort_by(|a, b| a.name().cmp(b.name()));

        let mut by_name = HashMap::new();
        for (idx, task) in tasks.iter().enumerate() {
            if by_name.insert(task.name().to_string(), idx).is_some() {
                return Err(CigraphError::DuplicateTask(task.name().to_string()));
            }
        }

        // First pass: raw forward edges, keyed by the identifier as written.
        let mut listed_by: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for task in tasks.iter() {
            for dep in task.raw_depends_on() {
                listed_by.entry(dep.as_str()).or_default().insert(task.name());
            }
        }

        // Second pass: union what was listed under each task's name and alias.
        let mut dependents = HashMap::new();
        for task in tasks.iter() {
            let mut names: BTreeSet<&str> = BTreeSet::new();
            if let Some(by) = listed_by.get(task.name()) {
                names.extend(by.iter().copied());
            }
            // An alias shadowed by another task's name resolves to that task.
            if let Some(alias) = task.alias().filter(|a| !by_name.contains_key(*a)) {
                if let Some(by) = listed_by.get(alias) {
                    names.extend(by.iter().copied());
                }
            }
            dependents.insert(
                task.name().to_string(),
                names.into_iter().map(str::to_string).collect::<Vec<_>>(),
            );
        }

        let graph = Self {
            name,
            env,
            tasks,
            by_name,
            dependents,
            diagnostics,
        };

        graph.resolve_all()?;
        graph.check_cycles(options)?;

        debug!(
            tasks = graph.tasks.len(),
            start_nodes = graph.start_nodes().len(),
            "task graph built"
        );

        Ok(graph)
    }

    /// Every `depends_on` entry must name exactly one task.
    fn resolve_all(&self) -> Result<()> {
        for task in self.tasks.iter() {
            task.depends_on(self)?;
        }
        Ok(())
    }

    fn check_cycles(&self, options: &GraphOptions) -> Result<()> {
        let Some(node) = reduce::find_cycle(self) else {
            return Ok(());
        };
        if options.reject_cycles {
            return Err(CigraphError::DagCycle(format!(
                "cycle detected in task graph involving task '{}'",
                node
            )));
        }
        warn!(task = %node, "dependency cycle detected; rendering anyway");
        Ok(())
    }

    /// Look a task up by internal name, falling back to alias.
    pub fn find(&self, identifier: &str) -> Result<&Task> {
        let by_name: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.name() == identifier)
            .collect();
        let matches = if by_name.is_empty() {
            self.tasks
                .iter()
                .filter(|t| t.alias() == Some(identifier))
                .collect()
        } else {
            by_name
        };

        match matches.as_slice() {
            [task] => Ok(*task),
            [] => Err(CigraphError::UnresolvedReference {
                identifier: identifier.to_string(),
                referrer: None,
            }),
            many => Err(CigraphError::AmbiguousReference {
                identifier: identifier.to_string(),
                candidates: many.iter().map(|t| t.name().to_string()).collect(),
                referrer: None,
            }),
        }
    }

    /// Exact lookup by internal name.
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.by_name.get(name).map(|&idx| &self.tasks[idx])
    }

    /// All tasks, sorted by name.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks without `depends_on`, sorted by name.
    pub fn start_nodes(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_start_node()).collect()
    }

    /// Names of the tasks that depend on `name` (directly or via its alias).
    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.dependents
            .get(name)
            .map(|d| d.as_slice())
            .unwrap_or(&[])
    }

    /// Document-level `name:`.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Document-level env.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Non-fatal problems found while parsing.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
