mod common;
use crate::common::{edge_lines, node_lines};

use std::collections::{BTreeSet, HashMap};

use cigraph::dag::TaskGraph;
use cigraph::render::{RenderOptions, render};
use cigraph_test_utils::builders::{DocumentBuilder, TaskBuilder};
use proptest::prelude::*;

/// Generated graph plus the dependency lists it was built from.
#[derive(Debug, Clone)]
struct GeneratedGraph {
    deps: Vec<BTreeSet<usize>>,
    aliased: Vec<bool>,
}

fn task_name(i: usize) -> String {
    format!("t{}", i)
}

fn alias_name(i: usize) -> String {
    format!("alias_{}", i)
}

impl GeneratedGraph {
    fn build(&self) -> TaskGraph {
        let mut builder = DocumentBuilder::new();
        for (i, deps) in self.deps.iter().enumerate() {
            let mut task = TaskBuilder::new();
            if self.aliased[i] {
                task = task.alias(&alias_name(i));
            }
            for &dep in deps {
                // Refer to aliased tasks by alias to exercise both lookups.
                let reference = if self.aliased[dep] {
                    alias_name(dep)
                } else {
                    task_name(dep)
                };
                task = task.depends_on(&reference);
            }
            builder = builder.with_task(&format!("{}_task", task_name(i)), task.build());
        }
        builder.graph()
    }
}

// Acyclic by construction: task N may only depend on tasks 0..N-1.
// With `allow_back_edges`, task N may also depend on later tasks, so cycles
// appear.
fn graph_strategy(
    max_tasks: usize,
    allow_back_edges: bool,
) -> impl Strategy<Value = GeneratedGraph> {
    (1..=max_tasks).prop_flat_map(move |num_tasks| {
        let deps_strat = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_tasks),
            num_tasks,
        );
        let alias_strat = proptest::collection::vec(any::<bool>(), num_tasks);

        (deps_strat, alias_strat).prop_map(move |(raw_deps, aliased)| {
            let deps = raw_deps
                .into_iter()
                .enumerate()
                .map(|(i, potential)| {
                    potential
                        .into_iter()
                        .filter_map(|d| {
                            if allow_back_edges {
                                Some(d % num_tasks)
                            } else if i > 0 {
                                Some(d % i)
                            } else {
                                None
                            }
                        })
                        .collect()
                })
                .collect();
            GeneratedGraph { deps, aliased }
        })
    })
}

/// Colour assigned to each node, parsed back out of the node lines.
fn node_colors(dot: &str) -> HashMap<String, String> {
    node_lines(dot)
        .into_iter()
        .map(|line| {
            let name = line
                .split('"')
                .nth(1)
                .expect("node line starts with a quoted name")
                .to_string();
            let color = line
                .split("color=")
                .nth(1)
                .and_then(|rest| rest.split(',').next())
                .expect("node line carries a colour")
                .to_string();
            (name, color)
        })
        .collect()
}

proptest! {
    #[test]
    fn every_task_is_declared_exactly_once(generated in graph_strategy(12, true)) {
        let graph = generated.build();
        let dot = render(&graph, &RenderOptions::default()).unwrap().dot;

        let declared: Vec<String> = node_lines(&dot)
            .into_iter()
            .map(|l| l.split('"').nth(1).unwrap().to_string())
            .collect();
        let unique: BTreeSet<&String> = declared.iter().collect();

        prop_assert_eq!(declared.len(), generated.deps.len());
        prop_assert_eq!(unique.len(), declared.len());
    }

    #[test]
    fn every_dependency_has_an_edge_in_the_source_colour(generated in graph_strategy(12, false)) {
        let graph = generated.build();
        let dot = render(&graph, &RenderOptions::default()).unwrap().dot;
        let colors = node_colors(&dot);
        let edges = edge_lines(&dot);

        for (i, deps) in generated.deps.iter().enumerate() {
            for &dep in deps {
                let from = task_name(dep);
                let expected = format!(
                    "\"{}\" -> \"{}\" [color={}];",
                    from,
                    task_name(i),
                    colors[&from]
                );
                prop_assert!(
                    edges.contains(&expected.as_str()),
                    "missing edge {} in:\n{}",
                    expected,
                    dot
                );
            }
        }

        let expected_edges: usize = generated.deps.iter().map(|d| d.len()).sum();
        prop_assert_eq!(edges.len(), expected_edges);
    }

    #[test]
    fn start_nodes_are_exactly_tasks_without_dependencies(generated in graph_strategy(12, true)) {
        let graph = generated.build();
        let starts: Vec<String> = graph
            .start_nodes()
            .into_iter()
            .map(|t| t.name().to_string())
            .collect();

        let mut expected: Vec<String> = generated
            .deps
            .iter()
            .enumerate()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(i, _)| task_name(i))
            .collect();
        expected.sort();

        prop_assert_eq!(starts, expected);
    }

    #[test]
    fn rendering_is_deterministic(generated in graph_strategy(12, true)) {
        let first = render(&generated.build(), &RenderOptions::default()).unwrap().dot;
        let second = render(&generated.build(), &RenderOptions::default()).unwrap().dot;
        prop_assert_eq!(first, second);
    }
}
