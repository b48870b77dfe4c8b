// src/dag/reduce.rs

//! Whole-graph analyses over resolved dependency edges.

use std::collections::HashSet;

use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graphmap::DiGraphMap;

use crate::dag::graph::TaskGraph;
use crate::types::TaskName;

/// Edge set kept after transitive reduction, as `(from, to)` task names.
pub type EdgeSet = HashSet<(TaskName, TaskName)>;

// Edge direction: dependency -> dependent.
// For:
//   build_task:
//     depends_on: [lint]
// we add edge lint -> build.
fn edge_graph(graph: &TaskGraph) -> DiGraphMap<&str, ()> {
    let mut g: DiGraphMap<&str, ()> = DiGraphMap::new();

    for task in graph.tasks() {
        g.add_node(task.name());
    }

    for task in graph.tasks() {
        for dependent in graph.dependents_of(task.name()) {
            g.add_edge(task.name(), dependent.as_str(), ());
        }
    }

    g
}

/// Name of a task that sits on a dependency cycle, if there is one.
pub fn find_cycle(graph: &TaskGraph) -> Option<TaskName> {
    let g = edge_graph(graph);
    // A topological sort will fail if there is a cycle.
    match toposort(&g, None) {
        Ok(_order) => None,
        Err(cycle) => Some(cycle.node_id().to_string()),
    }
}

/// Edges that survive transitive reduction.
///
/// An edge `u -> v` is dropped when `v` is also reachable through another
/// direct dependent of `u`. Returns `None` for a cyclic graph, where the
/// reduction is not unique.
pub fn transitive_reduction(graph: &TaskGraph) -> Option<EdgeSet> {
    let g = edge_graph(graph);
    if toposort(&g, None).is_err() {
        return None;
    }

    let mut kept = EdgeSet::new();
    for (from, to, _) in g.all_edges() {
        let implied = g
            .neighbors(from)
            .filter(|&via| via != to)
            .any(|via| has_path_connecting(&g, via, to, None));
        if !implied {
            kept.insert((from.to_string(), to.to_string()));
        }
    }
    Some(kept)
}
