#![allow(dead_code)]

pub use cigraph_test_utils::init_tracing;

use cigraph::config::parse_document;
use cigraph::dag::{GraphOptions, TaskGraph};
use cigraph::errors::Result;
use cigraph::render::{RenderOptions, render};

/// Parse YAML text and build a graph with default options.
pub fn graph_from_yaml(yaml: &str) -> Result<TaskGraph> {
    let doc = parse_document(yaml)?;
    TaskGraph::from_document(&doc, &GraphOptions::default())
}

/// Render with the default palette and no title.
pub fn render_default(graph: &TaskGraph) -> String {
    render(graph, &RenderOptions::default())
        .expect("rendering a built graph should not fail")
        .dot
}

/// Lines declaring nodes (not edges), trimmed.
pub fn node_lines(dot: &str) -> Vec<&str> {
    dot.lines()
        .map(str::trim)
        .filter(|l| l.starts_with('"') && !l.contains("->"))
        .collect()
}

/// Lines declaring edges, trimmed.
pub fn edge_lines(dot: &str) -> Vec<&str> {
    dot.lines()
        .map(str::trim)
        .filter(|l| l.contains("->"))
        .collect()
}
