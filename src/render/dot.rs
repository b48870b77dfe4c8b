// src/render/dot.rs

//! Depth-first DOT emitter.
//!
//! Start nodes are visited in name order. Each node is declared the first
//! time it is reached, gets the next palette colour, and then emits one edge
//! per dependent (in that colour) before recursing into the dependent. A
//! visited set makes re-entry a no-op, so diamonds and cycles are drawn once.

use std::collections::HashSet;
use std::fmt::Write;

use tracing::{debug, trace, warn};

use crate::dag::reduce::{self, EdgeSet};
use crate::dag::{Task, TaskGraph};
use crate::errors::Result;
use crate::render::palette::Palette;
use crate::render::{RenderOptions, Rendered};
use crate::types::{Diagnostic, TaskName};

/// Graph name used when the document has no `name:`.
pub const DEFAULT_GRAPH_NAME: &str = "tasks";

/// Aspect ratio hint handed to the layout engine.
pub const ASPECT_RATIO: &str = "0.7";

/// Left-justified line break inside a DOT label.
const LINE_BREAK: &str = "\\l";

/// Field separator inside a record label.
const FIELD_SEPARATOR: char = '|';

/// Render `graph` as DOT text.
///
/// Identical input and options always produce identical text.
pub fn render(graph: &TaskGraph, options: &RenderOptions) -> Result<Rendered> {
    let kept_edges = if options.reduce_transitive_edges {
        let kept = reduce::transitive_reduction(graph);
        if kept.is_none() {
            warn!("task graph has a cycle; skipping transitive reduction");
        }
        kept
    } else {
        None
    };

    let mut emitter = DotEmitter {
        graph,
        palette: Palette::new(options.palette.clone(), options.fallback_color.clone()),
        kept_edges,
        visited: HashSet::new(),
        out: String::new(),
        diagnostics: Vec::new(),
    };

    emitter.header(options)?;

    for task in graph.start_nodes() {
        emitter.draw_node(task)?;
    }

    // Tasks on a cycle with no start node upstream are never reached above.
    for task in graph.tasks() {
        if !emitter.visited.contains(task.name()) {
            debug!(task = %task.name(), "drawing task not reachable from any start node");
            emitter.draw_node(task)?;
        }
    }

    emitter.footer()?;

    debug!(
        nodes = emitter.visited.len(),
        bytes = emitter.out.len(),
        "rendered task graph"
    );

    Ok(Rendered {
        dot: emitter.out,
        diagnostics: emitter.diagnostics,
    })
}

struct DotEmitter<'g> {
    graph: &'g TaskGraph,
    palette: Palette,
    /// `Some` when transitive reduction is on.
    kept_edges: Option<EdgeSet>,
    visited: HashSet<TaskName>,
    out: String,
    diagnostics: Vec<Diagnostic>,
}

impl<'g> DotEmitter<'g> {
    fn header(&mut self, options: &RenderOptions) -> Result<()> {
        let name = self.graph.name().unwrap_or(DEFAULT_GRAPH_NAME);
        writeln!(self.out, "strict digraph {} {{", quote(name))?;
        writeln!(self.out, "    graph [rankdir=LR, ratio={}];", ASPECT_RATIO)?;
        if let Some(title) = &options.title {
            writeln!(self.out, "    labelloc=\"t\";")?;
            writeln!(self.out, "    label={};", quote(&title.to_string()))?;
        }
        Ok(())
    }

    fn footer(&mut self) -> Result<()> {
        writeln!(self.out, "}}")?;
        Ok(())
    }

    fn draw_node(&mut self, task: &'g Task) -> Result<()> {
        if !self.visited.insert(task.name().to_string()) {
            return Ok(());
        }

        let (color, diagnostic) = self.palette.next_for(task.name());
        self.diagnostics.extend(diagnostic);
        trace!(task = %task.name(), color = %color, "drawing task");

        self.declare_node(task, &color)?;

        let graph = self.graph;
        for dependent in task.depended_on_by(graph)? {
            if self.keeps_edge(task.name(), dependent.name()) {
                writeln!(
                    self.out,
                    "    {} -> {} [color={}];",
                    quote(task.name()),
                    quote(dependent.name()),
                    attr_value(&color)
                )?;
            }
            self.draw_node(dependent)?;
        }

        Ok(())
    }

    fn declare_node(&mut self, task: &Task, color: &str) -> Result<()> {
        let variants = task.subtask_labels(self.graph);
        let env_lines = task.env_matrix_labels();
        let color = attr_value(color);

        if variants.is_empty() && env_lines.is_empty() {
            writeln!(
                self.out,
                "    {} [shape=box, style=bold, color={color}, fontcolor={color}];",
                quote(task.name())
            )?;
            return Ok(());
        }

        let mut label = record_line(task.name());
        label.push(FIELD_SEPARATOR);
        for line in variants.iter() {
            label.push_str(&record_line(line));
        }
        if !variants.is_empty() && !env_lines.is_empty() {
            label.push(FIELD_SEPARATOR);
        }
        for line in env_lines.iter() {
            label.push_str(&record_line(line));
        }

        writeln!(
            self.out,
            "    {} [shape=record, style=bold, color={color}, fontcolor={color}, label=\"{}\"];",
            quote(task.name()),
            label
        )?;
        Ok(())
    }

    fn keeps_edge(&self, from: &str, to: &str) -> bool {
        match &self.kept_edges {
            Some(kept) => kept.contains(&(from.to_string(), to.to_string())),
            None => true,
        }
    }
}

/// Quote a DOT identifier.
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Bare attribute value when it is a plain word, quoted otherwise
/// (e.g. `#ff0000`).
fn attr_value(s: &str) -> String {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        s.to_string()
    } else {
        quote(s)
    }
}

/// Escape one record-label line and terminate it with a line break.
fn record_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + LINE_BREAK.len());
    for c in text.chars() {
        if matches!(c, '\\' | '{' | '}' | '|' | '<' | '>' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push_str(LINE_BREAK);
    out
}
