// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod git;
pub mod logging;
pub mod render;
pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::{load_document, load_settings};
use crate::config::model::SettingsFile;
use crate::dag::{GraphOptions, TaskGraph};
use crate::git::{FixedGitMetadata, GitCommand};
use crate::render::{RenderOptions, Title, render};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings and CI configuration loading
/// - task graph construction
/// - git metadata for the title
/// - DOT rendering to a file or stdout
pub fn run(args: CliArgs) -> Result<()> {
    let settings = load_settings(args.settings.as_deref().map(Path::new))
        .with_context(|| format!("loading settings from {:?}", args.settings))?;

    let config_path = args.config.clone();
    let doc = load_document(&config_path)
        .with_context(|| format!("loading CI configuration from {:?}", config_path))?;

    let graph_options = GraphOptions {
        reject_cycles: args.reject_cycles || settings.graph.reject_cycles,
    };
    let graph = TaskGraph::from_document(&doc, &graph_options)?;

    if args.dry_run {
        print_dry_run(&graph);
        return Ok(());
    }

    let options = render_options(&args, settings, &config_path);
    let rendered = render(&graph, &options)?;

    info!(
        tasks = graph.len(),
        warnings = graph.diagnostics().len() + rendered.diagnostics.len(),
        "task graph rendered"
    );

    match &args.output {
        Some(path) => fs::write(path, &rendered.dot)
            .with_context(|| format!("writing DOT output to {:?}", path))?,
        None => print!("{}", rendered.dot),
    }

    Ok(())
}

/// Merge settings with CLI flags; flags only ever switch things on.
fn render_options(args: &CliArgs, settings: SettingsFile, config_path: &Path) -> RenderOptions {
    let title = if args.no_title || !settings.render.title {
        None
    } else {
        let overrides = FixedGitMetadata {
            repo: args.repo.clone(),
            branch: args.branch.clone(),
            rev: args.rev.clone(),
        };
        let detected = GitCommand::new(config_root_dir(config_path));
        Some(Title::from_provider(&overrides.or_from(&detected)))
    };

    RenderOptions {
        palette: settings.render.palette,
        fallback_color: settings.render.fallback_color,
        reduce_transitive_edges: args.reduce || settings.render.reduce_transitive_edges,
        title,
    }
}

/// Directory git is queried in: the one holding the config file.
///
/// - If the config path has a non-empty parent (e.g. "ci/.cirrus.yml"),
///   we use that directory.
/// - If it's just a bare filename, we fall back to the current working
///   directory ".".
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Simple dry-run output: print tasks, aliases and resolved dependencies.
fn print_dry_run(graph: &TaskGraph) {
    println!("cigraph dry-run");
    if let Some(name) = graph.name() {
        println!("  name = {name}");
    }
    let starts: Vec<&str> = graph.start_nodes().into_iter().map(|t| t.name()).collect();
    println!("  start nodes = {:?}", starts);
    println!();

    println!("tasks ({}):", graph.len());
    for task in graph.tasks() {
        println!("  - {}", task.name());
        let display = task.expanded_display_name(graph);
        if display != task.name() {
            println!("      name: {display}");
        }
        if let Some(alias) = task.alias() {
            println!("      alias: {alias}");
        }
        if !task.raw_depends_on().is_empty() {
            println!("      depends_on: {:?}", task.raw_depends_on());
        }
        let dependents = graph.dependents_of(task.name());
        if !dependents.is_empty() {
            println!("      depended_on_by: {:?}", dependents);
        }
        for label in task.subtask_labels(graph) {
            println!("      variant: {label}");
        }
        for line in task.env_matrix_labels() {
            println!("      env: {line}");
        }
    }

    for diagnostic in graph.diagnostics() {
        println!("warning: {diagnostic}");
    }

    debug!("dry-run complete (no output rendered)");
}
