// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::loader::default_config_path;

/// Command-line arguments for `cigraph`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cigraph",
    version,
    about = "Draw the task dependency graph of a CI configuration as Graphviz DOT.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the CI configuration (YAML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Optional settings file (TOML) with palette and render options.
    #[arg(long, value_name = "PATH")]
    pub settings: Option<String>,

    /// Write the DOT text here instead of stdout.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<String>,

    /// Drop edges already implied by a longer dependency path.
    #[arg(long)]
    pub reduce: bool,

    /// Fail instead of warning when the dependencies form a cycle.
    #[arg(long)]
    pub reject_cycles: bool,

    /// Omit the `repo: branch @ rev` title.
    #[arg(long)]
    pub no_title: bool,

    /// Repository shown in the title (default: from `git remote`).
    #[arg(long, value_name = "NAME")]
    pub repo: Option<String>,

    /// Branch shown in the title (default: current git branch).
    #[arg(long, value_name = "NAME")]
    pub branch: Option<String>,

    /// Revision shown in the title (default: current git commit).
    #[arg(long, value_name = "REV")]
    pub rev: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `--debug`, `--verbose`, `CIGRAPH_LOG` or a default level
    /// will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Shorthand for `--log-level debug`.
    #[arg(long, short)]
    pub verbose: bool,

    /// Shorthand for `--log-level trace`.
    #[arg(long, short)]
    pub debug: bool,

    /// Parse and resolve the configuration, list tasks, but emit no DOT.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Log level requested on the command line, if any.
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        self.log_level.or(if self.debug {
            Some(LogLevel::Trace)
        } else if self.verbose {
            Some(LogLevel::Debug)
        } else {
            None
        })
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
