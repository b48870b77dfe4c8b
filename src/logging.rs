// src/logging.rs

//! Logging setup for `cigraph` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the filter:
//! 1. `--log-level`, `--debug` or `--verbose` on the CLI
//! 2. `CIGRAPH_LOG` environment variable, any `EnvFilter` directive
//!    (e.g. "debug" or "cigraph::render=trace")
//! 3. default to `warn`, so palette and matrix warnings still show
//!
//! Logs are sent to STDERR so that stdout can carry the DOT text.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable consulted when no level is given on the CLI.
pub const LOG_ENV_VAR: &str = "CIGRAPH_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Initialise the global logging subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(cli_level, env.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("initialising logging: {e}"))
}

/// Resolve the filter from the CLI level and the raw env value.
///
/// An env value that does not parse as a filter is ignored.
pub fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    match cli_level {
        Some(lvl) => EnvFilter::new(directive(lvl)),
        None => env
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| EnvFilter::try_new(s).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

fn directive(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
