// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Structural problems in the task graph (unknown or ambiguous references,
//! duplicate task names) are fatal and surface here. Cosmetic problems
//! (palette exhaustion, malformed matrices) are not errors; see
//! [`crate::types::Diagnostic`].

use thiserror::Error;

use crate::types::TaskName;

#[derive(Error, Debug)]
pub enum CigraphError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("unresolved task reference '{identifier}'{}", referred_from(.referrer))]
    UnresolvedReference {
        identifier: String,
        referrer: Option<TaskName>,
    },

    #[error(
        "ambiguous task reference '{identifier}' matches {candidates:?}{}",
        referred_from(.referrer)
    )]
    AmbiguousReference {
        identifier: String,
        candidates: Vec<TaskName>,
        referrer: Option<TaskName>,
    },

    #[error("Duplicate task name: {0}")]
    DuplicateTask(TaskName),

    #[error("Cycle detected in task graph: {0}")]
    DagCycle(String),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("formatting error: {0}")]
    FmtError(#[from] std::fmt::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CigraphError {
    /// Attach the name of the task whose `depends_on` produced this error.
    ///
    /// Errors other than reference errors are returned unchanged.
    pub fn referred_by(self, task: &str) -> Self {
        match self {
            CigraphError::UnresolvedReference { identifier, .. } => {
                CigraphError::UnresolvedReference {
                    identifier,
                    referrer: Some(task.to_string()),
                }
            }
            CigraphError::AmbiguousReference {
                identifier,
                candidates,
                ..
            } => CigraphError::AmbiguousReference {
                identifier,
                candidates,
                referrer: Some(task.to_string()),
            },
            other => other,
        }
    }
}

fn referred_from(referrer: &Option<TaskName>) -> String {
    match referrer {
        Some(task) => format!(" in `depends_on` of task '{task}'"),
        None => String::new(),
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CigraphError>;
