// src/git/mod.rs

//! Git metadata for the graph title.
//!
//! The graph core never shells out; callers hand a [`GitMetadataProvider`]
//! to [`Title::from_provider`](crate::render::Title::from_provider).

use std::fmt::Debug;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

pub mod mock;

pub use mock::FixedGitMetadata;

/// Source of the three opaque strings in the title.
pub trait GitMetadataProvider: Debug {
    /// Repository identity, e.g. `owner/name`.
    fn repo(&self) -> Option<String>;
    fn branch(&self) -> Option<String>;
    fn rev(&self) -> Option<String>;
}

/// Implementation that asks the `git` binary about a working tree.
#[derive(Debug, Clone)]
pub struct GitCommand {
    dir: PathBuf,
}

impl GitCommand {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Run `git -C <dir> <args>` and return trimmed stdout on success.
    fn query(&self, args: &[&str]) -> Option<String> {
        let output = match Command::new("git").arg("-C").arg(&self.dir).args(args).output() {
            Ok(output) => output,
            Err(e) => {
                debug!(error = %e, "could not run git");
                return None;
            }
        };

        if !output.status.success() {
            debug!(
                ?args,
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git query failed"
            );
            return None;
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() { None } else { Some(text) }
    }
}

impl GitMetadataProvider for GitCommand {
    fn repo(&self) -> Option<String> {
        self.query(&["remote", "get-url", "origin"])
            .map(|url| repo_from_remote_url(&url))
    }

    fn branch(&self) -> Option<String> {
        self.query(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn rev(&self) -> Option<String> {
        self.query(&["rev-parse", "--short", "HEAD"])
    }
}

/// Reduce a remote URL to its last two path segments.
///
/// `git@github.com:owner/name.git` and `https://github.com/owner/name`
/// both become `owner/name`. Anything shorter is returned as is.
pub fn repo_from_remote_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let segments: Vec<&str> = trimmed
        .split(['/', ':'])
        .filter(|s| !s.is_empty())
        .collect();

    match segments.as_slice() {
        [.., owner, name] => format!("{owner}/{name}"),
        _ => trimmed.to_string(),
    }
}
