// src/render/mod.rs

//! DOT output for a [`TaskGraph`](crate::dag::TaskGraph).
//!
//! - [`dot`] walks the graph and writes node and edge declarations.
//! - [`palette`] hands out node colours.
//!
//! The text produced here is meant for `tred` (optional) and then `dot`.

pub mod dot;
pub mod palette;

use std::fmt;

use crate::git::GitMetadataProvider;
use crate::render::palette::{DEFAULT_FALLBACK_COLOR, default_palette};
use crate::types::Diagnostic;

pub use dot::render;
pub use palette::Palette;

/// Graph title: `"<repo>: <branch> @ <rev>"`.
///
/// Parts are opaque strings; missing ones print as `(unknown ...)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Title {
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub rev: Option<String>,
}

impl Title {
    pub fn from_provider(provider: &dyn GitMetadataProvider) -> Self {
        Self {
            repo: provider.repo(),
            branch: provider.branch(),
            rev: provider.rev(),
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} @ {}",
            self.repo.as_deref().unwrap_or("(unknown repo)"),
            self.branch.as_deref().unwrap_or("(unknown branch)"),
            self.rev.as_deref().unwrap_or("(unknown rev)"),
        )
    }
}

/// Everything that shapes the emitted text apart from the graph itself.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub palette: Vec<String>,
    pub fallback_color: String,
    /// Skip edges implied by a longer path (acyclic graphs only).
    pub reduce_transitive_edges: bool,
    /// `None` omits the title lines.
    pub title: Option<Title>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            fallback_color: DEFAULT_FALLBACK_COLOR.to_string(),
            reduce_transitive_edges: false,
            title: None,
        }
    }
}

/// Output of one [`render`] call.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// The graph description text.
    pub dot: String,
    /// Non-fatal problems hit while rendering.
    pub diagnostics: Vec<Diagnostic>,
}
