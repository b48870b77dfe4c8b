// src/render/palette.rs

use std::collections::VecDeque;

use tracing::warn;

use crate::types::Diagnostic;

/// Colour used for every node once the palette runs out.
pub const DEFAULT_FALLBACK_COLOR: &str = "black";

/// Graphviz X11 colour names, picked to stay apart on a white background.
pub const DEFAULT_PALETTE: &[&str] = &[
    "blue",
    "darkgreen",
    "red3",
    "darkorange2",
    "purple",
    "brown",
    "deeppink3",
    "dodgerblue4",
    "forestgreen",
    "goldenrod4",
    "magenta4",
    "navy",
    "olivedrab",
    "orangered3",
    "sienna",
    "slateblue",
    "steelblue4",
    "tomato3",
    "turquoise4",
    "violetred",
    "chocolate",
    "darkcyan",
    "firebrick",
    "indigo",
];

pub fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
}

/// Colours handed out front to back, never replenished.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: VecDeque<String>,
    fallback: String,
    exhausted: bool,
}

impl Palette {
    pub fn new(colors: Vec<String>, fallback: impl Into<String>) -> Self {
        Self {
            colors: colors.into(),
            fallback: fallback.into(),
            exhausted: false,
        }
    }

    /// Take the next colour for `task`.
    ///
    /// The first time the palette comes up empty a
    /// [`Diagnostic::PaletteExhausted`] is returned alongside the fallback.
    pub fn next_for(&mut self, task: &str) -> (String, Option<Diagnostic>) {
        if let Some(color) = self.colors.pop_front() {
            return (color, None);
        }

        if self.exhausted {
            return (self.fallback.clone(), None);
        }
        self.exhausted = true;

        warn!(
            task = %task,
            fallback = %self.fallback,
            "colour palette exhausted; using fallback colour for remaining tasks"
        );
        (
            self.fallback.clone(),
            Some(Diagnostic::PaletteExhausted {
                first_task: task.to_string(),
            }),
        )
    }
}
