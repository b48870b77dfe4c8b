// src/config/model.rs

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use tracing::warn;

use crate::render::palette::{DEFAULT_FALLBACK_COLOR, default_palette};

/// Settings as read from an optional TOML file.
///
/// ```toml
/// [render]
/// palette = ["blue", "darkgreen", "red3"]
/// fallback_color = "black"
/// reduce_transitive_edges = false
/// title = true
///
/// [graph]
/// reject_cycles = false
/// ```
///
/// All sections are optional and have reasonable defaults. Use
/// [`SettingsFile::try_from`] to obtain a validated [`SettingsFile`].
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSettingsFile {
    #[serde(default)]
    pub render: RenderSection,

    #[serde(default)]
    pub graph: GraphSection,
}

/// Validated settings. Only constructible through validation.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    pub render: RenderSection,
    pub graph: GraphSection,
}

impl SettingsFile {
    pub(crate) fn new_unchecked(render: RenderSection, graph: GraphSection) -> Self {
        Self { render, graph }
    }
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self::new_unchecked(RenderSection::default(), GraphSection::default())
    }
}

/// `[render]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderSection {
    /// Colours handed out to nodes in discovery order. Never replenished.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// Colour used once `palette` runs out.
    #[serde(default = "default_fallback_color")]
    pub fallback_color: String,

    /// Drop edges implied by a longer path before emitting.
    #[serde(default)]
    pub reduce_transitive_edges: bool,

    /// Emit the `repo: branch @ rev` title.
    #[serde(default = "default_title")]
    pub title: bool,
}

fn default_fallback_color() -> String {
    DEFAULT_FALLBACK_COLOR.to_string()
}

fn default_title() -> bool {
    true
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            fallback_color: default_fallback_color(),
            reduce_transitive_edges: false,
            title: default_title(),
        }
    }
}

/// `[graph]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GraphSection {
    /// Treat a dependency cycle as a fatal error instead of a warning.
    #[serde(default)]
    pub reject_cycles: bool,
}

/// Document-level fields of a CI configuration.
///
/// Task entries are picked out of the top-level mapping by key name, so they
/// are not part of this struct; see [`crate::dag::TaskGraph::from_document`].
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawDocument {
    #[serde(default, deserialize_with = "scalar_field")]
    pub name: Option<String>,

    #[serde(default)]
    pub env: Option<Value>,
}

/// One `<name>_task:` entry.
///
/// Every other key a CI task may carry (`container`, `script`, `only_if`,
/// ...) is ignored.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawTask {
    /// Human-facing name; may contain `${VAR}` references.
    #[serde(default, deserialize_with = "scalar_field")]
    pub name: Option<String>,

    /// Alternate identifier usable in `depends_on`.
    #[serde(default, deserialize_with = "scalar_field")]
    pub alias: Option<String>,

    /// Tasks this one requires, by name or alias.
    #[serde(default)]
    pub depends_on: Option<DependsOn>,

    /// Variant matrix. Expected to be a list of mappings; checked at parse
    /// time so a wrong shape becomes a diagnostic, not an error.
    #[serde(default)]
    pub matrix: Option<Value>,

    /// Task-level env, optionally with a nested `matrix` of env tuples.
    #[serde(default)]
    pub env: Option<Value>,
}

/// `depends_on` written either as one entry or as a list.
///
/// Entries are kept as raw YAML so that `42` or `true` still name a task.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DependsOn {
    Many(Vec<Value>),
    One(Value),
}

impl DependsOn {
    /// Entries as task identifiers. Blank and non-scalar entries are dropped.
    pub fn into_vec(self) -> Vec<String> {
        let entries = match self {
            DependsOn::Many(deps) => deps,
            DependsOn::One(dep) => vec![dep],
        };
        entries
            .iter()
            .filter_map(|entry| {
                let text = scalar_text(entry);
                if text.is_none() {
                    warn!(?entry, "ignoring depends_on entry that is not a task identifier");
                }
                text
            })
            .collect()
    }
}

/// Text of a YAML scalar used as a name or identifier.
///
/// `null`, blank strings, sequences and mappings have none.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.trim().is_empty() { None } else { Some(text) }
}

fn scalar_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_text))
}
