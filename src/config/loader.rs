// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;

use crate::config::model::{RawSettingsFile, SettingsFile};
use crate::errors::Result;

/// Load a settings file from a given path and return the raw `RawSettingsFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_settings`] for that.
pub fn load_settings_from_path(path: impl AsRef<Path>) -> Result<RawSettingsFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let settings: RawSettingsFile = toml::from_str(&contents)?;

    Ok(settings)
}

/// Load and validate a settings file.
///
/// With `None`, the built-in defaults are returned.
pub fn load_settings(path: Option<&Path>) -> Result<SettingsFile> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading settings");
            let raw = load_settings_from_path(path)?;
            SettingsFile::try_from(raw)
        }
        None => Ok(SettingsFile::default()),
    }
}

/// Parse CI configuration text into a YAML document.
///
/// YAML merge keys (`<<: *anchor`) are applied here, so task entries built
/// from shared anchors carry their merged `depends_on`, `env` and `matrix`.
pub fn parse_document(contents: &str) -> Result<Value> {
    let mut doc: Value = serde_yaml::from_str(contents)?;
    doc.apply_merge()?;
    Ok(doc)
}

/// Read and parse the CI configuration at `path`.
pub fn load_document(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = contents.len(), "read CI configuration");
    parse_document(&contents)
}

/// Default CI configuration path: `.cirrus.yml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(".cirrus.yml")
}
