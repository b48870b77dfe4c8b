// src/config/mod.rs

//! Configuration loading and validation for cigraph.
//!
//! Responsibilities:
//! - Define the TOML-backed settings model and the YAML task model (`model.rs`).
//! - Load settings and CI documents from disk (`loader.rs`).
//! - Validate settings invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_document, load_settings, load_settings_from_path, parse_document};
pub use model::{
    DependsOn, GraphSection, RawDocument, RawSettingsFile, RawTask, RenderSection, SettingsFile,
};
