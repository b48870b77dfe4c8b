// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{RawSettingsFile, SettingsFile};
use crate::errors::{CigraphError, Result};

impl TryFrom<RawSettingsFile> for SettingsFile {
    type Error = crate::errors::CigraphError;

    fn try_from(raw: RawSettingsFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_settings(&raw)?;
        Ok(SettingsFile::new_unchecked(raw.render, raw.graph))
    }
}

fn validate_raw_settings(cfg: &RawSettingsFile) -> Result<()> {
    validate_fallback_color(cfg)?;
    validate_palette(cfg)?;
    Ok(())
}

fn validate_fallback_color(cfg: &RawSettingsFile) -> Result<()> {
    if cfg.render.fallback_color.trim().is_empty() {
        return Err(CigraphError::ConfigError(
            "[render].fallback_color must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_palette(cfg: &RawSettingsFile) -> Result<()> {
    let mut seen = HashSet::new();
    for (idx, color) in cfg.render.palette.iter().enumerate() {
        if color.trim().is_empty() {
            return Err(CigraphError::ConfigError(format!(
                "[render].palette entry {} is empty",
                idx
            )));
        }
        // Two nodes sharing a colour would make their edge chains unreadable.
        if !seen.insert(color.as_str()) {
            return Err(CigraphError::ConfigError(format!(
                "[render].palette lists colour '{}' more than once",
                color
            )));
        }
    }
    Ok(())
}
