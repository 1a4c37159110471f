// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management

use crate::types::{Label, Mode};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration, read from `config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine mode when `--mode` is not given
    pub mode: Mode,
    /// Source router when `--source` is not given
    pub source: Option<Label>,
    /// Skip identical duplicate links while loading
    pub dedup: bool,
    /// Colored human output
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Batch,
            source: None,
            dedup: false,
            color: true,
        }
    }
}

/// Platform config file location
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "hyperpolymath", "linkstate")
        .map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration from an explicit path, the platform location, or defaults.
///
/// A missing file at the platform location is not an error; a missing
/// explicit file is.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}
