// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod relations;
pub mod render;
pub mod replay;
pub mod route;

use crate::config::Config;
use crate::lsa::LoadOptions;
use crate::types::{Label, Mode};
use anyhow::Result;

/// Arguments shared by commands that compute routes
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// Source router
    pub source: Option<Label>,
    /// Engine mode
    pub mode: Option<Mode>,
    /// Deduplicate identical links while loading
    pub dedup: bool,
}

impl RunArgs {
    /// Resolve the source router: flag first, then config
    pub fn source(&self, config: &Config) -> Result<Label> {
        self.source
            .clone()
            .or_else(|| config.source.clone())
            .ok_or_else(|| anyhow::anyhow!("--source is required (or set `source` in the config file)"))
    }

    /// Resolve the engine mode: flag first, then config
    #[must_use]
    pub fn mode(&self, config: &Config) -> Mode {
        self.mode.unwrap_or(config.mode)
    }

    /// Loader options: either the flag or the config can turn dedup on
    #[must_use]
    pub fn load_options(&self, config: &Config) -> LoadOptions {
        LoadOptions {
            dedup: self.dedup || config.dedup,
        }
    }
}
