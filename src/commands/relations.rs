// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Relations command - dump the adjacency of every router

use super::render::{self, Output};
use crate::lsa::{self, LoadOptions};
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Supported dump formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    /// `X: N:c N:c` lines
    Text,
    /// Graphviz DOT
    Dot,
    /// `.lsa` topology text
    Lsa,
}

impl DumpFormat {
    /// Parse format from string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "dot" | "graphviz" => Some(Self::Dot),
            "lsa" => Some(Self::Lsa),
            _ => None,
        }
    }
}

/// Run the relations command
pub fn run(topology: &Path, format: &str, options: LoadOptions, output: Output) -> Result<()> {
    let format = DumpFormat::parse(format)
        .ok_or_else(|| anyhow::anyhow!("Unknown format: {}. Supported: text, dot, lsa", format))?;
    let topology = lsa::load(topology, options)?;
    info!(
        "Topology has {} router(s) and {} link(s)",
        topology.vertex_count(),
        topology.link_count()
    );

    if output.json {
        println!("{}", serde_json::to_string_pretty(&topology.relations())?);
        return Ok(());
    }

    let content = match format {
        DumpFormat::Text => render::relations(&topology.relations()),
        DumpFormat::Dot => topology.to_dot(),
        DumpFormat::Lsa => lsa::render(&topology),
    };
    print!("{content}");
    Ok(())
}
