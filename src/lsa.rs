// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! `.lsa` topology files
//!
//! One router per line: the router label (optionally followed by `:`), then
//! whitespace separated `neighbour:cost` pairs.
//!
//! ```text
//! # comment
//! A: B:5 C:3
//! B: A:5 C:1
//! C: A:3 B:1
//! ```
//!
//! A pair naming a router that has not been declared yet is held until that
//! router's line. If that line names this router back, the link is made from
//! there, so a link listed from both ends is created once; otherwise the held
//! pair is linked as written.

use crate::error::{Result, TopologyError};
use crate::topology::{validate_cost, Topology};
use crate::types::Label;
use anyhow::Context;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One parsed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line number
    pub line: usize,
    /// Router declared by this line
    pub label: Label,
    /// `(neighbour, cost)` pairs in file order
    pub links: Vec<(Label, i64)>,
}

/// Loader switches
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Skip a link when an identical one already exists
    pub dedup: bool,
}

fn parse_error(line: usize, message: impl Into<String>) -> TopologyError {
    TopologyError::Parse {
        line,
        message: message.into(),
    }
}

/// Parse a `neighbour:cost` token
pub fn parse_pair(token: &str, line: usize) -> Result<(Label, i64)> {
    let (label, cost) = token
        .split_once(':')
        .ok_or_else(|| parse_error(line, format!("expected neighbour:cost, got '{token}'")))?;
    if label.is_empty() {
        return Err(parse_error(line, format!("missing neighbour in '{token}'")));
    }
    let cost: i64 = cost
        .parse()
        .map_err(|_| parse_error(line, format!("invalid cost in '{token}'")))?;
    Ok((label.to_string(), cost))
}

/// Parse one router line: label followed by pairs.
///
/// Returns `None` for blank and comment lines.
pub fn parse_record(text: &str, line: usize) -> Result<Option<Record>> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }
    let mut tokens = text.split_whitespace();
    let head = tokens.next().unwrap_or_default();
    let label = head.strip_suffix(':').unwrap_or(head);
    if label.is_empty() || label.contains(':') {
        return Err(parse_error(line, format!("invalid router label '{head}'")));
    }
    let links = tokens
        .map(|token| parse_pair(token, line))
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(Record {
        line,
        label: label.to_string(),
        links,
    }))
}

/// Parse every line of a topology file
pub fn parse_records(text: &str) -> Result<Vec<Record>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| parse_record(line, i + 1).transpose())
        .collect()
}

/// Link `a` to `b` at `cost`, honouring the dedup option
fn link(topology: &mut Topology, a: &str, b: &str, cost: i64, options: LoadOptions) -> Result<()> {
    if options.dedup {
        topology.ensure_link(a, b, cost).map(|_| ())
    } else {
        topology.add_link(a, b, cost)
    }
}

/// Build a topology from parsed records
pub fn build(records: &[Record], options: LoadOptions) -> Result<Topology> {
    let mut topology = Topology::new();
    // undeclared neighbour -> (line, declaring router, cost)
    let mut pending: BTreeMap<&str, Vec<(usize, &str, i64)>> = BTreeMap::new();

    for record in records {
        topology.add_vertex(&record.label).map_err(|_| {
            parse_error(record.line, format!("router '{}' declared twice", record.label))
        })?;

        // Pairs naming this router from earlier lines. If this line lists the
        // earlier router back, its own pair makes the link below.
        for (line, earlier, cost) in pending.remove(record.label.as_str()).unwrap_or_default() {
            if record.links.iter().any(|(n, _)| n == earlier) {
                continue;
            }
            debug!("Line {}: linking {} - {} from one side", line, earlier, record.label);
            link(&mut topology, earlier, &record.label, cost, options)
                .map_err(|err| parse_error(line, err.to_string()))?;
        }

        for (neighbour, cost) in &record.links {
            validate_cost(&record.label, neighbour, *cost)
                .map_err(|err| parse_error(record.line, err.to_string()))?;
            if *neighbour == record.label {
                return Err(parse_error(
                    record.line,
                    format!("router '{neighbour}' lists itself"),
                ));
            }
            if !topology.contains(neighbour) {
                debug!("Line {}: deferring link {} - {}", record.line, record.label, neighbour);
                pending
                    .entry(neighbour.as_str())
                    .or_default()
                    .push((record.line, record.label.as_str(), *cost));
                continue;
            }
            link(&mut topology, &record.label, neighbour, *cost, options)
                .map_err(|err| parse_error(record.line, err.to_string()))?;
        }
    }

    for (missing, refs) in pending {
        warn!(
            "Router {} is referenced on {} line(s) but never declared; its links were dropped",
            missing,
            refs.len()
        );
    }

    Ok(topology)
}

/// Parse topology text
pub fn parse(text: &str, options: LoadOptions) -> Result<Topology> {
    build(&parse_records(text)?, options)
}

/// Load a topology file
pub fn load(path: &Path, options: LoadOptions) -> anyhow::Result<Topology> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let topology = parse(&content, options)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(
        "Loaded {} router(s), {} link(s) from {}",
        topology.vertex_count(),
        topology.link_count(),
        path.display()
    );
    Ok(topology)
}

/// Render a topology back to `.lsa` text
#[must_use]
pub fn render(topology: &Topology) -> String {
    let mut out = String::new();
    for relation in topology.relations() {
        out.push_str(&relation.label);
        out.push(':');
        for link in &relation.links {
            let _ = write!(out, " {link}");
        }
        out.push('\n');
    }
    out
}
