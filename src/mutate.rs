// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Topology edits applied between shortest-path runs
//!
//! There is no "change cost" edit: unlink and add the router again instead.

use crate::error::Result;
use crate::topology::Topology;
use crate::types::Label;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Add or delete a router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum NodeEdit {
    /// New router with its initial links; all-or-nothing
    Add {
        /// New router label
        label: Label,
        /// `(neighbour, cost)` pairs, neighbours must already exist
        links: Vec<(Label, i64)>,
    },
    /// Remove a router and all links touching it
    Delete {
        /// Router to remove
        label: Label,
    },
}

/// Remove the link(s) between two routers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeEdit {
    /// First endpoint
    pub a: Label,
    /// Second endpoint
    pub b: Label,
}

/// Any structural change a driver can request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Mutation {
    /// Router edit
    Node(NodeEdit),
    /// Link edit
    Edge(EdgeEdit),
}

impl From<NodeEdit> for Mutation {
    fn from(edit: NodeEdit) -> Self {
        Self::Node(edit)
    }
}

impl From<EdgeEdit> for Mutation {
    fn from(edit: EdgeEdit) -> Self {
        Self::Edge(edit)
    }
}

/// What an applied edit changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Router added with this many links
    Added {
        /// New router
        label: Label,
        /// Links created
        links: usize,
    },
    /// Router deleted along with this many links
    Deleted {
        /// Removed router
        label: Label,
        /// Links removed with it
        links: usize,
    },
    /// Links removed between two routers; zero when there was none
    Unlinked {
        /// First endpoint
        a: Label,
        /// Second endpoint
        b: Label,
        /// Links removed
        links: usize,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { label, links } => write!(f, "Added router {label} with {links} link(s)"),
            Self::Deleted { label, links } => {
                write!(f, "Deleted router {label} and {links} link(s)")
            }
            Self::Unlinked { a, b, links: 0 } => write!(f, "No link between {a} and {b}"),
            Self::Unlinked { a, b, links } => write!(f, "Removed {links} link(s) between {a} and {b}"),
        }
    }
}

/// Apply a router edit.
///
/// A failed add leaves the topology exactly as it was: the new router is
/// rolled back together with any links already made.
pub fn apply_node_edit(topology: &mut Topology, edit: &NodeEdit) -> Result<Outcome> {
    match edit {
        NodeEdit::Add { label, links } => {
            topology.add_vertex(label)?;
            for (neighbour, cost) in links {
                if let Err(err) = topology.add_link(label, neighbour, *cost) {
                    debug!("Rolling back router {}: {}", label, err);
                    topology.remove_vertex(label)?;
                    return Err(err);
                }
            }
            info!("Added router {} with {} link(s)", label, links.len());
            Ok(Outcome::Added {
                label: label.clone(),
                links: links.len(),
            })
        }
        NodeEdit::Delete { label } => {
            let links = topology.remove_vertex(label)?;
            info!("Deleted router {} ({} link(s))", label, links);
            Ok(Outcome::Deleted {
                label: label.clone(),
                links,
            })
        }
    }
}

/// Apply a link removal; a missing link is a no-op
pub fn apply_edge_edit(topology: &mut Topology, edit: &EdgeEdit) -> Result<Outcome> {
    let links = topology.remove_link(&edit.a, &edit.b)?;
    info!("Unlinked {} - {} ({} link(s))", edit.a, edit.b, links);
    Ok(Outcome::Unlinked {
        a: edit.a.clone(),
        b: edit.b.clone(),
        links,
    })
}

/// Apply any mutation
pub fn apply(topology: &mut Topology, mutation: &Mutation) -> Result<Outcome> {
    match mutation {
        Mutation::Node(edit) => apply_node_edit(topology, edit),
        Mutation::Edge(edit) => apply_edge_edit(topology, edit),
    }
}
