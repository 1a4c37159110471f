// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Router topology: the structural graph the shortest-path engine runs over

use crate::error::{Result, TopologyError};
use crate::types::{Cost, Label, Link, Relation};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences, NodeIndexable};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Edge weight stored in the petgraph backing
#[derive(Debug, Clone, Copy)]
struct LinkWeight {
    cost: Cost,
    /// Monotonic insertion counter, petgraph reuses freed edge slots
    seq: u64,
}

/// The router topology with petgraph backing.
///
/// Each undirected petgraph edge is one logical link; it is seen from both
/// endpoints, so the two directional adjacency records always exist or vanish
/// together. Parallel links between the same pair are allowed.
#[derive(Debug, Clone)]
pub struct Topology {
    /// The underlying undirected graph, node weight is the label
    graph: StableUnGraph<Label, LinkWeight>,
    /// Map from label to node index, ordered by label
    node_indices: BTreeMap<Label, NodeIndex>,
    next_seq: u64,
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a caller-supplied cost and narrow it to a link cost
pub fn validate_cost(a: &str, b: &str, cost: i64) -> Result<Cost> {
    Cost::try_from(cost).map_err(|_| TopologyError::InvalidCost {
        a: a.to_string(),
        b: b.to_string(),
        cost,
    })
}

impl Topology {
    /// Create an empty topology
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: StableUnGraph::default(),
            node_indices: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Add an isolated router
    pub fn add_vertex(&mut self, label: &str) -> Result<()> {
        if self.node_indices.contains_key(label) {
            return Err(TopologyError::DuplicateLabel(label.to_string()));
        }
        let idx = self.graph.add_node(label.to_string());
        self.node_indices.insert(label.to_string(), idx);
        debug!("Added router {}", label);
        Ok(())
    }

    /// Remove a router and every link touching it.
    ///
    /// Returns the number of links that went with it.
    pub fn remove_vertex(&mut self, label: &str) -> Result<usize> {
        let idx = self.require(label)?;
        let incident: Vec<EdgeIndex> = self.graph.edges(idx).map(|e| e.id()).collect();
        let removed = incident.len();
        self.graph.remove_node(idx);
        self.node_indices.remove(label);
        debug!("Removed router {} with {} link(s)", label, removed);
        Ok(removed)
    }

    /// Add an undirected link between two existing routers.
    ///
    /// Duplicate parallel links are kept; the costlier one is simply never
    /// chosen by the engine.
    pub fn add_link(&mut self, a: &str, b: &str, cost: i64) -> Result<()> {
        let (ia, ib) = self.endpoints(a, b)?;
        let cost = validate_cost(a, b, cost)?;
        if !self.links_between(ia, ib).is_empty() {
            warn!("Adding parallel link {} - {} (cost {})", a, b, cost);
        }
        self.insert_link(ia, ib, cost);
        debug!("Linked {} - {} (cost {})", a, b, cost);
        Ok(())
    }

    /// Add a link unless an identical one (same pair, same cost) exists.
    ///
    /// Returns whether a link was inserted.
    pub fn ensure_link(&mut self, a: &str, b: &str, cost: i64) -> Result<bool> {
        let (ia, ib) = self.endpoints(a, b)?;
        let cost = validate_cost(a, b, cost)?;
        if self.links_between(ia, ib).iter().any(|&(_, c)| c == cost) {
            return Ok(false);
        }
        self.insert_link(ia, ib, cost);
        Ok(true)
    }

    /// Remove every link between two routers.
    ///
    /// Missing links are not an error; returns how many were removed.
    pub fn remove_link(&mut self, a: &str, b: &str) -> Result<usize> {
        let (ia, ib) = self.endpoints(a, b)?;
        let doomed = self.links_between(ia, ib);
        for (edge, _) in &doomed {
            self.graph.remove_edge(*edge);
        }
        debug!("Unlinked {} - {} ({} link(s))", a, b, doomed.len());
        Ok(doomed.len())
    }

    /// Check whether a router exists
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.node_indices.contains_key(label)
    }

    /// All router labels, in label order
    #[must_use]
    pub fn vertices(&self) -> Vec<&str> {
        self.node_indices.keys().map(String::as_str).collect()
    }

    /// Adjacency of one router, in link insertion order
    pub fn links_of(&self, label: &str) -> Result<Vec<Link>> {
        let idx = self.require(label)?;
        Ok(self
            .adjacency(idx)
            .into_iter()
            .map(|(target, cost)| Link {
                target: self.graph[target].clone(),
                cost,
            })
            .collect())
    }

    /// Full adjacency dump, one entry per router in label order
    #[must_use]
    pub fn relations(&self) -> Vec<Relation> {
        self.node_indices
            .iter()
            .map(|(label, &idx)| Relation {
                label: label.clone(),
                links: self
                    .adjacency(idx)
                    .into_iter()
                    .map(|(target, cost)| Link {
                        target: self.graph[target].clone(),
                        cost,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Get router count
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get undirected link count
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if the topology is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_indices.is_empty()
    }

    /// Export to DOT format for Graphviz
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("graph topology {\n");
        dot.push_str("  node [shape=circle];\n\n");

        for label in self.node_indices.keys() {
            dot.push_str(&format!("  \"{label}\";\n"));
        }

        dot.push('\n');

        let mut links: Vec<_> = (&self.graph).edge_references().collect();
        links.sort_by_key(|e| e.weight().seq);
        for link in links {
            dot.push_str(&format!(
                "  \"{}\" -- \"{}\" [label=\"{}\"];\n",
                self.graph[link.source()],
                self.graph[link.target()],
                link.weight().cost
            ));
        }

        dot.push_str("}\n");
        dot
    }

    pub(crate) fn index_of(&self, label: &str) -> Option<NodeIndex> {
        self.node_indices.get(label).copied()
    }

    pub(crate) fn label_of(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Upper bound on node indices, for dense per-run arrays
    pub(crate) fn node_bound(&self) -> usize {
        self.graph.node_bound()
    }

    /// Neighbours of a node with link costs, in link insertion order
    pub(crate) fn adjacency(&self, idx: NodeIndex) -> Vec<(NodeIndex, Cost)> {
        let mut edges: Vec<_> = self
            .graph
            .edges(idx)
            .map(|e| {
                let other = if e.source() == idx { e.target() } else { e.source() };
                (e.weight().seq, other, e.weight().cost)
            })
            .collect();
        edges.sort_by_key(|&(seq, _, _)| seq);
        edges.into_iter().map(|(_, other, cost)| (other, cost)).collect()
    }

    /// Every link joining two nodes, with its cost
    fn links_between(&self, a: NodeIndex, b: NodeIndex) -> Vec<(EdgeIndex, Cost)> {
        self.graph
            .edges(a)
            .filter(|e| e.source() == b || e.target() == b)
            .map(|e| (e.id(), e.weight().cost))
            .collect()
    }

    fn insert_link(&mut self, a: NodeIndex, b: NodeIndex, cost: Cost) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.graph.add_edge(a, b, LinkWeight { cost, seq });
    }

    fn require(&self, label: &str) -> Result<NodeIndex> {
        self.index_of(label)
            .ok_or_else(|| TopologyError::VertexNotFound(label.to_string()))
    }

    fn endpoints(&self, a: &str, b: &str) -> Result<(NodeIndex, NodeIndex)> {
        let ia = self.require(a)?;
        let ib = self.require(b)?;
        if ia == ib {
            return Err(TopologyError::SelfLink(a.to_string()));
        }
        Ok((ia, ib))
    }
}
