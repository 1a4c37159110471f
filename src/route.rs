// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Shortest-path trees and path reconstruction
//!
//! A tree is the complete per-run state of one engine invocation. It lives
//! outside the topology, so a new run never sees values left over from an
//! earlier source or an earlier topology.

use crate::types::{Distance, Label};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-router result of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Best distance from the source; `None` means unreachable
    pub distance: Option<Distance>,
    /// Predecessor on the shortest path; `None` for the source and unreachable routers
    pub previous: Option<Label>,
}

/// A resolved route from the source to one destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Destination router
    pub destination: Label,
    /// Routers from source to destination, both inclusive
    pub hops: Vec<Label>,
    /// Total cost
    pub cost: Distance,
}

impl Route {
    /// Render hops as `A>B>C`
    #[must_use]
    pub fn display_path(&self) -> String {
        format_hops(&self.hops)
    }
}

/// Join labels with `>`
#[must_use]
pub fn format_hops(hops: &[Label]) -> String {
    hops.join(">")
}

/// Distances and predecessors for every router, from one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPathTree {
    source: Label,
    entries: BTreeMap<Label, RouteEntry>,
}

impl ShortestPathTree {
    pub(crate) fn new(source: Label, entries: BTreeMap<Label, RouteEntry>) -> Self {
        Self { source, entries }
    }

    /// The router this tree was computed from
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Entry for a router, if it existed when the tree was computed
    #[must_use]
    pub fn entry(&self, label: &str) -> Option<&RouteEntry> {
        self.entries.get(label)
    }

    /// All entries in label order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &RouteEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of routers covered
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the tree covers no routers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best distance to a router; `None` if unreachable or unknown
    #[must_use]
    pub fn distance(&self, label: &str) -> Option<Distance> {
        self.entries.get(label).and_then(|e| e.distance)
    }

    /// Predecessor of a router on its shortest path
    #[must_use]
    pub fn previous(&self, label: &str) -> Option<&str> {
        self.entries.get(label).and_then(|e| e.previous.as_deref())
    }

    /// Whether a router has a finite distance. Check this before trusting `path_to`.
    #[must_use]
    pub fn reachable(&self, label: &str) -> bool {
        self.distance(label).is_some()
    }

    /// Walk predecessors back from `target` and return source-to-target hops.
    ///
    /// Unreachable or unknown targets give an empty path; the source gives
    /// `[source]`.
    #[must_use]
    pub fn path_to(&self, target: &str) -> Vec<Label> {
        if !self.reachable(target) {
            return Vec::new();
        }
        let mut hops = vec![target.to_string()];
        let mut current = target;
        while let Some(prev) = self.previous(current) {
            // a predecessor chain longer than the tree is a cycle
            if hops.len() > self.entries.len() {
                break;
            }
            hops.push(prev.to_string());
            current = prev;
        }
        hops.reverse();
        hops
    }

    /// Full route to a destination, or `None` when unreachable
    #[must_use]
    pub fn route(&self, destination: &str) -> Option<Route> {
        let cost = self.distance(destination)?;
        Some(Route {
            destination: destination.to_string(),
            hops: self.path_to(destination),
            cost,
        })
    }

    /// Routes to every router except the source, in label order
    #[must_use]
    pub fn routes(&self) -> Vec<(Label, Option<Route>)> {
        self.entries
            .keys()
            .filter(|label| **label != self.source)
            .map(|label| (label.clone(), self.route(label)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(distance: Option<Distance>, previous: Option<&str>) -> RouteEntry {
        RouteEntry {
            distance,
            previous: previous.map(String::from),
        }
    }

    fn make_tree() -> ShortestPathTree {
        // A -1- B -2- C, D isolated
        let mut entries = BTreeMap::new();
        entries.insert("A".to_string(), entry(Some(0), None));
        entries.insert("B".to_string(), entry(Some(1), Some("A")));
        entries.insert("C".to_string(), entry(Some(3), Some("B")));
        entries.insert("D".to_string(), entry(None, None));
        ShortestPathTree::new("A".into(), entries)
    }

    #[test]
    fn test_path_to_walks_predecessors() {
        let tree = make_tree();
        assert_eq!(tree.path_to("C"), vec!["A", "B", "C"]);
        assert_eq!(tree.path_to("A"), vec!["A"]);
    }

    #[test]
    fn test_unreachable_has_no_path() {
        let tree = make_tree();
        assert!(!tree.reachable("D"));
        assert!(tree.path_to("D").is_empty());
        assert!(tree.route("D").is_none());
        assert!(tree.path_to("nowhere").is_empty());
    }

    #[test]
    fn test_route_display() {
        let tree = make_tree();
        let route = tree.route("C").unwrap();
        assert_eq!(route.cost, 3);
        assert_eq!(route.display_path(), "A>B>C");
    }

    #[test]
    fn test_routes_skip_source() {
        let tree = make_tree();
        let labels: Vec<_> = tree.routes().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["B", "C", "D"]);
    }

    #[test]
    fn test_cyclic_predecessors_terminate() {
        let mut entries = BTreeMap::new();
        entries.insert("X".to_string(), entry(Some(1), Some("Y")));
        entries.insert("Y".to_string(), entry(Some(1), Some("X")));
        let tree = ShortestPathTree::new("S".into(), entries);

        assert!(tree.path_to("X").len() <= 3);
    }
}
