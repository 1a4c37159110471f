// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Human-readable rendering of routes, discoveries and relations

use crate::route::ShortestPathTree;
use crate::spf::{Discovery, DiscoveryKind};
use crate::types::Relation;
use owo_colors::OwoColorize;
use std::fmt::Write as _;

/// Output switches shared by all commands
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Emit JSON instead of text
    pub json: bool,
    /// Use terminal colors
    pub color: bool,
}

/// One discovery event line
#[must_use]
pub fn discovery_line(event: &Discovery, color: bool) -> String {
    let line = event.to_string();
    match (color, event.kind) {
        (false, _) => line,
        (true, DiscoveryKind::Found) => line.green().to_string(),
        (true, DiscoveryKind::Improved) => line.yellow().to_string(),
    }
}

/// Route table for every router except the source
#[must_use]
pub fn route_table(tree: &ShortestPathTree, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Source {}:", tree.source());
    for (label, route) in tree.routes() {
        match route {
            Some(route) => {
                let _ = writeln!(out, "{}: Path: {} Cost:{}", label, route.display_path(), route.cost);
            }
            None if color => {
                let _ = writeln!(out, "{}: {}", label, "unreachable".red());
            }
            None => {
                let _ = writeln!(out, "{label}: unreachable");
            }
        }
    }
    out
}

/// Adjacency dump under the classic heading
#[must_use]
pub fn relations(relations: &[Relation]) -> String {
    let mut out = String::from("======= Below are the relations =======\n");
    for relation in relations {
        out.push_str(&relation.label);
        out.push(':');
        for link in &relation.links {
            let _ = write!(out, " {link}");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spf;
    use crate::topology::Topology;
    use crate::types::Mode;

    fn make_topology() -> Topology {
        let mut topo = Topology::new();
        for label in ["A", "B", "C", "D"] {
            topo.add_vertex(label).unwrap();
        }
        topo.add_link("A", "B", 1).unwrap();
        topo.add_link("B", "C", 2).unwrap();
        topo
    }

    #[test]
    fn test_route_table_plain() {
        let run = spf::compute(&make_topology(), "A", Mode::Batch).unwrap();
        insta::assert_snapshot!(route_table(&run.tree, false), @r"
        Source A:
        B: Path: A>B Cost:1
        C: Path: A>B>C Cost:3
        D: unreachable
        ");
    }

    #[test]
    fn test_relations_dump() {
        insta::assert_snapshot!(relations(&make_topology().relations()), @r"
        ======= Below are the relations =======
        A: B:1
        B: A:1 C:2
        C: B:2
        D:
        ");
    }

    #[test]
    fn test_discovery_line_plain() {
        let run = spf::compute(&make_topology(), "A", Mode::Incremental).unwrap();
        assert_eq!(discovery_line(&run.discoveries[0], false), "Found B: Path: A>B Cost:1");
    }
}
