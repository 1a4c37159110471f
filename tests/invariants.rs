// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for the topology and the shortest-path engine
//!
//! These tests verify critical invariants:
//! 1. Distances match an exhaustive reference computation
//! 2. Path costs add up to the reported distance
//! 3. Recomputing over an unchanged topology gives the same tree
//! 4. Links stay symmetric through every edit

use linkstate::mutate::{self, EdgeEdit, NodeEdit};
use linkstate::spf::{self, DiscoveryKind};
use linkstate::types::{Cost, Distance, Mode};
use linkstate::{Topology, TopologyError};
use proptest::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Test Helpers
// =============================================================================

fn label(i: usize) -> String {
    format!("R{i}")
}

fn build(n: usize, links: &[(usize, usize, Cost)]) -> Topology {
    let mut topo = Topology::new();
    for i in 0..n {
        topo.add_vertex(&label(i)).unwrap();
    }
    for &(a, b, cost) in links {
        if a != b {
            topo.add_link(&label(a), &label(b), i64::from(cost)).unwrap();
        }
    }
    topo
}

/// Floyd-Warshall over the same link list
fn reference_distances(n: usize, links: &[(usize, usize, Cost)]) -> Vec<Vec<Option<Distance>>> {
    let mut dist = vec![vec![None; n]; n];
    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = Some(0);
    }
    for &(a, b, cost) in links {
        if a == b {
            continue;
        }
        let cost = Distance::from(cost);
        for (x, y) in [(a, b), (b, a)] {
            if dist[x][y].map_or(true, |d| cost < d) {
                dist[x][y] = Some(cost);
            }
        }
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                if let (Some(ik), Some(kj)) = (dist[i][k], dist[k][j]) {
                    if dist[i][j].map_or(true, |d| ik + kj < d) {
                        dist[i][j] = Some(ik + kj);
                    }
                }
            }
        }
    }
    dist
}

/// Cheapest direct link between two routers
fn link_cost(topo: &Topology, a: &str, b: &str) -> Option<Distance> {
    topo.links_of(a)
        .unwrap()
        .iter()
        .filter(|l| l.target == b)
        .map(|l| Distance::from(l.cost))
        .min()
}

/// Each directional record must have a partner with the same cost
fn assert_symmetric(topo: &Topology) {
    let mut counts: HashMap<(String, String, Cost), i64> = HashMap::new();
    for relation in topo.relations() {
        for link in &relation.links {
            assert!(topo.contains(&link.target), "dangling link to {}", link.target);
            let (lo, hi) = if relation.label < link.target {
                (relation.label.clone(), link.target.clone())
            } else {
                (link.target.clone(), relation.label.clone())
            };
            let sign = if relation.label == lo { 1 } else { -1 };
            *counts.entry((lo, hi, link.cost)).or_default() += sign;
        }
    }
    assert!(counts.values().all(|&c| c == 0), "asymmetric adjacency: {counts:?}");
}

fn topology_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, Cost)>)> {
    (1usize..8).prop_flat_map(|n| {
        let links = prop::collection::vec((0..n, 0..n, 0u32..20), 0..16);
        (Just(n), links)
    })
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_linear_scenario() {
    // A -1- B -2- C
    let mut topo = Topology::new();
    for l in ["A", "B", "C"] {
        topo.add_vertex(l).unwrap();
    }
    topo.add_link("A", "B", 1).unwrap();
    topo.add_link("B", "C", 2).unwrap();

    let run = spf::compute(&topo, "A", Mode::Batch).unwrap();
    assert_eq!(run.tree.path_to("C"), vec!["A", "B", "C"]);
    assert_eq!(run.tree.distance("C"), Some(3));
}

#[test]
fn test_triangle_scenario() {
    let mut topo = Topology::new();
    for l in ["A", "B", "C"] {
        topo.add_vertex(l).unwrap();
    }
    topo.add_link("A", "B", 5).unwrap();
    topo.add_link("B", "C", 1).unwrap();
    topo.add_link("A", "C", 3).unwrap();

    let batch = spf::compute(&topo, "A", Mode::Batch).unwrap();
    assert_eq!(batch.tree.path_to("C"), vec!["A", "C"]);
    assert_eq!(batch.tree.distance("C"), Some(3));

    // B is first seen at 5 via A, then corrected to 4 via C
    let incremental = spf::compute(&topo, "A", Mode::Incremental).unwrap();
    let b_events: Vec<_> = incremental
        .discoveries
        .iter()
        .filter(|d| d.vertex == "B")
        .collect();
    assert_eq!(b_events.len(), 2);
    assert_eq!(b_events[0].kind, DiscoveryKind::Found);
    assert_eq!((b_events[0].path.clone(), b_events[0].cost), (vec!["A".to_string(), "B".to_string()], 5));
    assert_eq!(b_events[1].kind, DiscoveryKind::Improved);
    assert_eq!(b_events[1].cost, 4);
    assert_eq!(incremental.tree.distance("B"), Some(4));
}

#[test]
fn test_cut_vertex_scenario() {
    let mut topo = Topology::new();
    for l in ["A", "B", "C"] {
        topo.add_vertex(l).unwrap();
    }
    topo.add_link("A", "B", 1).unwrap();
    topo.add_link("B", "C", 1).unwrap();

    mutate::apply_node_edit(&mut topo, &NodeEdit::Delete { label: "B".into() }).unwrap();

    let run = spf::compute(&topo, "A", Mode::Batch).unwrap();
    let c = run.tree.entry("C").unwrap();
    assert_eq!(c.distance, None);
    assert_eq!(c.previous, None);
}

#[test]
fn test_error_taxonomy() {
    let mut topo = build(2, &[(0, 1, 1)]);

    assert!(matches!(topo.add_vertex("R0"), Err(TopologyError::DuplicateLabel(_))));
    assert!(matches!(topo.remove_vertex("R9"), Err(TopologyError::VertexNotFound(_))));
    assert!(matches!(topo.add_link("R0", "R1", -3), Err(TopologyError::InvalidCost { .. })));
    assert!(matches!(
        spf::compute(&topo, "R9", Mode::Batch),
        Err(TopologyError::SourceNotFound(_))
    ));
    assert_eq!(
        mutate::apply_edge_edit(
            &mut topo,
            &EdgeEdit {
                a: "R0".into(),
                b: "R9".into()
            }
        ),
        Err(TopologyError::VertexNotFound("R9".into()))
    );
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_distances_match_reference((n, links) in topology_strategy(), source in 0usize..8) {
        let source = source % n;
        let topo = build(n, &links);
        let expected = reference_distances(n, &links);
        let run = spf::compute(&topo, &label(source), Mode::Batch).unwrap();

        for (target, want) in expected[source].iter().enumerate() {
            let entry = run.tree.entry(&label(target)).unwrap();
            prop_assert_eq!(entry.distance, *want);
            if want.is_none() {
                prop_assert!(entry.previous.is_none());
            }
        }
    }

    #[test]
    fn prop_path_cost_matches_distance((n, links) in topology_strategy(), source in 0usize..8) {
        let source = label(source % n);
        let topo = build(n, &links);
        let run = spf::compute(&topo, &source, Mode::Batch).unwrap();

        for i in 0..n {
            let target = label(i);
            if !run.tree.reachable(&target) {
                continue;
            }
            let path = run.tree.path_to(&target);
            prop_assert_eq!(path.first(), Some(&source));
            prop_assert_eq!(path.last(), Some(&target));
            let total: Distance = path
                .windows(2)
                .map(|hop| link_cost(&topo, &hop[0], &hop[1]).unwrap())
                .sum();
            prop_assert_eq!(Some(total), run.tree.distance(&target));
        }
    }

    #[test]
    fn prop_recompute_is_idempotent((n, links) in topology_strategy(), source in 0usize..8) {
        let source = label(source % n);
        let topo = build(n, &links);
        let first = spf::compute(&topo, &source, Mode::Incremental).unwrap();
        let second = spf::compute(&topo, &source, Mode::Incremental).unwrap();
        prop_assert_eq!(&first.tree, &second.tree);
        prop_assert_eq!(&first.discoveries, &second.discoveries);
    }

    #[test]
    fn prop_last_discovery_is_authoritative((n, links) in topology_strategy(), source in 0usize..8) {
        let source = label(source % n);
        let topo = build(n, &links);
        let run = spf::compute(&topo, &source, Mode::Incremental).unwrap();

        let mut last = HashMap::new();
        for event in &run.discoveries {
            prop_assert_ne!(&event.vertex, &source);
            last.insert(event.vertex.clone(), event);
        }
        for i in 0..n {
            let target = label(i);
            if target == source {
                continue;
            }
            match last.get(&target) {
                Some(event) => {
                    prop_assert_eq!(Some(event.cost), run.tree.distance(&target));
                    prop_assert_eq!(&event.path, &run.tree.path_to(&target));
                }
                None => prop_assert!(!run.tree.reachable(&target)),
            }
        }
    }

    #[test]
    fn prop_edits_keep_links_symmetric(
        (n, links) in topology_strategy(),
        victim in 0usize..8,
        new_links in prop::collection::vec((0usize..8, 0i64..20), 0..4),
    ) {
        let mut topo = build(n, &links);
        assert_symmetric(&topo);

        let victim = label(victim % n);
        mutate::apply_node_edit(&mut topo, &NodeEdit::Delete { label: victim.clone() }).unwrap();
        assert_symmetric(&topo);
        for relation in topo.relations() {
            prop_assert!(relation.links.iter().all(|l| l.target != victim));
        }

        let links: Vec<_> = new_links.iter().map(|(i, c)| (label(*i), *c)).collect();
        let before = topo.relations();
        let result = mutate::apply_node_edit(&mut topo, &NodeEdit::Add { label: "NEW".into(), links: links.clone() });
        match result {
            Ok(_) => {
                for (neighbour, cost) in &links {
                    let cost = Cost::try_from(*cost).unwrap();
                    prop_assert!(topo.links_of("NEW").unwrap().iter().any(|l| &l.target == neighbour && l.cost == cost));
                    prop_assert!(topo.links_of(neighbour).unwrap().iter().any(|l| l.target == "NEW" && l.cost == cost));
                }
            }
            Err(_) => prop_assert_eq!(topo.relations(), before),
        }
        assert_symmetric(&topo);
    }
}
