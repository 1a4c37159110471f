// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Reroute cycle - compute, change the topology, recompute
//!
//! This test walks the loop a link-state router goes through:
//! 1. Load a topology and compute routes from A
//! 2. Lose a router on the preferred path, routes move to the backup
//! 3. Add a new router that offers a shorter path
//! 4. Cut a link, a destination becomes unreachable
//! 5. Recompute from another source over the same topology

use linkstate::lsa::{self, LoadOptions};
use linkstate::mutate::{EdgeEdit, NodeEdit};
use linkstate::types::Mode;
use linkstate::Session;

const TOPOLOGY: &str = "\
A: B:1 C:4
B: A:1 C:1 D:5
C: A:4 B:1 D:1
D: B:5 C:1
E: D:2
";

#[test]
fn test_reroute_cycle() {
    let topology = lsa::parse(TOPOLOGY, LoadOptions::default()).unwrap();
    let mut session = Session::new(topology);

    // 1. initial routes
    let run = session.run("A", Mode::Batch).unwrap();
    assert_eq!(run.tree.path_to("D"), vec!["A", "B", "C", "D"]);
    assert_eq!(run.tree.distance("E"), Some(5));

    // 2. B fails, traffic shifts to the direct A - C link
    session
        .apply(&NodeEdit::Delete { label: "B".into() }.into())
        .unwrap();
    assert!(session.tree().is_none());
    let run = session.run("A", Mode::Batch).unwrap();
    assert_eq!(run.tree.path_to("D"), vec!["A", "C", "D"]);
    assert_eq!(run.tree.distance("D"), Some(5));
    assert!(run.tree.entry("B").is_none());

    // 3. F joins with a cheap path to D
    session
        .apply(
            &NodeEdit::Add {
                label: "F".into(),
                links: vec![("A".into(), 1), ("D".into(), 1)],
            }
            .into(),
        )
        .unwrap();
    let run = session.run("A", Mode::Incremental).unwrap();
    assert_eq!(run.tree.path_to("E"), vec!["A", "F", "D", "E"]);
    assert_eq!(run.tree.distance("E"), Some(4));
    let last_d = run.discoveries.iter().rev().find(|d| d.vertex == "D").unwrap();
    assert_eq!(last_d.path, vec!["A", "F", "D"]);

    // 4. E loses its only link
    session
        .apply(
            &EdgeEdit {
                a: "E".into(),
                b: "D".into(),
            }
            .into(),
        )
        .unwrap();
    let run = session.run("A", Mode::Batch).unwrap();
    assert!(!run.tree.reachable("E"));
    assert!(run.tree.path_to("E").is_empty());

    // 5. another source, same topology
    let run = session.run("D", Mode::Batch).unwrap();
    assert_eq!(run.tree.source(), "D");
    assert_eq!(run.tree.distance("A"), Some(2));
    assert_eq!(run.tree.distance("D"), Some(0));
}
