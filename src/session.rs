// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Compute / mutate / recompute cycle over one topology

use crate::error::Result;
use crate::mutate::{self, Mutation, Outcome};
use crate::route::ShortestPathTree;
use crate::spf::{self, Discovery, SpfRun};
use crate::topology::Topology;
use crate::types::{Mode, Relation};
use tracing::debug;

/// A topology plus the result of the most recent run over it.
///
/// Every mutation drops the cached run, so a tree is never read against a
/// topology it was not computed for.
#[derive(Debug, Clone, Default)]
pub struct Session {
    topology: Topology,
    last: Option<SpfRun>,
}

impl Session {
    /// Start a session over a loaded topology
    #[must_use]
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            last: None,
        }
    }

    /// The current topology
    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Give the topology back
    #[must_use]
    pub fn into_topology(self) -> Topology {
        self.topology
    }

    /// Recompute from scratch and keep the result
    pub fn run(&mut self, source: &str, mode: Mode) -> Result<&SpfRun> {
        self.reset_computed_state();
        let run = spf::compute(&self.topology, source, mode)?;
        Ok(self.last.insert(run))
    }

    /// Incremental run streaming each discovery to `observer`
    pub fn run_with<F>(&mut self, source: &str, mut observer: F) -> Result<&SpfRun>
    where
        F: FnMut(&Discovery),
    {
        self.reset_computed_state();
        let mut discoveries = Vec::new();
        let tree = spf::compute_with(&self.topology, source, |event| {
            observer(event);
            discoveries.push(event.clone());
        })?;
        Ok(self.last.insert(SpfRun {
            mode: Mode::Incremental,
            tree,
            discoveries,
        }))
    }

    /// Apply a topology change; invalidates the last run
    pub fn apply(&mut self, mutation: &Mutation) -> Result<Outcome> {
        self.reset_computed_state();
        mutate::apply(&mut self.topology, mutation)
    }

    /// Forget any computed distances and predecessors
    pub fn reset_computed_state(&mut self) {
        if self.last.take().is_some() {
            debug!("Discarded previous shortest-path tree");
        }
    }

    /// The most recent run, if the topology has not changed since
    #[must_use]
    pub fn last_run(&self) -> Option<&SpfRun> {
        self.last.as_ref()
    }

    /// Tree of the most recent run
    #[must_use]
    pub fn tree(&self) -> Option<&ShortestPathTree> {
        self.last.as_ref().map(|run| &run.tree)
    }

    /// Adjacency dump of the current topology
    #[must_use]
    pub fn relations(&self) -> Vec<Relation> {
        self.topology.relations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TopologyError;
    use crate::mutate::{EdgeEdit, NodeEdit};

    fn make_session() -> Session {
        let mut topo = Topology::new();
        for label in ["A", "B", "C"] {
            topo.add_vertex(label).unwrap();
        }
        topo.add_link("A", "B", 1).unwrap();
        topo.add_link("B", "C", 1).unwrap();
        Session::new(topo)
    }

    #[test]
    fn test_run_caches_tree() {
        let mut session = make_session();
        assert!(session.last_run().is_none());

        session.run("A", Mode::Batch).unwrap();
        assert_eq!(session.tree().unwrap().distance("C"), Some(2));
    }

    #[test]
    fn test_mutation_invalidates_tree() {
        let mut session = make_session();
        session.run("A", Mode::Batch).unwrap();

        session
            .apply(&NodeEdit::Delete { label: "B".into() }.into())
            .unwrap();
        assert!(session.tree().is_none());

        let run = session.run("A", Mode::Batch).unwrap();
        assert!(!run.tree.reachable("C"));
    }

    #[test]
    fn test_failed_mutation_still_invalidates() {
        let mut session = make_session();
        session.run("A", Mode::Batch).unwrap();

        let err = session
            .apply(
                &EdgeEdit {
                    a: "A".into(),
                    b: "Q".into(),
                }
                .into(),
            )
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(session.tree().is_none());
    }

    #[test]
    fn test_failed_run_clears_previous() {
        let mut session = make_session();
        session.run("A", Mode::Batch).unwrap();

        let err = session.run("nope", Mode::Batch).unwrap_err();
        assert_eq!(err, TopologyError::SourceNotFound("nope".into()));
        assert!(session.last_run().is_none());
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let mut session = make_session();
        let first = session.run("C", Mode::Incremental).unwrap().clone();
        session.reset_computed_state();
        let second = session.run("C", Mode::Incremental).unwrap();

        assert_eq!(first.tree, second.tree);
        assert_eq!(first.discoveries, second.discoveries);
    }

    #[test]
    fn test_run_with_observer() {
        let mut session = make_session();
        let mut seen = Vec::new();
        let run = session.run_with("A", |d| seen.push(d.vertex.clone())).unwrap();

        assert_eq!(run.discoveries.len(), 2);
        assert_eq!(seen, vec!["B", "C"]);
    }
}
