// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Shortest path first: Dijkstra over a topology, in batch or incremental mode
//!
//! Both modes share one relaxation loop. Incremental mode additionally
//! reports a [`Discovery`] the moment a router first gets a finite distance,
//! carrying the best path known at that point. That path can still be beaten
//! before the router is finalized; each later improvement is reported as
//! [`DiscoveryKind::Improved`], so the last event per router always matches
//! the final tree.

use crate::error::{Result, TopologyError};
use crate::frontier::Frontier;
use crate::route::{format_hops, RouteEntry, ShortestPathTree};
use crate::topology::Topology;
use crate::types::{Distance, Label, Mode};
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, trace};

/// Why a discovery event fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryKind {
    /// First finite distance for this router in the run; may be provisional
    Found,
    /// A cheaper path replaced an earlier provisional one
    Improved,
}

/// Incremental-mode event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    /// Event kind
    pub kind: DiscoveryKind,
    /// Router whose distance changed
    pub vertex: Label,
    /// Best known path from the source at the time of the event
    pub path: Vec<Label>,
    /// Cost of that path
    pub cost: Distance,
}

impl fmt::Display for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            DiscoveryKind::Found => "Found",
            DiscoveryKind::Improved => "Updated",
        };
        write!(
            f,
            "{} {}: Path: {} Cost:{}",
            verb,
            self.vertex,
            format_hops(&self.path),
            self.cost
        )
    }
}

/// Result of one engine invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpfRun {
    /// Mode the run used
    pub mode: Mode,
    /// Final shortest-path tree
    pub tree: ShortestPathTree,
    /// Discovery events in emission order; empty in batch mode
    pub discoveries: Vec<Discovery>,
}

/// Compute shortest paths from `source`.
///
/// Fails with [`TopologyError::SourceNotFound`] before doing any work if the
/// source does not exist.
pub fn compute(topology: &Topology, source: &str, mode: Mode) -> Result<SpfRun> {
    let mut discoveries = Vec::new();
    let tree = match mode {
        Mode::Batch => dijkstra(topology, source, None)?,
        Mode::Incremental => {
            let mut collect = |event: &Discovery| discoveries.push(event.clone());
            dijkstra(topology, source, Some(&mut collect as &mut dyn FnMut(&Discovery)))?
        }
    };
    Ok(SpfRun {
        mode,
        tree,
        discoveries,
    })
}

/// Incremental run that hands each discovery to `observer` as it happens.
///
/// The observer runs synchronously inside the computation, so a caller can
/// pace output between events.
pub fn compute_with<F>(topology: &Topology, source: &str, mut observer: F) -> Result<ShortestPathTree>
where
    F: FnMut(&Discovery),
{
    dijkstra(topology, source, Some(&mut observer as &mut dyn FnMut(&Discovery)))
}

/// Per-run working state, indexed by node index
struct RunState {
    distance: Vec<Option<Distance>>,
    previous: Vec<Option<NodeIndex>>,
    finalized: Vec<bool>,
    touched: Vec<bool>,
}

impl RunState {
    fn new(bound: usize) -> Self {
        Self {
            distance: vec![None; bound],
            previous: vec![None; bound],
            finalized: vec![false; bound],
            touched: vec![false; bound],
        }
    }

    fn path_to(&self, topology: &Topology, target: NodeIndex) -> Vec<Label> {
        let mut hops = vec![topology.label_of(target).to_string()];
        let mut current = target;
        while let Some(prev) = self.previous[current.index()] {
            hops.push(topology.label_of(prev).to_string());
            current = prev;
        }
        hops.reverse();
        hops
    }
}

fn dijkstra(
    topology: &Topology,
    source: &str,
    mut observer: Option<&mut dyn FnMut(&Discovery)>,
) -> Result<ShortestPathTree> {
    let start = topology
        .index_of(source)
        .ok_or_else(|| TopologyError::SourceNotFound(source.to_string()))?;

    let bound = topology.node_bound();
    let mut state = RunState::new(bound);
    let mut frontier = Frontier::new(bound);

    state.distance[start.index()] = Some(0);
    state.touched[start.index()] = true;
    frontier.push(start.index(), 0);

    let mut finalized = 0usize;
    while let Some((u, dist_u)) = frontier.pop_min() {
        state.finalized[u] = true;
        finalized += 1;
        let u = NodeIndex::new(u);
        trace!("Finalized {} at {}", topology.label_of(u), dist_u);

        for (v, cost) in topology.adjacency(u) {
            let vi = v.index();
            if state.finalized[vi] {
                continue;
            }
            let through_u = dist_u + Distance::from(cost);
            if state.distance[vi].is_some_and(|current| through_u >= current) {
                continue;
            }

            state.distance[vi] = Some(through_u);
            state.previous[vi] = Some(u);
            frontier.push_or_decrease(vi, through_u);
            trace!(
                "Relaxed {} -> {} to {}",
                topology.label_of(u),
                topology.label_of(v),
                through_u
            );

            let kind = if state.touched[vi] {
                DiscoveryKind::Improved
            } else {
                state.touched[vi] = true;
                DiscoveryKind::Found
            };
            if let Some(observer) = observer.as_deref_mut() {
                let event = Discovery {
                    kind,
                    vertex: topology.label_of(v).to_string(),
                    path: state.path_to(topology, v),
                    cost: through_u,
                };
                observer(&event);
            }
        }
    }

    debug!(
        "SPF from {} finalized {} of {} router(s)",
        source,
        finalized,
        topology.vertex_count()
    );

    let entries: BTreeMap<Label, RouteEntry> = topology
        .vertices()
        .into_iter()
        .filter_map(|label| {
            let idx = topology.index_of(label)?.index();
            Some((
                label.to_string(),
                RouteEntry {
                    distance: state.distance[idx],
                    previous: state.previous[idx].map(|p| topology.label_of(p).to_string()),
                },
            ))
        })
        .collect();

    Ok(ShortestPathTree::new(source.to_string(), entries))
}
