// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Linkstate library - link-state routing simulator
//!
//! This crate models a network of routers joined by weighted, undirected
//! links, computes single-source shortest paths over it (all at once or
//! one discovery at a time), and lets the topology change between runs the
//! way a link-state protocol recomputes routes after a failure or a new
//! neighbour.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod config;
pub mod error;
pub mod frontier;
pub mod lsa;
pub mod mutate;
pub mod route;
pub mod session;
pub mod spf;
pub mod topology;

pub use error::{Result, TopologyError};
pub use session::Session;
pub use topology::Topology;

/// Core data types shared by the topology, the engine and the CLI
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// Router label, unique within a topology
    pub type Label = String;

    /// Cost of a single link
    pub type Cost = u32;

    /// Accumulated path cost
    pub type Distance = u64;

    // =========================================================================
    // Adjacency
    // =========================================================================

    /// One directional adjacency record: the neighbour and the cost to reach it.
    ///
    /// Every undirected link shows up as two of these, one in each endpoint's
    /// adjacency.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Link {
        /// Neighbouring router
        pub target: Label,
        /// Link cost
        pub cost: Cost,
    }

    impl fmt::Display for Link {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}:{}", self.target, self.cost)
        }
    }

    /// A router together with its full adjacency, as shown in a relations dump
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Relation {
        /// Router label
        pub label: Label,
        /// Adjacency in link insertion order
        pub links: Vec<Link>,
    }

    // =========================================================================
    // Engine mode
    // =========================================================================

    /// How the shortest-path engine reports its progress
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Mode {
        /// Run to completion, only the final tree is observable
        #[default]
        Batch,
        /// Emit a discovery event whenever a router's best path changes
        Incremental,
    }

    impl Mode {
        /// Parse a mode name; also accepts the short `CA`/`SS` codes
        #[must_use]
        pub fn parse(s: &str) -> Option<Self> {
            match s.to_lowercase().as_str() {
                "batch" | "ca" | "all" => Some(Self::Batch),
                "incremental" | "ss" | "step" | "steps" => Some(Self::Incremental),
                _ => None,
            }
        }

        /// Canonical name
        #[must_use]
        pub fn name(&self) -> &'static str {
            match self {
                Self::Batch => "batch",
                Self::Incremental => "incremental",
            }
        }
    }

    impl fmt::Display for Mode {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    impl std::str::FromStr for Mode {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Self::parse(s).ok_or_else(|| format!("unknown mode: {s} (expected batch or incremental)"))
        }
    }

}
