// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for topology, mutation and shortest-path operations

use thiserror::Error;

/// Result type for linkstate operations
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Recoverable failures reported by the core. None of these abort the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// A router with this label already exists
    #[error("duplicate router label: {0}")]
    DuplicateLabel(String),

    /// A referenced router does not exist
    #[error("router not found: {0}")]
    VertexNotFound(String),

    /// Link cost is negative or does not fit a link cost
    #[error("invalid link cost {cost} between {a} and {b}")]
    InvalidCost {
        /// First endpoint
        a: String,
        /// Second endpoint
        b: String,
        /// Rejected cost
        cost: i64,
    },

    /// A link from a router to itself
    #[error("router {0} cannot link to itself")]
    SelfLink(String),

    /// A shortest-path run was requested from an unknown router
    #[error("source router not found: {0}")]
    SourceNotFound(String),

    /// Malformed topology or script text
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
}

impl TopologyError {
    /// Whether this error means a referenced router or link is missing
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::VertexNotFound(_) | Self::SourceNotFound(_))
    }
}
