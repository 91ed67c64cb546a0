//! Edge type for the AND/OR graph.

use serde::{Deserialize, Serialize};
use super::node::NodeId;

/// Directed edge from a predecessor to a successor.
///
/// Ordered canonically by `(from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Predecessor (source).
    pub from: NodeId,
    /// Successor (target).
    pub to: NodeId,
}

impl Edge {
    /// Create a new edge.
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.from.cmp(&other.from).then_with(|| self.to.cmp(&other.to))
    }
}
