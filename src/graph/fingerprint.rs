//! Deterministic graph fingerprint.
//!
//! Tags extracted landmark tables with the graph they were computed over,
//! so a caller can check that a table pair matches the graph in use.

use serde::{Deserialize, Serialize};
use std::hash::Hasher;
use xxhash_rust::xxh64::Xxh64;

use crate::LANDMARK_SCHEMA_VERSION;
use super::{node_ids, AndOrGraph};

/// xxh64 fingerprint over node typing and the sorted edge list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphFingerprint(String);

impl GraphFingerprint {
    /// Compute the fingerprint of a graph.
    ///
    /// Folds in, in order: schema version, node count, each node's
    /// `(id, kind, content)`, then every edge in canonical order.
    /// Labels do not contribute.
    pub fn compute<G: AndOrGraph + ?Sized>(graph: &G) -> Self {
        let mut hasher = Xxh64::new(0);
        hasher.write(LANDMARK_SCHEMA_VERSION.as_bytes());
        hasher.write(&(graph.num_nodes() as u64).to_le_bytes());

        for id in node_ids(graph.num_nodes()) {
            hasher.write(&id.as_u32().to_le_bytes());
            if let Some(node) = graph.node(id) {
                hasher.write(&[node.kind.tag(), node.content.tag()]);
            }
        }

        for edge in graph.edges() {
            hasher.write(&edge.from.as_u32().to_le_bytes());
            hasher.write(&edge.to.as_u32().to_le_bytes());
        }

        Self(format!("{:016x}", hasher.finish()))
    }

    /// Get the fingerprint as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GraphFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
