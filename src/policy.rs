//! Extraction policy: capacity and termination guard configuration.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::types::NodeId;
use crate::DEFAULT_POLICY_VERSION;

/// Configuration for landmark extraction.
///
/// ## Parameters
///
/// - `max_nodes`: Largest id space accepted by extraction and ledgers
/// - `iteration_factor`: Multiplier on the `V * (E + 1)` worklist bound
/// - `trace_updates`: Emit a `trace!` event for every table update
/// - `check_acyclic`: Reject cyclic graphs before extraction starts (on by default)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionPolicy {
    /// Policy version identifier.
    pub version: String,
    /// Maximum number of nodes in the shared id space.
    pub max_nodes: usize,
    /// Worklist bound multiplier (at least 1).
    pub iteration_factor: u64,
    /// Whether to trace every table update.
    pub trace_updates: bool,
    /// Whether to run a cycle check on both graphs before extraction.
    pub check_acyclic: bool,
}

impl ExtractionPolicy {
    /// Load a policy from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut policy: Self = serde_json::from_str(json)?;
        policy.iteration_factor = policy.iteration_factor.max(1);
        Ok(policy)
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Effective node capacity, never above what [`NodeId`] can address.
    pub fn capacity(&self) -> usize {
        self.max_nodes.min(NodeId::MAX_NODES)
    }

    /// Maximum number of worklist dequeues for a graph with `num_nodes`
    /// nodes and `num_edges` edges.
    ///
    /// Every update strictly grows one of `V` sets bounded by `V` ids and
    /// re-enqueues at most the node's successors, so a monotone run
    /// dequeues at most `V + V * E` entries.
    pub fn iteration_bound(&self, num_nodes: usize, num_edges: usize) -> u64 {
        let v = num_nodes as u64;
        let e = num_edges as u64;
        v.saturating_mul(e.saturating_add(1))
            .saturating_mul(self.iteration_factor.max(1))
    }

    /// Compute a hash of the policy parameters.
    pub fn params_hash(&self) -> Result<String, serde_json::Error> {
        canonical_hash_hex(self)
    }
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            max_nodes: NodeId::MAX_NODES,
            iteration_factor: 4,
            trace_updates: false,
            check_acyclic: true,
        }
    }
}
