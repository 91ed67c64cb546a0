//! Landmark extraction over AND/OR graphs.
//!
//! Two fixpoint passes run once per planning model, before search:
//!
//! ```text
//! bottom-up graph ─→ bottom_up::compute ─→ bu table ─┐
//!                                                    ├─→ combine(state) ─→ LmNode
//! top-down graph  ─→ top_down::compute  ─→ td table ─┘
//! ```
//!
//! Tables are write-once, then read-only; [`combine`] runs per evaluated
//! search state and may be called concurrently from several workers.

pub mod bottom_up;
pub mod top_down;
pub mod bidirectional;
pub mod observer;
mod fixpoint;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::graph::{find_cycle, node_ids, AndOrGraph, GraphFingerprint};
use crate::ledger::{LedgerError, LmNode};
use crate::policy::ExtractionPolicy;
use crate::types::{ContentKind, NodeId, NodeSet};

pub use bidirectional::{combine, SearchContext, TaskRef};
pub use fixpoint::ExtractionStats;
pub use observer::{NoOpObserver, RecordingObserver, UpdateObserver, UpdateRecord};

/// Which extraction pass produced a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Natural dependency direction.
    BottomUp,
    /// Inverted graph with hybrid operator nodes.
    TopDown,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BottomUp => write!(f, "bottom_up"),
            Self::TopDown => write!(f, "top_down"),
        }
    }
}

/// Error type for landmark extraction and combination.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// The worklist ran past its bound (internal invariant violation).
    #[error("{direction} extraction exceeded iteration bound of {bound}; is the graph acyclic?")]
    IterationBoundExceeded {
        /// Pass that hit the bound.
        direction: Direction,
        /// The bound that was exceeded.
        bound: u64,
    },
    /// The two graphs do not share one id space.
    #[error("Id space mismatch: bottom-up graph has {bottom_up} nodes, top-down graph has {top_down}")]
    IdSpaceMismatch {
        /// Node count of the bottom-up graph.
        bottom_up: usize,
        /// Node count of the top-down graph.
        top_down: usize,
    },
    /// The id space is larger than the configured capacity.
    #[error("Graph has {nodes} nodes, capacity is {capacity}")]
    CapacityExceeded {
        /// Node count of the graph.
        nodes: usize,
        /// Configured capacity.
        capacity: usize,
    },
    /// A node id outside the id space.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
    /// A graph failed the acyclicity check.
    #[error("{direction} graph has a cycle through node {node}")]
    CyclicGraph {
        /// Graph that failed.
        direction: Direction,
        /// A node on the cycle.
        node: NodeId,
    },
    /// The policy could not be hashed.
    #[error("Policy encoding failed: {0}")]
    PolicyEncoding(String),
    /// Ledger construction failed.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Per-node landmark sets produced by one extraction pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkTable {
    direction: Direction,
    sets: Vec<NodeSet>,
    fingerprint: GraphFingerprint,
    stats: ExtractionStats,
}

impl LandmarkTable {
    /// Landmarks of a node.
    pub fn get(&self, id: NodeId) -> Option<&NodeSet> {
        self.sets.get(id.index())
    }

    /// Landmarks of a node, or an error for ids outside the table.
    pub fn landmarks_of(&self, id: NodeId) -> Result<&NodeSet, ExtractionError> {
        self.get(id).ok_or(ExtractionError::UnknownNode(id))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Iterate `(node, landmarks)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeSet)> + '_ {
        node_ids(self.sets.len()).zip(self.sets.iter())
    }

    /// Pass that produced the table.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Fingerprint of the graph the table was computed over.
    pub fn fingerprint(&self) -> &GraphFingerprint {
        &self.fingerprint
    }

    /// Counters from the run.
    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }
}

/// Bottom-up and top-down landmark tables for one planning model.
#[derive(Debug, Clone)]
pub struct Landmarks {
    bottom_up: LandmarkTable,
    top_down: LandmarkTable,
    contents: Vec<ContentKind>,
    facts: NodeSet,
    policy_hash: String,
}

impl Landmarks {
    /// Run both extraction passes.
    ///
    /// The graphs must share one dense id space and, for sound results,
    /// be acyclic.
    pub fn extract<B, T>(
        bottom_up_graph: &B,
        top_down_graph: &T,
        policy: &ExtractionPolicy,
    ) -> Result<Self, ExtractionError>
    where
        B: AndOrGraph + ?Sized,
        T: AndOrGraph + ?Sized,
    {
        Self::extract_observed(bottom_up_graph, top_down_graph, policy, &NoOpObserver)
    }

    /// Run both extraction passes, reporting every table update.
    pub fn extract_observed<B, T>(
        bottom_up_graph: &B,
        top_down_graph: &T,
        policy: &ExtractionPolicy,
        observer: &dyn UpdateObserver,
    ) -> Result<Self, ExtractionError>
    where
        B: AndOrGraph + ?Sized,
        T: AndOrGraph + ?Sized,
    {
        let nodes = bottom_up_graph.num_nodes();
        if top_down_graph.num_nodes() != nodes {
            return Err(ExtractionError::IdSpaceMismatch {
                bottom_up: nodes,
                top_down: top_down_graph.num_nodes(),
            });
        }
        if nodes > policy.capacity() {
            return Err(ExtractionError::CapacityExceeded {
                nodes,
                capacity: policy.capacity(),
            });
        }
        if policy.check_acyclic {
            if let Some(node) = find_cycle(bottom_up_graph) {
                return Err(ExtractionError::CyclicGraph { direction: Direction::BottomUp, node });
            }
            if let Some(node) = find_cycle(top_down_graph) {
                return Err(ExtractionError::CyclicGraph { direction: Direction::TopDown, node });
            }
        }

        let bottom_up = bottom_up::compute_observed(bottom_up_graph, policy, observer)?;
        let top_down = top_down::compute_observed(top_down_graph, policy, observer)?;

        let mut contents = Vec::with_capacity(nodes);
        for id in node_ids(nodes) {
            let node = bottom_up_graph.node(id).ok_or(ExtractionError::UnknownNode(id))?;
            contents.push(node.content);
        }
        let facts: NodeSet = bottom_up_graph.fact_ids().into_iter().collect();
        let policy_hash = policy
            .params_hash()
            .map_err(|e| ExtractionError::PolicyEncoding(e.to_string()))?;

        info!(
            nodes,
            facts = facts.len(),
            bottom_up_edges = bottom_up_graph.num_edges(),
            top_down_edges = top_down_graph.num_edges(),
            bottom_up_updates = bottom_up.stats().updates,
            top_down_updates = top_down.stats().updates,
            bottom_up_fingerprint = %bottom_up.fingerprint(),
            top_down_fingerprint = %top_down.fingerprint(),
            policy_hash = %policy_hash,
            "Landmarks extracted"
        );

        Ok(Self {
            bottom_up,
            top_down,
            contents,
            facts,
            policy_hash,
        })
    }

    /// Bottom-up table.
    pub fn bottom_up(&self) -> &LandmarkTable {
        &self.bottom_up
    }

    /// Top-down table.
    pub fn top_down(&self) -> &LandmarkTable {
        &self.top_down
    }

    /// Size of the shared id space.
    pub fn num_nodes(&self) -> usize {
        self.contents.len()
    }

    /// Content kind of a node.
    pub fn content_kind(&self, id: NodeId) -> Option<ContentKind> {
        self.contents.get(id.index()).copied()
    }

    /// Every fact id of the model.
    pub fn fact_ids(&self) -> &NodeSet {
        &self.facts
    }

    /// Hash of the policy the tables were extracted with.
    pub fn policy_hash(&self) -> &str {
        &self.policy_hash
    }

    /// Landmarks still relevant for a search state. See [`combine`].
    pub fn combine<Task: TaskRef>(&self, ctx: &SearchContext<'_, Task>) -> Result<NodeSet, ExtractionError> {
        bidirectional::combine(self, ctx)
    }

    /// Fresh ledger for the root search node of `ctx`.
    pub fn root_ledger<Task: TaskRef>(&self, ctx: &SearchContext<'_, Task>) -> Result<LmNode, ExtractionError> {
        let mut ledger = LmNode::with_capacity(self.num_nodes())?;
        ledger.add_landmarks(self.combine(ctx)?.iter())?;
        Ok(ledger)
    }
}
