//! Graph provider seam.
//!
//! The landmark engine consumes two AND/OR graphs over one shared id space:
//! the bottom-up graph (natural dependency direction) and the top-down
//! graph (inverted arcs). Building those graphs from a grounded planning
//! model is the provider's job; the engine only reads them.

pub mod memory;
pub mod fingerprint;

use petgraph::graphmap::DiGraphMap;

use crate::types::{ContentKind, Edge, Node, NodeId};

/// Error type for graph construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Edge endpoint is not a node of the graph.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
    /// Edge from a node to itself.
    #[error("Self loop on node {0}")]
    SelfLoop(NodeId),
    /// The graph already holds as many nodes as the id space allows.
    #[error("Node capacity exceeded: {capacity} nodes")]
    CapacityExceeded {
        /// Maximum number of nodes.
        capacity: usize,
    },
}

/// Read-only view of an AND/OR graph.
///
/// Implementations must keep ids dense over `[0, num_nodes())` and must
/// return adjacency in a stable order. Both graphs handed to the extractor
/// are expected to be acyclic (strongly connected components collapsed
/// upstream); see [`find_cycle`].
pub trait AndOrGraph: Send + Sync {
    /// Number of nodes.
    fn num_nodes(&self) -> usize;

    /// Fetch a node by id.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Predecessors of a node (empty for unknown ids).
    fn predecessors(&self, id: NodeId) -> &[NodeId];

    /// Successors of a node (empty for unknown ids).
    fn successors(&self, id: NodeId) -> &[NodeId];

    /// Whether `id` lies in the id space of this graph.
    fn contains(&self, id: NodeId) -> bool {
        id.index() < self.num_nodes()
    }

    /// Total number of edges.
    fn num_edges(&self) -> usize {
        node_ids(self.num_nodes())
            .map(|id| self.successors(id).len())
            .sum()
    }

    /// Every edge, in canonical `(from, to)` order.
    fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = node_ids(self.num_nodes())
            .flat_map(|from| self.successors(from).iter().map(move |&to| Edge::new(from, to)))
            .collect();
        edges.sort();
        edges
    }

    /// Nodes without predecessors, in ascending id order.
    fn sources(&self) -> Vec<NodeId> {
        node_ids(self.num_nodes())
            .filter(|id| self.predecessors(*id).is_empty())
            .collect()
    }

    /// Fact nodes, in ascending id order.
    fn fact_ids(&self) -> Vec<NodeId> {
        node_ids(self.num_nodes())
            .filter(|id| {
                self.node(*id)
                    .map_or(false, |node| node.content == ContentKind::Fact)
            })
            .collect()
    }
}

/// Iterate the dense id range `[0, num_nodes)`.
pub fn node_ids(num_nodes: usize) -> impl Iterator<Item = NodeId> {
    (0..num_nodes).map_while(NodeId::from_index)
}

/// Find a node lying on a cycle, if the graph has one.
///
/// `toposort` reports a member of a strongly connected component with more
/// than one node (or a self loop), so the returned node is on a cycle.
pub fn find_cycle<G: AndOrGraph + ?Sized>(graph: &G) -> Option<NodeId> {
    let edges = graph.edges();
    let dag: DiGraphMap<u32, ()> =
        DiGraphMap::from_edges(edges.iter().map(|edge| (edge.from.as_u32(), edge.to.as_u32())));

    petgraph::algo::toposort(&dag, None)
        .err()
        .map(|cycle| NodeId::new(cycle.node_id()))
}

pub use fingerprint::GraphFingerprint;
pub use memory::InMemoryAndOrGraph;
