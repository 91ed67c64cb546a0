//! In-memory AND/OR graph.

use crate::types::{ContentKind, Node, NodeId, NodeKind};
use super::{AndOrGraph, GraphError};

/// In-memory AND/OR graph with dense ids.
///
/// Nodes get the next free id on insertion. Adjacency lists keep edge
/// insertion order; duplicate edges are ignored.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAndOrGraph {
    /// Nodes by id.
    nodes: Vec<Node>,
    /// Node -> predecessors.
    predecessors: Vec<Vec<NodeId>>,
    /// Node -> successors.
    successors: Vec<Vec<NodeId>>,
    /// Number of distinct edges.
    edge_count: usize,
}

impl InMemoryAndOrGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unlabeled node and return its id.
    pub fn add_node(&mut self, kind: NodeKind, content: ContentKind) -> Result<NodeId, GraphError> {
        let id = NodeId::from_index(self.nodes.len()).ok_or(GraphError::CapacityExceeded {
            capacity: NodeId::MAX_NODES,
        })?;
        self.nodes.push(Node::new(id, kind, content));
        self.predecessors.push(Vec::new());
        self.successors.push(Vec::new());
        Ok(id)
    }

    /// Add a labeled node and return its id.
    pub fn add_labeled_node(
        &mut self,
        kind: NodeKind,
        content: ContentKind,
        label: impl Into<String>,
    ) -> Result<NodeId, GraphError> {
        let id = self.add_node(kind, content)?;
        self.nodes[id.index()].label = Some(label.into());
        Ok(id)
    }

    /// Add an edge `from -> to`.
    ///
    /// Returns `Ok(false)` if the edge already existed.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<bool, GraphError> {
        if !self.contains(from) {
            return Err(GraphError::UnknownNode(from));
        }
        if !self.contains(to) {
            return Err(GraphError::UnknownNode(to));
        }
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        if self.successors[from.index()].contains(&to) {
            return Ok(false);
        }

        self.successors[from.index()].push(to);
        self.predecessors[to.index()].push(from);
        self.edge_count += 1;
        Ok(true)
    }

    /// Copy of this graph with every edge reversed and node typing kept.
    pub fn inverted(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            predecessors: self.successors.clone(),
            successors: self.predecessors.clone(),
            edge_count: self.edge_count,
        }
    }
}

impl AndOrGraph for InMemoryAndOrGraph {
    fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn predecessors(&self, id: NodeId) -> &[NodeId] {
        self.predecessors
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn successors(&self, id: NodeId) -> &[NodeId] {
        self.successors
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn num_edges(&self) -> usize {
        self.edge_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Edge;

    #[test]
    fn test_add_and_get_node() {
        let mut graph = InMemoryAndOrGraph::new();
        let id = graph
            .add_labeled_node(NodeKind::Or, ContentKind::Fact, "on-a-b")
            .unwrap();

        let node = graph.node(id).unwrap();
        assert_eq!(node.id, id);
        assert_eq!(node.kind, NodeKind::Or);
        assert_eq!(node.label.as_deref(), Some("on-a-b"));
        assert!(graph.node(NodeId::new(9)).is_none());
    }

    #[test]
    fn test_predecessors_and_successors() {
        let mut graph = InMemoryAndOrGraph::new();
        let a = graph.add_node(NodeKind::And, ContentKind::Fact).unwrap();
        let b = graph.add_node(NodeKind::And, ContentKind::Fact).unwrap();
        let c = graph.add_node(NodeKind::And, ContentKind::Operator).unwrap();

        graph.add_edge(b, c).unwrap();
        graph.add_edge(a, c).unwrap();

        // Insertion order is kept.
        assert_eq!(graph.predecessors(c), &[b, a]);
        assert_eq!(graph.successors(a), &[c]);
        assert!(graph.predecessors(a).is_empty());
    }

    #[test]
    fn test_duplicate_edge_ignored() {
        let mut graph = InMemoryAndOrGraph::new();
        let a = graph.add_node(NodeKind::And, ContentKind::Fact).unwrap();
        let b = graph.add_node(NodeKind::And, ContentKind::Fact).unwrap();

        assert!(graph.add_edge(a, b).unwrap());
        assert!(!graph.add_edge(a, b).unwrap());
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(graph.predecessors(b).len(), 1);
    }

    #[test]
    fn test_invalid_edges() {
        let mut graph = InMemoryAndOrGraph::new();
        let a = graph.add_node(NodeKind::And, ContentKind::Fact).unwrap();

        assert_eq!(graph.add_edge(a, a), Err(GraphError::SelfLoop(a)));
        assert_eq!(
            graph.add_edge(a, NodeId::new(5)),
            Err(GraphError::UnknownNode(NodeId::new(5)))
        );
    }

    #[test]
    fn test_inverted() {
        let mut graph = InMemoryAndOrGraph::new();
        let a = graph.add_node(NodeKind::And, ContentKind::Method).unwrap();
        let b = graph.add_node(NodeKind::Or, ContentKind::Fact).unwrap();
        graph.add_edge(a, b).unwrap();

        let inv = graph.inverted();
        assert_eq!(inv.successors(b), &[a]);
        assert_eq!(inv.predecessors(a), &[b]);
        assert_eq!(inv.node(b).unwrap().kind, NodeKind::Or);
        assert_eq!(inv.edges(), vec![Edge::new(b, a)]);
    }
}
