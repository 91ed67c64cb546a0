//! Bottom-up landmark extraction.
//!
//! Works over the graph in its natural dependency direction and captures
//! the HTN hierarchy from the primitive level up:
//!
//! - OR node: intersection of its predecessors' landmarks (only what every
//!   alternative needs is guaranteed)
//! - AND node: union of its predecessors' landmarks (every predecessor is
//!   needed, and so is everything they need)
//! - every node is its own landmark

use crate::graph::AndOrGraph;
use crate::policy::ExtractionPolicy;
use crate::types::{Node, NodeKind, NodeSet};
use super::fixpoint;
use super::{Direction, ExtractionError, LandmarkTable, NoOpObserver, UpdateObserver};

/// Compute bottom-up landmarks for every node.
pub fn compute<G: AndOrGraph + ?Sized>(
    graph: &G,
    policy: &ExtractionPolicy,
) -> Result<LandmarkTable, ExtractionError> {
    compute_observed(graph, policy, &NoOpObserver)
}

/// Compute bottom-up landmarks, reporting every table update.
pub fn compute_observed<G: AndOrGraph + ?Sized>(
    graph: &G,
    policy: &ExtractionPolicy,
    observer: &dyn UpdateObserver,
) -> Result<LandmarkTable, ExtractionError> {
    fixpoint::run(graph, Direction::BottomUp, policy, observer, rule)
}

fn rule<G: AndOrGraph + ?Sized>(graph: &G, node: &Node, sets: &[NodeSet]) -> NodeSet {
    let inputs = graph.predecessors(node.id).iter().map(|pred| &sets[pred.index()]);
    match node.kind {
        NodeKind::Or => NodeSet::intersection_all(inputs),
        NodeKind::And => NodeSet::union_all(inputs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::InMemoryAndOrGraph;
    use crate::types::{ContentKind, NodeId};

    fn set(ids: &[NodeId]) -> NodeSet {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_and_or_example() {
        let mut graph = InMemoryAndOrGraph::new();
        let f0 = graph.add_node(NodeKind::And, ContentKind::Fact).unwrap();
        let f1 = graph.add_node(NodeKind::And, ContentKind::Fact).unwrap();
        let a = graph.add_node(NodeKind::And, ContentKind::Operator).unwrap();
        let o = graph.add_node(NodeKind::Or, ContentKind::Fact).unwrap();
        graph.add_edge(f0, a).unwrap();
        graph.add_edge(f1, a).unwrap();
        graph.add_edge(f0, o).unwrap();
        graph.add_edge(a, o).unwrap();

        let table = compute(&graph, &ExtractionPolicy::default()).unwrap();

        assert_eq!(table.get(f0), Some(&set(&[f0])));
        assert_eq!(table.get(f1), Some(&set(&[f1])));
        assert_eq!(table.get(a), Some(&set(&[f0, f1, a])));
        assert_eq!(table.get(o), Some(&set(&[f0, o])));
    }

    #[test]
    fn test_or_over_disjoint_alternatives() {
        // Two unrelated ways to reach `goal`: nothing but itself is forced.
        let mut graph = InMemoryAndOrGraph::new();
        let x = graph.add_node(NodeKind::And, ContentKind::Fact).unwrap();
        let y = graph.add_node(NodeKind::And, ContentKind::Fact).unwrap();
        let goal = graph.add_node(NodeKind::Or, ContentKind::Fact).unwrap();
        graph.add_edge(x, goal).unwrap();
        graph.add_edge(y, goal).unwrap();

        let table = compute(&graph, &ExtractionPolicy::default()).unwrap();
        assert_eq!(table.get(goal), Some(&set(&[goal])));
    }

    #[test]
    fn test_or_processed_before_late_predecessor() {
        // `o` is reachable from source `s` directly and through a longer
        // AND chain; the first visit sees an empty entry for `c` and must be
        // refined once `c` settles.
        let mut graph = InMemoryAndOrGraph::new();
        let s = graph.add_node(NodeKind::And, ContentKind::Fact).unwrap();
        let b = graph.add_node(NodeKind::And, ContentKind::Operator).unwrap();
        let c = graph.add_node(NodeKind::And, ContentKind::Operator).unwrap();
        let o = graph.add_node(NodeKind::Or, ContentKind::Fact).unwrap();
        graph.add_edge(s, b).unwrap();
        graph.add_edge(b, c).unwrap();
        graph.add_edge(s, o).unwrap();
        graph.add_edge(c, o).unwrap();

        let table = compute(&graph, &ExtractionPolicy::default()).unwrap();
        assert_eq!(table.get(c), Some(&set(&[s, b, c])));
        assert_eq!(table.get(o), Some(&set(&[s, o])));
    }
}
