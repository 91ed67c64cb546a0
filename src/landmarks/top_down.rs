//! Top-down landmark extraction.
//!
//! Runs over the graph with inverted arcs at tasks and methods, so
//! landmarks flow from the top of the hierarchy down. Operators are hybrid
//! nodes: AND-like towards fact predecessors, OR-like towards method
//! predecessors.
//!
//! For an operator with predecessors:
//!
//! ```text
//! td[op] = (∩ td[m] for method preds m) ∪ (∪ td[p] for other preds p) ∪ {op}
//! ```
//!
//! With no method predecessor the intersection term is empty. Every other
//! node follows the plain AND/OR rule.

use crate::graph::AndOrGraph;
use crate::policy::ExtractionPolicy;
use crate::types::{ContentKind, Node, NodeId, NodeKind, NodeSet};
use super::fixpoint;
use super::{Direction, ExtractionError, LandmarkTable, NoOpObserver, UpdateObserver};

/// Compute top-down landmarks for every node of the inverted graph.
pub fn compute<G: AndOrGraph + ?Sized>(
    inverted_graph: &G,
    policy: &ExtractionPolicy,
) -> Result<LandmarkTable, ExtractionError> {
    compute_observed(inverted_graph, policy, &NoOpObserver)
}

/// Compute top-down landmarks, reporting every table update.
pub fn compute_observed<G: AndOrGraph + ?Sized>(
    inverted_graph: &G,
    policy: &ExtractionPolicy,
    observer: &dyn UpdateObserver,
) -> Result<LandmarkTable, ExtractionError> {
    fixpoint::run(inverted_graph, Direction::TopDown, policy, observer, rule)
}

fn rule<G: AndOrGraph + ?Sized>(graph: &G, node: &Node, sets: &[NodeSet]) -> NodeSet {
    let preds = graph.predecessors(node.id);

    if node.content == ContentKind::Operator && !preds.is_empty() {
        let is_method = |id: &&NodeId| {
            graph
                .node(**id)
                .map_or(false, |pred| pred.content == ContentKind::Method)
        };

        let mut result = NodeSet::intersection_all(
            preds.iter().filter(is_method).map(|pred| &sets[pred.index()]),
        );
        let forced = NodeSet::union_all(
            preds
                .iter()
                .filter(|id| !is_method(id))
                .map(|pred| &sets[pred.index()]),
        );
        result.union_with(&forced);
        return result;
    }

    let inputs = preds.iter().map(|pred| &sets[pred.index()]);
    match node.kind {
        NodeKind::Or => NodeSet::intersection_all(inputs),
        NodeKind::And => NodeSet::union_all(inputs),
    }
}
