//! Shared worklist fixpoint for both extractors.
//!
//! ## Algorithm
//!
//! 1. Seed a FIFO queue with every source node (ascending id)
//! 2. Pop a node and let the direction's rule compute a candidate set
//!    from the current table; the node's own id is always added
//! 3. If the candidate strictly contains the stored set, replace it and
//!    enqueue every successor
//! 4. Stop when the queue drains; a node still empty at that point is
//!    unreachable from every source and fails the run
//!
//! Each rule is a union/intersection of already-monotone entries, so
//! stored sets only grow. The strict-superset test makes that a checked
//! property rather than an assumption, and the run terminates on any
//! finite graph. Soundness of the resulting landmarks still requires the
//! graph to be acyclic.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::graph::{node_ids, AndOrGraph, GraphFingerprint};
use crate::policy::ExtractionPolicy;
use crate::types::{Node, NodeSet};
use super::{Direction, ExtractionError, LandmarkTable, UpdateObserver};

/// Counters collected during one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Nodes popped from the worklist.
    pub dequeues: u64,
    /// Nodes pushed onto the worklist, seeds included.
    pub enqueues: u64,
    /// Table replacements.
    pub updates: u64,
    /// Largest queue length observed.
    pub max_queue_len: usize,
}

/// Run the fixpoint for one direction.
///
/// `rule` maps a node and the current table to the node's candidate set
/// (before its own id is added).
pub(crate) fn run<G, R>(
    graph: &G,
    direction: Direction,
    policy: &ExtractionPolicy,
    observer: &dyn UpdateObserver,
    rule: R,
) -> Result<LandmarkTable, ExtractionError>
where
    G: AndOrGraph + ?Sized,
    R: Fn(&G, &Node, &[NodeSet]) -> NodeSet,
{
    validate(graph)?;

    let num_nodes = graph.num_nodes();
    let bound = policy.iteration_bound(num_nodes, graph.num_edges());

    // One independent set per index.
    let mut sets: Vec<NodeSet> = (0..num_nodes).map(|_| NodeSet::new()).collect();
    let mut queue: VecDeque<_> = graph.sources().into_iter().collect();
    let mut stats = ExtractionStats {
        enqueues: queue.len() as u64,
        max_queue_len: queue.len(),
        ..ExtractionStats::default()
    };

    while let Some(id) = queue.pop_front() {
        stats.dequeues += 1;
        if stats.dequeues > bound {
            error!(
                direction = %direction,
                bound,
                nodes = num_nodes,
                "Landmark worklist exceeded its iteration bound; input graph is likely cyclic"
            );
            return Err(ExtractionError::IterationBoundExceeded { direction, bound });
        }

        let node = graph.node(id).ok_or(ExtractionError::UnknownNode(id))?;
        let mut candidate = rule(graph, node, &sets);
        candidate.insert(id);

        let stored = &mut sets[id.index()];
        if !candidate.is_strict_superset(stored) {
            continue;
        }

        observer.on_update(direction, id, stored, &candidate);
        if policy.trace_updates {
            trace!(
                direction = %direction,
                node = %id,
                before = stored.len(),
                after = candidate.len(),
                "landmark set grew"
            );
        }
        *stored = candidate;
        stats.updates += 1;

        for &succ in graph.successors(id) {
            queue.push_back(succ);
            stats.enqueues += 1;
        }
        stats.max_queue_len = stats.max_queue_len.max(queue.len());
    }

    // A node that was never updated lies on or behind a cycle no source reaches.
    if let Some(id) = node_ids(num_nodes).find(|id| sets[id.index()].is_empty()) {
        error!(
            direction = %direction,
            node = %id,
            "Landmark worklist drained without reaching a node; input graph is cyclic"
        );
        return Err(ExtractionError::CyclicGraph { direction, node: id });
    }

    debug!(
        direction = %direction,
        nodes = num_nodes,
        dequeues = stats.dequeues,
        enqueues = stats.enqueues,
        updates = stats.updates,
        max_queue_len = stats.max_queue_len,
        "Landmark extraction converged"
    );

    Ok(LandmarkTable {
        direction,
        sets,
        fingerprint: GraphFingerprint::compute(graph),
        stats,
    })
}

/// Every node id resolves and every adjacency entry stays in the id space.
fn validate<G: AndOrGraph + ?Sized>(graph: &G) -> Result<(), ExtractionError> {
    for id in node_ids(graph.num_nodes()) {
        if graph.node(id).is_none() {
            return Err(ExtractionError::UnknownNode(id));
        }
        let adjacent = graph.predecessors(id).iter().chain(graph.successors(id));
        for &other in adjacent {
            if !graph.contains(other) {
                return Err(ExtractionError::UnknownNode(other));
            }
        }
    }
    Ok(())
}
