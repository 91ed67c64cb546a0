//! Bidirectional landmark combination against a live search state.
//!
//! Bottom-up landmarks of open goals and pending tasks seed a worklist.
//! Operators and facts that do not hold yet are pending; each pending
//! landmark pulls in its entries from both tables, and every newly found
//! id is expanded in turn until nothing new is discovered. Holding facts
//! and methods in the seed are marked visited and never expanded.
//!
//! The result is computed fresh for every evaluated state.

use std::collections::VecDeque;

use crate::types::{ContentKind, NodeId, NodeSet};
use super::{ExtractionError, Landmarks};

/// A pending task in the task network.
pub trait TaskRef {
    /// Node id of the task in the shared id space.
    fn global_id(&self) -> NodeId;
}

impl TaskRef for NodeId {
    fn global_id(&self) -> NodeId {
        *self
    }
}

/// Live search state for one combination.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a, T: TaskRef> {
    /// Fact ids that must hold at the goal.
    pub goal_mask: &'a NodeSet,
    /// Fact ids that currently hold.
    pub state_mask: &'a NodeSet,
    /// Pending tasks, in task network order.
    pub task_network: &'a [T],
}

impl<'a, T: TaskRef> SearchContext<'a, T> {
    /// Bundle a search state.
    pub fn new(goal_mask: &'a NodeSet, state_mask: &'a NodeSet, task_network: &'a [T]) -> Self {
        Self {
            goal_mask,
            state_mask,
            task_network,
        }
    }
}

/// Compute the landmarks still relevant for a search state.
///
/// Seeding covers the full fact range of the graph; mask positions that are
/// not fact nodes are ignored. Ids outside the id space are rejected.
pub fn combine<T: TaskRef>(
    landmarks: &Landmarks,
    ctx: &SearchContext<'_, T>,
) -> Result<NodeSet, ExtractionError> {
    let bottom_up = landmarks.bottom_up();
    let top_down = landmarks.top_down();
    for mask in [ctx.goal_mask, ctx.state_mask] {
        if let Some(max) = mask.max() {
            if max.index() >= landmarks.num_nodes() {
                return Err(ExtractionError::UnknownNode(max));
            }
        }
    }

    let mut result = NodeSet::new();

    // Unachieved goal facts need their bottom-up landmarks.
    let mut open_goals = ctx.goal_mask.clone();
    open_goals.subtract(ctx.state_mask);
    open_goals.intersect_with(landmarks.fact_ids());
    for fact in open_goals.iter() {
        result.union_with(bottom_up.landmarks_of(fact)?);
    }

    // Facts that already hold are trivially satisfied landmarks.
    let mut holding = ctx.state_mask.clone();
    holding.intersect_with(landmarks.fact_ids());
    result.union_with(&holding);

    for task in ctx.task_network {
        result.union_with(bottom_up.landmarks_of(task.global_id())?);
    }

    let mut visited = NodeSet::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    for id in result.iter() {
        let pending = match landmarks.content_kind(id) {
            Some(ContentKind::Operator) => true,
            Some(ContentKind::Fact) => !ctx.state_mask.contains(id),
            _ => false,
        };
        visited.insert(id);
        if pending {
            queue.push_back(id);
        }
    }

    while let Some(id) = queue.pop_front() {
        result.insert(id);
        let refinements = top_down
            .landmarks_of(id)?
            .iter()
            .chain(bottom_up.landmarks_of(id)?.iter());
        for lm in refinements {
            if visited.insert(lm) {
                queue.push_back(lm);
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::InMemoryAndOrGraph;
    use crate::policy::ExtractionPolicy;
    use crate::types::NodeKind;

    struct Task {
        id: NodeId,
    }

    impl TaskRef for Task {
        fn global_id(&self) -> NodeId {
            self.id
        }
    }

    fn set(ids: &[NodeId]) -> NodeSet {
        ids.iter().copied().collect()
    }

    /// init -> load -> loaded -> drive -> at; load, drive -> m_deliver -> deliver
    fn delivery() -> (Landmarks, [NodeId; 7]) {
        let mut g = InMemoryAndOrGraph::new();
        let f_init = g.add_node(NodeKind::Or, ContentKind::Fact).unwrap();
        let op_load = g.add_node(NodeKind::And, ContentKind::Operator).unwrap();
        let f_loaded = g.add_node(NodeKind::Or, ContentKind::Fact).unwrap();
        let op_drive = g.add_node(NodeKind::And, ContentKind::Operator).unwrap();
        let f_at = g.add_node(NodeKind::Or, ContentKind::Fact).unwrap();
        let m_deliver = g.add_node(NodeKind::And, ContentKind::Method).unwrap();
        let t_deliver = g.add_node(NodeKind::Or, ContentKind::Method).unwrap();
        for (a, b) in [
            (f_init, op_load),
            (op_load, f_loaded),
            (f_loaded, op_drive),
            (op_drive, f_at),
            (op_load, m_deliver),
            (op_drive, m_deliver),
            (m_deliver, t_deliver),
        ] {
            g.add_edge(a, b).unwrap();
        }
        let lms = Landmarks::extract(&g, &g.inverted(), &ExtractionPolicy::default()).unwrap();
        (lms, [f_init, op_load, f_loaded, op_drive, f_at, m_deliver, t_deliver])
    }

    #[test]
    fn test_empty_context_yields_nothing() {
        let (lms, _) = delivery();
        let empty = NodeSet::new();
        let ctx = SearchContext::<NodeId>::new(&empty, &empty, &[]);
        assert!(combine(&lms, &ctx).unwrap().is_empty());
    }

    #[test]
    fn test_open_goal_landmarks_included() {
        let (lms, [f_init, _, _, _, f_at, _, _]) = delivery();
        let goal = set(&[f_at]);
        let state = set(&[f_init]);
        let ctx = SearchContext::<NodeId>::new(&goal, &state, &[]);

        let result = combine(&lms, &ctx).unwrap();
        assert!(lms.bottom_up().get(f_at).unwrap().is_subset(&result));
        assert!(result.contains(f_init));
    }

    #[test]
    fn test_satisfied_goal_only_keeps_state_facts() {
        let (lms, [_, _, _, _, f_at, _, _]) = delivery();
        let goal = set(&[f_at]);
        let state = set(&[f_at]);
        let ctx = SearchContext::<NodeId>::new(&goal, &state, &[]);

        assert_eq!(combine(&lms, &ctx).unwrap(), set(&[f_at]));
    }

    #[test]
    fn test_task_network_refined_top_down() {
        let (lms, [f_init, _, _, _, f_at, _, t_deliver]) = delivery();
        let empty = NodeSet::new();
        let state = set(&[f_init]);
        let tasks = [Task { id: t_deliver }];
        let ctx = SearchContext::new(&empty, &state, &tasks);

        let result = combine(&lms, &ctx).unwrap();
        assert!(lms.bottom_up().get(t_deliver).unwrap().is_subset(&result));
        // `at` is not a bottom-up landmark of the task; it enters through
        // the top-down landmarks of `drive`.
        assert!(!lms.bottom_up().get(t_deliver).unwrap().contains(f_at));
        assert!(result.contains(f_at));
    }

    #[test]
    fn test_non_fact_mask_positions_ignored() {
        let (lms, [_, op_load, _, _, _, _, _]) = delivery();
        let empty = NodeSet::new();
        let state = set(&[op_load]);
        let ctx = SearchContext::<NodeId>::new(&empty, &state, &[]);
        assert!(combine(&lms, &ctx).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_ids_rejected() {
        let (lms, _) = delivery();
        let empty = NodeSet::new();
        let bad = set(&[NodeId::new(99)]);

        let ctx = SearchContext::<NodeId>::new(&bad, &empty, &[]);
        assert_eq!(combine(&lms, &ctx), Err(ExtractionError::UnknownNode(NodeId::new(99))));

        let tasks = [NodeId::new(42)];
        let ctx = SearchContext::new(&empty, &empty, &tasks);
        assert_eq!(combine(&lms, &ctx), Err(ExtractionError::UnknownNode(NodeId::new(42))));
    }

    #[test]
    fn test_root_ledger_counts_combined_landmarks() {
        let (lms, [f_init, _, _, _, f_at, _, _]) = delivery();
        let goal = set(&[f_at]);
        let state = set(&[f_init]);
        let ctx = SearchContext::<NodeId>::new(&goal, &state, &[]);

        let combined = lms.combine(&ctx).unwrap();
        let ledger = lms.root_ledger(&ctx).unwrap();
        assert_eq!(ledger.heuristic_value(), combined.len());
        assert_eq!(ledger.achieved_count(), 0);
    }
}
