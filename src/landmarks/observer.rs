//! Observation hooks for landmark table updates.

use parking_lot::Mutex;
use serde::Serialize;

use crate::types::{NodeId, NodeSet};
use super::Direction;

/// Receives every landmark table replacement made by an extractor.
pub trait UpdateObserver: Send + Sync {
    /// Called just before `previous` is replaced by `next` for `node`.
    fn on_update(&self, direction: Direction, node: NodeId, previous: &NodeSet, next: &NodeSet);
}

/// Observer that ignores every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpObserver;

impl UpdateObserver for NoOpObserver {
    fn on_update(&self, _direction: Direction, _node: NodeId, _previous: &NodeSet, _next: &NodeSet) {}
}

/// One recorded table update.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRecord {
    /// Which extractor made the update.
    pub direction: Direction,
    /// Updated node.
    pub node: NodeId,
    /// Stored set before the update.
    pub previous: NodeSet,
    /// Stored set after the update.
    pub next: NodeSet,
}

/// In-memory observer for testing.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    records: Mutex<Vec<UpdateRecord>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every update so far.
    pub fn records(&self) -> Vec<UpdateRecord> {
        self.records.lock().clone()
    }

    /// Number of updates made by one extractor.
    pub fn update_count(&self, direction: Direction) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|r| r.direction == direction)
            .count()
    }

    /// Whether every recorded update strictly grew the stored set.
    pub fn all_strictly_growing(&self) -> bool {
        self.records
            .lock()
            .iter()
            .all(|r| r.next.is_strict_superset(&r.previous))
    }
}

impl UpdateObserver for RecordingObserver {
    fn on_update(&self, direction: Direction, node: NodeId, previous: &NodeSet, next: &NodeSet) {
        self.records.lock().push(UpdateRecord {
            direction,
            node,
            previous: previous.clone(),
            next: next.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_observer() {
        let observer = RecordingObserver::new();
        let empty = NodeSet::new();
        let one = NodeSet::singleton(NodeId::new(1));

        observer.on_update(Direction::BottomUp, NodeId::new(1), &empty, &one);
        observer.on_update(Direction::TopDown, NodeId::new(1), &empty, &one);
        observer.on_update(Direction::TopDown, NodeId::new(1), &one, &one);

        assert_eq!(observer.update_count(Direction::BottomUp), 1);
        assert_eq!(observer.update_count(Direction::TopDown), 2);
        assert_eq!(observer.records().len(), 3);
        // The last record does not grow.
        assert!(!observer.all_strictly_growing());
    }
}
