//! Per-search-node landmark ledger.
//!
//! Each search node owns one [`LmNode`] recording which landmarks are
//! relevant on its path and which of those have been achieved. A child
//! starts as a value copy of its parent ([`LmNode::branch`]) and evolves
//! independently afterwards; nothing is shared once the copy is made.
//!
//! ## Invariants
//!
//! - `achieved ⊆ required`
//! - `required_count == |required|`, `achieved_count == |achieved|`
//! - `heuristic_value() == required_count - achieved_count >= 0`

use std::fmt;

use crate::types::{NodeId, NodeSet};

/// Error type for ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Requested capacity does not fit the id space.
    #[error("Ledger capacity {requested} exceeds id space of {max} nodes")]
    CapacityExceeded {
        /// Requested number of nodes.
        requested: usize,
        /// Largest supported number of nodes.
        max: usize,
    },
    /// Landmark id outside the ledger's capacity.
    #[error("Landmark {id} outside ledger capacity {capacity}")]
    OutOfRange {
        /// Offending landmark.
        id: NodeId,
        /// Ledger capacity.
        capacity: usize,
    },
}

/// Landmark ledger attached to one search node.
#[derive(Debug, Clone, PartialEq)]
pub struct LmNode {
    required: NodeSet,
    achieved: NodeSet,
    required_count: usize,
    achieved_count: usize,
    capacity: usize,
}

impl LmNode {
    /// Create an empty ledger spanning the whole id space.
    pub fn new() -> Self {
        Self {
            required: NodeSet::new(),
            achieved: NodeSet::new(),
            required_count: 0,
            achieved_count: 0,
            capacity: NodeId::MAX_NODES,
        }
    }

    /// Create an empty ledger for a model with `num_nodes` nodes.
    pub fn with_capacity(num_nodes: usize) -> Result<Self, LedgerError> {
        if num_nodes > NodeId::MAX_NODES {
            return Err(LedgerError::CapacityExceeded {
                requested: num_nodes,
                max: NodeId::MAX_NODES,
            });
        }
        Ok(Self {
            capacity: num_nodes,
            ..Self::new()
        })
    }

    /// Copy for a child search node.
    pub fn branch(&self) -> Self {
        self.clone()
    }

    /// Mark a landmark as achieved.
    ///
    /// Only required, not yet achieved landmarks count. Returns `true` if
    /// the landmark was newly achieved.
    pub fn mark_landmark(&mut self, id: NodeId) -> bool {
        if !self.required.contains(id) || !self.achieved.insert(id) {
            return false;
        }
        self.achieved_count += 1;
        true
    }

    /// Mark several landmarks. Returns how many were newly achieved.
    pub fn mark_landmarks<I: IntoIterator<Item = NodeId>>(&mut self, ids: I) -> usize {
        ids.into_iter().filter(|id| self.mark_landmark(*id)).count()
    }

    /// Add newly required landmarks; they start unachieved.
    ///
    /// Returns how many were not already required. Fails without changing
    /// the ledger if any id lies outside its capacity.
    pub fn add_landmarks<I: IntoIterator<Item = NodeId>>(&mut self, ids: I) -> Result<usize, LedgerError> {
        let incoming: NodeSet = ids.into_iter().collect();
        if let Some(max) = incoming.max() {
            if max.index() >= self.capacity {
                return Err(LedgerError::OutOfRange {
                    id: max,
                    capacity: self.capacity,
                });
            }
        }

        let mut added = 0;
        for id in incoming.iter() {
            if self.required.insert(id) {
                added += 1;
            }
        }
        self.required_count += added;
        Ok(added)
    }

    /// Number of outstanding landmarks.
    pub fn heuristic_value(&self) -> usize {
        self.required_count - self.achieved_count
    }

    /// Number of required landmarks.
    pub fn required_count(&self) -> usize {
        self.required_count
    }

    /// Number of achieved landmarks.
    pub fn achieved_count(&self) -> usize {
        self.achieved_count
    }

    /// Ledger capacity in nodes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `id` is a required landmark.
    pub fn is_required(&self, id: NodeId) -> bool {
        self.required.contains(id)
    }

    /// Whether `id` has been achieved.
    pub fn is_achieved(&self, id: NodeId) -> bool {
        self.achieved.contains(id)
    }

    /// Required landmarks.
    pub fn required(&self) -> &NodeSet {
        &self.required
    }

    /// Achieved landmarks.
    pub fn achieved(&self) -> &NodeSet {
        &self.achieved
    }

    /// Required but not yet achieved landmarks, ascending.
    pub fn outstanding(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.required.iter().filter(|id| !self.achieved.contains(*id))
    }
}

impl Default for LmNode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LmNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Landmarks (value={}):", self.heuristic_value())?;
        writeln!(f, "\trequired: {}", self.required)?;
        write!(f, "\tachieved: {}", self.achieved)
    }
}
