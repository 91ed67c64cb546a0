//! Dense-id bitset used for landmark sets, state masks and ledgers.
//!
//! Node ids double as bit positions. The backing store is a compressed
//! [`RoaringBitmap`], so the width is bounded only by the `u32` id space
//! rather than by a native integer width.

use roaring::RoaringBitmap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::node::NodeId;

/// A set of node ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSet(RoaringBitmap);

impl NodeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding a single id.
    pub fn singleton(id: NodeId) -> Self {
        let mut set = Self::new();
        set.insert(id);
        set
    }

    /// Insert an id. Returns `true` if it was not present.
    pub fn insert(&mut self, id: NodeId) -> bool {
        self.0.insert(id.as_u32())
    }

    /// Remove an id. Returns `true` if it was present.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.0.remove(id.as_u32())
    }

    /// Membership test.
    pub fn contains(&self, id: NodeId) -> bool {
        self.0.contains(id.as_u32())
    }

    /// Number of ids in the set.
    pub fn len(&self) -> usize {
        self.0.len() as usize
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest id in the set.
    pub fn max(&self) -> Option<NodeId> {
        self.0.max().map(NodeId::new)
    }

    /// Iterate ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().map(NodeId::new)
    }

    /// In-place union.
    pub fn union_with(&mut self, other: &NodeSet) {
        self.0 |= &other.0;
    }

    /// In-place intersection.
    pub fn intersect_with(&mut self, other: &NodeSet) {
        self.0 &= &other.0;
    }

    /// In-place difference.
    pub fn subtract(&mut self, other: &NodeSet) {
        self.0 -= &other.0;
    }

    /// `self ⊆ other`.
    pub fn is_subset(&self, other: &NodeSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// `self ⊋ other`.
    pub fn is_strict_superset(&self, other: &NodeSet) -> bool {
        self.0.len() > other.0.len() && other.0.is_subset(&self.0)
    }

    /// Intersection of every set in `sets`.
    ///
    /// An empty sequence reduces to the empty set.
    pub fn intersection_all<'a, I>(sets: I) -> NodeSet
    where
        I: IntoIterator<Item = &'a NodeSet>,
    {
        let mut iter = sets.into_iter();
        let Some(first) = iter.next() else {
            return NodeSet::new();
        };
        let mut acc = first.clone();
        for set in iter {
            if acc.is_empty() {
                break;
            }
            acc.intersect_with(set);
        }
        acc
    }

    /// Union of every set in `sets`.
    ///
    /// An empty sequence reduces to the empty set.
    pub fn union_all<'a, I>(sets: I) -> NodeSet
    where
        I: IntoIterator<Item = &'a NodeSet>,
    {
        let mut acc = NodeSet::new();
        for set in sets {
            acc.union_with(set);
        }
        acc
    }

    /// Ids as a sorted vector.
    pub fn to_vec(&self) -> Vec<NodeId> {
        self.iter().collect()
    }
}

impl FromIterator<NodeId> for NodeSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self(iter.into_iter().map(NodeId::as_u32).collect())
    }
}

impl Extend<NodeId> for NodeSet {
    fn extend<I: IntoIterator<Item = NodeId>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl fmt::Display for NodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, id) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", id)?;
        }
        write!(f, "}}")
    }
}

// Serialized as a sorted list of ids.
impl Serialize for NodeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for NodeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids = Vec::<u32>::deserialize(deserializer)?;
        Ok(Self(ids.into_iter().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u32]) -> NodeSet {
        ids.iter().copied().map(NodeId::new).collect()
    }

    #[test]
    fn test_insert_and_contains() {
        let mut s = NodeSet::new();
        assert!(s.insert(NodeId::new(3)));
        assert!(!s.insert(NodeId::new(3)));
        assert!(s.contains(NodeId::new(3)));
        assert!(!s.contains(NodeId::new(4)));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_strict_superset() {
        let small = set(&[1, 2]);
        let big = set(&[1, 2, 3]);
        assert!(big.is_strict_superset(&small));
        assert!(!small.is_strict_superset(&big));
        assert!(!big.is_strict_superset(&big.clone()));
        // Larger but not containing.
        assert!(!set(&[4, 5, 6]).is_strict_superset(&small));
    }

    #[test]
    fn test_reductions_over_empty_sequence() {
        let none: Vec<NodeSet> = Vec::new();
        assert!(NodeSet::intersection_all(&none).is_empty());
        assert!(NodeSet::union_all(&none).is_empty());
    }

    #[test]
    fn test_reductions() {
        let sets = vec![set(&[1, 2, 3]), set(&[2, 3, 4]), set(&[3, 2, 9])];
        assert_eq!(NodeSet::intersection_all(&sets), set(&[2, 3]));
        assert_eq!(NodeSet::union_all(&sets), set(&[1, 2, 3, 4, 9]));
    }

    #[test]
    fn test_high_ids_beyond_native_width() {
        let mut s = NodeSet::new();
        s.insert(NodeId::new(200));
        s.insert(NodeId::new(70_000));
        assert_eq!(s.max(), Some(NodeId::new(70_000)));
        assert_eq!(s.to_vec(), vec![NodeId::new(200), NodeId::new(70_000)]);
    }

    #[test]
    fn test_serde_as_sorted_list() {
        let s = set(&[5, 1, 3]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "[1,3,5]");
        let back: NodeSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_display() {
        assert_eq!(set(&[2, 0]).to_string(), "{0, 2}");
        assert_eq!(NodeSet::new().to_string(), "{}");
    }
}
