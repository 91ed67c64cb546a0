//! Node types for the AND/OR landmark graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense identifier of a node in the AND/OR graph.
///
/// Ids are dense over `[0, N)` and double as bit positions in
/// [`NodeSet`](super::NodeSet). Both the bottom-up and the top-down graph
/// share one id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Number of node ids the id space can hold.
    pub const MAX_NODES: usize = u32::MAX as usize;

    /// Create a node id from its raw value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Create a node id from a dense index, if it fits the id space.
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= Self::MAX_NODES {
            return None;
        }
        u32::try_from(index).ok().map(Self)
    }

    /// Raw value of the id.
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// The id as a table index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Every predecessor must be achieved.
    And,
    /// Any single predecessor suffices.
    Or,
}

impl NodeKind {
    /// Parse node kind from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            _ => None,
        }
    }

    /// Stable numeric tag used for fingerprinting.
    pub(crate) fn tag(self) -> u8 {
        match self {
            Self::And => 0,
            Self::Or => 1,
        }
    }
}

impl Default for NodeKind {
    fn default() -> Self {
        Self::And
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
        }
    }
}

/// What a node stands for in the planning model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    /// A proposition about the world state.
    Fact,
    /// A primitive, executable action.
    Operator,
    /// A task decomposition rule.
    Method,
}

impl ContentKind {
    /// Parse content kind from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fact" => Some(Self::Fact),
            "operator" => Some(Self::Operator),
            "method" => Some(Self::Method),
            _ => None,
        }
    }

    pub(crate) fn tag(self) -> u8 {
        match self {
            Self::Fact => 0,
            Self::Operator => 1,
            Self::Method => 2,
        }
    }
}

impl Default for ContentKind {
    fn default() -> Self {
        Self::Fact
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fact => write!(f, "fact"),
            Self::Operator => write!(f, "operator"),
            Self::Method => write!(f, "method"),
        }
    }
}

/// A node of the AND/OR graph.
///
/// Adjacency is owned by the graph, not by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Dense node id.
    pub id: NodeId,
    /// Structural kind (AND/OR).
    pub kind: NodeKind,
    /// Content kind (fact/operator/method).
    pub content: ContentKind,
    /// Optional human-readable name from the planning model.
    pub label: Option<String>,
}

impl Node {
    /// Create a new unlabeled node.
    pub fn new(id: NodeId, kind: NodeKind, content: ContentKind) -> Self {
        Self {
            id,
            kind,
            content,
            label: None,
        }
    }

    /// Attach a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether the node is a fact.
    pub fn is_fact(&self) -> bool {
        self.content == ContentKind::Fact
    }

    /// Whether the node is an operator.
    pub fn is_operator(&self) -> bool {
        self.content == ContentKind::Operator
    }

    /// Whether the node is a method.
    pub fn is_method(&self) -> bool {
        self.content == ContentKind::Method
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}#{} [{} {}]", label, self.id, self.kind, self.content),
            None => write!(f, "#{} [{} {}]", self.id, self.kind, self.content),
        }
    }
}
