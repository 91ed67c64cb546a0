//! Core types for the landmark engine.

pub mod node;
pub mod node_set;
pub mod edge;

pub use node::{NodeId, NodeKind, ContentKind, Node};
pub use node_set::NodeSet;
pub use edge::Edge;
