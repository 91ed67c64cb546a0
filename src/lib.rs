//! # htn-landmarks
//!
//! Landmark extraction for Hierarchical Task Network planning.
//!
//! The engine answers one question:
//!
//! > Which facts, operators and methods are **necessary on every path** to
//! > reaching a fact, executing an operator or decomposing a method?
//!
//! ## Core Contract
//!
//! 1. Given a bottom-up and a top-down AND/OR graph over one id space,
//!    compute per-node landmark tables by monotone fixpoint (once per model)
//! 2. Given a live search state, combine both tables into the landmarks
//!    still relevant for that state (once per evaluated node)
//! 3. Track relevant and achieved landmarks per search node in an
//!    [`LmNode`] whose outstanding count is the heuristic value
//!
//! ## Architecture
//!
//! ```text
//! AndOrGraph (bottom-up) → bottom_up::compute ─┐
//!                                              ├→ Landmarks::combine(state) → LmNode
//! AndOrGraph (top-down)  → top_down::compute  ─┘
//! ```
//!
//! ## Preconditions
//!
//! - Node ids are dense over `[0, N)` and shared by both graphs
//! - Both graphs are acyclic (strongly connected components collapsed
//!   upstream); a bounded worklist reports violations instead of looping

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod graph;
pub mod landmarks;
pub mod ledger;
pub mod policy;
pub mod canonical;

// Re-exports
pub use types::{NodeId, NodeKind, ContentKind, Node, NodeSet, Edge};
pub use graph::{AndOrGraph, InMemoryAndOrGraph, GraphError, GraphFingerprint, find_cycle};
pub use landmarks::{
    Landmarks, LandmarkTable, Direction, ExtractionError, ExtractionStats,
    SearchContext, TaskRef, combine,
    UpdateObserver, NoOpObserver, RecordingObserver, UpdateRecord,
};
pub use ledger::{LmNode, LedgerError};
pub use policy::ExtractionPolicy;
pub use canonical::{canonical_digest, canonical_hash_hex};

/// Schema version folded into graph fingerprints.
/// Increment on changes to fingerprint inputs.
pub const LANDMARK_SCHEMA_VERSION: &str = "1.0.0";

/// Default policy version identifier.
pub const DEFAULT_POLICY_VERSION: &str = "landmark_policy_v1";
