//! Half-edge topology kernel.
//!
//! This module provides the node arena and the [`MtgGraph`] built on it:
//! - [`NodeId`] handles and the free-list [`NodeArena`](arena::NodeArena)
//! - the two successor permutations and the edit operators that keep them
//!   consistent ([`edit`])
//! - mask bits, the [`ScopedMask`] guard and the [`MarkSet`] worklist
//! - per-node integer labels
//! - loop traversal and structural validation
//!
//! Most users build geometry through [`crate::facets::MtgFacets`] and only
//! reach for the graph directly to walk loops or read labels.

pub mod arena;
pub mod edit;
pub mod graph;
pub mod labels;
pub mod mark_set;
pub mod mask;
pub mod node_id;
pub mod traversal;
pub mod validation;

pub use graph::MtgGraph;
pub use labels::{LabelDefinition, LabelKind};
pub use mark_set::{MarkScope, MarkSet};
pub use mask::{GRANTABLE_MASK_COUNT, MASK_WIDTH, Mask, ScopedMask};
pub use node_id::NodeId;
pub use traversal::LoopIter;

#[cfg(test)]
mod tests;
