//! MtgError: unified error type for mtg-mesh public APIs
//!
//! Every fallible kernel, facet and stitching operation reports failure
//! through this type instead of panicking. An `Err` from a structural edit
//! means the graph was left exactly as it was before the call.

use thiserror::Error;

use crate::topology::node_id::NodeId;

/// Unified error type for mtg-mesh operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MtgError {
    /// The node arena cannot hand out another id.
    #[error("node arena exhausted: no id available past {0} nodes")]
    ArenaExhausted(usize),
    /// The id is out of range or refers to a deleted node.
    #[error("invalid node id `{0}` (out of range or deleted)")]
    InvalidNode(NodeId),
    /// An operator that needs two distinct nodes received the same one twice.
    #[error("operator requires distinct nodes, got `{0}` twice")]
    SameNode(NodeId),
    /// `heal_edge` was asked to remove a vertex that does not have exactly two nodes.
    #[error("cannot heal at node `{node}`: vertex has {found} nodes, expected 2")]
    HealPrecondition { node: NodeId, found: usize },
    /// Every grantable mask bit is in use.
    #[error("mask pool exhausted: all {0} grantable bits are in use")]
    MaskPoolExhausted(usize),
    /// `define_label` was called twice with the same user tag.
    #[error("label tag {0} is already defined")]
    DuplicateLabelTag(i32),
    /// A label offset does not address a defined slot.
    #[error("label offset {offset} out of range ({count} labels defined)")]
    LabelOffsetOutOfRange { offset: usize, count: usize },
    /// A node carries a label value that cannot be used as an index.
    #[error("node `{node}` has no usable value for label offset {offset}")]
    MissingLabel { node: NodeId, offset: usize },
    /// An array index is out of range for the named array.
    #[error("{array} index {index} out of range (len {len})")]
    IndexOutOfRange {
        array: &'static str,
        index: usize,
        len: usize,
    },
    /// The normal mode can only be changed before any geometry is added.
    #[error("normal mode cannot change after geometry has been added")]
    NormalModeLocked,
    /// A face needs at least three distinct points.
    #[error("degenerate face: {0} usable points (need at least 3)")]
    DegenerateFace(usize),
    /// `VSucc(FSucc(VSucc(FSucc(n)))) != n` or the mate of `n` is `n` itself.
    #[error("closure violated at node `{0}`")]
    ClosureViolation(NodeId),
    /// A successor relation is not a permutation of the active nodes.
    #[error("{relation} is not a permutation: node `{node}` has {count} predecessors")]
    PermutationViolation {
        relation: &'static str,
        node: NodeId,
        count: usize,
    },
    /// An active node points at a deleted or out-of-range slot.
    #[error("active node `{node}` has {relation} pointing at a deleted slot")]
    DeletedTarget {
        relation: &'static str,
        node: NodeId,
    },
}
