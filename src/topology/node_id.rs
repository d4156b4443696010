//! `NodeId`: a strong, zero-cost handle for half-edge nodes
//!
//! Every node ("VU node", one directed half-edge endpoint) lives in a dense
//! arena and is addressed by its zero-based slot index. `NodeId` wraps that
//! index as a `u32` so ids stay small and `Copy`; the two largest `u32`
//! values are reserved by the arena for its "end of free list" and "deleted"
//! markers and are never handed out.
//!
//! Constructors and edit operators express "no node" as `Option::None`. The
//! successor accessors of the graph instead return [`NodeId::NULL`] for an
//! id that is out of range or deleted, so lookups can be chained without
//! unwrapping.

use std::fmt;

use crate::mesh_error::MtgError;

/// Opaque handle for a node in an [`MtgGraph`](crate::topology::graph::MtgGraph).
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Largest index the arena will ever hand out.
    pub const MAX_INDEX: u32 = u32::MAX - 2;

    /// The null node. Never active, so every accessor maps it to itself.
    pub const NULL: NodeId = NodeId(u32::MAX);

    /// Creates a `NodeId` for arena slot `index`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use mtg_mesh::topology::node_id::NodeId;
    /// let n = NodeId::new(3);
    /// assert_eq!(n.index(), 3);
    /// ```
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Creates a `NodeId` from a `usize` index, rejecting indices the arena
    /// can never produce.
    pub fn try_from_index(index: usize) -> Result<Self, MtgError> {
        match u32::try_from(index) {
            Ok(raw) if raw <= Self::MAX_INDEX => Ok(NodeId(raw)),
            _ => Err(MtgError::IndexOutOfRange {
                array: "node id",
                index,
                len: Self::MAX_INDEX as usize + 1,
            }),
        }
    }

    /// Returns the arena slot index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }

    /// Returns the raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeId").field(&self.0).finish()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::{assert_eq_align, assert_eq_size};

    assert_eq_size!(NodeId, u32);
    assert_eq_align!(NodeId, u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_index() {
        let n = NodeId::new(42);
        assert_eq!(n.index(), 42);
        assert_eq!(n.raw(), 42);
    }

    #[test]
    fn try_from_index_rejects_reserved_values() {
        assert!(NodeId::try_from_index(0).is_ok());
        assert!(NodeId::try_from_index(NodeId::MAX_INDEX as usize).is_ok());
        assert!(NodeId::try_from_index(NodeId::MAX_INDEX as usize + 1).is_err());
        assert!(NodeId::try_from_index(usize::MAX).is_err());
    }

    #[test]
    fn debug_and_display() {
        let n = NodeId::new(7);
        assert_eq!(format!("{:?}", n), "NodeId(7)");
        assert_eq!(format!("{}", n), "7");
    }

    #[test]
    fn json_roundtrip() {
        let n = NodeId::new(123);
        let s = serde_json::to_string(&n).unwrap();
        assert_eq!(s, "123");
        let back: NodeId = serde_json::from_str(&s).unwrap();
        assert_eq!(back, n);
    }
}
