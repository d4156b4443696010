//! Per-node mask bits and the per-graph grant pool.
//!
//! Every node carries a 32-bit mask word. The low four bits are predefined
//! masks with fixed meaning ([`Mask::EXTERIOR`] and friends); the other
//! [`GRANTABLE_MASK_COUNT`] bits are handed out on demand by a per-graph
//! pool so that algorithms can mark nodes without stepping on each other.
//!
//! Prefer [`MtgGraph::grab_scoped_mask`](crate::topology::graph::MtgGraph::grab_scoped_mask):
//! the returned [`ScopedMask`] gives the bit back when it goes out of scope,
//! including on early return and `?` propagation. A leaked grant shrinks the
//! pool for every later caller of the same graph.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Deref, DerefMut};

use crate::topology::graph::MtgGraph;

/// Width of the per-node mask word.
pub const MASK_WIDTH: usize = 32;

/// Number of bits the pool can grant.
pub const GRANTABLE_MASK_COUNT: usize = MASK_WIDTH - Mask::RESERVED.0.count_ones() as usize;

/// A set of mask bits.
#[derive(
    Copy, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct Mask(u32);

impl Mask {
    /// The empty mask. Also what a failed grab would be in a C-style API.
    pub const NONE: Mask = Mask(0);
    /// Marks nodes on the outside (non-polygon) side of a face.
    pub const EXTERIOR: Mask = Mask(1 << 0);
    /// Marks nodes on boundary edges.
    pub const BOUNDARY_EDGE: Mask = Mask(1 << 1);
    /// Marks nodes on edges that belong to the original polygon outlines.
    pub const PRIMARY_EDGE: Mask = Mask(1 << 2);
    /// Marks one of the two nodes of an edge as its preferred direction.
    pub const DIRECTED_EDGE: Mask = Mask(1 << 3);
    /// All predefined bits; never granted by the pool.
    pub const RESERVED: Mask = Mask(0b1111);

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Mask(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: Mask) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when `self` and `other` share at least one bit.
    #[inline]
    pub const fn intersects(self, other: Mask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn without(self, other: Mask) -> Mask {
        Mask(self.0 & !other.0)
    }
}

impl BitOr for Mask {
    type Output = Mask;
    fn bitor(self, rhs: Mask) -> Mask {
        Mask(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mask {
    fn bitor_assign(&mut self, rhs: Mask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Mask {
    type Output = Mask;
    fn bitand(self, rhs: Mask) -> Mask {
        Mask(self.0 & rhs.0)
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mask({:#010x})", self.0)
    }
}

/// Free-bit allocator over the grantable part of the mask word.
#[derive(Clone, Debug, Default)]
pub(crate) struct MaskPool {
    granted: u32,
}

impl MaskPool {
    /// Grants the lowest free bit, or `None` when the pool is exhausted.
    pub(crate) fn grab(&mut self) -> Option<Mask> {
        let free = !(self.granted | Mask::RESERVED.0);
        if free == 0 {
            return None;
        }
        let bit = free & free.wrapping_neg();
        self.granted |= bit;
        Some(Mask(bit))
    }

    /// Returns a granted bit to the pool. Reserved bits, multi-bit masks and
    /// bits that are not currently granted are refused.
    pub(crate) fn release(&mut self, mask: Mask) -> bool {
        let bit = mask.0;
        if bit.count_ones() != 1 || bit & Mask::RESERVED.0 != 0 || self.granted & bit == 0 {
            return false;
        }
        self.granted &= !bit;
        true
    }

    pub(crate) fn granted_count(&self) -> usize {
        self.granted.count_ones() as usize
    }
}

/// A granted mask bit tied to a mutable borrow of its graph.
///
/// Derefs to the graph, so the holder keeps full access while the grant is
/// live. The bit goes back to the pool on drop.
pub struct ScopedMask<'g> {
    graph: &'g mut MtgGraph,
    mask: Mask,
}

impl<'g> ScopedMask<'g> {
    pub(crate) fn new(graph: &'g mut MtgGraph, mask: Mask) -> Self {
        Self { graph, mask }
    }

    /// The granted bit.
    #[inline]
    pub fn mask(&self) -> Mask {
        self.mask
    }
}

impl Deref for ScopedMask<'_> {
    type Target = MtgGraph;
    fn deref(&self) -> &MtgGraph {
        self.graph
    }
}

impl DerefMut for ScopedMask<'_> {
    fn deref_mut(&mut self) -> &mut MtgGraph {
        self.graph
    }
}

impl Drop for ScopedMask<'_> {
    fn drop(&mut self) {
        self.graph.drop_mask(self.mask);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_grants_distinct_unreserved_bits() {
        let mut pool = MaskPool::default();
        let mut seen = Mask::NONE;
        for _ in 0..GRANTABLE_MASK_COUNT {
            let m = pool.grab().expect("pool should not be exhausted yet");
            assert_eq!(m.bits().count_ones(), 1);
            assert!(!m.intersects(Mask::RESERVED));
            assert!(!m.intersects(seen));
            seen |= m;
        }
        assert_eq!(pool.grab(), None);
        assert_eq!(pool.granted_count(), GRANTABLE_MASK_COUNT);
    }

    #[test]
    fn release_refuses_foreign_bits() {
        let mut pool = MaskPool::default();
        let m = pool.grab().unwrap();
        assert!(!pool.release(Mask::EXTERIOR));
        assert!(!pool.release(m | Mask::from_bits(1 << 30)));
        assert!(pool.release(m));
        assert!(!pool.release(m), "double release must be refused");
        assert_eq!(pool.granted_count(), 0);
    }

    #[test]
    fn mask_set_ops() {
        let a = Mask::EXTERIOR | Mask::PRIMARY_EDGE;
        assert!(a.contains(Mask::EXTERIOR));
        assert!(!a.contains(Mask::BOUNDARY_EDGE));
        assert!(a.intersects(Mask::PRIMARY_EDGE | Mask::BOUNDARY_EDGE));
        assert_eq!(a.without(Mask::EXTERIOR), Mask::PRIMARY_EDGE);
        assert_eq!(a & Mask::EXTERIOR, Mask::EXTERIOR);
        assert!(Mask::NONE.is_empty());
    }
}
