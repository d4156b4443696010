//! [`MtgGraph`]: the half-edge topology kernel.
//!
//! The graph represents an oriented 2-manifold (with boundary) as two
//! permutations over the active nodes:
//!
//! - `fsucc(n)`: next node around the face to the left of `n`;
//! - `vsucc(n)`: next node around the vertex at the tail of `n`.
//!
//! The opposite node of the same edge is derived, never stored:
//! `edge_mate(n) == vsucc(fsucc(n))`. Every successful structural edit
//! leaves `edge_mate(edge_mate(n)) == n` and `edge_mate(n) != n` for every
//! active node (the closure law; see [`MtgGraph::verify_graph`]).
//!
//! This file holds construction, successor queries, masks and labels. The
//! edit operators live in [`edit`](super::edit), the loop iterators in
//! [`traversal`](super::traversal) and the checks in
//! [`validation`](super::validation).

use crate::mesh_error::MtgError;
use crate::topology::arena::NodeArena;
use crate::topology::labels::{LabelDefinition, LabelKind, LabelTable};
use crate::topology::mask::{GRANTABLE_MASK_COUNT, Mask, MaskPool, ScopedMask};
use crate::topology::node_id::NodeId;

/// Half-edge graph: node arena, label table and mask pool.
#[derive(Clone, Debug, Default)]
pub struct MtgGraph {
    pub(crate) arena: NodeArena,
    labels: LabelTable,
    masks: MaskPool,
}

impl MtgGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with room for `nodes` nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        let mut graph = Self::default();
        graph.arena.reserve(nodes);
        graph
    }

    /// Creates an empty graph whose arena never grows past `limit` slots.
    /// Operators that need more nodes fail with [`MtgError::ArenaExhausted`].
    pub fn with_node_limit(limit: usize) -> Self {
        Self {
            arena: NodeArena::with_limit(limit),
            ..Self::default()
        }
    }

    /// Read access to the node storage.
    #[inline]
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Highest id ever used plus one, deleted holes included.
    #[inline]
    pub fn node_id_count(&self) -> usize {
        self.arena.node_id_count()
    }

    /// Number of live nodes.
    #[inline]
    pub fn active_node_count(&self) -> usize {
        self.arena.active_node_count()
    }

    #[inline]
    pub fn is_active(&self, id: NodeId) -> bool {
        self.arena.is_active(id)
    }

    pub(crate) fn check_active(&self, id: NodeId) -> Result<(), MtgError> {
        if self.arena.is_active(id) {
            Ok(())
        } else {
            Err(MtgError::InvalidNode(id))
        }
    }

    // -------------------------------------------------------------------------
    // Successor queries
    // -------------------------------------------------------------------------

    // Every accessor below maps an out-of-range or deleted id to
    // `NodeId::NULL`, which maps to itself.

    /// Next node around the face.
    #[inline]
    pub fn fsucc(&self, id: NodeId) -> NodeId {
        self.arena.fsucc(id)
    }

    /// Next node around the vertex.
    #[inline]
    pub fn vsucc(&self, id: NodeId) -> NodeId {
        self.arena.vsucc(id)
    }

    /// Opposite node of the same edge.
    #[inline]
    pub fn edge_mate(&self, id: NodeId) -> NodeId {
        self.vsucc(self.fsucc(id))
    }

    /// Previous node around the face (walks the face loop).
    pub fn fpred(&self, id: NodeId) -> NodeId {
        if !self.is_active(id) {
            return NodeId::NULL;
        }
        let mut p = id;
        loop {
            let next = self.fsucc(p);
            if next == id {
                return p;
            }
            p = next;
        }
    }

    /// Previous node around the vertex (walks the vertex loop).
    pub fn vpred(&self, id: NodeId) -> NodeId {
        if !self.is_active(id) {
            return NodeId::NULL;
        }
        let mut p = id;
        loop {
            let next = self.vsucc(p);
            if next == id {
                return p;
            }
            p = next;
        }
    }

    // -------------------------------------------------------------------------
    // Masks
    // -------------------------------------------------------------------------

    /// Grants an unused mask bit, cleared on every node, or `None` when all
    /// [`GRANTABLE_MASK_COUNT`] bits are out.
    ///
    /// The caller must hand the bit back with [`drop_mask`](Self::drop_mask).
    /// [`grab_scoped_mask`](Self::grab_scoped_mask) does that automatically.
    pub fn grab_mask(&mut self) -> Option<Mask> {
        match self.masks.grab() {
            Some(mask) => {
                self.arena.clear_mask_everywhere(mask);
                Some(mask)
            }
            None => {
                log::warn!(
                    "mask pool exhausted ({} of {} bits granted)",
                    self.masks.granted_count(),
                    GRANTABLE_MASK_COUNT
                );
                None
            }
        }
    }

    /// Returns a granted bit to the pool. Returns `false` if `mask` is not a
    /// single currently-granted bit.
    pub fn drop_mask(&mut self, mask: Mask) -> bool {
        self.masks.release(mask)
    }

    /// Grants a mask bit that is released when the guard drops.
    pub fn grab_scoped_mask(&mut self) -> Result<ScopedMask<'_>, MtgError> {
        let mask = self
            .grab_mask()
            .ok_or(MtgError::MaskPoolExhausted(GRANTABLE_MASK_COUNT))?;
        Ok(ScopedMask::new(self, mask))
    }

    /// Number of bits currently granted.
    pub fn granted_mask_count(&self) -> usize {
        self.masks.granted_count()
    }

    /// Sets `mask` on `id`. Does nothing if `id` is not active.
    #[inline]
    pub fn set_mask(&mut self, id: NodeId, mask: Mask) {
        self.arena.or_mask(id, mask);
    }

    #[inline]
    pub fn clear_mask(&mut self, id: NodeId, mask: Mask) {
        self.arena.and_not_mask(id, mask);
    }

    /// True if any bit of `mask` is set on `id`; `false` for an inactive id.
    #[inline]
    pub fn get_mask(&self, id: NodeId, mask: Mask) -> bool {
        self.arena.mask(id).intersects(mask)
    }

    /// The whole mask word of `id`.
    #[inline]
    pub fn node_mask(&self, id: NodeId) -> Mask {
        self.arena.mask(id)
    }

    pub fn set_mask_around_face(&mut self, seed: NodeId, mask: Mask) {
        let ids: Vec<NodeId> = self.face_loop(seed).collect();
        for id in ids {
            self.set_mask(id, mask);
        }
    }

    pub fn clear_mask_around_face(&mut self, seed: NodeId, mask: Mask) {
        let ids: Vec<NodeId> = self.face_loop(seed).collect();
        for id in ids {
            self.clear_mask(id, mask);
        }
    }

    pub fn set_mask_around_vertex(&mut self, seed: NodeId, mask: Mask) {
        let ids: Vec<NodeId> = self.vertex_loop(seed).collect();
        for id in ids {
            self.set_mask(id, mask);
        }
    }

    pub fn clear_mask_around_vertex(&mut self, seed: NodeId, mask: Mask) {
        let ids: Vec<NodeId> = self.vertex_loop(seed).collect();
        for id in ids {
            self.clear_mask(id, mask);
        }
    }

    /// Sets `mask` on `seed` and its edge mate.
    pub fn set_mask_around_edge(&mut self, seed: NodeId, mask: Mask) {
        let mate = self.edge_mate(seed);
        self.set_mask(seed, mask);
        self.set_mask(mate, mask);
    }

    pub fn clear_mask_around_edge(&mut self, seed: NodeId, mask: Mask) {
        let mate = self.edge_mate(seed);
        self.clear_mask(seed, mask);
        self.clear_mask(mate, mask);
    }

    /// Sets `mask` on every active node.
    pub fn set_mask_all(&mut self, mask: Mask) {
        let ids: Vec<NodeId> = self.active_nodes().collect();
        for id in ids {
            self.set_mask(id, mask);
        }
    }

    /// Clears `mask` on every node.
    pub fn clear_mask_all(&mut self, mask: Mask) {
        self.arena.clear_mask_everywhere(mask);
    }

    /// Number of active nodes with any bit of `mask` set.
    pub fn count_mask(&self, mask: Mask) -> usize {
        self.active_nodes()
            .filter(|&id| self.get_mask(id, mask))
            .count()
    }

    /// Number of nodes around the face of `seed` with any bit of `mask` set.
    pub fn count_mask_around_face(&self, seed: NodeId, mask: Mask) -> usize {
        self.face_loop(seed)
            .filter(|&id| self.get_mask(id, mask))
            .count()
    }

    // -------------------------------------------------------------------------
    // Labels
    // -------------------------------------------------------------------------

    /// Adds a label slot to every existing and future node and returns its
    /// offset. Existing nodes get `default`.
    pub fn define_label(
        &mut self,
        tag: i32,
        kind: LabelKind,
        default: i32,
    ) -> Result<usize, MtgError> {
        let offset = self.labels.define(tag, kind, default)?;
        self.arena.add_label_slot(default);
        Ok(offset)
    }

    /// Resolves a caller tag to its label offset.
    pub fn try_search_label_tag(&self, tag: i32) -> Option<usize> {
        self.labels.search(tag)
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn label_definition(&self, offset: usize) -> Option<&LabelDefinition> {
        self.labels.get(offset)
    }

    /// Label value of `id` at `offset`, or `None` if either is invalid.
    pub fn try_get_label(&self, id: NodeId, offset: usize) -> Option<i32> {
        self.arena.label(id, offset)
    }

    /// Writes a label value after checking both the node and the offset.
    pub fn try_set_label(&mut self, id: NodeId, offset: usize, value: i32) -> Result<(), MtgError> {
        self.labels.check_offset(offset)?;
        self.check_active(id)?;
        self.arena.set_label(id, offset, value);
        Ok(())
    }

    /// Writes `value` at `offset` on every node of the vertex loop of `seed`.
    pub fn set_label_around_vertex(
        &mut self,
        seed: NodeId,
        offset: usize,
        value: i32,
    ) -> Result<(), MtgError> {
        self.labels.check_offset(offset)?;
        self.check_active(seed)?;
        let ids: Vec<NodeId> = self.vertex_loop(seed).collect();
        for id in ids {
            self.arena.set_label(id, offset, value);
        }
        Ok(())
    }

    /// Copies the mask word and every label value of `src` onto `dst`.
    pub fn copy_masks_and_labels(&mut self, src: NodeId, dst: NodeId) -> Result<(), MtgError> {
        self.check_active(src)?;
        self.check_active(dst)?;
        self.arena.copy_record_data(src, dst);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Bulk lifecycle
    // -------------------------------------------------------------------------

    /// Removes every node. Label definitions and mask grants survive; with
    /// `preserve_capacity` the arena keeps its allocation.
    pub fn empty(&mut self, preserve_capacity: bool) {
        self.arena.clear(preserve_capacity);
    }

    /// Removes every node and frees the arena's memory.
    pub fn release_mem(&mut self) {
        self.arena.clear(false);
    }
}
