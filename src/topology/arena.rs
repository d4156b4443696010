//! Dense node storage with free-list recycling.
//!
//! Nodes live in a `Vec` indexed by [`NodeId`]. Each record holds the face
//! successor, the vertex successor and the mask word; label values live in
//! a parallel flat `Vec<i32>` with one stride per node.
//!
//! A deleted slot stores [`DELETED`] in its vertex-successor field, which no
//! valid id can equal, and threads the free list through its face-successor
//! field. No side allocation is needed to track holes.

use crate::mesh_error::MtgError;
use crate::topology::mask::Mask;
use crate::topology::node_id::NodeId;

/// End-of-free-list marker.
const NIL: u32 = NodeId::NULL.raw();
/// Vertex-successor value of a deleted slot.
const DELETED: u32 = u32::MAX - 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct NodeRecord {
    fsucc: u32,
    vsucc: u32,
    mask: Mask,
}

/// Growable node storage.
#[derive(Clone, Debug)]
pub struct NodeArena {
    nodes: Vec<NodeRecord>,
    labels: Vec<i32>,
    label_defaults: Vec<i32>,
    free_head: u32,
    free_count: usize,
    limit: usize,
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::with_limit(NodeId::MAX_INDEX as usize + 1)
    }
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// An arena that refuses to grow past `limit` slots.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            nodes: Vec::new(),
            labels: Vec::new(),
            label_defaults: Vec::new(),
            free_head: NIL,
            free_count: 0,
            limit: limit.min(NodeId::MAX_INDEX as usize + 1),
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
        self.labels.reserve(additional * self.label_defaults.len());
    }

    /// Number of slots ever used, deleted holes included.
    #[inline]
    pub fn node_id_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live nodes.
    #[inline]
    pub fn active_node_count(&self) -> usize {
        self.nodes.len() - self.free_count
    }

    /// How many more nodes can be created without failing.
    pub fn available(&self) -> usize {
        self.free_count + (self.limit - self.nodes.len())
    }

    #[inline]
    pub fn is_active(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.index())
            .is_some_and(|rec| rec.vsucc != DELETED)
    }

    /// Hands out a recycled id if one exists, else grows the arena.
    ///
    /// The new node is its own face and vertex successor, has an empty mask
    /// and default label values.
    pub fn create_node(&mut self) -> Result<NodeId, MtgError> {
        let stride = self.label_defaults.len();
        if self.free_head != NIL {
            let id = self.free_head;
            let slot = id as usize;
            self.free_head = self.nodes[slot].fsucc;
            self.free_count -= 1;
            self.nodes[slot] = NodeRecord {
                fsucc: id,
                vsucc: id,
                mask: Mask::NONE,
            };
            self.labels[slot * stride..(slot + 1) * stride].copy_from_slice(&self.label_defaults);
            return Ok(NodeId::new(id));
        }
        if self.nodes.len() >= self.limit {
            return Err(MtgError::ArenaExhausted(self.nodes.len()));
        }
        let id = NodeId::try_from_index(self.nodes.len())?;
        self.nodes.push(NodeRecord {
            fsucc: id.raw(),
            vsucc: id.raw(),
            mask: Mask::NONE,
        });
        self.labels.extend_from_slice(&self.label_defaults);
        Ok(id)
    }

    /// Marks `id` deleted and pushes it onto the free list. Returns `false`
    /// if `id` was not active.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        if !self.is_active(id) {
            return false;
        }
        let rec = &mut self.nodes[id.index()];
        rec.vsucc = DELETED;
        rec.fsucc = self.free_head;
        rec.mask = Mask::NONE;
        self.free_head = id.raw();
        self.free_count += 1;
        true
    }

    #[inline]
    fn live(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(id.index()).filter(|rec| rec.vsucc != DELETED)
    }

    /// Face successor of `id`, or [`NodeId::NULL`] if `id` is not active.
    #[inline]
    pub fn fsucc(&self, id: NodeId) -> NodeId {
        self.live(id).map_or(NodeId::NULL, |rec| NodeId::new(rec.fsucc))
    }

    /// Vertex successor of `id`, or [`NodeId::NULL`] if `id` is not active.
    #[inline]
    pub fn vsucc(&self, id: NodeId) -> NodeId {
        self.live(id).map_or(NodeId::NULL, |rec| NodeId::new(rec.vsucc))
    }

    #[inline]
    pub(crate) fn set_fsucc(&mut self, id: NodeId, succ: NodeId) {
        self.nodes[id.index()].fsucc = succ.raw();
    }

    #[inline]
    pub(crate) fn set_vsucc(&mut self, id: NodeId, succ: NodeId) {
        self.nodes[id.index()].vsucc = succ.raw();
    }

    /// Mask word of `id`; empty for an inactive node.
    #[inline]
    pub fn mask(&self, id: NodeId) -> Mask {
        self.live(id).map_or(Mask::NONE, |rec| rec.mask)
    }

    #[inline]
    fn live_mut(&mut self, id: NodeId) -> Option<&mut NodeRecord> {
        self.nodes
            .get_mut(id.index())
            .filter(|rec| rec.vsucc != DELETED)
    }

    #[inline]
    pub(crate) fn or_mask(&mut self, id: NodeId, mask: Mask) {
        if let Some(rec) = self.live_mut(id) {
            rec.mask = rec.mask | mask;
        }
    }

    #[inline]
    pub(crate) fn and_not_mask(&mut self, id: NodeId, mask: Mask) {
        if let Some(rec) = self.live_mut(id) {
            rec.mask = rec.mask.without(mask);
        }
    }

    /// Clears `mask` on every slot, live or not.
    pub(crate) fn clear_mask_everywhere(&mut self, mask: Mask) {
        for rec in &mut self.nodes {
            rec.mask = rec.mask.without(mask);
        }
    }

    /// Number of label slots per node.
    #[inline]
    pub fn label_stride(&self) -> usize {
        self.label_defaults.len()
    }

    /// Appends one label slot to every node record, existing nodes getting
    /// `default`. Rebuilds the label storage.
    pub(crate) fn add_label_slot(&mut self, default: i32) {
        let old_stride = self.label_defaults.len();
        let new_stride = old_stride + 1;
        let mut rebuilt = Vec::with_capacity(self.nodes.len() * new_stride);
        for slot in 0..self.nodes.len() {
            rebuilt.extend_from_slice(&self.labels[slot * old_stride..(slot + 1) * old_stride]);
            rebuilt.push(default);
        }
        self.labels = rebuilt;
        self.label_defaults.push(default);
    }

    /// Label value at `offset`, or `None` for an inactive node or an offset
    /// past the stride.
    pub fn label(&self, id: NodeId, offset: usize) -> Option<i32> {
        let stride = self.label_defaults.len();
        if offset >= stride || !self.is_active(id) {
            return None;
        }
        Some(self.labels[id.index() * stride + offset])
    }

    /// Writes a label value. Returns `false` for an inactive node or an
    /// offset past the stride.
    pub fn set_label(&mut self, id: NodeId, offset: usize, value: i32) -> bool {
        let stride = self.label_defaults.len();
        if offset >= stride || !self.is_active(id) {
            return false;
        }
        self.labels[id.index() * stride + offset] = value;
        true
    }

    /// Copies mask and labels of `src` onto `dst`.
    pub(crate) fn copy_record_data(&mut self, src: NodeId, dst: NodeId) {
        let stride = self.label_defaults.len();
        self.nodes[dst.index()].mask = self.nodes[src.index()].mask;
        self.labels.copy_within(
            src.index() * stride..(src.index() + 1) * stride,
            dst.index() * stride,
        );
    }

    /// Ids of all live nodes in slot order.
    pub fn active_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, rec)| rec.vsucc != DELETED)
            .map(|(slot, _)| NodeId::new(slot as u32))
    }

    /// Swaps the face and vertex successor permutations for their inverses.
    pub(crate) fn invert_successors(&mut self) {
        let mut inv_f = vec![NIL; self.nodes.len()];
        let mut inv_v = vec![NIL; self.nodes.len()];
        for (slot, rec) in self.nodes.iter().enumerate() {
            if rec.vsucc != DELETED {
                inv_f[rec.fsucc as usize] = slot as u32;
                inv_v[rec.vsucc as usize] = slot as u32;
            }
        }
        for (slot, rec) in self.nodes.iter_mut().enumerate() {
            if rec.vsucc != DELETED {
                rec.fsucc = inv_f[slot];
                rec.vsucc = inv_v[slot];
            }
        }
    }

    /// Drops every node. Label definitions survive.
    pub fn clear(&mut self, preserve_capacity: bool) {
        self.nodes.clear();
        self.labels.clear();
        self.free_head = NIL;
        self.free_count = 0;
        if !preserve_capacity {
            self.nodes.shrink_to_fit();
            self.labels.shrink_to_fit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_delete_recycles_ids() {
        let mut arena = NodeArena::new();
        let a = arena.create_node().unwrap();
        let b = arena.create_node().unwrap();
        assert_eq!((a.index(), b.index()), (0, 1));
        assert!(arena.delete_node(a));
        assert!(!arena.delete_node(a), "second delete is refused");
        assert_eq!(arena.active_node_count(), 1);
        assert_eq!(arena.node_id_count(), 2);
        let c = arena.create_node().unwrap();
        assert_eq!(c, a, "free list hands back the hole first");
        assert_eq!(arena.node_id_count(), 2);
    }

    #[test]
    fn limit_is_enforced() {
        let mut arena = NodeArena::with_limit(1);
        arena.create_node().unwrap();
        assert_eq!(arena.create_node(), Err(MtgError::ArenaExhausted(1)));
        assert_eq!(arena.available(), 0);
    }

    #[test]
    fn label_slot_growth_keeps_old_values() {
        let mut arena = NodeArena::new();
        arena.add_label_slot(-1);
        let a = arena.create_node().unwrap();
        assert!(arena.set_label(a, 0, 42));
        arena.add_label_slot(9);
        let b = arena.create_node().unwrap();
        assert_eq!(arena.label(a, 0), Some(42));
        assert_eq!(arena.label(a, 1), Some(9));
        assert_eq!(arena.label(b, 0), Some(-1));
        assert_eq!(arena.label(b, 2), None);
        assert!(!arena.set_label(b, 2, 0));
    }

    #[test]
    fn recycled_node_gets_fresh_labels() {
        let mut arena = NodeArena::new();
        arena.add_label_slot(-5);
        let a = arena.create_node().unwrap();
        arena.set_label(a, 0, 17);
        arena.delete_node(a);
        assert_eq!(arena.label(a, 0), None);
        let b = arena.create_node().unwrap();
        assert_eq!(b, a);
        assert_eq!(arena.label(b, 0), Some(-5));
    }
}
