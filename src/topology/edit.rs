//! Structural edit operators on [`MtgGraph`].
//!
//! Nodes are created and destroyed in mate pairs. Every operator either
//! succeeds and leaves the closure law intact, or returns `Err` with the
//! graph untouched: all preconditions (node liveness, local topology, arena
//! room for two nodes) are checked before the first write.
//!
//! A fresh edge from [`create_edge`](MtgGraph::create_edge) has both nodes
//! in one vertex loop and each node in its own face loop:
//!
//! ```text
//!   fsucc(a) = a   vsucc(a) = b
//!   fsucc(b) = b   vsucc(b) = a
//! ```
//!
//! That is exactly the shape of the new vertex inserted by
//! [`split_edge`](MtgGraph::split_edge), which splices the fresh pair into
//! the two face loops of the split edge with two face twists.
//!
//! The two twists are the primitives. [`vertex_twist`](MtgGraph::vertex_twist)
//! swaps two `vsucc` links, [`face_twist`](MtgGraph::face_twist) swaps two
//! `fsucc` links. Each either merges two loops into one or splits one loop
//! into two. A single twist need not respect the closure law; the operators
//! compose them so that the result does.

use crate::debug_invariants;
use crate::mesh_error::MtgError;
use crate::topology::graph::MtgGraph;
use crate::topology::mask::Mask;
use crate::topology::node_id::NodeId;

impl MtgGraph {
    fn create_node_pair(&mut self) -> Result<(NodeId, NodeId), MtgError> {
        if self.arena.available() < 2 {
            return Err(MtgError::ArenaExhausted(self.node_id_count()));
        }
        let a = self.arena.create_node()?;
        let b = self.arena.create_node()?;
        Ok((a, b))
    }

    /// Allocates an isolated edge `(a, b)`. The nodes are mates; each is
    /// its own face loop and together they form one vertex loop.
    pub fn create_edge(&mut self) -> Result<(NodeId, NodeId), MtgError> {
        let (a, b) = self.create_node_pair()?;
        self.arena.set_vsucc(a, b);
        self.arena.set_vsucc(b, a);
        Ok((a, b))
    }

    /// Allocates a sling: an edge with both ends at one vertex, returned as
    /// `(inside, outside)`. Splitting `inside` repeatedly grows a polygon
    /// whose interior is the face loop of `inside`.
    pub fn create_sling(&mut self) -> Result<(NodeId, NodeId), MtgError> {
        self.create_edge()
    }

    /// Swaps `vsucc(n0)` and `vsucc(n1)`.
    ///
    /// Merges the vertex loops of `n0` and `n1` when they differ and splits
    /// the loop when they are the same.
    pub fn vertex_twist(&mut self, n0: NodeId, n1: NodeId) -> Result<(), MtgError> {
        self.check_active(n0)?;
        self.check_active(n1)?;
        self.twist_v(n0, n1);
        Ok(())
    }

    /// Swaps `fsucc(n0)` and `fsucc(n1)`.
    pub fn face_twist(&mut self, n0: NodeId, n1: NodeId) -> Result<(), MtgError> {
        self.check_active(n0)?;
        self.check_active(n1)?;
        self.twist_f(n0, n1);
        Ok(())
    }

    #[inline]
    pub(crate) fn twist_v(&mut self, n0: NodeId, n1: NodeId) {
        let s0 = self.arena.vsucc(n0);
        let s1 = self.arena.vsucc(n1);
        self.arena.set_vsucc(n0, s1);
        self.arena.set_vsucc(n1, s0);
    }

    #[inline]
    fn twist_f(&mut self, n0: NodeId, n1: NodeId) {
        let s0 = self.arena.fsucc(n0);
        let s1 = self.arena.fsucc(n1);
        self.arena.set_fsucc(n0, s1);
        self.arena.set_fsucc(n1, s0);
    }

    /// Inserts a vertex inside the edge of `base` and returns
    /// `(left, right)`: `left` follows `base` around its face, `right`
    /// follows `edge_mate(base)` around the other face.
    ///
    /// With `base == None` this is [`create_sling`](Self::create_sling),
    /// which bootstraps a polygon from nothing.
    pub fn split_edge(&mut self, base: Option<NodeId>) -> Result<(NodeId, NodeId), MtgError> {
        let Some(base) = base else {
            return self.create_sling();
        };
        self.check_active(base)?;
        let mate = self.edge_mate(base);
        let (left, right) = self.create_edge()?;
        self.twist_f(base, left);
        self.twist_f(mate, right);
        debug_invariants!(self.check_closure_near(&[base, mate, left, right]), "split_edge");
        Ok((left, right))
    }

    /// Inserts an edge from the vertex of `a` to the vertex of `b` and
    /// returns `(new_a, new_b)`, the new nodes at `a`'s and `b`'s vertex.
    ///
    /// `new_a` is spliced in right after `a` around its vertex and `new_b`
    /// right after `b`. When `a` and `b` share a face the face is split in
    /// two; otherwise the two faces are merged. `mask_a` / `mask_b` are set
    /// on the new nodes.
    pub fn join(
        &mut self,
        a: NodeId,
        b: NodeId,
        mask_a: Mask,
        mask_b: Mask,
    ) -> Result<(NodeId, NodeId), MtgError> {
        self.check_active(a)?;
        self.check_active(b)?;
        if a == b {
            return Err(MtgError::SameNode(a));
        }
        let pa = self.fpred(a);
        let pb = self.fpred(b);
        let (new_a, new_b) = self.create_edge()?;

        // Pull the fresh pair apart, then hang each end on its vertex.
        self.twist_v(new_a, new_b);
        self.twist_v(a, new_a);
        self.twist_v(b, new_b);

        // Cut the face(s) at a and b, then route them through the new edge.
        self.twist_f(pa, pb);
        self.twist_f(pa, new_a);
        self.twist_f(pb, new_b);

        self.set_mask(new_a, mask_a);
        self.set_mask(new_b, mask_b);
        debug_invariants!(self.check_closure_near(&[a, b, pa, pb, new_a, new_b]), "join");
        Ok((new_a, new_b))
    }

    /// Detaches the tail of `id`'s edge from its vertex, leaving a dangling
    /// end. No-op if `id` is already alone at its vertex.
    pub fn yank_edge_from_vertex(&mut self, id: NodeId) -> Result<(), MtgError> {
        self.check_active(id)?;
        if self.vsucc(id) == id {
            return Ok(());
        }
        let pred = self.fpred(id);
        let mate = self.edge_mate(id);
        // `fsucc(mate)` is the vertex predecessor of `id`.
        let after_mate = self.fsucc(mate);
        self.twist_v(after_mate, id);
        self.twist_f(pred, mate);
        debug_invariants!(self.check_closure_near(&[id, mate, pred, after_mate]), "yank_edge_from_vertex");
        Ok(())
    }

    /// Deletes the edge of `id` (both mates) and recycles the two ids.
    /// The faces on either side merge. No-op if `id` is already deleted.
    pub fn drop_edge(&mut self, id: NodeId) -> Result<(), MtgError> {
        if id.index() >= self.node_id_count() {
            return Err(MtgError::InvalidNode(id));
        }
        if !self.is_active(id) {
            return Ok(());
        }
        let mate = self.edge_mate(id);
        self.yank_edge_from_vertex(id)?;
        self.yank_edge_from_vertex(mate)?;
        self.arena.delete_node(id);
        self.arena.delete_node(mate);
        Ok(())
    }

    /// Removes the two-node vertex at `id`, merging its two edges into one.
    /// Inverse of [`split_edge`](Self::split_edge).
    ///
    /// Fails with [`MtgError::HealPrecondition`] unless the vertex has
    /// exactly two nodes belonging to two distinct edges.
    pub fn heal_edge(&mut self, id: NodeId) -> Result<(), MtgError> {
        self.check_active(id)?;
        let other = self.vsucc(id);
        if other == id || self.vsucc(other) != id {
            return Err(MtgError::HealPrecondition {
                node: id,
                found: self.count_nodes_around_vertex(id),
            });
        }
        let p0 = self.fpred(id);
        let p1 = self.fpred(other);
        if p0 == id || p0 == other || p1 == id || p1 == other {
            // The vertex carries a loop edge; there is nothing to merge.
            return Err(MtgError::HealPrecondition { node: id, found: 2 });
        }
        let f0 = self.fsucc(id);
        let f1 = self.fsucc(other);
        self.arena.set_fsucc(p0, f0);
        self.arena.set_fsucc(p1, f1);
        self.arena.delete_node(id);
        self.arena.delete_node(other);
        debug_invariants!(self.check_closure_near(&[p0, p1]), "heal_edge");
        Ok(())
    }

    /// Inverts every `fsucc` and `vsucc` relation, flipping the orientation
    /// of the whole graph. Mate pairs change but the closure law holds.
    pub fn reverse_face_and_vertex_loops(&mut self) {
        self.arena.invert_successors();
    }

    /// Drops every edge with `mask` on either node. Returns the number of
    /// edges dropped.
    pub fn drop_edges_with_mask(&mut self, mask: Mask) -> Result<usize, MtgError> {
        let targets: Vec<NodeId> = self
            .active_nodes()
            .filter(|&id| self.get_mask(id, mask))
            .collect();
        let mut dropped = 0;
        for id in targets {
            if self.is_active(id) {
                self.drop_edge(id)?;
                dropped += 1;
            }
        }
        Ok(dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closure_holds(graph: &MtgGraph) {
        graph.verify_graph().expect("closure law");
    }

    #[test]
    fn create_edge_shape() {
        let mut graph = MtgGraph::new();
        let (a, b) = graph.create_edge().unwrap();
        assert_eq!((a.index(), b.index()), (0, 1));
        assert_eq!(graph.edge_mate(a), b);
        assert_eq!(graph.fsucc(a), a);
        assert_eq!(graph.vsucc(a), b);
        assert_eq!(graph.fsucc(b), b);
        assert_eq!(graph.vsucc(b), a);
        closure_holds(&graph);
    }

    #[test]
    fn split_twice_makes_triangle() {
        let mut graph = MtgGraph::new();
        let (inside, outside) = graph.split_edge(None).unwrap();
        let (l1, _) = graph.split_edge(Some(inside)).unwrap();
        let (l2, _) = graph.split_edge(Some(l1)).unwrap();
        assert_eq!(graph.face_loop(inside).collect::<Vec<_>>(), vec![inside, l1, l2]);
        assert_eq!(graph.count_nodes_around_face(outside), 3);
        for n in graph.face_loop(inside) {
            assert_eq!(graph.count_nodes_around_vertex(n), 2);
        }
        closure_holds(&graph);
    }

    #[test]
    fn join_splits_square_into_two_triangles() {
        let mut graph = MtgGraph::new();
        let (n0, _) = graph.split_edge(None).unwrap();
        let (n1, _) = graph.split_edge(Some(n0)).unwrap();
        let (n2, _) = graph.split_edge(Some(n1)).unwrap();
        let (n3, _) = graph.split_edge(Some(n2)).unwrap();
        assert_eq!(graph.count_nodes_around_face(n0), 4);

        let (a, b) = graph.join(n0, n2, Mask::PRIMARY_EDGE, Mask::NONE).unwrap();
        closure_holds(&graph);
        assert_eq!(graph.edge_mate(a), b);
        assert!(graph.get_mask(a, Mask::PRIMARY_EDGE));
        assert!(!graph.get_mask(b, Mask::PRIMARY_EDGE));
        assert_eq!(graph.count_nodes_around_face(n0), 3);
        assert_eq!(graph.count_nodes_around_face(n2), 3);
        assert_eq!(graph.count_nodes_around_vertex(n0), 3);
        assert_eq!(graph.count_nodes_around_vertex(n2), 3);
        assert_eq!(graph.count_nodes_around_vertex(n3), 2);
        // a starts at n0's vertex, b at n2's vertex.
        assert!(graph.vertex_loop(n0).any(|x| x == a));
        assert!(graph.vertex_loop(n2).any(|x| x == b));
    }

    #[test]
    fn join_same_node_is_rejected_without_change() {
        let mut graph = MtgGraph::new();
        let (a, _) = graph.create_edge().unwrap();
        let before = graph.node_id_count();
        assert_eq!(graph.join(a, a, Mask::NONE, Mask::NONE), Err(MtgError::SameNode(a)));
        assert_eq!(graph.node_id_count(), before);
    }

    #[test]
    fn heal_rejects_three_node_vertex() {
        let mut graph = MtgGraph::new();
        let (n0, _) = graph.split_edge(None).unwrap();
        let (n1, _) = graph.split_edge(Some(n0)).unwrap();
        let (n2, _) = graph.split_edge(Some(n1)).unwrap();
        graph.split_edge(Some(n2)).unwrap();
        graph.join(n0, n2, Mask::NONE, Mask::NONE).unwrap();
        let count = graph.active_node_count();
        assert_eq!(
            graph.heal_edge(n0),
            Err(MtgError::HealPrecondition { node: n0, found: 3 })
        );
        assert_eq!(graph.active_node_count(), count);
        closure_holds(&graph);
    }

    #[test]
    fn heal_rejects_fresh_edge() {
        let mut graph = MtgGraph::new();
        let (a, _) = graph.create_edge().unwrap();
        assert!(matches!(
            graph.heal_edge(a),
            Err(MtgError::HealPrecondition { found: 2, .. })
        ));
        closure_holds(&graph);
    }

    #[test]
    fn yank_then_drop_dangling_edge() {
        let mut graph = MtgGraph::new();
        let (n0, _) = graph.split_edge(None).unwrap();
        let (n1, _) = graph.split_edge(Some(n0)).unwrap();
        graph.split_edge(Some(n1)).unwrap();
        graph.yank_edge_from_vertex(n1).unwrap();
        closure_holds(&graph);
        assert_eq!(graph.vsucc(n1), n1);
        // yanking again is a no-op
        graph.yank_edge_from_vertex(n1).unwrap();
        closure_holds(&graph);
        graph.drop_edge(n1).unwrap();
        closure_holds(&graph);
        assert_eq!(graph.active_node_count(), 4);
    }

    #[test]
    fn drop_edge_is_idempotent() {
        let mut graph = MtgGraph::new();
        let (a, _) = graph.create_edge().unwrap();
        graph.drop_edge(a).unwrap();
        graph.drop_edge(a).unwrap();
        assert_eq!(graph.active_node_count(), 0);
        assert!(matches!(
            graph.drop_edge(NodeId::new(40)),
            Err(MtgError::InvalidNode(_))
        ));
    }

    #[test]
    fn exhausted_arena_leaves_graph_unchanged() {
        let mut graph = MtgGraph::with_node_limit(3);
        let (a, _) = graph.create_edge().unwrap();
        assert!(matches!(graph.create_edge(), Err(MtgError::ArenaExhausted(2))));
        assert!(matches!(graph.split_edge(Some(a)), Err(MtgError::ArenaExhausted(_))));
        assert_eq!(graph.active_node_count(), 2);
        assert_eq!(graph.node_id_count(), 2);
        closure_holds(&graph);
    }

    #[test]
    fn reverse_keeps_closure_and_face_sizes() {
        let mut graph = MtgGraph::new();
        let (n0, _) = graph.split_edge(None).unwrap();
        let (n1, _) = graph.split_edge(Some(n0)).unwrap();
        let (n2, _) = graph.split_edge(Some(n1)).unwrap();
        graph.split_edge(Some(n2)).unwrap();
        graph.join(n0, n2, Mask::NONE, Mask::NONE).unwrap();
        let forward: Vec<NodeId> = graph.face_loop(n0).collect();
        graph.reverse_face_and_vertex_loops();
        closure_holds(&graph);
        let mut backward: Vec<NodeId> = graph.face_loop(n0).collect();
        backward[1..].reverse();
        assert_eq!(forward, backward);
        graph.reverse_face_and_vertex_loops();
        assert_eq!(graph.face_loop(n0).collect::<Vec<_>>(), forward);
    }

    #[test]
    fn drop_masked_edges() {
        let mut graph = MtgGraph::new();
        let (a, _) = graph.create_edge().unwrap();
        let (c, _) = graph.create_edge().unwrap();
        graph.set_mask(a, Mask::BOUNDARY_EDGE);
        assert_eq!(graph.drop_edges_with_mask(Mask::BOUNDARY_EDGE), Ok(1));
        assert!(graph.is_active(c));
        assert_eq!(graph.active_node_count(), 2);
    }
}
