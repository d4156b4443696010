//! [`MarkSet`]: a lazily-invalidated worklist over graph nodes.
//!
//! The set owns one granted mask bit and a stack of candidate ids. The mask
//! is the ground truth for membership; the stack is only a source of
//! candidates and may hold stale entries, e.g. nodes that were unmasked
//! as part of another member's vertex or face. Stale entries are skipped when
//! popped, so membership never needs a search.
//!
//! With a wider [`MarkScope`], adding a node marks its whole vertex loop,
//! edge or face loop, and the set then yields one representative per
//! loop.

use crate::mesh_error::MtgError;
use crate::topology::graph::MtgGraph;
use crate::topology::mask::{Mask, ScopedMask};
use crate::topology::node_id::NodeId;

/// How many nodes one logical add/remove marks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MarkScope {
    /// Just the node.
    Node,
    /// Every node of its vertex loop.
    Vertex,
    /// The node and its edge mate.
    Edge,
    /// Every node of its face loop.
    Face,
}

/// Worklist of nodes backed by a granted mask bit.
///
/// Holds the graph mutably for its lifetime; reach the graph through
/// [`graph`](Self::graph) / [`graph_mut`](Self::graph_mut). The mask bit
/// goes back to the pool when the set drops.
pub struct MarkSet<'g> {
    graph: ScopedMask<'g>,
    candidates: Vec<NodeId>,
    scope: MarkScope,
}

impl<'g> MarkSet<'g> {
    /// Grabs a mask from `graph`. Fails if the mask pool is exhausted.
    pub fn new(graph: &'g mut MtgGraph, scope: MarkScope) -> Result<Self, MtgError> {
        Ok(Self {
            graph: graph.grab_scoped_mask()?,
            candidates: Vec::new(),
            scope,
        })
    }

    #[inline]
    pub fn scope(&self) -> MarkScope {
        self.scope
    }

    /// The mask bit marking members.
    #[inline]
    pub fn mask(&self) -> Mask {
        self.graph.mask()
    }

    #[inline]
    pub fn graph(&self) -> &MtgGraph {
        &self.graph
    }

    #[inline]
    pub fn graph_mut(&mut self) -> &mut MtgGraph {
        &mut self.graph
    }

    fn mark_scope(&mut self, id: NodeId, on: bool) {
        let mask = self.graph.mask();
        let graph: &mut MtgGraph = &mut self.graph;
        match (self.scope, on) {
            (MarkScope::Node, true) => graph.set_mask(id, mask),
            (MarkScope::Node, false) => graph.clear_mask(id, mask),
            (MarkScope::Vertex, true) => graph.set_mask_around_vertex(id, mask),
            (MarkScope::Vertex, false) => graph.clear_mask_around_vertex(id, mask),
            (MarkScope::Edge, true) => graph.set_mask_around_edge(id, mask),
            (MarkScope::Edge, false) => graph.clear_mask_around_edge(id, mask),
            (MarkScope::Face, true) => graph.set_mask_around_face(id, mask),
            (MarkScope::Face, false) => graph.clear_mask_around_face(id, mask),
        }
    }

    /// True if `id` is currently marked.
    pub fn contains(&self, id: NodeId) -> bool {
        self.graph.is_active(id) && self.graph.get_mask(id, self.graph.mask())
    }

    /// Marks the scope of `id` and pushes `id` as a candidate. Returns
    /// `false` (and does nothing) if `id` is inactive or already marked.
    pub fn add_node(&mut self, id: NodeId) -> bool {
        if !self.graph.is_active(id) || self.contains(id) {
            return false;
        }
        self.mark_scope(id, true);
        self.candidates.push(id);
        true
    }

    /// Adds every node of `ids`; returns how many were newly added.
    pub fn add_nodes<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = NodeId>,
    {
        ids.into_iter().filter(|&id| self.add_node(id)).count()
    }

    /// Unmarks the scope of `id`. Its stack entry, if any, goes stale.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.mark_scope(id, false);
        true
    }

    /// Pops candidates until one is still marked, unmarks its scope and
    /// returns it. `None` when no marked candidate remains.
    pub fn choose_and_remove_node(&mut self) -> Option<NodeId> {
        while let Some(id) = self.candidates.pop() {
            if self.contains(id) {
                self.mark_scope(id, false);
                return Some(id);
            }
        }
        None
    }

    /// True when no marked candidate remains. Discards stale entries from
    /// the top of the stack.
    pub fn is_empty(&mut self) -> bool {
        while let Some(&id) = self.candidates.last() {
            if self.contains(id) {
                return false;
            }
            self.candidates.pop();
        }
        true
    }

    /// Unmarks every member and empties the stack.
    pub fn clear(&mut self) {
        while self.choose_and_remove_node().is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(graph: &mut MtgGraph) -> [NodeId; 4] {
        let (n0, _) = graph.split_edge(None).unwrap();
        let (n1, _) = graph.split_edge(Some(n0)).unwrap();
        let (n2, _) = graph.split_edge(Some(n1)).unwrap();
        let (n3, _) = graph.split_edge(Some(n2)).unwrap();
        [n0, n1, n2, n3]
    }

    #[test]
    fn node_scope_lifo_and_duplicates() {
        let mut graph = MtgGraph::new();
        let [n0, n1, n2, _] = square(&mut graph);
        let mut set = MarkSet::new(&mut graph, MarkScope::Node).unwrap();
        assert!(set.add_node(n0));
        assert!(set.add_node(n1));
        assert!(!set.add_node(n0), "already a member");
        assert!(set.add_node(n2));
        assert_eq!(set.choose_and_remove_node(), Some(n2));
        assert_eq!(set.choose_and_remove_node(), Some(n1));
        assert_eq!(set.choose_and_remove_node(), Some(n0));
        assert_eq!(set.choose_and_remove_node(), None);
    }

    #[test]
    fn vertex_scope_yields_one_node_per_vertex() {
        let mut graph = MtgGraph::new();
        square(&mut graph);
        let all: Vec<NodeId> = graph.active_nodes().collect();
        let mut set = MarkSet::new(&mut graph, MarkScope::Vertex).unwrap();
        assert_eq!(set.add_nodes(all), 4);
        let mut count = 0;
        while set.choose_and_remove_node().is_some() {
            count += 1;
        }
        assert_eq!(count, 4);
    }

    #[test]
    fn stale_entries_are_skipped() {
        let mut graph = MtgGraph::new();
        let [n0, n1, n2, _] = square(&mut graph);
        let mut set = MarkSet::new(&mut graph, MarkScope::Node).unwrap();
        set.add_nodes([n0, n1, n2]);
        assert!(set.remove_node(n2));
        assert!(!set.remove_node(n2));
        let m = set.mask();
        set.graph_mut().clear_mask(n1, m);
        assert!(!set.is_empty());
        assert_eq!(set.choose_and_remove_node(), Some(n0));
        assert!(set.is_empty());
    }

    #[test]
    fn face_scope_marks_whole_loop() {
        let mut graph = MtgGraph::new();
        let [n0, n1, n2, n3] = square(&mut graph);
        let mut set = MarkSet::new(&mut graph, MarkScope::Face).unwrap();
        set.add_node(n0);
        assert!(set.contains(n1) && set.contains(n2) && set.contains(n3));
        assert!(!set.add_node(n2));
        set.clear();
        assert!(!set.contains(n0));
        assert!(!set.contains(n3));
    }

    #[test]
    fn mask_is_returned_when_set_drops() {
        let mut graph = MtgGraph::new();
        square(&mut graph);
        {
            let set = MarkSet::new(&mut graph, MarkScope::Edge).unwrap();
            assert_eq!(set.graph().granted_mask_count(), 1);
        }
        assert_eq!(graph.granted_mask_count(), 0);
    }
}
