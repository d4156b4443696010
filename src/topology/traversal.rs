//! Lazy walks over an [`MtgGraph`].
//!
//! Three producers cover every traversal the kernel needs:
//!
//! - [`LoopIter`] over a face loop (`fsucc` steps) or a vertex loop (`vsucc`
//!   steps), starting at and ending before a seed;
//! - [`MtgGraph::active_nodes`], one pass over the arena skipping holes.
//!
//! The walks borrow the graph immutably, so no edit can happen mid-walk. To
//! edit while walking, collect the ids first.

use crate::topology::graph::MtgGraph;
use crate::topology::mask::Mask;
use crate::topology::node_id::NodeId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Step {
    Face,
    Vertex,
}

/// Iterator over one face or vertex loop. Yields the seed first and stops
/// when the step function returns to it. Empty for an inactive seed.
#[derive(Clone, Debug)]
pub struct LoopIter<'g> {
    graph: &'g MtgGraph,
    seed: NodeId,
    next: Option<NodeId>,
    step: Step,
}

impl<'g> LoopIter<'g> {
    fn new(graph: &'g MtgGraph, seed: NodeId, step: Step) -> Self {
        Self {
            graph,
            seed,
            next: graph.is_active(seed).then_some(seed),
            step,
        }
    }

    /// The node the walk started from.
    pub fn seed(&self) -> NodeId {
        self.seed
    }
}

impl Iterator for LoopIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        let succ = match self.step {
            Step::Face => self.graph.fsucc(current),
            Step::Vertex => self.graph.vsucc(current),
        };
        self.next = (succ != self.seed).then_some(succ);
        Some(current)
    }
}

impl std::iter::FusedIterator for LoopIter<'_> {}

impl MtgGraph {
    /// Walks the face loop of `seed` via `fsucc`.
    pub fn face_loop(&self, seed: NodeId) -> LoopIter<'_> {
        LoopIter::new(self, seed, Step::Face)
    }

    /// Walks the vertex loop of `seed` via `vsucc`.
    pub fn vertex_loop(&self, seed: NodeId) -> LoopIter<'_> {
        LoopIter::new(self, seed, Step::Vertex)
    }

    /// Every active node, in id order.
    pub fn active_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.arena.active_ids()
    }

    /// `seed` and its edge mate.
    pub fn edge_nodes(&self, seed: NodeId) -> [NodeId; 2] {
        [seed, self.edge_mate(seed)]
    }

    pub fn count_nodes_around_face(&self, seed: NodeId) -> usize {
        self.face_loop(seed).count()
    }

    pub fn count_nodes_around_vertex(&self, seed: NodeId) -> usize {
        self.vertex_loop(seed).count()
    }

    /// Number of edges (mate pairs).
    pub fn count_edges(&self) -> usize {
        self.active_node_count() / 2
    }

    /// Number of distinct face loops.
    pub fn count_face_loops(&self) -> usize {
        self.loop_seeds(Step::Face, Mask::NONE).len()
    }

    /// Number of distinct vertex loops.
    pub fn count_vertex_loops(&self) -> usize {
        self.loop_seeds(Step::Vertex, Mask::NONE).len()
    }

    /// One seed per face loop, lowest id first, skipping loops whose seed
    /// carries any bit of `exclude`.
    pub fn face_loop_seeds(&self, exclude: Mask) -> Vec<NodeId> {
        self.loop_seeds(Step::Face, exclude)
    }

    /// One seed per vertex loop, lowest id first, skipping loops whose seed
    /// carries any bit of `exclude`.
    pub fn vertex_loop_seeds(&self, exclude: Mask) -> Vec<NodeId> {
        self.loop_seeds(Step::Vertex, exclude)
    }

    fn loop_seeds(&self, step: Step, exclude: Mask) -> Vec<NodeId> {
        let mut seen = vec![false; self.node_id_count()];
        let mut seeds = Vec::new();
        for id in self.active_nodes() {
            if seen[id.index()] {
                continue;
            }
            for member in LoopIter::new(self, id, step) {
                seen[member.index()] = true;
            }
            if !self.get_mask(id, exclude) {
                seeds.push(id);
            }
        }
        seeds
    }
}
