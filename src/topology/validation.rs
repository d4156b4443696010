//! Structural validation of an [`MtgGraph`].
//!
//! [`MtgGraph::verify_graph`] walks every active node and checks
//!
//! 1. both successors point at active nodes;
//! 2. `fsucc` and `vsucc` are permutations (every node has exactly one
//!    predecessor under each);
//! 3. the closure law: `edge_mate(n) != n` and `edge_mate(edge_mate(n)) == n`.
//!
//! A failure here is a kernel bug, not a caller error, so the usual entry
//! point is the [`DebugInvariants`] impl or the `debug_invariants!` macro.

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MtgError;
use crate::topology::graph::MtgGraph;
use crate::topology::node_id::NodeId;

impl MtgGraph {
    /// Checks every invariant over the whole graph.
    pub fn verify_graph(&self) -> Result<(), MtgError> {
        let n = self.node_id_count();
        let mut f_in = vec![0usize; n];
        let mut v_in = vec![0usize; n];
        for id in self.active_nodes() {
            let f = self.fsucc(id);
            let v = self.vsucc(id);
            if !self.is_active(f) {
                return Err(MtgError::DeletedTarget {
                    relation: "fsucc",
                    node: id,
                });
            }
            if !self.is_active(v) {
                return Err(MtgError::DeletedTarget {
                    relation: "vsucc",
                    node: id,
                });
            }
            f_in[f.index()] += 1;
            v_in[v.index()] += 1;
        }
        for id in self.active_nodes() {
            for (relation, counts) in [("fsucc", &f_in), ("vsucc", &v_in)] {
                let count = counts[id.index()];
                if count != 1 {
                    return Err(MtgError::PermutationViolation {
                        relation,
                        node: id,
                        count,
                    });
                }
            }
        }
        for id in self.active_nodes() {
            self.check_closure_at(id)?;
        }
        Ok(())
    }

    /// Closure law at a single node. Assumes successors are live.
    pub fn check_closure_at(&self, id: NodeId) -> Result<(), MtgError> {
        let mate = self.edge_mate(id);
        if mate == id || !self.is_active(mate) || self.edge_mate(mate) != id {
            return Err(MtgError::ClosureViolation(id));
        }
        Ok(())
    }

    /// Closure law at each of `ids` and at their face predecessors: the
    /// nodes whose mate can change when `ids` are rewired.
    pub(crate) fn check_closure_near(&self, ids: &[NodeId]) -> Result<(), MtgError> {
        for &id in ids {
            if !self.is_active(id) {
                continue;
            }
            self.check_closure_at(id)?;
            self.check_closure_at(self.fpred(id))?;
        }
        Ok(())
    }
}

impl DebugInvariants for MtgGraph {
    fn validate_invariants(&self) -> Result<(), MtgError> {
        self.verify_graph()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_is_valid() {
        let graph = MtgGraph::new();
        assert_eq!(graph.verify_graph(), Ok(()));
        graph.debug_assert_invariants();
    }

    #[test]
    fn single_twist_breaks_closure() {
        let mut graph = MtgGraph::new();
        let (a, b) = graph.create_edge().unwrap();
        graph.vertex_twist(a, b).unwrap();
        assert_eq!(graph.verify_graph(), Err(MtgError::ClosureViolation(a)));
        graph.vertex_twist(a, b).unwrap();
        assert_eq!(graph.verify_graph(), Ok(()));
    }

    #[test]
    fn face_twist_between_edges_is_detected() {
        let mut graph = MtgGraph::new();
        let (a, _) = graph.create_edge().unwrap();
        let (c, _) = graph.create_edge().unwrap();
        graph.face_twist(a, c).unwrap();
        assert!(matches!(
            graph.verify_graph(),
            Err(MtgError::ClosureViolation(_))
        ));
    }
}
