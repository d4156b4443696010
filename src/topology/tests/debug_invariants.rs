#![cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]

use crate::debug_invariants::DebugInvariants;
use crate::topology::graph::MtgGraph;
use crate::topology::node_id::NodeId;

fn triangle() -> (MtgGraph, NodeId) {
    let mut g = MtgGraph::new();
    let (n0, _) = g.split_edge(None).unwrap();
    let (n1, _) = g.split_edge(Some(n0)).unwrap();
    g.split_edge(Some(n1)).unwrap();
    (g, n0)
}

#[test]
fn valid_triangle_passes() {
    let (g, _) = triangle();
    g.debug_assert_invariants();
}

#[test]
#[should_panic]
fn unpaired_vertex_twist_panics_in_debug() {
    let (mut g, n0) = triangle();
    let n1 = g.fsucc(n0);
    g.vertex_twist(n0, n1).unwrap();
    g.debug_assert_invariants();
}

#[test]
#[should_panic]
fn dangling_successor_panics_in_debug() {
    let (mut g, n0) = triangle();
    let mate = g.edge_mate(n0);
    g.arena.delete_node(mate);
    g.debug_assert_invariants();
}
