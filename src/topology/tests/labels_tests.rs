use crate::mesh_error::MtgError;
use crate::topology::graph::MtgGraph;
use crate::topology::labels::LabelKind;
use crate::topology::mask::Mask;
use crate::topology::node_id::NodeId;

#[test]
fn define_and_search_labels() {
    let mut g = MtgGraph::new();
    let vtx = g.define_label(100, LabelKind::Vertex, -1).unwrap();
    let nrm = g.define_label(200, LabelKind::Sector, 7).unwrap();
    assert_eq!((vtx, nrm), (0, 1));
    assert_eq!(g.try_search_label_tag(200), Some(nrm));
    assert_eq!(g.try_search_label_tag(300), None);
    assert_eq!(g.label_count(), 2);
    assert_eq!(g.label_definition(nrm).map(|d| d.kind), Some(LabelKind::Sector));
    assert_eq!(
        g.define_label(100, LabelKind::Sector, 0),
        Err(MtgError::DuplicateLabelTag(100))
    );
}

#[test]
fn existing_nodes_get_default_of_late_label() {
    let mut g = MtgGraph::new();
    let (a, b) = g.create_edge().unwrap();
    let first = g.define_label(1, LabelKind::Vertex, 0).unwrap();
    g.try_set_label(a, first, 11).unwrap();
    let second = g.define_label(2, LabelKind::Sector, -5).unwrap();
    assert_eq!(g.try_get_label(a, first), Some(11));
    assert_eq!(g.try_get_label(a, second), Some(-5));
    assert_eq!(g.try_get_label(b, second), Some(-5));
    let (c, _) = g.create_edge().unwrap();
    assert_eq!(g.try_get_label(c, first), Some(0));
}

#[test]
fn out_of_range_label_access() {
    let mut g = MtgGraph::new();
    let (a, _) = g.create_edge().unwrap();
    let off = g.define_label(1, LabelKind::Vertex, 0).unwrap();
    assert_eq!(g.try_get_label(a, off + 1), None);
    assert_eq!(g.try_get_label(NodeId::new(50), off), None);
    assert_eq!(
        g.try_set_label(a, 3, 1),
        Err(MtgError::LabelOffsetOutOfRange { offset: 3, count: 1 })
    );
    assert_eq!(
        g.try_set_label(NodeId::new(50), off, 1),
        Err(MtgError::InvalidNode(NodeId::new(50)))
    );
}

#[test]
fn recycled_node_gets_fresh_record() {
    let mut g = MtgGraph::new();
    let off = g.define_label(9, LabelKind::Sector, 4).unwrap();
    let (a, b) = g.create_edge().unwrap();
    g.try_set_label(a, off, 99).unwrap();
    g.set_mask(a, Mask::PRIMARY_EDGE);
    g.drop_edge(a).unwrap();
    let (c, d) = g.create_edge().unwrap();
    let mut reused = [c, d];
    reused.sort();
    assert_eq!(reused, [a, b]);
    for n in reused {
        assert_eq!(g.try_get_label(n, off), Some(4));
        assert_eq!(g.node_mask(n), Mask::NONE);
    }
}

#[test]
fn vertex_label_and_copy() {
    let mut g = MtgGraph::new();
    let off = g.define_label(1, LabelKind::Vertex, 0).unwrap();
    let (n0, _) = g.split_edge(None).unwrap();
    let (n1, _) = g.split_edge(Some(n0)).unwrap();
    g.set_label_around_vertex(n1, off, 42).unwrap();
    for n in g.vertex_loop(n1).collect::<Vec<_>>() {
        assert_eq!(g.try_get_label(n, off), Some(42));
    }
    assert_eq!(g.try_get_label(n0, off), Some(0));
    g.set_mask(n1, Mask::BOUNDARY_EDGE);
    g.copy_masks_and_labels(n1, n0).unwrap();
    assert_eq!(g.try_get_label(n0, off), Some(42));
    assert!(g.get_mask(n0, Mask::BOUNDARY_EDGE));
}
