use mtg_mesh::prelude::*;

fn regular_polygon(k: usize) -> Vec<Point3> {
    (0..k)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / k as f64;
            [t.cos(), t.sin(), 0.0]
        })
        .collect()
}

#[test]
fn k_gon_loops_close_in_k_steps() {
    for k in 3..12 {
        let mut facets = MtgFacets::new();
        facets.set_normal_mode(NormalMode::VertexOnly, k, 0).unwrap();
        let start = facets
            .add_coordinate_face(&regular_polygon(k), None, None)
            .unwrap();
        let g = facets.graph();

        let mut n = start;
        for step in 1..=k {
            n = g.fsucc(n);
            assert_eq!(n == start, step == k, "front loop of {k}-gon");
        }
        let back = g.edge_mate(start);
        let mut n = back;
        for step in 1..=k {
            n = g.fsucc(n);
            assert_eq!(n == back, step == k, "back loop of {k}-gon");
        }

        assert_eq!(
            facets.face_vertex_indices(start),
            Some((0..k).collect::<Vec<_>>())
        );
        for n in g.face_loop(start) {
            // Both nodes at a corner carry the corner's vertex.
            assert_eq!(facets.vertex_index(n), facets.vertex_index(g.vsucc(n)));
            assert_eq!(g.count_nodes_around_vertex(n), 2);
        }
        assert!(g.is_isolated_ring(start));
        g.verify_graph().unwrap();
    }
}

#[test]
fn ring_normals_point_opposite_ways() {
    let mut facets = MtgFacets::new();
    facets.set_normal_mode(NormalMode::VertexOnly, 6, 0).unwrap();
    let start = facets
        .add_coordinate_face(&regular_polygon(6), None, None)
        .unwrap();
    let front = facets.face_normal(start).unwrap();
    let back = facets.face_normal(facets.graph().edge_mate(start)).unwrap();
    assert!(front[2] > 0.0);
    assert!((front[2] + back[2]).abs() < 1e-12);
}

#[test]
fn exhausted_arena_rejects_the_whole_face() {
    let mut facets = MtgFacets::with_graph(MtgGraph::with_node_limit(10));
    facets.set_normal_mode(NormalMode::VertexOnly, 0, 0).unwrap();
    facets
        .add_coordinate_face(&regular_polygon(4), None, None)
        .unwrap();
    let err = facets
        .add_coordinate_face(&regular_polygon(3), None, None)
        .unwrap_err();
    assert!(matches!(err, MtgError::ArenaExhausted(_)));
    assert_eq!(facets.graph().active_node_count(), 8);
    assert_eq!(facets.points().len(), 4);
    assert_eq!(facets.face_starts().len(), 1);
}
