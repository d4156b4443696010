//! Facet stitching: rebuild vertex and edge adjacency between faces that
//! were built as independent rings.
//!
//! [`stitch_facets`] consumes the face starts of an [`MtgFacets`] and runs
//! four passes:
//!
//! 1. cluster coincident points ([`cluster_vertices`]) and relabel every
//!    node with its cluster representative;
//! 2. drop triangles that collapsed to two or fewer distinct vertices;
//! 3. mask exact duplicate faces (same vertex cycle, same direction) so
//!    only the first survives;
//! 4. for every edge, sort the faces using it by the angle of their sheet
//!    about the edge axis and vertex-twist angular neighbours together.
//!
//! Only `vsucc` changes in the last pass. Each ring keeps both of its
//! loops, so every edge star with `m` sheets has `2m` nodes and the twists
//! pair the two sides facing each angular wedge: the node running
//! `lo -> hi` on sheet `i` becomes the mate of the node running `hi -> lo`
//! on sheet `i + 1`. An edge used by more than two faces is fanned in
//! angular order rather than rejected.

use std::collections::HashMap;
use std::f64::consts::TAU;

use itertools::Itertools;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algs::cluster::cluster_vertices;
use crate::debug_invariants;
use crate::facets::{MtgFacets, Tolerance};
use crate::geometry::vec3::{Point3, cross, dot, normalize, reject, scale, sub};
use crate::mesh_error::MtgError;
use crate::topology::graph::MtgGraph;
use crate::topology::mark_set::{MarkScope, MarkSet};
use crate::topology::mask::{GRANTABLE_MASK_COUNT, Mask};
use crate::topology::node_id::NodeId;

/// Angle tolerance used when `angle_tol` is zero.
pub const DEFAULT_ANGLE_TOL: f64 = 1e-10;

/// Tolerances for [`stitch_facets`].
///
/// With `abs_tol` and `rel_tol` both zero the distance defaults of
/// [`Tolerance`] apply.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchOptions {
    pub abs_tol: f64,
    pub rel_tol: f64,
    /// Two sheet angles closer than this are the same angle.
    pub angle_tol: f64,
}

impl Default for StitchOptions {
    fn default() -> Self {
        Self {
            abs_tol: 0.0,
            rel_tol: 0.0,
            angle_tol: DEFAULT_ANGLE_TOL,
        }
    }
}

impl StitchOptions {
    pub fn with_abs_tol(abs_tol: f64) -> Self {
        Self {
            abs_tol,
            ..Self::default()
        }
    }

    pub fn distance_tolerance(&self) -> Tolerance {
        Tolerance::new(self.abs_tol, self.rel_tol)
    }

    fn angle_tolerance(&self) -> f64 {
        if self.angle_tol > 0.0 {
            self.angle_tol
        } else {
            DEFAULT_ANGLE_TOL
        }
    }
}

/// What one [`stitch_facets`] call did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StitchSummary {
    /// Faces taken from the face-start list and stitched.
    pub faces: usize,
    /// Faces left alone because they were not isolated rings with vertex
    /// labels.
    pub skipped_faces: usize,
    /// Points folded into another point's cluster.
    pub merged_vertices: usize,
    /// Triangles deleted because they collapsed.
    pub degenerate_faces: usize,
    /// Exact duplicate faces deleted.
    pub duplicate_faces: usize,
    /// Edges where two or more faces were joined.
    pub joined_edges: usize,
    /// Joined edges with more than two faces.
    pub non_manifold_edges: usize,
}

/// One face's use of an undirected edge.
#[derive(Copy, Clone, Debug)]
struct Incidence {
    lo: usize,
    hi: usize,
    /// Node of the face loop on this edge.
    node: NodeId,
    /// True if `node` runs from `lo` to `hi`.
    forward: bool,
    face: usize,
}

#[derive(Copy, Clone, Debug)]
struct Sheet {
    incidence: Incidence,
    angle: f64,
}

/// Stitches every face recorded since the last call.
///
/// The face-start list is consumed: calling again stitches nothing until
/// faces are added or [`MtgFacets::collect_face_starts`] regenerates the
/// list (stitched faces then fail the isolated-ring check and are
/// skipped).
///
/// Stitching needs one free mask bit. With the pool exhausted it fails
/// with [`MtgError::MaskPoolExhausted`] before touching the facets; on any
/// error the face-start list is left in place for a retry.
pub fn stitch_facets(
    facets: &mut MtgFacets,
    options: &StitchOptions,
) -> Result<StitchSummary, MtgError> {
    if facets.graph.granted_mask_count() >= GRANTABLE_MASK_COUNT {
        log::warn!("cannot stitch: mask pool exhausted");
        return Err(MtgError::MaskPoolExhausted(GRANTABLE_MASK_COUNT));
    }
    let starts = std::mem::take(&mut facets.face_starts);
    match stitch_starts(facets, &starts, options) {
        Ok(summary) => Ok(summary),
        Err(e) => {
            facets.face_starts = starts;
            Err(e)
        }
    }
}

fn stitch_starts(
    facets: &mut MtgFacets,
    starts: &[NodeId],
    options: &StitchOptions,
) -> Result<StitchSummary, MtgError> {
    let mut summary = StitchSummary::default();
    let Some(offset) = facets.vertex_label else {
        log::warn!(
            "facets carry no vertex labels; skipping all {} faces",
            starts.len()
        );
        summary.skipped_faces = starts.len();
        return Ok(summary);
    };

    let accepted = accept_faces(facets, starts, &mut summary);
    if accepted.is_empty() {
        log::debug!("nothing to stitch ({} faces skipped)", summary.skipped_faces);
        return Ok(summary);
    }

    let clusters = cluster_vertices(&facets.points, options.distance_tolerance());
    summary.merged_vertices = clusters.merged_count();
    relabel_vertices(&mut facets.graph, offset, &clusters.representative)?;

    let (collapsed, faces): (Vec<NodeId>, Vec<NodeId>) = accepted
        .into_iter()
        .partition(|&start| is_collapsed_triangle(facets, start));
    summary.degenerate_faces = collapsed.len();
    for start in collapsed {
        // Still an isolated ring: nothing is joined yet.
        let nodes: Vec<NodeId> = facets.graph.face_loop(start).collect();
        for n in nodes {
            facets.graph.drop_edge(n)?;
        }
    }

    let cycles: Vec<Vec<usize>> = faces
        .iter()
        .map(|&start| canonical_cycle(facets.face_vertex_indices(start).unwrap_or_default()))
        .collect();
    let normals = face_normals(facets, &faces);
    let incidences = collect_incidences(facets, &faces);
    let angle_tol = options.angle_tolerance();

    let points = &facets.points;
    let mut graph = facets.graph.grab_scoped_mask()?;
    let duplicate = graph.mask();

    let mut first_with_cycle: HashMap<&[usize], usize> = HashMap::new();
    let mut is_duplicate = vec![false; faces.len()];
    for (face, cycle) in cycles.iter().enumerate() {
        if let Some(&kept) = first_with_cycle.get(cycle.as_slice()) {
            log::trace!("face {} duplicates face {}", faces[face], faces[kept]);
            is_duplicate[face] = true;
            graph.set_mask_around_face(faces[face], duplicate);
        } else {
            first_with_cycle.insert(cycle.as_slice(), face);
        }
    }
    summary.duplicate_faces = is_duplicate.iter().filter(|&&d| d).count();

    let stars = incidences
        .into_iter()
        .filter(|inc| !is_duplicate[inc.face])
        .chunk_by(|inc| (inc.lo, inc.hi));
    for ((lo, hi), star) in &stars {
        let star: Vec<Incidence> = star.collect();
        if star.len() < 2 {
            continue;
        }
        let Some(axis) = normalize(sub(points[hi], points[lo])) else {
            log::warn!("edge {lo}-{hi} has zero length; leaving {} faces unjoined", star.len());
            continue;
        };
        let sheets = sort_sheets(&star, axis, &normals, angle_tol);
        twist_star(&mut graph, &sheets);
        log::trace!(
            "joined edge {lo}-{hi}: {} faces at angles {:?}",
            sheets.len(),
            sheets.iter().map(|s| s.angle).collect::<Vec<_>>()
        );
        summary.joined_edges += 1;
        if sheets.len() > 2 {
            summary.non_manifold_edges += 1;
        }
    }

    graph.drop_edges_with_mask(duplicate)?;
    drop(graph);

    summary.faces = faces.len() - summary.duplicate_faces;
    debug_invariants!(facets.graph.verify_graph(), "stitch_facets");
    log::debug!("stitched facets: {summary:?}");
    Ok(summary)
}

/// Face starts that are live, unclaimed isolated rings with a vertex index
/// on every node.
fn accept_faces(facets: &MtgFacets, starts: &[NodeId], summary: &mut StitchSummary) -> Vec<NodeId> {
    let graph = &facets.graph;
    let mut claimed = vec![false; graph.node_id_count()];
    let mut faces = Vec::with_capacity(starts.len());
    for &start in starts {
        let usable = graph.is_active(start)
            && !claimed[start.index()]
            && graph.is_isolated_ring(start)
            && graph
                .face_loop(start)
                .all(|n| facets.vertex_index(n).is_some());
        if !usable {
            log::warn!("skipping face at node {start}: not an isolated labelled ring");
            summary.skipped_faces += 1;
            continue;
        }
        let mirror = graph.edge_mate(start);
        for n in graph.face_loop(start).chain(graph.face_loop(mirror)) {
            claimed[n.index()] = true;
        }
        faces.push(start);
    }
    faces
}

/// Rewrites every vertex label through `representative`, one vertex loop
/// at a time.
fn relabel_vertices(
    graph: &mut MtgGraph,
    offset: usize,
    representative: &[usize],
) -> Result<(), MtgError> {
    let nodes: Vec<NodeId> = graph.active_nodes().collect();
    let mut set = MarkSet::new(graph, MarkScope::Vertex)?;
    set.add_nodes(nodes);
    while let Some(node) = set.choose_and_remove_node() {
        let Some(old) = set.graph().try_get_label(node, offset) else {
            continue;
        };
        let Some(&new) = usize::try_from(old).ok().and_then(|i| representative.get(i)) else {
            continue;
        };
        if new as i32 != old {
            set.graph_mut()
                .set_label_around_vertex(node, offset, new as i32)?;
        }
    }
    Ok(())
}

fn is_collapsed_triangle(facets: &MtgFacets, start: NodeId) -> bool {
    match facets.face_vertex_indices(start).as_deref() {
        Some(&[a, b, c]) => a == b || b == c || c == a,
        _ => false,
    }
}

/// Rotation of `cycle` starting at its smallest entry.
fn canonical_cycle(mut cycle: Vec<usize>) -> Vec<usize> {
    if let Some(first) = cycle.iter().position_min() {
        cycle.rotate_left(first);
    }
    cycle
}

#[cfg(feature = "rayon")]
fn face_normals(facets: &MtgFacets, faces: &[NodeId]) -> Vec<Point3> {
    faces
        .par_iter()
        .map(|&start| facets.face_normal(start).unwrap_or([0.0; 3]))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn face_normals(facets: &MtgFacets, faces: &[NodeId]) -> Vec<Point3> {
    faces
        .iter()
        .map(|&start| facets.face_normal(start).unwrap_or([0.0; 3]))
        .collect()
}

/// One incidence per face-loop node, sorted by edge then face.
fn collect_incidences(facets: &MtgFacets, faces: &[NodeId]) -> Vec<Incidence> {
    let graph = &facets.graph;
    let mut incidences = Vec::new();
    for (face, &start) in faces.iter().enumerate() {
        for node in graph.face_loop(start) {
            let (Some(tail), Some(head)) = (
                facets.vertex_index(node),
                facets.vertex_index(graph.fsucc(node)),
            ) else {
                continue;
            };
            if tail == head {
                continue;
            }
            incidences.push(Incidence {
                lo: tail.min(head),
                hi: tail.max(head),
                node,
                forward: tail < head,
                face,
            });
        }
    }
    incidences.sort_by_key(|inc| (inc.lo, inc.hi, inc.face, inc.node));
    incidences
}

/// Sorts the faces of one edge by the angle of their sheet about `axis`,
/// measured from the first incidence.
///
/// A sheet's direction is `normal x e` projected off the axis, where `e`
/// is the direction its face loop runs along the edge: the direction from
/// the edge into the face.
fn sort_sheets(star: &[Incidence], axis: Point3, normals: &[Point3], angle_tol: f64) -> Vec<Sheet> {
    let into_face = |inc: &Incidence| {
        let e = if inc.forward { axis } else { scale(axis, -1.0) };
        reject(cross(normals[inc.face], e), axis)
    };
    let reference = into_face(&star[0]);
    let mut sheets: Vec<Sheet> = star
        .iter()
        .map(|inc| {
            let d = into_face(inc);
            Sheet {
                incidence: *inc,
                angle: dot(cross(reference, d), axis).atan2(dot(reference, d)),
            }
        })
        .collect();
    sheets.sort_by(|a, b| {
        a.angle
            .total_cmp(&b.angle)
            .then(a.incidence.face.cmp(&b.incidence.face))
    });
    // The same direction can come out as +pi and -pi.
    for _ in 1..sheets.len() {
        let (first, last) = (sheets[0].angle, sheets[sheets.len() - 1].angle);
        if (last - TAU - first).abs() > angle_tol {
            break;
        }
        sheets.rotate_right(1);
        sheets[0].angle -= TAU;
    }
    sheets
}

/// Joins the sheets of one edge in angular order.
///
/// Node `fwd_i` (running `lo -> hi` on sheet `i`) must end up mated to
/// `rev_{i+1}` (running `hi -> lo` on the next sheet), cyclically. Since
/// `edge_mate(n) = vsucc(fsucc(n))`, that fixes `vsucc` on the nodes after
/// each `fwd_i` (at `hi`) and after each `rev_i` (at `lo`); the twists
/// below reach exactly that state from the isolated rings.
fn twist_star(graph: &mut MtgGraph, sheets: &[Sheet]) {
    let (at_hi, at_lo): (Vec<NodeId>, Vec<NodeId>) = sheets
        .iter()
        .map(|sheet| {
            let node = sheet.incidence.node;
            let mate = graph.edge_mate(node);
            let (fwd, rev) = if sheet.incidence.forward {
                (node, mate)
            } else {
                (mate, node)
            };
            (graph.fsucc(fwd), graph.fsucc(rev))
        })
        .unzip();
    for (&a, &b) in at_hi.iter().tuple_windows() {
        graph.twist_v(a, b);
    }
    for &b in &at_lo[1..] {
        graph.twist_v(at_lo[0], b);
    }
}
