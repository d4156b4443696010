//! [`MtgFacets`]: a half-edge graph plus the coordinate data its nodes
//! point at.
//!
//! Nodes never store geometry. Each node carries a vertex-index label (and,
//! in [`NormalMode::SeparateNormals`], a normal-index label) that indexes
//! into the arrays owned here. Faces are built as isolated rings, one
//! [`split_edge`](MtgGraph::split_edge) per corner, and recorded as *face
//! starts* for [`stitch_facets`](crate::algs::stitch::stitch_facets) to
//! consume.
//!
//! ```rust
//! use mtg_mesh::facets::{MtgFacets, NormalMode};
//!
//! let mut facets = MtgFacets::new();
//! facets.set_normal_mode(NormalMode::VertexOnly, 4, 0)?;
//! let start = facets.add_coordinate_face(
//!     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
//!     None,
//!     None,
//! )?;
//! assert_eq!(facets.graph().count_nodes_around_face(start), 4);
//! # Ok::<(), mtg_mesh::mesh_error::MtgError>(())
//! ```

mod build;
mod query;

use serde::{Deserialize, Serialize};

use crate::debug_invariants::DebugInvariants;
use crate::geometry::vec3::Point3;
use crate::mesh_error::MtgError;
use crate::topology::graph::MtgGraph;
use crate::topology::mask::Mask;
use crate::topology::node_id::NodeId;

/// Label tag of the per-node vertex index.
pub const VERTEX_INDEX_TAG: i32 = -1;
/// Label tag of the per-node normal index.
pub const NORMAL_INDEX_TAG: i32 = -2;

/// Relative tolerance used when a [`Tolerance`] is all zeros.
pub const DEFAULT_REL_TOL: f64 = 1e-10;
/// Absolute tolerance used when a [`Tolerance`] is all zeros.
pub const DEFAULT_ABS_TOL: f64 = 1e-14;

/// Which index labels the facet nodes carry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NormalMode {
    /// No labels: faces carry topology only.
    #[default]
    None,
    /// A vertex index per node.
    VertexOnly,
    /// A vertex index per node; the normal array is parallel to the
    /// point array.
    NormalPerVertex,
    /// A vertex index and an independent normal index per node.
    SeparateNormals,
}

impl NormalMode {
    pub fn has_vertex_label(self) -> bool {
        self != NormalMode::None
    }

    pub fn has_normal_label(self) -> bool {
        self == NormalMode::SeparateNormals
    }
}

/// Combined absolute and relative distance tolerance.
///
/// The effective tolerance is `abs + rel * range`, where `range` is the
/// largest extent of the coordinates involved. When both terms are zero
/// the defaults [`DEFAULT_ABS_TOL`] and [`DEFAULT_REL_TOL`] apply.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    pub abs: f64,
    pub rel: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            abs: DEFAULT_ABS_TOL,
            rel: DEFAULT_REL_TOL,
        }
    }
}

impl Tolerance {
    pub const fn new(abs: f64, rel: f64) -> Self {
        Self { abs, rel }
    }

    /// Effective tolerance for coordinates spanning `range`.
    pub fn resolve(&self, range: f64) -> f64 {
        let (abs, rel) = if self.abs == 0.0 && self.rel == 0.0 {
            (DEFAULT_ABS_TOL, DEFAULT_REL_TOL)
        } else {
            (self.abs.abs(), self.rel.abs())
        };
        abs + rel * range.abs()
    }
}

/// Per-edge labels written while a face is built.
#[derive(Copy, Clone, Debug)]
pub struct EdgeLabels<'a> {
    /// Offset of a label defined on the facets' graph.
    pub offset: usize,
    /// `values[i]` goes onto both nodes of edge `i` (from point `i` to
    /// point `i + 1`).
    pub values: &'a [i32],
    /// Written onto the returned start node after the edge values.
    pub head: Option<i32>,
}

/// Facet builder and coordinate store over an [`MtgGraph`].
#[derive(Clone, Debug, Default)]
pub struct MtgFacets {
    pub(crate) graph: MtgGraph,
    pub(crate) points: Vec<Point3>,
    pub(crate) normals: Vec<Point3>,
    pub(crate) params: Vec<[f64; 2]>,
    pub(crate) normal_mode: NormalMode,
    pub(crate) vertex_label: Option<usize>,
    pub(crate) normal_label: Option<usize>,
    pub(crate) face_starts: Vec<NodeId>,
}

impl MtgFacets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing graph. Its labels must not use the reserved
    /// [`VERTEX_INDEX_TAG`] / [`NORMAL_INDEX_TAG`] for anything else.
    pub fn with_graph(graph: MtgGraph) -> Self {
        Self {
            graph,
            ..Self::default()
        }
    }

    #[inline]
    pub fn graph(&self) -> &MtgGraph {
        &self.graph
    }

    #[inline]
    pub fn graph_mut(&mut self) -> &mut MtgGraph {
        &mut self.graph
    }

    pub fn into_graph(self) -> MtgGraph {
        self.graph
    }

    pub fn normal_mode(&self) -> NormalMode {
        self.normal_mode
    }

    /// Offset of the vertex-index label, if the mode defines one.
    pub fn vertex_label_offset(&self) -> Option<usize> {
        self.vertex_label
    }

    /// Offset of the normal-index label, if the mode defines one.
    pub fn normal_label_offset(&self) -> Option<usize> {
        self.normal_label
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn normals(&self) -> &[Point3] {
        &self.normals
    }

    pub fn params(&self) -> &[[f64; 2]] {
        &self.params
    }

    /// Seeds of the faces added since the last stitch.
    pub fn face_starts(&self) -> &[NodeId] {
        &self.face_starts
    }

    /// Rebuilds the face-start list from the graph: one seed per face loop
    /// that is not [`Mask::EXTERIOR`]. For an unstitched ring only one of
    /// its two loops is taken. Returns the number of seeds.
    pub fn collect_face_starts(&mut self) -> usize {
        let graph = &self.graph;
        let mut seen = vec![false; graph.node_id_count()];
        let mut starts = Vec::new();
        for seed in graph.face_loop_seeds(Mask::EXTERIOR) {
            if seen[seed.index()] {
                continue;
            }
            for n in graph.face_loop(seed) {
                seen[n.index()] = true;
            }
            if graph.is_isolated_ring(seed) {
                for n in graph.face_loop(graph.edge_mate(seed)) {
                    seen[n.index()] = true;
                }
            }
            starts.push(seed);
        }
        self.face_starts = starts;
        self.face_starts.len()
    }

    /// Removes all nodes and geometry. The normal mode and the label
    /// definitions survive.
    pub fn empty(&mut self, preserve_capacity: bool) {
        self.graph.empty(preserve_capacity);
        self.points.clear();
        self.normals.clear();
        self.params.clear();
        self.face_starts.clear();
        if !preserve_capacity {
            self.points.shrink_to_fit();
            self.normals.shrink_to_fit();
            self.params.shrink_to_fit();
            self.face_starts.shrink_to_fit();
        }
    }

    /// Removes everything and frees the memory.
    pub fn release_mem(&mut self) {
        self.graph.release_mem();
        self.empty(false);
    }
}

impl MtgGraph {
    /// True if every node of the face loop of `seed` sits at a vertex with
    /// exactly two nodes, i.e. the face has not been stitched to anything.
    pub fn is_isolated_ring(&self, seed: NodeId) -> bool {
        self.face_loop(seed).all(|n| {
            let partner = self.vsucc(n);
            partner != n && self.vsucc(partner) == n
        })
    }
}

impl DebugInvariants for MtgFacets {
    fn validate_invariants(&self) -> Result<(), MtgError> {
        self.graph.verify_graph()?;
        if let Some(offset) = self.vertex_label {
            for n in self.graph.active_nodes() {
                if self.vertex_index(n).is_none() {
                    return Err(MtgError::MissingLabel { node: n, offset });
                }
            }
        }
        Ok(())
    }
}
