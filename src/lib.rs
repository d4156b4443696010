#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mtg-mesh
//!
//! mtg-mesh is a half-edge topology kernel for polygon meshes that are
//! oriented 2-manifolds with boundary, plus a facet builder that turns
//! independently specified polygons into one connected mesh.
//!
//! ## Features
//! - [`MtgGraph`](topology::MtgGraph): nodes in a recycling arena, related by
//!   a face-successor and a vertex-successor permutation; the opposite node
//!   of an edge is derived as `vsucc(fsucc(n))`
//! - Edit operators (split, join, heal, drop, twist, reverse) that either
//!   succeed with the closure law intact or leave the graph untouched
//! - Scoped mask bits ([`ScopedMask`](topology::ScopedMask),
//!   [`MarkSet`](topology::MarkSet)) and per-node integer labels
//! - [`MtgFacets`](facets::MtgFacets): coordinate, normal and parameter
//!   arrays addressed through node labels
//! - [`stitch_facets`](algs::stitch::stitch_facets): vertex clustering and
//!   angular edge-star assembly, including non-manifold fans
//!
//! ## Determinism
//!
//! Stitching sorts by vertex index, face order and angle; the same input
//! produces the same graph, with or without the `rayon` feature.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! mtg-mesh = "0.1"
//! # Optional features:
//! # features = ["rayon", "check-invariants"]
//! ```
//!
//! ```rust
//! use mtg_mesh::prelude::*;
//!
//! let mut facets = MtgFacets::new();
//! facets.set_normal_mode(NormalMode::VertexOnly, 6, 0)?;
//! facets.add_coordinate_face(
//!     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
//!     None,
//!     None,
//! )?;
//! facets.add_coordinate_face(
//!     &[[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
//!     None,
//!     None,
//! )?;
//! let summary = stitch_facets(&mut facets, &StitchOptions::with_abs_tol(1e-8))?;
//! assert_eq!(summary.joined_edges, 1);
//! assert_eq!(facets.graph().count_vertex_loops(), 6);
//! # Ok::<(), mtg_mesh::mesh_error::MtgError>(())
//! ```

pub mod algs;
pub mod debug_invariants;
pub mod facets;
pub mod geometry;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::cluster::{VertexClusters, cluster_vertices};
    pub use crate::algs::stitch::{StitchOptions, StitchSummary, stitch_facets};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::facets::{EdgeLabels, MtgFacets, NormalMode, Tolerance};
    pub use crate::geometry::vec3::Point3;
    pub use crate::mesh_error::MtgError;
    pub use crate::topology::{
        LabelKind, MarkScope, MarkSet, Mask, MtgGraph, NodeId, ScopedMask,
    };
}
