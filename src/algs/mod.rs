//! Algorithms over facets: vertex clustering and stitching.

pub mod cluster;
pub mod stitch;

pub use cluster::cluster_vertices;
pub use stitch::stitch_facets;
