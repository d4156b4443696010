//! Tolerance clustering of vertex coordinates.
//!
//! Points are projected onto a fixed unit direction and sorted by the
//! projection. A sweep keeps the clusters whose pivot projection is still
//! within reach and joins each point to the first open cluster whose pivot
//! it matches on every axis. Two points within the tolerance on every axis
//! are never more than `tol * |dir|_1` apart along the projection, so the
//! window cannot miss a true match against a pivot.
//!
//! Membership is tested against the pivot only, not every member, so a
//! chain of points each within tolerance of the next may split into
//! several clusters. Two far-apart points can also land next to each other
//! in the sort order; the per-axis test keeps them apart.

use itertools::Itertools;

use crate::facets::Tolerance;
use crate::geometry::vec3::{BoundingBox, Point3, dot};

/// Sweep direction. Any direction works; this one avoids aligning with the
/// coordinate axes and the common diagonals.
const SWEEP_DIRECTION: Point3 = [0.571_085_3, 0.676_523_6, 0.464_945_1];

#[derive(Copy, Clone, Debug)]
struct OpenCluster {
    pivot: usize,
    projection: f64,
    id: usize,
}

/// Result of [`cluster_vertices`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexClusters {
    /// `representative[i]` is the smallest point index in `i`'s cluster.
    pub representative: Vec<usize>,
    /// Number of distinct clusters.
    pub cluster_count: usize,
}

impl VertexClusters {
    /// Number of points folded into another point's cluster.
    pub fn merged_count(&self) -> usize {
        self.representative.len() - self.cluster_count
    }
}

fn within(a: Point3, b: Point3, tol: f64) -> bool {
    (0..3).all(|k| (a[k] - b[k]).abs() < tol)
}

/// Clusters `points` within `tolerance.resolve(range)`, where `range` is
/// the largest bounding-box extent of `points`. A separation equal to the
/// tolerance is not merged.
pub fn cluster_vertices(points: &[Point3], tolerance: Tolerance) -> VertexClusters {
    let range = BoundingBox::from_points(points).map_or(0.0, |b| b.max_extent());
    let tol = tolerance.resolve(range);
    let reach = tol * SWEEP_DIRECTION.iter().map(|c| c.abs()).sum::<f64>();

    let projections: Vec<f64> = points.iter().map(|&p| dot(p, SWEEP_DIRECTION)).collect();
    let order = (0..points.len()).sorted_by(|&a, &b| {
        projections[a]
            .total_cmp(&projections[b])
            .then(a.cmp(&b))
    });

    let mut cluster_of = vec![usize::MAX; points.len()];
    let mut open: Vec<OpenCluster> = Vec::new();
    let mut cluster_count = 0;
    for i in order {
        let proj = projections[i];
        open.retain(|c| proj - c.projection <= reach);
        let hit = open
            .iter()
            .find(|c| within(points[c.pivot], points[i], tol))
            .map(|c| c.id);
        cluster_of[i] = match hit {
            Some(id) => id,
            None => {
                let id = cluster_count;
                cluster_count += 1;
                open.push(OpenCluster {
                    pivot: i,
                    projection: proj,
                    id,
                });
                id
            }
        };
    }

    let mut smallest = vec![usize::MAX; cluster_count];
    for (i, &c) in cluster_of.iter().enumerate() {
        smallest[c] = smallest[c].min(i);
    }
    let representative = cluster_of.iter().map(|&c| smallest[c]).collect();
    log::debug!(
        "clustered {} points into {} vertices (tol {tol:e})",
        points.len(),
        cluster_count
    );
    VertexClusters {
        representative,
        cluster_count,
    }
}
