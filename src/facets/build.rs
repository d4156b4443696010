//! Face construction for [`MtgFacets`].

use crate::facets::{EdgeLabels, MtgFacets, NORMAL_INDEX_TAG, NormalMode, Tolerance, VERTEX_INDEX_TAG};
use crate::geometry::vec3::{BoundingBox, Point3, sub};
use crate::mesh_error::MtgError;
use crate::topology::labels::LabelKind;
use crate::topology::mask::Mask;
use crate::topology::node_id::NodeId;

/// One corner of a face about to be built.
#[derive(Copy, Clone, Debug)]
struct Corner {
    vertex: usize,
    normal: Option<usize>,
}

/// Nodes of a freshly built ring: the seed of the face loop through the
/// corners in order, and the seed of its mirror loop.
#[derive(Copy, Clone, Debug)]
struct Ring {
    front: NodeId,
    back: NodeId,
}

fn label_value(index: usize) -> Result<i32, MtgError> {
    i32::try_from(index).map_err(|_| MtgError::IndexOutOfRange {
        array: "label value",
        index,
        len: i32::MAX as usize,
    })
}

fn check_index(array: &'static str, index: usize, len: usize) -> Result<(), MtgError> {
    if index < len {
        Ok(())
    } else {
        Err(MtgError::IndexOutOfRange { array, index, len })
    }
}

/// True if `a` and `b` coincide within `tol` on every axis. Equal to the
/// tolerance counts as distinct.
fn coincident(a: Point3, b: Point3, tol: f64) -> bool {
    sub(a, b).iter().all(|d| d.abs() < tol)
}

impl MtgFacets {
    /// Fixes which labels the facet nodes carry and reserves room for
    /// `hint_vertex_count` points and `hint_normal_count` normals.
    ///
    /// Setting the current mode again only reserves. Switching modes fails
    /// with [`MtgError::NormalModeLocked`] once any geometry exists.
    pub fn set_normal_mode(
        &mut self,
        mode: NormalMode,
        hint_vertex_count: usize,
        hint_normal_count: usize,
    ) -> Result<(), MtgError> {
        if mode != self.normal_mode {
            if !self.points.is_empty() || self.graph.active_node_count() > 0 {
                return Err(MtgError::NormalModeLocked);
            }
            self.vertex_label = if mode.has_vertex_label() {
                Some(self.label_offset_for(VERTEX_INDEX_TAG, LabelKind::Vertex)?)
            } else {
                None
            };
            self.normal_label = if mode.has_normal_label() {
                Some(self.label_offset_for(NORMAL_INDEX_TAG, LabelKind::Sector)?)
            } else {
                None
            };
            self.normal_mode = mode;
        }
        self.points.reserve(hint_vertex_count);
        if mode != NormalMode::VertexOnly {
            self.normals.reserve(hint_normal_count);
        }
        self.graph.arena.reserve(2 * hint_vertex_count);
        Ok(())
    }

    fn label_offset_for(&mut self, tag: i32, kind: LabelKind) -> Result<usize, MtgError> {
        match self.graph.try_search_label_tag(tag) {
            Some(offset) => Ok(offset),
            None => self.graph.define_label(tag, kind, -1),
        }
    }

    pub fn add_vertex(&mut self, point: Point3) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    pub fn add_normal(&mut self, normal: Point3) -> usize {
        self.normals.push(normal);
        self.normals.len() - 1
    }

    pub fn add_param(&mut self, uv: [f64; 2]) -> usize {
        self.params.push(uv);
        self.params.len() - 1
    }

    /// Builds one face from explicit coordinates and returns its start node.
    ///
    /// A final point repeating the first (within a relative tolerance) is
    /// dropped. The face loop runs through the points in order. Every node
    /// of the mirror loop is marked [`Mask::EXTERIOR`], so a k-gon adds k
    /// exterior nodes, not one. `normals`, when given, must have
    /// one entry per point and is stored according to the normal mode.
    /// `edge_labels`, when given, is written after the ring is closed.
    pub fn add_coordinate_face(
        &mut self,
        points: &[Point3],
        normals: Option<&[Point3]>,
        edge_labels: Option<EdgeLabels<'_>>,
    ) -> Result<NodeId, MtgError> {
        let mut count = points.len();
        if count >= 2 {
            let range = BoundingBox::from_points(points).map_or(0.0, |b| b.max_extent());
            let tol = Tolerance::default().resolve(range);
            if coincident(points[0], points[count - 1], tol) {
                count -= 1;
            }
        }
        if count < 3 {
            return Err(MtgError::DegenerateFace(count));
        }
        if let Some(normals) = normals {
            if normals.len() < count {
                return Err(MtgError::IndexOutOfRange {
                    array: "normals",
                    index: count - 1,
                    len: normals.len(),
                });
            }
        }
        if let Some(labels) = &edge_labels {
            self.check_edge_labels(labels, count)?;
        }
        self.check_room(count)?;

        let corners: Vec<Corner> = (0..count)
            .map(|i| {
                let vertex = self.add_vertex(points[i]);
                let normal = match (self.normal_mode, normals) {
                    (NormalMode::NormalPerVertex, Some(ns)) => {
                        self.set_parallel_normal(vertex, ns[i]);
                        None
                    }
                    (NormalMode::SeparateNormals, Some(ns)) => Some(self.add_normal(ns[i])),
                    _ => None,
                };
                Corner { vertex, normal }
            })
            .collect();
        let ring = self.build_ring(&corners, true)?;
        if let Some(labels) = edge_labels {
            self.write_edge_labels(ring.front, &labels)?;
        }
        self.face_starts.push(ring.front);
        Ok(ring.front)
    }

    /// Builds one face through existing vertices and returns its start
    /// node. The mirror loop is marked [`Mask::EXTERIOR`].
    pub fn add_indexed_face(
        &mut self,
        vertex_indices: &[usize],
        normal_indices: Option<&[usize]>,
    ) -> Result<NodeId, MtgError> {
        let corners = self.indexed_corners(vertex_indices, normal_indices)?;
        self.check_room(corners.len())?;
        let ring = self.build_ring(&corners, true)?;
        self.face_starts.push(ring.front);
        Ok(ring.front)
    }

    /// Builds a two-sided face through existing vertices and returns
    /// `(front, back)`. Neither loop is exterior.
    pub fn add_indexed_double_face(
        &mut self,
        vertex_indices: &[usize],
    ) -> Result<(NodeId, NodeId), MtgError> {
        let corners = self.indexed_corners(vertex_indices, None)?;
        self.check_room(corners.len())?;
        let ring = self.build_ring(&corners, false)?;
        self.face_starts.push(ring.front);
        Ok((ring.front, ring.back))
    }

    /// Builds a two-sided face from coordinates, skipping any point that
    /// repeats its predecessor within `tolerance` (the last point is also
    /// compared with the first). Every node of both loops gets the id of
    /// its vertex partner on the opposite side written at `partner_offset`.
    pub fn add_double_face_tol(
        &mut self,
        points: &[Point3],
        tolerance: Tolerance,
        partner_offset: usize,
    ) -> Result<(NodeId, NodeId), MtgError> {
        if partner_offset >= self.graph.label_count() {
            return Err(MtgError::LabelOffsetOutOfRange {
                offset: partner_offset,
                count: self.graph.label_count(),
            });
        }
        let range = BoundingBox::from_points(points).map_or(0.0, |b| b.max_extent());
        let tol = tolerance.resolve(range);
        let mut kept: Vec<Point3> = Vec::with_capacity(points.len());
        for &p in points {
            if kept.last().is_none_or(|&q| !coincident(p, q, tol)) {
                kept.push(p);
            }
        }
        while kept.len() > 1 && coincident(kept[0], kept[kept.len() - 1], tol) {
            kept.pop();
        }
        if kept.len() < 3 {
            return Err(MtgError::DegenerateFace(kept.len()));
        }
        self.check_room(kept.len())?;

        let corners: Vec<Corner> = kept
            .iter()
            .map(|&p| Corner {
                vertex: self.add_vertex(p),
                normal: None,
            })
            .collect();
        let ring = self.build_ring(&corners, false)?;
        let nodes: Vec<NodeId> = self
            .graph
            .face_loop(ring.front)
            .chain(self.graph.face_loop(ring.back))
            .collect();
        for n in nodes {
            let partner = self.graph.vsucc(n);
            let value = i32::try_from(partner.raw()).map_err(|_| MtgError::IndexOutOfRange {
                array: "label value",
                index: partner.index(),
                len: i32::MAX as usize,
            })?;
            self.graph.try_set_label(n, partner_offset, value)?;
        }
        self.face_starts.push(ring.front);
        Ok((ring.front, ring.back))
    }

    fn indexed_corners(
        &self,
        vertex_indices: &[usize],
        normal_indices: Option<&[usize]>,
    ) -> Result<Vec<Corner>, MtgError> {
        if vertex_indices.len() < 3 {
            return Err(MtgError::DegenerateFace(vertex_indices.len()));
        }
        if let Some(ns) = normal_indices {
            if ns.len() < vertex_indices.len() {
                return Err(MtgError::IndexOutOfRange {
                    array: "normal indices",
                    index: vertex_indices.len() - 1,
                    len: ns.len(),
                });
            }
        }
        vertex_indices
            .iter()
            .enumerate()
            .map(|(i, &vertex)| {
                check_index("points", vertex, self.points.len())?;
                let normal = match normal_indices {
                    Some(ns) if self.normal_mode == NormalMode::SeparateNormals => {
                        check_index("normals", ns[i], self.normals.len())?;
                        Some(ns[i])
                    }
                    _ => None,
                };
                Ok(Corner { vertex, normal })
            })
            .collect()
    }

    fn check_room(&self, corners: usize) -> Result<(), MtgError> {
        if self.graph.arena().available() < 2 * corners {
            return Err(MtgError::ArenaExhausted(self.graph.node_id_count()));
        }
        Ok(())
    }

    fn check_edge_labels(&self, labels: &EdgeLabels<'_>, count: usize) -> Result<(), MtgError> {
        if labels.offset >= self.graph.label_count() {
            return Err(MtgError::LabelOffsetOutOfRange {
                offset: labels.offset,
                count: self.graph.label_count(),
            });
        }
        if labels.values.len() < count {
            return Err(MtgError::IndexOutOfRange {
                array: "edge labels",
                index: count - 1,
                len: labels.values.len(),
            });
        }
        Ok(())
    }

    /// Stores the normal of `vertex` in the array kept parallel to the
    /// points in [`NormalMode::NormalPerVertex`].
    fn set_parallel_normal(&mut self, vertex: usize, normal: Point3) {
        if self.normals.len() <= vertex {
            self.normals.resize(vertex + 1, [0.0; 3]);
        }
        self.normals[vertex] = normal;
    }

    /// Grows an isolated ring through `corners`: a sling, then one split per
    /// further corner. Every corner's vertex gets its labels on both of its
    /// nodes. Callers check arena room first.
    fn build_ring(&mut self, corners: &[Corner], exterior: bool) -> Result<Ring, MtgError> {
        let (front, back) = self.graph.split_edge(None)?;
        let mut tails = Vec::with_capacity(corners.len());
        tails.push(front);
        let mut last = front;
        for _ in 1..corners.len() {
            let (left, _) = self.graph.split_edge(Some(last))?;
            tails.push(left);
            last = left;
        }
        for (&node, corner) in tails.iter().zip(corners) {
            if let Some(offset) = self.vertex_label {
                self.graph
                    .set_label_around_vertex(node, offset, label_value(corner.vertex)?)?;
            }
            if let (Some(offset), Some(normal)) = (self.normal_label, corner.normal) {
                self.graph
                    .set_label_around_vertex(node, offset, label_value(normal)?)?;
            }
        }
        if exterior {
            self.graph.set_mask_around_face(back, Mask::EXTERIOR);
        }
        Ok(Ring { front, back })
    }

    fn write_edge_labels(&mut self, front: NodeId, labels: &EdgeLabels<'_>) -> Result<(), MtgError> {
        let nodes: Vec<NodeId> = self.graph.face_loop(front).collect();
        for (node, &value) in nodes.into_iter().zip(labels.values) {
            let mate = self.graph.edge_mate(node);
            self.graph.try_set_label(node, labels.offset, value)?;
            self.graph.try_set_label(mate, labels.offset, value)?;
        }
        if let Some(head) = labels.head {
            self.graph.try_set_label(front, labels.offset, head)?;
        }
        Ok(())
    }
}
