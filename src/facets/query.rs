//! Read-only geometry lookups through the node labels.
//!
//! Every lookup resolves a node's label to an array index and checks both
//! steps. A missing label, a negative value or an index past the array all
//! come back as `None` (or `Err` for the buffer fill).

use crate::facets::{MtgFacets, NormalMode};
use crate::geometry::vec3::{self, BoundingBox, Point3};
use crate::mesh_error::MtgError;
use crate::topology::node_id::NodeId;

impl MtgFacets {
    fn label_index(&self, node: NodeId, offset: Option<usize>, len: usize) -> Option<usize> {
        let value = self.graph.try_get_label(node, offset?)?;
        let index = usize::try_from(value).ok()?;
        (index < len).then_some(index)
    }

    /// Index into [`points`](Self::points) of the vertex at the tail of `node`.
    pub fn vertex_index(&self, node: NodeId) -> Option<usize> {
        self.label_index(node, self.vertex_label, self.points.len())
    }

    /// Index into [`normals`](Self::normals) for the corner at `node`.
    pub fn normal_index(&self, node: NodeId) -> Option<usize> {
        match self.normal_mode {
            NormalMode::NormalPerVertex => self
                .vertex_index(node)
                .filter(|&i| i < self.normals.len()),
            NormalMode::SeparateNormals => {
                self.label_index(node, self.normal_label, self.normals.len())
            }
            NormalMode::None | NormalMode::VertexOnly => None,
        }
    }

    pub fn node_coordinates(&self, node: NodeId) -> Option<Point3> {
        self.vertex_index(node).map(|i| self.points[i])
    }

    pub fn node_normal(&self, node: NodeId) -> Option<Point3> {
        self.normal_index(node).map(|i| self.normals[i])
    }

    /// Clears `buffer` and fills it with the coordinates around the face of
    /// `seed`. Returns the number of points written.
    ///
    /// On error `buffer` holds the points gathered before the failing node.
    pub fn face_coordinates_into(
        &self,
        seed: NodeId,
        buffer: &mut Vec<Point3>,
    ) -> Result<usize, MtgError> {
        self.graph.check_active(seed)?;
        buffer.clear();
        for node in self.graph.face_loop(seed) {
            let point = self.node_coordinates(node).ok_or(MtgError::MissingLabel {
                node,
                offset: self.vertex_label.unwrap_or(usize::MAX),
            })?;
            buffer.push(point);
        }
        Ok(buffer.len())
    }

    /// Vertex indices around the face of `seed`, or `None` if any node
    /// lacks one.
    pub fn face_vertex_indices(&self, seed: NodeId) -> Option<Vec<usize>> {
        if !self.graph.is_active(seed) {
            return None;
        }
        self.graph
            .face_loop(seed)
            .map(|n| self.vertex_index(n))
            .collect()
    }

    /// Unit normal of the triangle whose face loop contains `seed`. `None`
    /// unless the face has exactly three nodes with coordinates and
    /// positive area.
    pub fn triangle_normal(&self, seed: NodeId) -> Option<Point3> {
        if !self.graph.is_active(seed) {
            return None;
        }
        let mut walk = self.graph.face_loop(seed);
        let a = self.node_coordinates(walk.next()?)?;
        let b = self.node_coordinates(walk.next()?)?;
        let c = self.node_coordinates(walk.next()?)?;
        if walk.next().is_some() {
            return None;
        }
        vec3::triangle_normal(a, b, c)
    }

    /// Unnormalized Newell normal of the face of `seed` (length is twice
    /// the area), or `None` if a node lacks coordinates.
    pub fn face_normal(&self, seed: NodeId) -> Option<Point3> {
        if !self.graph.is_active(seed) {
            return None;
        }
        let points: Option<Vec<Point3>> = self
            .graph
            .face_loop(seed)
            .map(|n| self.node_coordinates(n))
            .collect();
        Some(vec3::newell_normal(points?))
    }

    /// Bounding box of every stored point.
    pub fn coordinate_range(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::mask::Mask;

    fn triangle_facets() -> (MtgFacets, NodeId) {
        let mut f = MtgFacets::new();
        f.set_normal_mode(NormalMode::NormalPerVertex, 3, 3).unwrap();
        let pts = [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]];
        let normals = [[0.0, 0.0, 1.0]; 3];
        let start = f.add_coordinate_face(&pts, Some(&normals), None).unwrap();
        (f, start)
    }

    #[test]
    fn lookups_through_labels() {
        let (f, start) = triangle_facets();
        assert_eq!(f.vertex_index(start), Some(0));
        assert_eq!(f.node_coordinates(start), Some([0.0, 0.0, 0.0]));
        assert_eq!(f.node_normal(start), Some([0.0, 0.0, 1.0]));
        assert_eq!(f.normal_index(f.graph().fsucc(start)), Some(1));
        assert_eq!(f.triangle_normal(start), Some([0.0, 0.0, 1.0]));
        assert_eq!(f.face_normal(start), Some([0.0, 0.0, 4.0]));
        let back = f.graph().edge_mate(start);
        assert!(f.graph().get_mask(back, Mask::EXTERIOR));
        assert_eq!(f.triangle_normal(back), Some([0.0, 0.0, -1.0]));
    }

    #[test]
    fn buffer_fill() {
        let (f, start) = triangle_facets();
        let mut buf = vec![[9.0; 3]; 7];
        assert_eq!(f.face_coordinates_into(start, &mut buf), Ok(3));
        assert_eq!(buf[1], [2.0, 0.0, 0.0]);
        assert_eq!(
            f.face_coordinates_into(NodeId::new(1000), &mut buf),
            Err(MtgError::InvalidNode(NodeId::new(1000)))
        );
    }

    #[test]
    fn missing_labels_fail_softly() {
        let mut f = MtgFacets::new();
        let (a, _) = f.graph_mut().create_edge().unwrap();
        assert_eq!(f.vertex_index(a), None);
        assert_eq!(f.node_coordinates(a), None);
        assert_eq!(f.node_normal(a), None);
        assert_eq!(f.triangle_normal(a), None);
        assert_eq!(f.face_vertex_indices(a), None);
        assert_eq!(f.face_vertex_indices(NodeId::new(50)), None);
        assert!(matches!(
            f.face_coordinates_into(a, &mut Vec::new()),
            Err(MtgError::MissingLabel { .. })
        ));
        assert!(f.coordinate_range().is_none());
    }

    #[test]
    fn out_of_range_label_value() {
        let (mut f, start) = triangle_facets();
        let offset = f.vertex_label_offset().unwrap();
        f.graph_mut().try_set_label(start, offset, 17).unwrap();
        assert_eq!(f.vertex_index(start), None);
        f.graph_mut().try_set_label(start, offset, -3).unwrap();
        assert_eq!(f.node_coordinates(start), None);
        let range = f.coordinate_range().unwrap();
        assert_eq!(range.max_extent(), 2.0);
    }
}
