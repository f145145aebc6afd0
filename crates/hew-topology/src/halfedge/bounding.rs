use hew_core::traits::BoundingBox;
use hew_math::Point3;

use super::mesh::EditMesh;

impl BoundingBox for EditMesh {
    type Point = Point3;

    fn bounding_box(&self) -> (Point3, Point3) {
        if self.vertices.is_empty() {
            return (Point3::ZERO, Point3::ZERO);
        }

        let mut min = Point3::splat(f32::INFINITY);
        let mut max = Point3::splat(f32::NEG_INFINITY);

        for vertex in &self.vertices {
            min = min.min(vertex.position);
            max = max.max(vertex.position);
        }

        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::halfedge::types::Vertex;
    use hew_math::vec3;

    #[test]
    fn test_bounding_box_spans_vertices() {
        let mut mesh = EditMesh::new();
        mesh.add_vertex(Vertex::at(vec3(-2.0, 0.5, 1.0)));
        mesh.add_vertex(Vertex::at(vec3(3.0, -1.0, 0.0)));
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, vec3(-2.0, -1.0, 0.0));
        assert_eq!(max, vec3(3.0, 0.5, 1.0));
    }

    #[test]
    fn test_empty_mesh_bounding_box() {
        let mesh = EditMesh::new();
        assert_eq!(mesh.bounding_box(), (Point3::ZERO, Point3::ZERO));
    }
}
