//! Box subtraction.
//!
//! Cuts an axis-aligned box out of the mesh surface: every face is scribed
//! against the six box planes, then the pieces whose centers fall strictly
//! inside the box are removed. The rim left around a removed region stays an
//! open boundary; no interior walls are synthesized.

use hew_core::traits::BoundingBox;
use hew_math::{Plane, Point3, Vec3};
use hew_topology::EditMesh;

use crate::slice::split_faces_in_place;

/// Subtracts the axis-aligned box `aabb_min..aabb_max` from the mesh and
/// returns the number of faces removed.
///
/// Faces lying exactly on a box wall survive the cut. Scribe lines from the
/// box planes persist even where nothing was removed.
pub fn boolean_cut(mesh: &mut EditMesh, aabb_min: Point3, aabb_max: Point3) -> usize {
    if !aabb_min.cmplt(aabb_max).all() {
        tracing::warn!("boolean cut rejected: degenerate box");
        return 0;
    }
    if mesh.face_count() == 0 {
        tracing::warn!("boolean cut rejected: empty mesh");
        return 0;
    }
    let (mesh_min, mesh_max) = mesh.bounding_box();
    if mesh_max.cmplt(aabb_min).any() || mesh_min.cmpgt(aabb_max).any() {
        tracing::warn!("boolean cut rejected: box does not intersect the mesh");
        return 0;
    }

    for plane in [
        Plane::new(aabb_min, Vec3::X),
        Plane::new(aabb_min, Vec3::Y),
        Plane::new(aabb_min, Vec3::Z),
        Plane::new(aabb_max, Vec3::X),
        Plane::new(aabb_max, Vec3::Y),
        Plane::new(aabb_max, Vec3::Z),
    ] {
        split_faces_in_place(mesh, &plane);
    }

    // Shrink the box by the linear tolerance so pieces sitting exactly on a
    // wall are kept.
    let pad = Vec3::splat(mesh.tolerance.linear);
    let lo = aabb_min + pad;
    let hi = aabb_max - pad;
    let mut removed = 0;
    for face in 0..mesh.face_count() as u32 {
        if mesh.face(face).vertex_count < 3 {
            continue;
        }
        let center = mesh.face_center(face);
        if center.cmpgt(lo).all() && center.cmplt(hi).all() {
            mesh.remove_face(face);
            removed += 1;
        }
    }
    if removed > 0 {
        mesh.rebuild_from_faces();
        mesh.link_twins_by_position();
        tracing::debug!(removed, faces = mesh.face_count(), "boolean cut");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use hew_math::vec3;
    use hew_topology::{Vertex, NONE};

    fn boundary_count(mesh: &EditMesh) -> usize {
        mesh.half_edges_data()
            .iter()
            .filter(|he| he.twin == NONE)
            .count()
    }

    fn wall() -> EditMesh {
        let mut mesh = EditMesh::new();
        mesh.add_vertex(Vertex::at(vec3(-2.0, -2.0, 0.0)));
        mesh.add_vertex(Vertex::at(vec3(2.0, -2.0, 0.0)));
        mesh.add_vertex(Vertex::at(vec3(2.0, 2.0, 0.0)));
        mesh.add_vertex(Vertex::at(vec3(-2.0, 2.0, 0.0)));
        mesh.add_face(&[0, 1, 2, 3]).unwrap();
        mesh
    }

    #[test]
    fn test_boolean_cut_punches_hole_in_wall() {
        let mut mesh = wall();
        let removed = boolean_cut(&mut mesh, vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));

        // The wall becomes a 3x3 grid with the middle piece gone.
        assert_eq!(removed, 1);
        assert_eq!(mesh.face_count(), 8);
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(boundary_count(&mesh), 16);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_boolean_cut_tunnels_through_cube() {
        let mut mesh = hew_mesh::cube(4.0).unwrap();
        let removed = boolean_cut(&mut mesh, vec3(-1.0, -1.0, -3.0), vec3(1.0, 1.0, 3.0));

        assert_eq!(removed, 2);
        assert_eq!(mesh.face_count(), 28);
        assert_eq!(mesh.vertex_count(), 32);
        // Two square hole rims, one per pierced wall.
        assert_eq!(boundary_count(&mesh), 8);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_boolean_cut_degenerate_box_is_noop() {
        let mut mesh = wall();
        let removed = boolean_cut(&mut mesh, vec3(1.0, 1.0, 1.0), vec3(1.0, 2.0, 2.0));
        assert_eq!(removed, 0);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_boolean_cut_outside_mesh_is_noop() {
        let mut mesh = wall();
        let removed = boolean_cut(&mut mesh, vec3(5.0, -1.0, -1.0), vec3(6.0, 1.0, 1.0));
        assert_eq!(removed, 0);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.vertex_count(), 4);
    }
}
