//! Normal flipping.
//!
//! Reverses the winding of each selected face and negates the normals of
//! the vertices it touches. A flipped face no longer winds opposite to an
//! unflipped neighbor, so the shared edge loses its twin link and becomes a
//! boundary — flip both faces to keep the link.

use std::collections::BTreeSet;

use hew_topology::EditMesh;

/// Flips every selected face. Returns the number of faces flipped.
pub fn flip_selected_normals(mesh: &mut EditMesh) -> usize {
    let faces = mesh.selected_faces();
    if faces.is_empty() {
        tracing::warn!("flip rejected: no faces selected");
        return 0;
    }

    let mut rings = Vec::with_capacity(faces.len());
    let mut touched = BTreeSet::new();
    for &face in &faces {
        let mut ring = mesh.face_vertices(face);
        if ring.len() < 3 {
            continue;
        }
        touched.extend(ring.iter().copied());
        ring.reverse();
        rings.push((face, ring, mesh.face(face).selected));
    }
    if rings.is_empty() {
        return 0;
    }

    // Negate before the rebuild remaps vertex indices.
    for &v in &touched {
        let vertex = mesh.vertex_mut(v);
        vertex.normal = -vertex.normal;
    }
    let flipped = rings.len();
    for (face, ring, selected) in rings {
        mesh.remove_face(face);
        if let Ok(new_face) = mesh.add_face(&ring) {
            mesh.face_mut(new_face).selected = selected;
        }
    }
    mesh.rebuild_from_faces();
    tracing::debug!(faces = flipped, "flipped face windings");
    flipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use hew_math::{vec3, Vec3};
    use hew_topology::Vertex;

    fn quad_strip() -> EditMesh {
        let mut mesh = EditMesh::new();
        for (x, y) in [
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (2.0, 1.0),
        ] {
            mesh.add_vertex(Vertex::at(vec3(x, y, 0.0)));
        }
        mesh.add_face(&[0, 1, 4, 3]).unwrap();
        mesh.add_face(&[1, 2, 5, 4]).unwrap();
        mesh
    }

    #[test]
    fn test_flip_reverses_face_normal() {
        let mut mesh = quad_strip();
        mesh.select_face(0, false);
        mesh.select_face(1, true);

        assert_eq!(flip_selected_normals(&mut mesh), 2);
        assert!(mesh.is_valid());
        assert!(mesh.face_normal(0).dot(Vec3::Z) < -0.99);
        assert!(mesh.face_normal(1).dot(Vec3::Z) < -0.99);
        // Vertex normals are negated, not recomputed.
        assert!(mesh.vertex(0).normal.dot(Vec3::Z) < 0.0);
    }

    #[test]
    fn test_flipping_both_neighbors_keeps_the_twin_link() {
        let mut mesh = quad_strip();
        mesh.select_face(0, false);
        mesh.select_face(1, true);
        flip_selected_normals(&mut mesh);

        assert_eq!(mesh.face_neighbors(0), vec![1]);
    }

    #[test]
    fn test_flipping_one_neighbor_opens_the_shared_edge() {
        let mut mesh = quad_strip();
        mesh.select_face(0, false);
        flip_selected_normals(&mut mesh);

        assert!(mesh.is_valid());
        assert!(mesh.face_neighbors(0).is_empty());
        assert!(mesh.face_neighbors(1).is_empty());
    }

    #[test]
    fn test_flip_empty_selection_is_noop() {
        let mut mesh = quad_strip();
        assert_eq!(flip_selected_normals(&mut mesh), 0);
    }
}
