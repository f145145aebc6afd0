//! Face deletion.

use hew_topology::EditMesh;

/// Deletes every selected face. Returns the number of faces removed.
pub fn delete_selected_faces(mesh: &mut EditMesh) -> usize {
    let faces = mesh.selected_faces();
    if faces.is_empty() {
        tracing::warn!("delete rejected: no faces selected");
        return 0;
    }
    delete_faces(mesh, &faces)
}

/// Deletes the given faces and compacts the mesh.
///
/// Vertices and half-edges no longer referenced by a remaining face are
/// dropped; all indices held by the caller are invalidated.
pub fn delete_faces(mesh: &mut EditMesh, faces: &[u32]) -> usize {
    let mut removed = 0;
    for &face in faces {
        if face < mesh.face_count() as u32 && mesh.face(face).vertex_count >= 3 {
            mesh.remove_face(face);
            removed += 1;
        }
    }
    if removed > 0 {
        mesh.rebuild_from_faces();
        tracing::debug!(faces = removed, "deleted faces");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use hew_math::vec3;
    use hew_topology::{Vertex, NONE};

    #[test]
    fn test_delete_selected_leaves_open_boundary() {
        let mut mesh = hew_mesh::cube(2.0).unwrap();
        mesh.select_face(1, false);

        assert_eq!(delete_selected_faces(&mut mesh), 1);
        assert_eq!(mesh.face_count(), 5);
        assert_eq!(mesh.vertex_count(), 8);
        assert!(mesh.is_valid());
        let open = mesh
            .half_edges_data()
            .iter()
            .filter(|he| he.twin == NONE)
            .count();
        assert_eq!(open, 4);
    }

    #[test]
    fn test_delete_drops_orphaned_vertices() {
        let mut mesh = EditMesh::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            mesh.add_vertex(Vertex::at(vec3(x, y, 0.0)));
        }
        for (x, y) in [(3.0, 0.0), (4.0, 0.0), (4.0, 1.0), (3.0, 1.0)] {
            mesh.add_vertex(Vertex::at(vec3(x, y, 0.0)));
        }
        mesh.add_face(&[0, 1, 2, 3]).unwrap();
        mesh.add_face(&[4, 5, 6, 7]).unwrap();

        assert_eq!(delete_faces(&mut mesh, &[0]), 1);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.vertices_data().iter().all(|v| v.position.x >= 3.0));
    }

    #[test]
    fn test_delete_empty_selection_is_noop() {
        let mut mesh = hew_mesh::cube(1.0).unwrap();
        assert_eq!(delete_selected_faces(&mut mesh), 0);
        assert_eq!(mesh.face_count(), 6);
    }
}
