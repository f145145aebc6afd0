//! Shell hollowing.
//!
//! Duplicates the surface inward along the vertex normals, reverses the
//! duplicate so it faces the inside, and stitches the two shells together
//! with quads along every open boundary. A closed shell gains a detached
//! interior wall; an open sheet becomes a thin solid slab.

use hew_topology::{EditMesh, NONE};

/// Hollows the mesh with the given wall `thickness`. Returns the number of
/// faces added.
pub fn hollow(mesh: &mut EditMesh, thickness: f32) -> usize {
    if thickness <= 0.0 {
        tracing::warn!(thickness, "hollow rejected: non-positive thickness");
        return 0;
    }
    if mesh.is_empty() {
        tracing::warn!("hollow rejected: empty mesh");
        return 0;
    }

    let outer_vertices = mesh.vertex_count() as u32;
    let outer_faces = mesh.face_count() as u32;
    let rims: Vec<(u32, u32)> = (0..mesh.half_edge_count() as u32)
        .filter(|&h| mesh.half_edge(h).twin == NONE)
        .map(|h| mesh.edge_vertices(h))
        .collect();

    // Inner shell: offset copies with reversed rings.
    for v in 0..outer_vertices {
        let mut dup = *mesh.vertex(v);
        dup.position -= dup.normal * thickness;
        dup.normal = -dup.normal;
        dup.outgoing = NONE;
        dup.selected = false;
        mesh.add_vertex(dup);
    }
    let mut added = 0;
    for face in 0..outer_faces {
        let mut ring: Vec<u32> = mesh
            .face_vertices(face)
            .into_iter()
            .map(|v| v + outer_vertices)
            .collect();
        ring.reverse();
        if mesh.add_face(&ring).is_ok() {
            added += 1;
        }
    }
    for (from, to) in rims {
        if mesh
            .add_face(&[to, from, from + outer_vertices, to + outer_vertices])
            .is_ok()
        {
            added += 1;
        }
    }

    mesh.recalculate_normals();
    tracing::debug!(faces = added, "hollowed shell");
    added
}
