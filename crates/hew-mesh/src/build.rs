//! Building editable meshes from indexed vertex data.

use hew_core::error::{HewError, Result};
use hew_topology::{EditMesh, Vertex, NONE};

use crate::buffer::TriangleBuffer;

/// Builds an editable mesh from a triangle buffer.
///
/// Vertices are taken over as given, duplicates included; twin links are
/// made by shared index first, then by coincident position, so buffers
/// with per-face vertex copies (the output of triangulation, or a typical
/// render mesh) come back fully connected.
pub fn build_from_triangles(buffer: &TriangleBuffer) -> Result<EditMesh> {
    build_indexed(buffer, 3)
}

/// Builds an editable mesh from a buffer whose index list holds quads.
pub fn build_from_quads(buffer: &TriangleBuffer) -> Result<EditMesh> {
    build_indexed(buffer, 4)
}

fn build_indexed(buffer: &TriangleBuffer, ring_size: usize) -> Result<EditMesh> {
    if buffer.indices.len() % ring_size != 0 {
        return Err(HewError::InvalidData(format!(
            "index count {} is not a multiple of {ring_size}",
            buffer.indices.len()
        )));
    }
    let n = buffer.positions.len();
    for (name, len) in [
        ("normals", buffer.normals.len()),
        ("uvs", buffer.uvs.len()),
        ("colors", buffer.colors.len()),
    ] {
        if len != 0 && len != n {
            return Err(HewError::InvalidData(format!(
                "{name} has {len} entries for {n} positions"
            )));
        }
    }
    for &i in &buffer.indices {
        if i as usize >= n {
            return Err(HewError::InvalidData(format!(
                "index {i} out of range ({n} vertices)"
            )));
        }
    }

    let mut mesh = EditMesh::new();
    for i in 0..n {
        let mut vertex = Vertex::at(buffer.positions[i]);
        if let Some(&normal) = buffer.normals.get(i) {
            vertex.normal = normal;
        }
        if let Some(&uv) = buffer.uvs.get(i) {
            vertex.uv = uv;
        }
        if let Some(&color) = buffer.colors.get(i) {
            vertex.color = color;
        }
        mesh.add_vertex(vertex);
    }
    for ring in buffer.indices.chunks_exact(ring_size) {
        let mut distinct = ring.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        // Collapsed rings carry no surface.
        if distinct.len() < 3 {
            continue;
        }
        mesh.add_face(ring)?;
    }
    mesh.link_twins_by_position();
    Ok(mesh)
}

/// Joins coplanar triangle pairs into quads.
///
/// Two triangles merge when they share an edge and their unit normals
/// agree by at least `normal_threshold` (a dot product, 0.85 for roughly
/// 32 degrees). Each triangle joins at most one partner per pass. Returns
/// the number of quads formed.
pub fn merge_triangles_to_quads(mesh: &mut EditMesh, normal_threshold: f32) -> usize {
    let mut taken = vec![false; mesh.face_count()];
    let mut quads: Vec<[u32; 4]> = Vec::new();

    for he in 0..mesh.half_edge_count() as u32 {
        let twin = mesh.half_edge(he).twin;
        if twin == NONE || twin < he {
            continue;
        }
        let face_a = mesh.half_edge(he).face;
        let face_b = mesh.half_edge(twin).face;
        if face_a == face_b
            || taken[face_a as usize]
            || taken[face_b as usize]
            || mesh.face(face_a).vertex_count != 3
            || mesh.face(face_b).vertex_count != 3
        {
            continue;
        }
        if mesh.face_normal(face_a).dot(mesh.face_normal(face_b)) < normal_threshold {
            continue;
        }

        // Walk around the outside of the pair, dropping the shared edge.
        let far_a = mesh.half_edge(mesh.half_edge(he).prev).origin;
        let near = mesh.half_edge(he).origin;
        let far_b = mesh.half_edge(mesh.half_edge(twin).prev).origin;
        let head = mesh.half_edge(mesh.half_edge(he).next).origin;
        quads.push([far_a, near, far_b, head]);
        taken[face_a as usize] = true;
        taken[face_b as usize] = true;
    }

    if quads.is_empty() {
        return 0;
    }
    for (face, merged) in taken.iter().enumerate() {
        if *merged {
            mesh.remove_face(face as u32);
        }
    }
    let merged_count = quads.len();
    for ring in quads {
        mesh.add_face(&ring).ok();
    }
    mesh.rebuild_from_faces();
    mesh.link_twins_by_position();
    merged_count
}
