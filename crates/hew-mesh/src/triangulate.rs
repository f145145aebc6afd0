use std::collections::BTreeSet;

use hew_topology::EditMesh;

use crate::buffer::TriangleBuffer;

/// Converts the mesh into a triangle buffer by fan triangulation.
pub fn triangulate(mesh: &EditMesh) -> TriangleBuffer {
    triangulate_skipping(mesh, &BTreeSet::new())
}

/// Converts the mesh into a triangle buffer, leaving out faces in `hidden`.
///
/// Every face emits private copies of its ring vertices and fans out from
/// the first ring vertex, so triangle order matches the `triangle_index`
/// reported by face raycasts with the same hidden set.
pub fn triangulate_skipping(mesh: &EditMesh, hidden: &BTreeSet<u32>) -> TriangleBuffer {
    let mut buffer = TriangleBuffer::default();
    for face in 0..mesh.face_count() as u32 {
        if hidden.contains(&face) {
            continue;
        }
        let ring = mesh.face_vertices(face);
        if ring.len() < 3 {
            continue;
        }
        let base = buffer.positions.len() as u32;
        for &v in &ring {
            let vertex = mesh.vertex(v);
            buffer.positions.push(vertex.position);
            buffer.normals.push(vertex.normal);
            buffer.uvs.push(vertex.uv);
            buffer.colors.push(vertex.color);
        }
        for i in 1..ring.len() as u32 - 1 {
            buffer.indices.extend_from_slice(&[base, base + i, base + i + 1]);
        }
    }
    buffer
}
