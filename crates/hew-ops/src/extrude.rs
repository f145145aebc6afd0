//! Face extrusion.
//!
//! Each face is pushed out along its own normal: the ring vertices are
//! duplicated and offset, the duplicate ring becomes the new cap, and a
//! skirt of quads reconnects the cap to the surrounding surface. Faces are
//! extruded independently, so a shared edge between two extruded faces gets
//! two skirt quads back to back.

use hew_topology::{EditMesh, NONE};

/// Extrudes every selected face by `distance` along its normal.
///
/// The cap face inherits the selection, so repeated calls with
/// `distance / n` build a segmented extrusion. Returns the number of faces
/// extruded.
pub fn extrude_selected_faces(mesh: &mut EditMesh, distance: f32) -> usize {
    let faces = mesh.selected_faces();
    if faces.is_empty() {
        tracing::warn!("extrude rejected: no faces selected");
        return 0;
    }
    extrude_faces(mesh, &faces, distance)
}

/// Extrudes the given faces by `distance` along their normals.
pub fn extrude_faces(mesh: &mut EditMesh, faces: &[u32], distance: f32) -> usize {
    let mut extruded = 0;
    for &face in faces {
        if face >= mesh.face_count() as u32 {
            continue;
        }
        let ring = mesh.face_vertices(face);
        if ring.len() < 3 {
            continue;
        }
        let offset = mesh.face_normal(face) * distance;
        let selected = mesh.face(face).selected;

        let cap: Vec<u32> = ring
            .iter()
            .map(|&v| {
                let mut dup = *mesh.vertex(v);
                dup.position += offset;
                dup.outgoing = NONE;
                dup.selected = false;
                mesh.add_vertex(dup)
            })
            .collect();

        mesh.remove_face(face);
        if let Ok(cap_face) = mesh.add_face(&cap) {
            mesh.face_mut(cap_face).selected = selected;
        }
        for i in 0..ring.len() {
            let j = (i + 1) % ring.len();
            mesh.add_face(&[ring[i], ring[j], cap[j], cap[i]]).ok();
        }
        extruded += 1;
    }
    if extruded > 0 {
        mesh.rebuild_from_faces();
        mesh.recalculate_normals();
        tracing::debug!(faces = extruded, "extruded faces");
    }
    extruded
}
