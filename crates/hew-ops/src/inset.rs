//! Face inset.
//!
//! Shrinks each face toward its centroid and fills the gap with a ring of
//! trim quads. The inner face inherits the selection, which makes the usual
//! inset-then-extrude workflow a pair of operator calls.

use hew_math::Point2;
use hew_topology::{EditMesh, NONE};

/// Insets every selected face by `factor`, the fraction of the way from the
/// boundary to the centroid (0 = no movement, 1 = collapse to a point; only
/// values strictly between are accepted). Returns the number of faces inset.
pub fn inset_selected_faces(mesh: &mut EditMesh, factor: f32) -> usize {
    if !(factor > 0.0 && factor < 1.0) {
        tracing::warn!(factor, "inset rejected: factor outside (0, 1)");
        return 0;
    }
    let faces = mesh.selected_faces();
    if faces.is_empty() {
        tracing::warn!("inset rejected: no faces selected");
        return 0;
    }

    let mut inset = 0;
    for &face in &faces {
        let ring = mesh.face_vertices(face);
        if ring.len() < 3 {
            continue;
        }
        let center = mesh.face_center(face);
        let uv_center = ring
            .iter()
            .fold(Point2::ZERO, |acc, &v| acc + mesh.vertex(v).uv)
            / ring.len() as f32;
        let selected = mesh.face(face).selected;

        let inner: Vec<u32> = ring
            .iter()
            .map(|&v| {
                let mut dup = *mesh.vertex(v);
                dup.position = dup.position.lerp(center, factor);
                dup.uv = dup.uv.lerp(uv_center, factor);
                dup.outgoing = NONE;
                dup.selected = false;
                mesh.add_vertex(dup)
            })
            .collect();

        mesh.remove_face(face);
        if let Ok(inner_face) = mesh.add_face(&inner) {
            mesh.face_mut(inner_face).selected = selected;
        }
        for i in 0..ring.len() {
            let j = (i + 1) % ring.len();
            mesh.add_face(&[ring[i], ring[j], inner[j], inner[i]]).ok();
        }
        inset += 1;
    }
    if inset > 0 {
        mesh.rebuild_from_faces();
        mesh.recalculate_normals();
        tracing::debug!(faces = inset, "inset faces");
    }
    inset
}
