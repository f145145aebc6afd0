//! UV assignment for the half-edge mesh: projections, seam handling, and
//! island packing.
//!
//! Every entry point works on the current face selection and falls back to
//! the whole mesh when nothing is selected. Projections that map
//! neighboring faces differently give those faces private vertex copies via
//! [`EditMesh::split_vertices_for_groups`], so the single `uv` attribute on
//! a vertex never has to serve two islands at once; the mesh stays
//! geometrically connected because the twin links survive the split.

pub mod islands;
pub mod pack;
pub mod project;

pub use islands::{sew_all_uvs, uv_islands};
pub use pack::{auto_pack_uv_islands, TextureImage};
pub use project::{
    project_box, project_by_normal_groups, project_cylindrical, project_from_view,
    project_per_face, project_uniform, smart_project,
};

use hew_topology::EditMesh;

/// The faces a UV operation applies to: the selected ones, or every live
/// face when the selection is empty.
pub fn target_faces(mesh: &EditMesh) -> Vec<u32> {
    let selected = mesh.selected_faces();
    if !selected.is_empty() {
        return selected;
    }
    (0..mesh.face_count() as u32)
        .filter(|&face| mesh.face(face).vertex_count >= 3)
        .collect()
}
