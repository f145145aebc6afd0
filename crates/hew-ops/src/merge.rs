//! Vertex merging.
//!
//! Collapses a set of vertices into one survivor at their centroid. Every
//! half-edge that referenced a merged vertex is redirected to the survivor;
//! rings that collapse below three distinct vertices are dropped during the
//! rebuild.

use std::collections::BTreeSet;

use hew_math::Point3;
use hew_topology::EditMesh;

/// Merges every selected vertex into one. Returns the number of vertices
/// removed (`selected - 1`), or 0 when fewer than two are selected.
pub fn merge_selected_vertices(mesh: &mut EditMesh) -> usize {
    let selected = mesh.selected_vertices();
    merge_vertices(mesh, &selected)
}

/// Merges the given vertices into the first of them.
pub fn merge_vertices(mesh: &mut EditMesh, vertices: &[u32]) -> usize {
    let set: BTreeSet<u32> = vertices
        .iter()
        .copied()
        .filter(|&v| v < mesh.vertex_count() as u32)
        .collect();
    if set.len() < 2 {
        tracing::warn!(count = set.len(), "merge rejected: need at least 2 vertices");
        return 0;
    }

    let centroid = set
        .iter()
        .fold(Point3::ZERO, |acc, &v| acc + mesh.vertex(v).position)
        / set.len() as f32;
    let survivor = *set.iter().next().unwrap_or(&0);
    mesh.vertex_mut(survivor).position = centroid;

    for half_edge in &mut mesh.half_edges {
        if set.contains(&half_edge.origin) {
            half_edge.origin = survivor;
        }
    }
    mesh.rebuild_from_faces();
    mesh.recalculate_normals();

    let removed = set.len() - 1;
    tracing::debug!(vertices = removed, "merged vertices");
    removed
}
