//! Edge bridging.
//!
//! Connects two edges with a ladder of quads. Endpoints are paired by
//! whichever assignment gives the shorter total rail length, which keeps the
//! bridge from twisting when the edges wind in opposite directions.

use hew_topology::{EditMesh, Vertex};

/// Bridges the two selected edges with `segments` rows of quads.
pub fn bridge_selected_edges(mesh: &mut EditMesh, segments: u32) -> bool {
    let selected = mesh.selected_edges();
    if selected.len() != 2 {
        tracing::warn!(
            count = selected.len(),
            "bridge rejected: need exactly 2 selected edges"
        );
        return false;
    }
    bridge_edges(mesh, selected[0], selected[1], segments)
}

/// Builds `segments` rows of quads between `edge_a` and `edge_b`.
pub fn bridge_edges(mesh: &mut EditMesh, edge_a: u32, edge_b: u32, segments: u32) -> bool {
    if segments == 0 {
        tracing::warn!("bridge rejected: zero segments");
        return false;
    }
    let count = mesh.half_edge_count() as u32;
    if edge_a >= count || edge_b >= count || edge_a == edge_b {
        tracing::warn!(edge_a, edge_b, "bridge rejected: bad edge pair");
        return false;
    }

    let (a0, a1) = mesh.edge_vertices(edge_a);
    let (b0, b1) = mesh.edge_vertices(edge_b);
    let pa0 = mesh.vertex(a0).position;
    let pa1 = mesh.vertex(a1).position;
    let pb0 = mesh.vertex(b0).position;
    let pb1 = mesh.vertex(b1).position;

    let straight = pa0.distance(pb0) + pa1.distance(pb1);
    let crossed = pa0.distance(pb1) + pa1.distance(pb0);
    let (u_end, w_end) = if straight <= crossed { (b0, b1) } else { (b1, b0) };

    let u_rail = rail(mesh, a0, u_end, segments);
    let w_rail = rail(mesh, a1, w_end, segments);
    for k in 0..segments as usize {
        mesh.add_face(&[w_rail[k], u_rail[k], u_rail[k + 1], w_rail[k + 1]])
            .ok();
    }

    mesh.rebuild_from_faces();
    mesh.recalculate_normals();
    tracing::debug!(segments, "bridged edges");
    true
}

/// Vertex chain from `start` to `end` with `segments - 1` interpolated
/// vertices between them.
fn rail(mesh: &mut EditMesh, start: u32, end: u32, segments: u32) -> Vec<u32> {
    let a = *mesh.vertex(start);
    let b = *mesh.vertex(end);
    let mut chain = Vec::with_capacity(segments as usize + 1);
    chain.push(start);
    for k in 1..segments {
        let t = k as f32 / segments as f32;
        chain.push(mesh.add_vertex(Vertex::lerp(&a, &b, t)));
    }
    chain.push(end);
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use hew_math::vec3;

    /// Two unit quads in the z = 0 plane with a one unit gap between them.
    fn facing_quads() -> EditMesh {
        let mut mesh = EditMesh::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            mesh.add_vertex(Vertex::at(vec3(x, y, 0.0)));
        }
        for (x, y) in [(2.0, 0.0), (3.0, 0.0), (3.0, 1.0), (2.0, 1.0)] {
            mesh.add_vertex(Vertex::at(vec3(x, y, 0.0)));
        }
        mesh.add_face(&[0, 1, 2, 3]).unwrap();
        mesh.add_face(&[4, 5, 6, 7]).unwrap();
        mesh
    }

    #[test]
    fn test_bridge_joins_facing_edges() {
        let mut mesh = facing_quads();
        let edge_a = mesh.find_half_edge(1, 2).unwrap();
        let edge_b = mesh.find_half_edge(7, 4).unwrap();

        assert!(bridge_edges(&mut mesh, edge_a, edge_b, 1));
        assert_eq!(mesh.face_count(), 3);
        assert_eq!(mesh.vertex_count(), 8);
        assert!(mesh.is_valid());

        // The new quad is twinned into both source faces.
        assert_eq!(mesh.face_neighbors(2), vec![0, 1]);
    }

    #[test]
    fn test_bridge_three_segments() {
        let mut mesh = facing_quads();
        let edge_a = mesh.find_half_edge(1, 2).unwrap();
        let edge_b = mesh.find_half_edge(7, 4).unwrap();

        assert!(bridge_edges(&mut mesh, edge_a, edge_b, 3));
        assert_eq!(mesh.face_count(), 5);
        assert_eq!(mesh.vertex_count(), 12);
        assert!(mesh.is_valid());

        let rail_x: Vec<f32> = mesh
            .vertices_data()
            .iter()
            .skip(8)
            .map(|v| v.position.x)
            .collect();
        for x in rail_x {
            assert!((x - 4.0 / 3.0).abs() < 1e-5 || (x - 5.0 / 3.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_bridge_picks_untwisted_pairing() {
        let mut mesh = facing_quads();
        let edge_a = mesh.find_half_edge(1, 2).unwrap();
        let edge_b = mesh.find_half_edge(7, 4).unwrap();
        bridge_edges(&mut mesh, edge_a, edge_b, 1);

        // Rails connect 1-4 and 2-7, never the crossing 1-7 / 2-4 pairs.
        assert!(mesh.find_half_edge(1, 4).is_some());
        assert!(mesh.find_half_edge(1, 7).is_none());
        assert!(mesh.find_half_edge(7, 1).is_none());
    }

    #[test]
    fn test_bridge_selected_requires_two_edges() {
        let mut mesh = facing_quads();
        let edge = mesh.find_half_edge(1, 2).unwrap();
        mesh.select_edge(edge, false);

        assert!(!bridge_selected_edges(&mut mesh, 1));
        assert_eq!(mesh.face_count(), 2);
    }
}
