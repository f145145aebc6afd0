//! Selection transforms.
//!
//! These act on the vertex set implied by the current selection: selected
//! vertices, plus the endpoints of selected edges and the rings of selected
//! faces. Positions move, topology is untouched. Each returns the number of
//! vertices affected.

use hew_math::{EulerRot, Plane, Quat, Vec3};
use hew_topology::EditMesh;

/// Moves the selected vertices by `offset`.
pub fn translate_selected_vertices(mesh: &mut EditMesh, offset: Vec3) -> usize {
    let selection = mesh.selection_vertices();
    if selection.is_empty() {
        tracing::warn!("translate rejected: nothing selected");
        return 0;
    }
    for &v in &selection {
        mesh.vertex_mut(v).position += offset;
    }
    tracing::debug!(vertices = selection.len(), "translated selection");
    selection.len()
}

/// Scales the selected vertices about `pivot`, per axis.
pub fn scale_selected_vertices(mesh: &mut EditMesh, pivot: Vec3, scale: Vec3) -> usize {
    let selection = mesh.selection_vertices();
    if selection.is_empty() {
        tracing::warn!("scale rejected: nothing selected");
        return 0;
    }
    for &v in &selection {
        let vertex = mesh.vertex_mut(v);
        vertex.position = pivot + (vertex.position - pivot) * scale;
    }
    mesh.recalculate_normals();
    tracing::debug!(vertices = selection.len(), "scaled selection");
    selection.len()
}

/// Rotates the selected vertices about `pivot` by Euler angles in degrees,
/// applied X then Y then Z. Normals rotate with the positions.
pub fn rotate_selected_vertices(mesh: &mut EditMesh, pivot: Vec3, degrees: Vec3) -> usize {
    let selection = mesh.selection_vertices();
    if selection.is_empty() {
        tracing::warn!("rotate rejected: nothing selected");
        return 0;
    }
    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    );
    for &v in &selection {
        let vertex = mesh.vertex_mut(v);
        vertex.position = pivot + rotation * (vertex.position - pivot);
        vertex.normal = rotation * vertex.normal;
    }
    tracing::debug!(vertices = selection.len(), "rotated selection");
    selection.len()
}

/// Projects the selected vertices onto their best-fit plane.
///
/// Needs at least three selected vertices that are not collinear; otherwise
/// no plane is defined and nothing moves.
pub fn make_coplanar(mesh: &mut EditMesh) -> usize {
    let selection = mesh.selection_vertices();
    let points: Vec<Vec3> = selection.iter().map(|&v| mesh.vertex(v).position).collect();
    let Some(plane) = Plane::best_fit(&points) else {
        tracing::warn!("make coplanar rejected: selection has no well-defined plane");
        return 0;
    };
    for &v in &selection {
        let vertex = mesh.vertex_mut(v);
        vertex.position = plane.project_point(vertex.position);
    }
    mesh.recalculate_normals();
    tracing::debug!(vertices = selection.len(), "projected selection onto best-fit plane");
    selection.len()
}

/// Snaps the selected vertices' X coordinates to their average.
pub fn flatten_x(mesh: &mut EditMesh) -> usize {
    flatten_axis(mesh, 0)
}

/// Snaps the selected vertices' Y coordinates to their average.
pub fn flatten_y(mesh: &mut EditMesh) -> usize {
    flatten_axis(mesh, 1)
}

/// Snaps the selected vertices' Z coordinates to their average.
pub fn flatten_z(mesh: &mut EditMesh) -> usize {
    flatten_axis(mesh, 2)
}

fn flatten_axis(mesh: &mut EditMesh, axis: usize) -> usize {
    let selection = mesh.selection_vertices();
    if selection.is_empty() {
        tracing::warn!("flatten rejected: nothing selected");
        return 0;
    }
    let sum: f32 = selection
        .iter()
        .map(|&v| mesh.vertex(v).position[axis])
        .sum();
    let level = sum / selection.len() as f32;
    for &v in &selection {
        mesh.vertex_mut(v).position[axis] = level;
    }
    mesh.recalculate_normals();
    tracing::debug!(vertices = selection.len(), axis, "flattened selection");
    selection.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hew_math::vec3;
    use hew_topology::Vertex;

    fn unit_quad() -> EditMesh {
        let mut mesh = EditMesh::new();
        mesh.add_vertex(Vertex::at(vec3(0.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(vec3(1.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(vec3(1.0, 1.0, 0.0)));
        mesh.add_vertex(Vertex::at(vec3(0.0, 1.0, 0.0)));
        mesh.add_face(&[0, 1, 2, 3]).unwrap();
        mesh
    }

    #[test]
    fn test_translate_moves_only_selection() {
        let mut mesh = unit_quad();
        mesh.select_vertex(0, false);
        mesh.select_vertex(1, true);

        assert_eq!(translate_selected_vertices(&mut mesh, vec3(0.0, 0.0, 2.0)), 2);
        assert_relative_eq!(mesh.vertex(0).position.z, 2.0);
        assert_relative_eq!(mesh.vertex(1).position.z, 2.0);
        assert_relative_eq!(mesh.vertex(2).position.z, 0.0);
    }

    #[test]
    fn test_translate_selected_edge_moves_endpoints() {
        let mut mesh = unit_quad();
        let edge = mesh.find_half_edge(0, 1).unwrap();
        mesh.select_edge(edge, false);

        assert_eq!(translate_selected_vertices(&mut mesh, vec3(0.0, 0.0, 1.0)), 2);
        assert_relative_eq!(mesh.vertex(0).position.z, 1.0);
        assert_relative_eq!(mesh.vertex(1).position.z, 1.0);
        assert_relative_eq!(mesh.vertex(2).position.z, 0.0);
    }

    #[test]
    fn test_rotate_spins_positions_and_normals() {
        let mut mesh = unit_quad();
        mesh.recalculate_normals();
        mesh.select_face(0, false);

        let moved = rotate_selected_vertices(&mut mesh, Vec3::ZERO, vec3(90.0, 0.0, 0.0));
        assert_eq!(moved, 4);
        // (0, 1, 0) swings up to (0, 0, 1); the +Z normal swings to -Y.
        assert_relative_eq!(mesh.vertex(3).position.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(mesh.vertex(3).position.z, 1.0, epsilon = 1e-6);
        assert_relative_eq!(mesh.vertex(0).normal.y, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_scale_about_pivot() {
        let mut mesh = unit_quad();
        mesh.select_face(0, false);

        assert_eq!(
            scale_selected_vertices(&mut mesh, Vec3::ZERO, vec3(2.0, 1.0, 1.0)),
            4
        );
        assert_relative_eq!(mesh.vertex(1).position.x, 2.0);
        assert_relative_eq!(mesh.vertex(1).position.y, 0.0);
    }

    #[test]
    fn test_make_coplanar_flattens_selection() {
        let mut mesh = unit_quad();
        mesh.vertex_mut(2).position.z = 0.4;
        mesh.select_face(0, false);

        assert_eq!(make_coplanar(&mut mesh), 4);
        let points: Vec<Vec3> = (0..4).map(|v| mesh.vertex(v).position).collect();
        let plane = Plane::best_fit(&points).unwrap();
        for p in points {
            assert!(plane.signed_distance(p).abs() < 1e-5);
        }
    }

    #[test]
    fn test_flatten_y_snaps_to_average() {
        let mut mesh = unit_quad();
        mesh.select_vertex(0, false);
        mesh.select_vertex(3, true);

        assert_eq!(flatten_y(&mut mesh), 2);
        assert_relative_eq!(mesh.vertex(0).position.y, 0.5);
        assert_relative_eq!(mesh.vertex(3).position.y, 0.5);
        assert_relative_eq!(mesh.vertex(1).position.y, 0.0);
    }

    #[test]
    fn test_transform_empty_selection_is_noop() {
        let mut mesh = unit_quad();
        assert_eq!(translate_selected_vertices(&mut mesh, vec3(1.0, 0.0, 0.0)), 0);
        assert_eq!(flatten_x(&mut mesh), 0);
        assert_eq!(make_coplanar(&mut mesh), 0);
        assert_relative_eq!(mesh.vertex(1).position.x, 1.0);
    }
}
