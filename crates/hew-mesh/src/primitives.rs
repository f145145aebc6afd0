//! Primitive shape builders.
//!
//! All primitives are centered on the origin, wound counter-clockwise seen
//! from outside, and finish with smooth recalculated normals. Dimension and
//! resolution arguments are validated up front.

use std::f32::consts::{PI, TAU};

use hew_core::error::{HewError, Result};
use hew_math::{vec2, vec3};
use hew_topology::{EditMesh, Vertex};

/// Axis-aligned cube with the given edge length.
pub fn cube(size: f32) -> Result<EditMesh> {
    cuboid(size, size, size)
}

/// Axis-aligned box: 8 vertices, 6 quad faces.
pub fn cuboid(width: f32, height: f32, depth: f32) -> Result<EditMesh> {
    if width <= 0.0 || height <= 0.0 || depth <= 0.0 {
        return Err(HewError::Geometry(format!(
            "cuboid dimensions must be positive, got {width} x {height} x {depth}"
        )));
    }
    let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);
    let mut mesh = EditMesh::new();
    for (x, y, z) in [
        (-hw, -hh, -hd),
        (hw, -hh, -hd),
        (hw, hh, -hd),
        (-hw, hh, -hd),
        (-hw, -hh, hd),
        (hw, -hh, hd),
        (hw, hh, hd),
        (-hw, hh, hd),
    ] {
        mesh.add_vertex(Vertex::at(vec3(x, y, z)));
    }
    for ring in [
        [0, 3, 2, 1],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [1, 2, 6, 5],
        [2, 3, 7, 6],
        [3, 0, 4, 7],
    ] {
        mesh.add_face(&ring)?;
    }
    mesh.recalculate_normals();
    Ok(mesh)
}

/// Cylinder along the y axis.
///
/// `segments` vertices per ring, `divisions` quad rows along the height.
/// With `caps` the rims are closed by one n-gon each; without, the tube is
/// left open with boundary edges at both rims.
pub fn cylinder(
    radius: f32,
    height: f32,
    segments: u32,
    divisions: u32,
    caps: bool,
) -> Result<EditMesh> {
    if radius <= 0.0 || height <= 0.0 {
        return Err(HewError::Geometry(format!(
            "cylinder needs positive radius and height, got {radius} and {height}"
        )));
    }
    if segments < 3 {
        return Err(HewError::Geometry(format!(
            "cylinder needs at least 3 segments, got {segments}"
        )));
    }
    if divisions < 1 {
        return Err(HewError::Geometry(format!(
            "cylinder needs at least 1 division, got {divisions}"
        )));
    }

    let mut mesh = EditMesh::new();
    for row in 0..=divisions {
        let v = row as f32 / divisions as f32;
        let y = height * (v - 0.5);
        for seg in 0..segments {
            let angle = TAU * seg as f32 / segments as f32;
            let mut vertex =
                Vertex::at(vec3(radius * angle.cos(), y, radius * angle.sin()));
            vertex.uv = vec2(seg as f32 / segments as f32, v);
            mesh.add_vertex(vertex);
        }
    }

    let index = |row: u32, seg: u32| row * segments + seg % segments;
    for row in 0..divisions {
        for seg in 0..segments {
            mesh.add_face(&[
                index(row, seg),
                index(row + 1, seg),
                index(row + 1, seg + 1),
                index(row, seg + 1),
            ])?;
        }
    }
    if caps {
        let bottom: Vec<u32> = (0..segments).map(|s| index(0, s)).collect();
        mesh.add_face(&bottom)?;
        let top: Vec<u32> = (0..segments).rev().map(|s| index(divisions, s)).collect();
        mesh.add_face(&top)?;
    }
    mesh.recalculate_normals();
    Ok(mesh)
}

/// UV sphere: quad bands between triangle fans at the poles.
pub fn sphere(radius: f32, rings: u32, segments: u32) -> Result<EditMesh> {
    if radius <= 0.0 {
        return Err(HewError::Geometry(format!(
            "sphere needs a positive radius, got {radius}"
        )));
    }
    if rings < 2 {
        return Err(HewError::Geometry(format!(
            "sphere needs at least 2 rings, got {rings}"
        )));
    }
    if segments < 3 {
        return Err(HewError::Geometry(format!(
            "sphere needs at least 3 segments, got {segments}"
        )));
    }

    let mut mesh = EditMesh::new();
    let mut top = Vertex::at(vec3(0.0, radius, 0.0));
    top.uv = vec2(0.5, 0.0);
    let top = mesh.add_vertex(top);

    for row in 1..rings {
        let v = row as f32 / rings as f32;
        let phi = PI * v;
        let y = radius * phi.cos();
        let ring_radius = radius * phi.sin();
        for seg in 0..segments {
            let angle = TAU * seg as f32 / segments as f32;
            let mut vertex = Vertex::at(vec3(
                ring_radius * angle.cos(),
                y,
                ring_radius * angle.sin(),
            ));
            vertex.uv = vec2(seg as f32 / segments as f32, v);
            mesh.add_vertex(vertex);
        }
    }
    let mut bottom = Vertex::at(vec3(0.0, -radius, 0.0));
    bottom.uv = vec2(0.5, 1.0);
    let bottom = mesh.add_vertex(bottom);

    let index = |row: u32, seg: u32| 1 + (row - 1) * segments + seg % segments;
    for seg in 0..segments {
        mesh.add_face(&[top, index(1, seg + 1), index(1, seg)])?;
    }
    for row in 1..rings - 1 {
        for seg in 0..segments {
            mesh.add_face(&[
                index(row + 1, seg),
                index(row, seg),
                index(row, seg + 1),
                index(row + 1, seg + 1),
            ])?;
        }
    }
    for seg in 0..segments {
        mesh.add_face(&[bottom, index(rings - 1, seg), index(rings - 1, seg + 1)])?;
    }
    mesh.recalculate_normals();
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hew_core::traits::BoundingBox;
    use hew_topology::NONE;

    fn boundary_count(mesh: &EditMesh) -> usize {
        mesh.half_edges_data()
            .iter()
            .filter(|he| he.twin == NONE)
            .count()
    }

    #[test]
    fn test_cube_is_a_closed_box() {
        let mesh = cube(2.0).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.half_edge_count(), 24);
        assert_eq!(boundary_count(&mesh), 0);
        assert!(mesh.is_valid());

        let (min, max) = mesh.bounding_box();
        assert_eq!(min, vec3(-1.0, -1.0, -1.0));
        assert_eq!(max, vec3(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_cuboid_dimensions() {
        let mesh = cuboid(2.0, 4.0, 6.0).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_eq!(max - min, vec3(2.0, 4.0, 6.0));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_capped_cylinder_is_closed() {
        let segments = 8;
        let divisions = 3;
        let mesh = cylinder(1.0, 2.0, segments, divisions, true).unwrap();

        assert_eq!(mesh.vertex_count() as u32, segments * (divisions + 1));
        assert_eq!(mesh.face_count() as u32, segments * divisions + 2);
        assert_eq!(boundary_count(&mesh), 0);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_open_cylinder_has_two_rims() {
        let segments = 6;
        let mesh = cylinder(1.0, 2.0, segments, 2, false).unwrap();
        assert_eq!(boundary_count(&mesh) as u32, 2 * segments);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_sphere_counts_and_closure() {
        let rings = 4;
        let segments = 8;
        let mesh = sphere(1.5, rings, segments).unwrap();

        assert_eq!(mesh.vertex_count() as u32, 2 + (rings - 1) * segments);
        assert_eq!(
            mesh.face_count() as u32,
            2 * segments + (rings - 2) * segments
        );
        assert_eq!(boundary_count(&mesh), 0);
        assert!(mesh.is_valid());

        // Every vertex sits on the sphere.
        for vertex in mesh.vertices_data() {
            assert!((vertex.position.length() - 1.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_smooth_normals_point_outward() {
        let mesh = sphere(1.0, 6, 12).unwrap();
        for vertex in mesh.vertices_data() {
            let radial = vertex.position.normalize();
            assert!(vertex.normal.dot(radial) > 0.9);
        }
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(cube(0.0).is_err());
        assert!(cuboid(1.0, -1.0, 1.0).is_err());
        assert!(cylinder(1.0, 1.0, 2, 1, true).is_err());
        assert!(cylinder(0.0, 1.0, 8, 1, true).is_err());
        assert!(sphere(1.0, 1, 8).is_err());
        assert!(sphere(1.0, 4, 2).is_err());
    }
}
