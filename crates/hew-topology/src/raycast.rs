//! Ray picking against vertices, edges and faces.
//!
//! Faces are tested as fan triangulations, so the reported
//! `triangle_index` lines up with the triangle order of a render buffer
//! built with the same hidden-face set. Vertex and edge picks accept hits
//! within a world-space radius around the element and keep the one closest
//! along the ray.

use std::collections::BTreeSet;

use hew_math::{Point3, Ray, Vector3};

use crate::halfedge::{EditMesh, NONE};
use crate::selection::SelectionMode;

/// Default pick radius around vertices, world units.
pub const VERTEX_PICK_RADIUS: f32 = 0.1;
/// Default pick radius around edges, world units.
pub const EDGE_PICK_RADIUS: f32 = 0.05;

/// Result of a ray query against the mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshRayHit {
    pub hit: bool,
    /// Ray parameter of the hit.
    pub distance: f32,
    pub position: Point3,
    pub normal: Vector3,
    pub face_index: u32,
    pub vertex_index: u32,
    pub edge_index: u32,
    /// Position in the fan-triangulation order of the visible faces.
    pub triangle_index: u32,
}

impl MeshRayHit {
    fn miss() -> Self {
        Self {
            hit: false,
            distance: 0.0,
            position: Point3::ZERO,
            normal: Vector3::ZERO,
            face_index: NONE,
            vertex_index: NONE,
            edge_index: NONE,
            triangle_index: NONE,
        }
    }
}

impl Default for MeshRayHit {
    fn default() -> Self {
        Self::miss()
    }
}

impl EditMesh {
    /// Nearest face hit along the ray.
    pub fn raycast_face(&self, origin: Point3, direction: Vector3) -> MeshRayHit {
        self.raycast_face_skipping(origin, direction, &BTreeSet::new())
    }

    /// Nearest face hit along the ray, ignoring faces in `hidden`.
    ///
    /// Hidden faces do not advance the triangle counter, matching a render
    /// buffer built with the same hidden set.
    pub fn raycast_face_skipping(
        &self,
        origin: Point3,
        direction: Vector3,
        hidden: &BTreeSet<u32>,
    ) -> MeshRayHit {
        let ray = Ray::new(origin, direction);
        let mut best = MeshRayHit::miss();
        let mut triangle_counter: u32 = 0;

        for face in 0..self.faces.len() as u32 {
            if hidden.contains(&face) {
                continue;
            }
            let ring = self.face_vertices(face);
            if ring.len() < 3 {
                continue;
            }
            let anchor = self.vertices[ring[0] as usize].position;
            for i in 1..ring.len() - 1 {
                let b = self.vertices[ring[i] as usize].position;
                let c = self.vertices[ring[i + 1] as usize].position;
                if let Some(t) = ray.intersect_triangle(anchor, b, c) {
                    if !best.hit || t < best.distance {
                        best = MeshRayHit {
                            hit: true,
                            distance: t,
                            position: ray.at(t),
                            normal: self.face_normal(face),
                            face_index: face,
                            vertex_index: NONE,
                            edge_index: NONE,
                            triangle_index: triangle_counter,
                        };
                    }
                }
                triangle_counter += 1;
            }
        }
        best
    }

    /// Nearest vertex within `radius` of the ray.
    pub fn raycast_vertex(&self, origin: Point3, direction: Vector3, radius: f32) -> MeshRayHit {
        let ray = Ray::new(origin, direction);
        let mut best = MeshRayHit::miss();

        for (v, vertex) in self.vertices.iter().enumerate() {
            let t = ray.project_point(vertex.position);
            if t <= 0.0 {
                continue;
            }
            if (ray.at(t) - vertex.position).length() > radius {
                continue;
            }
            if !best.hit || t < best.distance {
                best = MeshRayHit {
                    hit: true,
                    distance: t,
                    position: vertex.position,
                    normal: vertex.normal,
                    face_index: NONE,
                    vertex_index: v as u32,
                    edge_index: NONE,
                    triangle_index: NONE,
                };
            }
        }
        best
    }

    /// Nearest edge within `radius` of the ray. The reported position lies
    /// on the edge segment.
    pub fn raycast_edge(&self, origin: Point3, direction: Vector3, radius: f32) -> MeshRayHit {
        let ray = Ray::new(origin, direction);
        let mut best = MeshRayHit::miss();

        for he in 0..self.half_edges.len() as u32 {
            let twin = self.half_edges[he as usize].twin;
            if twin != NONE && twin < he {
                continue;
            }
            let (v0, v1) = self.edge_vertices(he);
            let a = self.vertices[v0 as usize].position;
            let b = self.vertices[v1 as usize].position;
            let (t, s) = ray.closest_to_segment(a, b);
            if t <= 0.0 {
                continue;
            }
            let on_edge = a + (b - a) * s;
            if (ray.at(t) - on_edge).length() > radius {
                continue;
            }
            if !best.hit || t < best.distance {
                best = MeshRayHit {
                    hit: true,
                    distance: t,
                    position: on_edge,
                    normal: self.face_normal(self.half_edges[he as usize].face),
                    face_index: NONE,
                    vertex_index: NONE,
                    edge_index: he,
                    triangle_index: NONE,
                };
            }
        }
        best
    }

    /// Picks the element class selected by `mode` with default radii.
    /// `skip_faces` hides faces from face picking; vertex and edge picks
    /// ignore it.
    pub fn raycast(
        &self,
        origin: Point3,
        direction: Vector3,
        mode: SelectionMode,
        skip_faces: &BTreeSet<u32>,
    ) -> MeshRayHit {
        match mode {
            SelectionMode::Vertex => self.raycast_vertex(origin, direction, VERTEX_PICK_RADIUS),
            SelectionMode::Edge => self.raycast_edge(origin, direction, EDGE_PICK_RADIUS),
            SelectionMode::Face => self.raycast_face_skipping(origin, direction, skip_faces),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::halfedge::Vertex;
    use hew_math::vec3;

    /// Two unit quads in the z = 0 plane, side by side along x.
    fn flat_quads() -> EditMesh {
        let mut mesh = EditMesh::new();
        for p in [
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(1.0, 1.0, 0.0),
            vec3(0.0, 1.0, 0.0),
            vec3(2.0, 0.0, 0.0),
            vec3(2.0, 1.0, 0.0),
        ] {
            mesh.add_vertex(Vertex::at(p));
        }
        mesh.add_face(&[0, 1, 2, 3]).unwrap();
        mesh.add_face(&[1, 4, 5, 2]).unwrap();
        mesh
    }

    #[test]
    fn test_face_pick_reports_triangle_index() {
        let mesh = flat_quads();
        let hit = mesh.raycast_face(vec3(1.75, 0.25, 1.0), vec3(0.0, 0.0, -1.0));
        assert!(hit.hit);
        assert_eq!(hit.face_index, 1);
        // Fan order: quad 0 emits triangles 0 and 1, quad 1 starts at 2.
        assert_eq!(hit.triangle_index, 2);
        assert!((hit.distance - 1.0).abs() < 1e-5);
        assert!((hit.position - vec3(1.75, 0.25, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_hidden_faces_do_not_count_triangles() {
        let mesh = flat_quads();
        let hidden: BTreeSet<u32> = [0].into_iter().collect();
        let hit =
            mesh.raycast_face_skipping(vec3(1.75, 0.25, 1.0), vec3(0.0, 0.0, -1.0), &hidden);
        assert!(hit.hit);
        assert_eq!(hit.face_index, 1);
        assert_eq!(hit.triangle_index, 0);

        let blocked =
            mesh.raycast_face_skipping(vec3(0.5, 0.5, 1.0), vec3(0.0, 0.0, -1.0), &hidden);
        assert!(!blocked.hit);
    }

    #[test]
    fn test_vertex_pick_within_radius() {
        let mesh = flat_quads();
        let hit = mesh.raycast_vertex(vec3(1.02, 0.03, 1.0), vec3(0.0, 0.0, -1.0), 0.1);
        assert!(hit.hit);
        assert_eq!(hit.vertex_index, 1);
        assert_eq!(hit.position, vec3(1.0, 0.0, 0.0));

        let missed = mesh.raycast_vertex(vec3(0.5, 0.5, 1.0), vec3(0.0, 0.0, -1.0), 0.1);
        assert!(!missed.hit);
    }

    #[test]
    fn test_edge_pick_snaps_to_segment() {
        let mesh = flat_quads();
        // Near the middle of the shared edge x = 1.
        let hit = mesh.raycast_edge(vec3(1.02, 0.5, 1.0), vec3(0.0, 0.0, -1.0), 0.05);
        assert!(hit.hit);
        let (v0, v1) = mesh.edge_vertices(hit.edge_index);
        assert_eq!((v0.min(v1), v0.max(v1)), (1, 2));
        assert!((hit.position - vec3(1.0, 0.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_ray_behind_mesh_misses() {
        let mesh = flat_quads();
        let hit = mesh.raycast_face(vec3(0.5, 0.5, 1.0), vec3(0.0, 0.0, 1.0));
        assert!(!hit.hit);
        let vertex = mesh.raycast_vertex(vec3(0.5, 0.5, 1.0), vec3(0.0, 0.0, 1.0), 0.1);
        assert!(!vertex.hit);
    }

    #[test]
    fn test_mode_dispatch() {
        let mesh = flat_quads();
        let none = BTreeSet::new();
        let hit =
            mesh.raycast(vec3(0.5, 0.5, 1.0), vec3(0.0, 0.0, -1.0), SelectionMode::Face, &none);
        assert!(hit.hit);
        assert_eq!(hit.face_index, 0);
        assert_eq!(hit.vertex_index, NONE);

        let hidden: BTreeSet<u32> = [0].into_iter().collect();
        let skipped =
            mesh.raycast(vec3(0.5, 0.5, 1.0), vec3(0.0, 0.0, -1.0), SelectionMode::Face, &hidden);
        assert!(!skipped.hit);
    }
}
