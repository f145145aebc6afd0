//! Editable half-edge mesh.

use std::collections::{BTreeSet, HashMap};

use hew_core::error::{HewError, Result};
use hew_core::Tolerance;
use hew_math::{Point3, Vec4, Vector3};

use super::types::{edge_key, Face, HalfEdge, Vertex, NONE};
use crate::history::MeshSnapshot;

/// Editable half-edge mesh with flat `u32`-indexed element storage.
///
/// Vertices, half-edges and faces live in plain vectors and reference each
/// other by index. An undirected edge map accelerates half-edge lookup by
/// vertex pair, and a set of selected half-edges complements the selection
/// flags stored on vertices and faces. Boundary edges (twin `NONE`) are a
/// valid state throughout.
///
/// Structural edits go through [`add_face`](Self::add_face) /
/// [`remove_face`](Self::remove_face) followed by
/// [`rebuild_from_faces`](Self::rebuild_from_faces), which compacts storage
/// and re-derives every derived structure.
#[derive(Debug, Clone)]
pub struct EditMesh {
    pub vertices: Vec<Vertex>,
    pub half_edges: Vec<HalfEdge>,
    pub faces: Vec<Face>,
    /// Undirected (min,max) vertex pair -> one half-edge on that edge.
    pub(crate) edge_map: HashMap<u64, u32>,
    /// Selected half-edges; vertex and face selection lives on the elements.
    pub(crate) selected_edges: BTreeSet<u32>,
    /// Position-matching and plane-classification epsilons.
    pub tolerance: Tolerance,
    pub(crate) undo_stack: Vec<MeshSnapshot>,
    pub(crate) redo_stack: Vec<MeshSnapshot>,
}

impl EditMesh {
    /// Empty mesh with default tolerances.
    pub fn new() -> Self {
        Self::with_tolerance(Tolerance::default_precision())
    }

    /// Empty mesh using the given tolerances for all position matching.
    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            vertices: Vec::new(),
            half_edges: Vec::new(),
            faces: Vec::new(),
            edge_map: HashMap::new(),
            selected_edges: BTreeSet::new(),
            tolerance,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Removes all elements, selection and history.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.half_edges.clear();
        self.faces.clear();
        self.edge_map.clear();
        self.selected_edges.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn vertex(&self, index: u32) -> &Vertex {
        &self.vertices[index as usize]
    }

    pub fn vertex_mut(&mut self, index: u32) -> &mut Vertex {
        &mut self.vertices[index as usize]
    }

    pub fn half_edge(&self, index: u32) -> &HalfEdge {
        &self.half_edges[index as usize]
    }

    pub fn face(&self, index: u32) -> &Face {
        &self.faces[index as usize]
    }

    pub fn face_mut(&mut self, index: u32) -> &mut Face {
        &mut self.faces[index as usize]
    }

    /// Destination vertex of a half-edge, read through its `next` link.
    #[inline]
    pub fn dest(&self, half_edge: u32) -> u32 {
        let next = self.half_edges[half_edge as usize].next;
        self.half_edges[next as usize].origin
    }

    /// Origin and destination vertices of a half-edge.
    pub fn edge_vertices(&self, half_edge: u32) -> (u32, u32) {
        (self.half_edges[half_edge as usize].origin, self.dest(half_edge))
    }

    pub fn set_vertex_position(&mut self, index: u32, position: Point3) {
        self.vertices[index as usize].position = position;
    }

    /// Appends a vertex and returns its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Appends a face over the given vertex ring, counter-clockwise.
    ///
    /// Creates one fresh half-edge per ring edge, links `next`/`prev`
    /// cyclically and pairs twins through the undirected edge map when an
    /// unpaired opposite half-edge already exists. Edges whose opposite is
    /// missing stay boundary; an edge shared by more than two faces leaves
    /// the extra half-edges unpaired rather than failing.
    pub fn add_face(&mut self, ring: &[u32]) -> Result<u32> {
        let n = ring.len();
        if n < 3 {
            return Err(HewError::Topology(format!(
                "face requires at least 3 vertices, got {n}"
            )));
        }
        for &v in ring {
            if v as usize >= self.vertices.len() {
                return Err(HewError::InvalidData(format!(
                    "face references vertex {v} out of range ({} vertices)",
                    self.vertices.len()
                )));
            }
        }

        let base = self.half_edges.len() as u32;
        let face_index = self.faces.len() as u32;
        for (i, &v) in ring.iter().enumerate() {
            let he = base + i as u32;
            self.half_edges.push(HalfEdge {
                origin: v,
                face: face_index,
                next: base + ((i + 1) % n) as u32,
                prev: base + ((i + n - 1) % n) as u32,
                twin: NONE,
            });
            if self.vertices[v as usize].outgoing == NONE {
                self.vertices[v as usize].outgoing = he;
            }
        }
        self.faces.push(Face {
            first: base,
            vertex_count: n as u32,
            selected: false,
        });

        for i in 0..n {
            let he = base + i as u32;
            let v0 = ring[i];
            let v1 = ring[(i + 1) % n];
            let key = edge_key(v0, v1);
            match self.edge_map.get(&key) {
                Some(&other) if other != he => {
                    let candidate = self.half_edges[other as usize];
                    if candidate.twin == NONE
                        && candidate.origin == v1
                        && self.dest(other) == v0
                    {
                        self.half_edges[other as usize].twin = he;
                        self.half_edges[he as usize].twin = other;
                    }
                }
                Some(_) => {}
                None => {
                    self.edge_map.insert(key, he);
                }
            }
        }
        Ok(face_index)
    }

    /// Appends a quad face; see [`add_face`](Self::add_face).
    pub fn add_quad_face(&mut self, v0: u32, v1: u32, v2: u32, v3: u32) -> Result<u32> {
        self.add_face(&[v0, v1, v2, v3])
    }

    /// Marks a face for removal; storage is reclaimed by the next
    /// [`rebuild_from_faces`](Self::rebuild_from_faces).
    pub fn remove_face(&mut self, index: u32) {
        let face = &mut self.faces[index as usize];
        face.vertex_count = 0;
        face.selected = false;
    }

    /// Finds the half-edge running `from -> to`, if the edge exists.
    pub fn find_half_edge(&self, from: u32, to: u32) -> Option<u32> {
        let &he = self.edge_map.get(&edge_key(from, to))?;
        if self.half_edges[he as usize].origin == from && self.dest(he) == to {
            return Some(he);
        }
        let twin = self.half_edges[he as usize].twin;
        if twin != NONE
            && self.half_edges[twin as usize].origin == from
            && self.dest(twin) == to
        {
            return Some(twin);
        }
        None
    }

    /// Vertex ring of a face, in half-edge order.
    pub fn face_vertices(&self, face: u32) -> Vec<u32> {
        self.face_half_edges(face)
            .map(|he| self.half_edges[he as usize].origin)
            .collect()
    }

    /// Half-edge ring of a face.
    pub fn face_edges(&self, face: u32) -> Vec<u32> {
        self.face_half_edges(face).collect()
    }

    /// Faces sharing an edge with `face`, without duplicates.
    pub fn face_neighbors(&self, face: u32) -> Vec<u32> {
        let mut seen = BTreeSet::new();
        for he in self.face_half_edges(face) {
            let twin = self.half_edges[he as usize].twin;
            if twin != NONE {
                let neighbor = self.half_edges[twin as usize].face;
                if neighbor != NONE && neighbor != face {
                    seen.insert(neighbor);
                }
            }
        }
        seen.into_iter().collect()
    }

    /// Half-edges incident to a vertex, one per undirected edge.
    ///
    /// Prefers the outgoing direction; an incoming boundary half-edge whose
    /// opposite does not exist is reported as itself. A full scan keeps this
    /// correct on boundaries where the outgoing fan cannot be walked.
    pub fn vertex_edges(&self, vertex: u32) -> Vec<u32> {
        let mut edges = Vec::new();
        for (i, he) in self.half_edges.iter().enumerate() {
            let i = i as u32;
            if he.origin == vertex {
                edges.push(i);
            } else if he.twin == NONE && self.dest(i) == vertex {
                edges.push(i);
            }
        }
        edges
    }

    /// Faces that use a vertex, without duplicates.
    pub fn vertex_faces(&self, vertex: u32) -> Vec<u32> {
        let mut seen = BTreeSet::new();
        for (i, he) in self.half_edges.iter().enumerate() {
            if he.face == NONE {
                continue;
            }
            if he.origin == vertex || self.dest(i as u32) == vertex {
                seen.insert(he.face);
            }
        }
        seen.into_iter().collect()
    }

    /// Vertices connected to `vertex` by an edge, without duplicates.
    pub fn vertex_neighbors(&self, vertex: u32) -> Vec<u32> {
        let mut seen = BTreeSet::new();
        for (i, he) in self.half_edges.iter().enumerate() {
            let dest = self.dest(i as u32);
            if he.origin == vertex {
                seen.insert(dest);
            } else if dest == vertex {
                seen.insert(he.origin);
            }
        }
        seen.into_iter().collect()
    }

    pub fn is_quad(&self, face: u32) -> bool {
        self.faces[face as usize].vertex_count == 4
    }

    /// Centroid of a face's vertex ring.
    pub fn face_center(&self, face: u32) -> Point3 {
        let ring = self.face_vertices(face);
        if ring.is_empty() {
            return Point3::ZERO;
        }
        let sum: Point3 = ring
            .iter()
            .map(|&v| self.vertices[v as usize].position)
            .sum();
        sum / ring.len() as f32
    }

    /// Face normal by Newell's method, robust for non-planar n-gons.
    ///
    /// Returns the zero vector for degenerate rings.
    pub fn face_normal(&self, face: u32) -> Vector3 {
        self.face_normal_raw(face).normalize_or_zero()
    }

    /// Unnormalized Newell normal; its length is twice the face area.
    pub(crate) fn face_normal_raw(&self, face: u32) -> Vector3 {
        let ring = self.face_vertices(face);
        let mut normal = Vector3::ZERO;
        for i in 0..ring.len() {
            let a = self.vertices[ring[i] as usize].position;
            let b = self.vertices[ring[(i + 1) % ring.len()] as usize].position;
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
        }
        normal
    }

    /// Recomputes smooth vertex normals, weighting each face by its area.
    pub fn recalculate_normals(&mut self) {
        let mut accumulated = vec![Vector3::ZERO; self.vertices.len()];
        for face in 0..self.faces.len() as u32 {
            if self.faces[face as usize].vertex_count < 3 {
                continue;
            }
            let weighted = self.face_normal_raw(face);
            for v in self.face_vertices(face) {
                accumulated[v as usize] += weighted;
            }
        }
        for (vertex, normal) in self.vertices.iter_mut().zip(accumulated) {
            let length_sq = normal.length_squared();
            if length_sq > 1e-12 {
                vertex.normal = normal / length_sq.sqrt();
            }
        }
    }

    /// Sets every vertex color to `color`.
    pub fn set_all_vertex_colors(&mut self, color: Vec4) {
        for vertex in &mut self.vertices {
            vertex.color = color;
        }
    }

    /// Raw vertex storage, the persistence surface of the mesh.
    pub fn vertices_data(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Raw half-edge storage.
    pub fn half_edges_data(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    /// Raw face storage.
    pub fn faces_data(&self) -> &[Face] {
        &self.faces
    }

    /// Replaces the mesh contents from raw element data.
    ///
    /// The edge map is rebuilt from the half-edges as given (twin links in
    /// the data are kept) and the result is validated; on error the mesh is
    /// left in the replaced-but-rejected state described by the error.
    /// Selection flags in the data survive, edge selection and history do
    /// not.
    pub fn set_from_data(
        &mut self,
        vertices: Vec<Vertex>,
        half_edges: Vec<HalfEdge>,
        faces: Vec<Face>,
    ) -> Result<()> {
        self.vertices = vertices;
        self.half_edges = half_edges;
        self.faces = faces;
        self.selected_edges.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.rebuild_edge_map_preserving_twins();
        self.validate_topology()
    }

    /// True when the mesh has any faces and passes full topology
    /// validation.
    pub fn is_valid(&self) -> bool {
        !self.faces.is_empty() && self.validate_topology().is_ok()
    }
}

impl Default for EditMesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hew_math::vec3;

    fn quad_mesh() -> EditMesh {
        let mut mesh = EditMesh::new();
        mesh.add_vertex(Vertex::at(vec3(0.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(vec3(1.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(vec3(1.0, 1.0, 0.0)));
        mesh.add_vertex(Vertex::at(vec3(0.0, 1.0, 0.0)));
        mesh.add_face(&[0, 1, 2, 3]).unwrap();
        mesh
    }

    #[test]
    fn test_single_face_topology() {
        let mesh = quad_mesh();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.half_edge_count(), 4);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.face_vertices(0), vec![0, 1, 2, 3]);
        // Every half-edge of a lone face is a boundary.
        for he in &mesh.half_edges {
            assert_eq!(he.twin, NONE);
            assert_eq!(he.face, 0);
        }
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_two_faces_share_a_twin() {
        let mut mesh = quad_mesh();
        mesh.add_vertex(Vertex::at(vec3(2.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(vec3(2.0, 1.0, 0.0)));
        mesh.add_face(&[1, 4, 5, 2]).unwrap();

        let shared = mesh.find_half_edge(1, 2).unwrap();
        let twin = mesh.half_edges[shared as usize].twin;
        assert_ne!(twin, NONE);
        assert_eq!(mesh.edge_vertices(twin), (2, 1));
        assert_eq!(mesh.half_edges[twin as usize].twin, shared);
        assert_eq!(mesh.face_neighbors(0), vec![1]);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_add_face_rejects_bad_input() {
        let mut mesh = quad_mesh();
        assert!(mesh.add_face(&[0, 1]).is_err());
        assert!(mesh.add_face(&[0, 1, 99]).is_err());
        // The mesh keeps working after a rejected face.
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_vertex_adjacency_on_boundary() {
        let mut mesh = quad_mesh();
        mesh.add_vertex(Vertex::at(vec3(2.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(vec3(2.0, 1.0, 0.0)));
        mesh.add_face(&[1, 4, 5, 2]).unwrap();

        // Vertex 1 sits on the shared edge: neighbors from both faces.
        assert_eq!(mesh.vertex_neighbors(1), vec![0, 2, 4]);
        assert_eq!(mesh.vertex_faces(1), vec![0, 1]);
        // One entry per undirected incident edge.
        assert_eq!(mesh.vertex_edges(1).len(), 3);
    }

    #[test]
    fn test_face_center_and_normal() {
        let mesh = quad_mesh();
        let center = mesh.face_center(0);
        assert!((center - vec3(0.5, 0.5, 0.0)).length() < 1e-6);
        let normal = mesh.face_normal(0);
        assert!((normal - vec3(0.0, 0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_recalculate_normals_flat_quad() {
        let mut mesh = quad_mesh();
        for v in &mut mesh.vertices {
            v.normal = vec3(1.0, 0.0, 0.0);
        }
        mesh.recalculate_normals();
        for v in &mesh.vertices {
            assert!((v.normal - vec3(0.0, 0.0, 1.0)).length() < 1e-6);
        }
    }

    #[test]
    fn test_set_from_data_round_trip() {
        let source = quad_mesh();
        let mut restored = EditMesh::new();
        restored
            .set_from_data(
                source.vertices_data().to_vec(),
                source.half_edges_data().to_vec(),
                source.faces_data().to_vec(),
            )
            .unwrap();
        assert_eq!(restored.vertex_count(), 4);
        assert_eq!(restored.face_vertices(0), vec![0, 1, 2, 3]);
        assert_eq!(restored.find_half_edge(0, 1), source.find_half_edge(0, 1));
    }

    #[test]
    fn test_set_from_data_rejects_dangling_indices() {
        let mut broken = quad_mesh();
        broken.half_edges[0].origin = 42;
        let mut target = EditMesh::new();
        let result = target.set_from_data(
            broken.vertices.clone(),
            broken.half_edges.clone(),
            broken.faces.clone(),
        );
        assert!(result.is_err());
    }
}
