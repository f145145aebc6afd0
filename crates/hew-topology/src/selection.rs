//! Element selection state and queries.
//!
//! Vertex and face selection are flags on the elements themselves; edge
//! selection is a set of half-edge indices where either direction stands
//! for the undirected edge. All query methods deduplicate so an edge
//! selected from both sides reports once.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use hew_math::Point3;

use crate::halfedge::{edge_key, EditMesh, NONE};

/// Which element class a pick or selection query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    Vertex,
    Edge,
    Face,
}

impl EditMesh {
    /// Selects a vertex, replacing the current selection unless `additive`.
    pub fn select_vertex(&mut self, index: u32, additive: bool) {
        if !additive {
            self.clear_selection();
        }
        self.vertices[index as usize].selected = true;
    }

    /// Selects an edge by one of its half-edges, replacing the current
    /// selection unless `additive`.
    pub fn select_edge(&mut self, half_edge: u32, additive: bool) {
        if !additive {
            self.clear_selection();
        }
        let twin = self.half_edges[half_edge as usize].twin;
        if twin == NONE || !self.selected_edges.contains(&twin) {
            self.selected_edges.insert(half_edge);
        }
    }

    /// Selects a face, replacing the current selection unless `additive`.
    pub fn select_face(&mut self, index: u32, additive: bool) {
        if !additive {
            self.clear_selection();
        }
        self.faces[index as usize].selected = true;
    }

    pub fn toggle_vertex_selection(&mut self, index: u32) {
        let vertex = &mut self.vertices[index as usize];
        vertex.selected = !vertex.selected;
    }

    /// Toggles an edge; selecting from one side and deselecting from the
    /// twin side cancel out.
    pub fn toggle_edge_selection(&mut self, half_edge: u32) {
        if self.selected_edges.remove(&half_edge) {
            return;
        }
        let twin = self.half_edges[half_edge as usize].twin;
        if twin != NONE && self.selected_edges.remove(&twin) {
            return;
        }
        self.selected_edges.insert(half_edge);
    }

    pub fn toggle_face_selection(&mut self, index: u32) {
        let face = &mut self.faces[index as usize];
        face.selected = !face.selected;
    }

    /// Adds a whole edge loop to the selection.
    pub fn select_edge_loop(&mut self, half_edge: u32, additive: bool) {
        if !additive {
            self.clear_selection();
        }
        for he in self.edge_loop(half_edge) {
            self.select_edge(he, true);
        }
    }

    /// Adds a whole edge ring to the selection.
    pub fn select_edge_ring(&mut self, half_edge: u32, additive: bool) {
        if !additive {
            self.clear_selection();
        }
        for he in self.edge_ring(half_edge) {
            self.select_edge(he, true);
        }
    }

    /// Deselects everything in all three modes.
    pub fn clear_selection(&mut self) {
        for vertex in &mut self.vertices {
            vertex.selected = false;
        }
        for face in &mut self.faces {
            face.selected = false;
        }
        self.selected_edges.clear();
    }

    /// Inverts the selection of one element class, leaving the others
    /// untouched.
    pub fn invert_selection(&mut self, mode: SelectionMode) {
        match mode {
            SelectionMode::Vertex => {
                for vertex in &mut self.vertices {
                    vertex.selected = !vertex.selected;
                }
            }
            SelectionMode::Face => {
                for face in &mut self.faces {
                    face.selected = !face.selected;
                }
            }
            SelectionMode::Edge => {
                let mut inverted = BTreeSet::new();
                for he in 0..self.half_edges.len() as u32 {
                    let twin = self.half_edges[he as usize].twin;
                    if twin != NONE && twin < he {
                        continue;
                    }
                    let selected = self.selected_edges.contains(&he)
                        || (twin != NONE && self.selected_edges.contains(&twin));
                    if !selected {
                        inverted.insert(he);
                    }
                }
                self.selected_edges = inverted;
            }
        }
    }

    pub fn has_selection(&self) -> bool {
        !self.selected_edges.is_empty()
            || self.vertices.iter().any(|v| v.selected)
            || self.faces.iter().any(|f| f.selected)
    }

    pub fn selected_vertices(&self) -> Vec<u32> {
        (0..self.vertices.len() as u32)
            .filter(|&v| self.vertices[v as usize].selected)
            .collect()
    }

    /// Selected edges, one half-edge per undirected edge.
    pub fn selected_edges(&self) -> Vec<u32> {
        let mut seen = BTreeSet::new();
        let mut edges = Vec::new();
        for &he in &self.selected_edges {
            let (v0, v1) = self.edge_vertices(he);
            if seen.insert(edge_key(v0, v1)) {
                edges.push(he);
            }
        }
        edges
    }

    pub fn selected_faces(&self) -> Vec<u32> {
        (0..self.faces.len() as u32)
            .filter(|&f| self.faces[f as usize].selected)
            .collect()
    }

    /// Every vertex the current selection touches: selected vertices,
    /// selected edges' endpoints and selected faces' rings combined.
    pub fn selection_vertices(&self) -> BTreeSet<u32> {
        let mut affected = BTreeSet::new();
        for (v, vertex) in self.vertices.iter().enumerate() {
            if vertex.selected {
                affected.insert(v as u32);
            }
        }
        for &he in &self.selected_edges {
            let (v0, v1) = self.edge_vertices(he);
            affected.insert(v0);
            affected.insert(v1);
        }
        for f in 0..self.faces.len() as u32 {
            if self.faces[f as usize].selected {
                affected.extend(self.face_vertices(f));
            }
        }
        affected
    }

    /// Centroid of all vertices the selection touches; zero when nothing
    /// is selected.
    pub fn selection_center(&self) -> Point3 {
        let affected = self.selection_vertices();
        if affected.is_empty() {
            return Point3::ZERO;
        }
        let sum: Point3 = affected
            .iter()
            .map(|&v| self.vertices[v as usize].position)
            .sum();
        sum / affected.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::halfedge::Vertex;
    use hew_math::vec3;

    fn two_quads() -> EditMesh {
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
    fn test_replacing_and_additive_selection() {
        let mut mesh = two_quads();
        mesh.select_vertex(0, false);
        mesh.select_vertex(1, true);
        assert_eq!(mesh.selected_vertices(), vec![0, 1]);

        mesh.select_face(1, false);
        assert_eq!(mesh.selected_vertices(), Vec::<u32>::new());
        assert_eq!(mesh.selected_faces(), vec![1]);
    }

    #[test]
    fn test_edge_selected_from_both_sides_reports_once() {
        let mut mesh = two_quads();
        let he = mesh.find_half_edge(1, 2).unwrap();
        let twin = mesh.half_edges[he as usize].twin;

        mesh.select_edge(he, false);
        mesh.select_edge(twin, true);
        assert_eq!(mesh.selected_edges().len(), 1);
    }

    #[test]
    fn test_toggle_edge_through_twin() {
        let mut mesh = two_quads();
        let he = mesh.find_half_edge(1, 2).unwrap();
        let twin = mesh.half_edges[he as usize].twin;

        mesh.toggle_edge_selection(he);
        assert!(mesh.has_selection());
        mesh.toggle_edge_selection(twin);
        assert!(!mesh.has_selection());
    }

    #[test]
    fn test_invert_edge_selection_counts_undirected_edges() {
        let mut mesh = two_quads();
        let he = mesh.find_half_edge(0, 1).unwrap();
        mesh.select_edge(he, false);

        mesh.invert_selection(SelectionMode::Edge);
        // Two quads share one edge: 7 undirected edges in total.
        assert_eq!(mesh.selected_edges().len(), 6);

        mesh.invert_selection(SelectionMode::Edge);
        assert_eq!(mesh.selected_edges().len(), 1);
        let (v0, v1) = mesh.edge_vertices(mesh.selected_edges()[0]);
        assert_eq!((v0.min(v1), v0.max(v1)), (0, 1));
    }

    #[test]
    fn test_selection_vertices_unions_all_modes() {
        let mut mesh = two_quads();
        mesh.select_vertex(3, false);
        let he = mesh.find_half_edge(4, 5).unwrap();
        mesh.select_edge(he, true);
        mesh.toggle_face_selection(0);

        let affected = mesh.selection_vertices();
        let expected: BTreeSet<u32> = [0, 1, 2, 3, 4, 5].into_iter().collect();
        assert_eq!(affected, expected);
    }

    #[test]
    fn test_selection_center_of_face() {
        let mut mesh = two_quads();
        mesh.select_face(0, false);
        let center = mesh.selection_center();
        assert!((center - vec3(0.5, 0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_clear_selection_resets_everything() {
        let mut mesh = two_quads();
        mesh.select_vertex(0, false);
        mesh.toggle_face_selection(1);
        let he = mesh.find_half_edge(1, 2).unwrap();
        mesh.select_edge(he, true);

        mesh.clear_selection();
        assert!(!mesh.has_selection());
        assert!(mesh.selection_vertices().is_empty());
    }
}
