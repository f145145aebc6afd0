use hew_core::error::{HewError, Result};
use hew_core::traits::Validate;

use super::mesh::EditMesh;
use super::types::NONE;

impl EditMesh {
    /// Full structural audit of the half-edge graph.
    ///
    /// Checks index ranges, twin symmetry, face ring closure and half-edge
    /// coverage. Boundary half-edges (twin `NONE`) are accepted; twins are
    /// allowed to join duplicate vertices as long as their endpoints
    /// coincide in space within the linear tolerance.
    pub fn validate_topology(&self) -> Result<()> {
        let vertex_count = self.vertices.len();
        let half_edge_count = self.half_edges.len();
        let face_count = self.faces.len();

        // 1. Index ranges
        for (i, he) in self.half_edges.iter().enumerate() {
            if he.origin as usize >= vertex_count {
                return Err(HewError::Topology(format!(
                    "half-edge {i} origin {} out of range ({vertex_count} vertices)",
                    he.origin
                )));
            }
            if he.next as usize >= half_edge_count || he.prev as usize >= half_edge_count {
                return Err(HewError::Topology(format!(
                    "half-edge {i} has dangling next/prev ({}, {})",
                    he.next, he.prev
                )));
            }
            if he.twin != NONE && he.twin as usize >= half_edge_count {
                return Err(HewError::Topology(format!(
                    "half-edge {i} twin {} does not exist",
                    he.twin
                )));
            }
            if he.face == NONE || he.face as usize >= face_count {
                return Err(HewError::Topology(format!(
                    "half-edge {i} face {} does not exist",
                    he.face
                )));
            }
        }
        for (v, vertex) in self.vertices.iter().enumerate() {
            if vertex.outgoing == NONE {
                continue;
            }
            if vertex.outgoing as usize >= half_edge_count {
                return Err(HewError::Topology(format!(
                    "vertex {v} outgoing half-edge {} does not exist",
                    vertex.outgoing
                )));
            }
            if self.half_edges[vertex.outgoing as usize].origin != v as u32 {
                return Err(HewError::Topology(format!(
                    "vertex {v} outgoing half-edge {} starts elsewhere",
                    vertex.outgoing
                )));
            }
        }

        // 2. Twin symmetry and opposite direction
        let tol_sq = self.tolerance.linear * self.tolerance.linear;
        for i in 0..half_edge_count as u32 {
            let twin = self.half_edges[i as usize].twin;
            if twin == NONE {
                continue;
            }
            if self.half_edges[twin as usize].twin != i {
                return Err(HewError::Topology(format!(
                    "twin symmetry violated: {i}.twin = {twin}, but {twin}.twin = {}",
                    self.half_edges[twin as usize].twin
                )));
            }
            let (v0, v1) = self.edge_vertices(i);
            let (t0, t1) = self.edge_vertices(twin);
            let reversed_by_index = (t0, t1) == (v1, v0);
            let reversed_by_position = self.vertices[t0 as usize]
                .position
                .distance_squared(self.vertices[v1 as usize].position)
                <= tol_sq
                && self.vertices[t1 as usize]
                    .position
                    .distance_squared(self.vertices[v0 as usize].position)
                    <= tol_sq;
            if !reversed_by_index && !reversed_by_position {
                return Err(HewError::Topology(format!(
                    "half-edge {i} ({v0}->{v1}) and twin {twin} ({t0}->{t1}) do not run opposite"
                )));
            }
        }

        // 3. Face rings close after exactly vertex_count steps
        for (f, face) in self.faces.iter().enumerate() {
            if face.vertex_count < 3 {
                return Err(HewError::Topology(format!(
                    "face {f} has fewer than 3 vertices ({})",
                    face.vertex_count
                )));
            }
            if face.first as usize >= half_edge_count {
                return Err(HewError::Topology(format!(
                    "face {f} first half-edge {} does not exist",
                    face.first
                )));
            }
            let mut current = face.first;
            for _ in 0..face.vertex_count {
                let he = &self.half_edges[current as usize];
                if he.face != f as u32 {
                    return Err(HewError::Topology(format!(
                        "half-edge {current} in face {f} ring is assigned to face {}",
                        he.face
                    )));
                }
                if self.half_edges[he.next as usize].prev != current {
                    return Err(HewError::Topology(format!(
                        "next/prev mismatch: {current}.next = {}, but {}.prev = {}",
                        he.next, he.next, self.half_edges[he.next as usize].prev
                    )));
                }
                current = he.next;
            }
            if current != face.first {
                return Err(HewError::Topology(format!(
                    "face {f} ring does not close after {} steps",
                    face.vertex_count
                )));
            }
        }

        // 4. Every half-edge belongs to exactly one ring
        let ring_total: u64 = self.faces.iter().map(|f| f.vertex_count as u64).sum();
        if ring_total != half_edge_count as u64 {
            return Err(HewError::Topology(format!(
                "face rings cover {ring_total} half-edges, storage holds {half_edge_count}"
            )));
        }

        Ok(())
    }
}

impl Validate for EditMesh {
    fn validate(&self) -> Result<()> {
        self.validate_topology()
    }
}
