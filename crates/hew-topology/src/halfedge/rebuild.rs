//! Derived-structure maintenance: edge map, twin links, storage compaction.
//!
//! Structural operators mutate face rings freely (tombstoning faces,
//! appending new ones, rewriting origins) and then call
//! [`EditMesh::rebuild_from_faces`] to compact storage and re-derive every
//! link. Twin pairing happens by vertex index first; meshes that duplicate
//! vertices at the same position (UV seams, split normals) are re-joined by
//! [`EditMesh::link_twins_by_position`].

use std::collections::HashMap;

use super::mesh::EditMesh;
use super::types::{edge_key, NONE};

/// Strips consecutive duplicate vertices from a ring, including the
/// wrap-around pair.
fn dedup_ring(ring: &mut Vec<u32>) {
    ring.dedup();
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
}

impl EditMesh {
    /// Recomputes the undirected edge map and index-based twin links.
    ///
    /// All twin links are re-derived: two half-edges pair up when they run
    /// the same vertex pair in opposite directions. Edges duplicated at the
    /// same position but with different vertex indices stay unpaired; use
    /// [`link_twins_by_position`](Self::link_twins_by_position) afterwards
    /// to join those.
    pub fn rebuild_edge_map(&mut self) {
        for he in &mut self.half_edges {
            he.twin = NONE;
        }
        let endpoints: Vec<(u32, u32)> = (0..self.half_edges.len() as u32)
            .map(|he| self.edge_vertices(he))
            .collect();

        self.edge_map.clear();
        for (i, &(v0, v1)) in endpoints.iter().enumerate() {
            let i = i as u32;
            match self.edge_map.get(&edge_key(v0, v1)) {
                Some(&other) => {
                    let (o0, o1) = endpoints[other as usize];
                    if self.half_edges[other as usize].twin == NONE && (o0, o1) == (v1, v0) {
                        self.half_edges[other as usize].twin = i;
                        self.half_edges[i as usize].twin = other;
                    }
                }
                None => {
                    self.edge_map.insert(edge_key(v0, v1), i);
                }
            }
        }
    }

    /// Recomputes the undirected edge map, keeping twin links as stored.
    ///
    /// Used when restoring from snapshots or raw data whose twin links are
    /// already authoritative.
    pub(crate) fn rebuild_edge_map_preserving_twins(&mut self) {
        let endpoints: Vec<(u32, u32)> = (0..self.half_edges.len() as u32)
            .map(|he| {
                let origin = self.half_edges[he as usize].origin;
                let next = self.half_edges[he as usize].next;
                (origin, self.half_edges[next as usize].origin)
            })
            .collect();
        self.edge_map.clear();
        for (i, &(v0, v1)) in endpoints.iter().enumerate() {
            self.edge_map.entry(edge_key(v0, v1)).or_insert(i as u32);
        }
    }

    /// Pairs unlinked half-edges whose endpoints coincide in space.
    ///
    /// Handles meshes that carry duplicate vertices at the same position,
    /// e.g. split normals or UV seams: two boundary half-edges become twins
    /// when their endpoint positions match in reverse within the linear
    /// tolerance. Segment midpoints are hashed on a grid of twice the
    /// tolerance and the 27 surrounding cells are probed, so matching stays
    /// linear in edge count.
    pub fn link_twins_by_position(&mut self) {
        let tol = self.tolerance.linear;
        let cell = (tol * 2.0).max(f32::MIN_POSITIVE);
        let cell_of = |p: hew_math::Point3| {
            (
                (p.x / cell).floor() as i64,
                (p.y / cell).floor() as i64,
                (p.z / cell).floor() as i64,
            )
        };

        let unlinked: Vec<u32> = (0..self.half_edges.len() as u32)
            .filter(|&he| self.half_edges[he as usize].twin == NONE)
            .collect();

        let mut grid: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
        for &he in &unlinked {
            let (v0, v1) = self.edge_vertices(he);
            let mid = (self.vertices[v0 as usize].position
                + self.vertices[v1 as usize].position)
                * 0.5;
            grid.entry(cell_of(mid)).or_default().push(he);
        }

        for &he in &unlinked {
            if self.half_edges[he as usize].twin != NONE {
                continue;
            }
            let (v0, v1) = self.edge_vertices(he);
            let a = self.vertices[v0 as usize].position;
            let b = self.vertices[v1 as usize].position;
            let (cx, cy, cz) = cell_of((a + b) * 0.5);

            'probe: for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let Some(bucket) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                            continue;
                        };
                        for &other in bucket {
                            if other == he || self.half_edges[other as usize].twin != NONE {
                                continue;
                            }
                            let (o0, o1) = self.edge_vertices(other);
                            let oa = self.vertices[o0 as usize].position;
                            let ob = self.vertices[o1 as usize].position;
                            if (oa - b).length() < tol && (ob - a).length() < tol {
                                self.half_edges[he as usize].twin = other;
                                self.half_edges[other as usize].twin = he;
                                break 'probe;
                            }
                        }
                    }
                }
            }
        }
    }

    /// Rebuilds the whole mesh from its live face rings.
    ///
    /// Faces marked for removal (`vertex_count == 0`) are dropped, rings
    /// are cleaned of consecutive duplicate vertices, rings shorter than
    /// three vertices after cleaning are discarded, and vertices no live
    /// ring references disappear. Surviving vertices are compacted in order
    /// of first use and every half-edge is re-created, so all half-edge
    /// indices change and the edge selection is cleared. Vertex attributes,
    /// vertex selection and face selection survive.
    pub fn rebuild_from_faces(&mut self) {
        let mut rings: Vec<(Vec<u32>, bool)> = Vec::new();
        for face in 0..self.faces.len() as u32 {
            if self.faces[face as usize].vertex_count < 3 {
                continue;
            }
            let mut ring = self.face_vertices(face);
            dedup_ring(&mut ring);
            if ring.len() >= 3 {
                rings.push((ring, self.faces[face as usize].selected));
            }
        }

        let mut remap: HashMap<u32, u32> = HashMap::new();
        let mut compacted = Vec::new();
        for (ring, _) in &mut rings {
            for v in ring.iter_mut() {
                let new = *remap.entry(*v).or_insert_with(|| {
                    let mut vertex = self.vertices[*v as usize];
                    vertex.outgoing = NONE;
                    compacted.push(vertex);
                    (compacted.len() - 1) as u32
                });
                *v = new;
            }
        }

        self.vertices = compacted;
        self.half_edges.clear();
        self.faces.clear();
        self.edge_map.clear();
        self.selected_edges.clear();

        for (ring, selected) in rings {
            if let Ok(face) = self.add_face(&ring) {
                self.faces[face as usize].selected = selected;
            }
        }
    }

    /// Gives each face group private copies of the vertices it shares with
    /// other groups.
    ///
    /// Faces absent from every group form an implicit extra group. The
    /// first group to use a vertex keeps the original; later groups get
    /// duplicates with copied attributes. Twin links are left in place, so
    /// the groups stay geometric neighbors across the new seams; the edge
    /// map is rebuilt for the rewritten origins.
    pub fn split_vertices_for_groups(&mut self, groups: &[Vec<u32>]) {
        if groups.is_empty() {
            return;
        }
        let mut face_group = vec![usize::MAX; self.faces.len()];
        for (group, faces) in groups.iter().enumerate() {
            for &face in faces {
                if (face as usize) < face_group.len() {
                    face_group[face as usize] = group;
                }
            }
        }

        let mut claimed: HashMap<u32, usize> = HashMap::new();
        let mut duplicates: HashMap<(u32, usize), u32> = HashMap::new();
        for i in 0..self.half_edges.len() {
            let face = self.half_edges[i].face;
            let group = if face == NONE {
                usize::MAX - 1
            } else {
                face_group[face as usize]
            };
            let v = self.half_edges[i].origin;
            let first = *claimed.entry(v).or_insert(group);
            if first == group {
                continue;
            }
            let new_index = match duplicates.get(&(v, group)) {
                Some(&index) => index,
                None => {
                    let mut copy = self.vertices[v as usize];
                    copy.outgoing = NONE;
                    let index = self.vertices.len() as u32;
                    self.vertices.push(copy);
                    duplicates.insert((v, group), index);
                    index
                }
            };
            self.half_edges[i].origin = new_index;
        }

        for vertex in &mut self.vertices {
            vertex.outgoing = NONE;
        }
        for i in 0..self.half_edges.len() {
            let v = self.half_edges[i].origin as usize;
            if self.vertices[v].outgoing == NONE {
                self.vertices[v].outgoing = i as u32;
            }
        }
        self.rebuild_edge_map_preserving_twins();
    }
}
