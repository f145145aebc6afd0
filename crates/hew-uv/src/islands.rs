//! UV island discovery and seam sewing.
//!
//! Two faces belong to the same island when they share a 3D edge whose
//! corner UVs agree on both sides of the twin pair. Twin links survive
//! every projection, so island structure is always recoverable from the
//! mesh itself.

use std::collections::{HashMap, HashSet};

use hew_topology::{EditMesh, NONE};

/// Disjoint-set forest over face indices, path-halving on find.
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len as u32).collect(),
        }
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grandparent = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grandparent;
            x = grandparent;
        }
        x
    }

    fn union(&mut self, a: u32, b: u32) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent[root_b as usize] = root_a;
        }
    }
}

/// Groups `faces` into UV islands.
///
/// Islands are returned with their faces in ascending order and are
/// themselves ordered by their lowest face index, so repeated calls over
/// the same mesh line up.
pub fn uv_islands(mesh: &EditMesh, faces: &[u32]) -> Vec<Vec<u32>> {
    let members: HashSet<u32> = faces.iter().copied().collect();
    let mut forest = UnionFind::new(mesh.face_count());
    for &face in faces {
        for he in mesh.face_edges(face) {
            let twin = mesh.half_edge(he).twin;
            if twin == NONE || twin < he {
                continue;
            }
            let other = mesh.half_edge(twin).face;
            if other == NONE || !members.contains(&other) {
                continue;
            }
            if !uv_seam(mesh, he, twin) {
                forest.union(face, other);
            }
        }
    }

    let mut islands: HashMap<u32, Vec<u32>> = HashMap::new();
    for &face in faces {
        islands.entry(forest.find(face)).or_default().push(face);
    }
    let mut result: Vec<Vec<u32>> = islands.into_values().collect();
    for island in &mut result {
        island.sort_unstable();
    }
    result.sort_by_key(|island| island.first().copied());
    result
}

/// Sews UV seams across shared 3D edges among `faces`.
///
/// Each seam's corner UVs move to their midpoints, joining the islands on
/// both sides. A sew that would mirror either incident face in UV space is
/// reverted and skipped. Returns the number of edges sewn.
pub fn sew_all_uvs(mesh: &mut EditMesh, faces: &[u32]) -> usize {
    if faces.is_empty() {
        tracing::warn!("uv sewing rejected: no faces to sew");
        return 0;
    }
    let members: HashSet<u32> = faces.iter().copied().collect();
    let mut sewn = 0;
    for &face in faces {
        for he in mesh.face_edges(face) {
            let twin = mesh.half_edge(he).twin;
            if twin == NONE || twin < he {
                continue;
            }
            let other = mesh.half_edge(twin).face;
            if other == NONE || !members.contains(&other) {
                continue;
            }
            if !uv_seam(mesh, he, twin) {
                continue;
            }

            // `he` runs a -> b, its twin runs the same positions backwards,
            // so the matching corner pairs are (a, d) and (b, c).
            let (a, b) = mesh.edge_vertices(he);
            let (c, d) = mesh.edge_vertices(twin);
            let saved = [
                (a, mesh.vertex(a).uv),
                (b, mesh.vertex(b).uv),
                (c, mesh.vertex(c).uv),
                (d, mesh.vertex(d).uv),
            ];
            let before = (uv_signed_area(mesh, face), uv_signed_area(mesh, other));

            let mid_ad = (mesh.vertex(a).uv + mesh.vertex(d).uv) * 0.5;
            let mid_bc = (mesh.vertex(b).uv + mesh.vertex(c).uv) * 0.5;
            mesh.vertex_mut(a).uv = mid_ad;
            mesh.vertex_mut(d).uv = mid_ad;
            mesh.vertex_mut(b).uv = mid_bc;
            mesh.vertex_mut(c).uv = mid_bc;

            let after = (uv_signed_area(mesh, face), uv_signed_area(mesh, other));
            if before.0 * after.0 < 0.0 || before.1 * after.1 < 0.0 {
                for (v, uv) in saved {
                    mesh.vertex_mut(v).uv = uv;
                }
                continue;
            }
            sewn += 1;
        }
    }
    if sewn > 0 {
        tracing::debug!(edges = sewn, "sewed uv seams");
    }
    sewn
}

/// True when the corner UVs on the two sides of a twin pair disagree
/// beyond the linear tolerance.
fn uv_seam(mesh: &EditMesh, he: u32, twin: u32) -> bool {
    let (a, b) = mesh.edge_vertices(he);
    let (c, d) = mesh.edge_vertices(twin);
    let tol = mesh.tolerance.linear;
    mesh.vertex(a).uv.distance(mesh.vertex(d).uv) > tol
        || mesh.vertex(b).uv.distance(mesh.vertex(c).uv) > tol
}

/// Shoelace area of a face's UV ring, signed by winding.
fn uv_signed_area(mesh: &EditMesh, face: u32) -> f32 {
    let ring = mesh.face_vertices(face);
    let mut doubled = 0.0;
    for i in 0..ring.len() {
        let a = mesh.vertex(ring[i]).uv;
        let b = mesh.vertex(ring[(i + 1) % ring.len()]).uv;
        doubled += a.x * b.y - b.x * a.y;
    }
    doubled * 0.5
}
