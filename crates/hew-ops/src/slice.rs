//! Plane slicing.
//!
//! A cutting plane partitions a mesh into two fragments. Faces wholly on one
//! side are copied across; faces straddling the plane are clipped, with cut
//! vertices interpolated along the crossing edges and shared between
//! neighboring faces. The seam left on each fragment is then closed with cap
//! faces so slicing a closed solid yields two closed solids. Open seam chains
//! (from slicing an open sheet) are left uncapped.

use std::collections::HashMap;

use hew_core::Tolerance;
use hew_math::{Plane, Point3, Vector3};
use hew_topology::{edge_key, EditMesh, Vertex, NONE};

/// The two fragments produced by [`slice`].
///
/// A side is `None` when no face landed on it. If the plane misses the mesh
/// entirely (or only grazes it), both sides are `None` and the cut is a no-op.
#[derive(Debug, Default)]
pub struct SliceResult {
    /// Fragment on the side the plane normal points toward.
    pub positive: Option<EditMesh>,
    /// Fragment on the opposite side.
    pub negative: Option<EditMesh>,
}

impl SliceResult {
    /// True when the cut produced nothing.
    pub fn is_noop(&self) -> bool {
        self.positive.is_none() && self.negative.is_none()
    }
}

/// Accumulates one fragment while the source mesh is walked face by face.
///
/// `carried` maps source vertices to their copies so shared corners are not
/// duplicated; `cuts` does the same for plane crossings, keyed by undirected
/// edge so both faces flanking a cut edge reuse one vertex. Because all
/// sharing goes through these maps, twin links pair up by index as faces are
/// added and no positional re-linking is needed afterwards.
struct SideBuilder {
    mesh: EditMesh,
    carried: HashMap<u32, u32>,
    cuts: HashMap<u64, u32>,
    /// Directed seam segments, one per clipped face, chained into cap rings.
    seams: Vec<(u32, u32)>,
}

impl SideBuilder {
    fn new(tolerance: Tolerance) -> Self {
        Self {
            mesh: EditMesh::with_tolerance(tolerance),
            carried: HashMap::new(),
            cuts: HashMap::new(),
            seams: Vec::new(),
        }
    }

    /// Copies a source vertex into the fragment, reusing it on repeat visits.
    fn carry(&mut self, source: &EditMesh, vertex: u32) -> u32 {
        if let Some(&out) = self.carried.get(&vertex) {
            return out;
        }
        let mut dup = *source.vertex(vertex);
        dup.outgoing = NONE;
        dup.selected = false;
        let out = self.mesh.add_vertex(dup);
        self.carried.insert(vertex, out);
        out
    }

    /// Vertex where the edge `v -> w` pierces the plane.
    fn cut(&mut self, source: &EditMesh, plane: &Plane, v: u32, w: u32) -> u32 {
        let key = edge_key(v, w);
        if let Some(&out) = self.cuts.get(&key) {
            return out;
        }
        let a = source.vertex(v);
        let b = source.vertex(w);
        let d0 = plane.signed_distance(a.position);
        let d1 = plane.signed_distance(b.position);
        let out = self.mesh.add_vertex(Vertex::lerp(a, b, d0 / (d0 - d1)));
        self.cuts.insert(key, out);
        out
    }

    fn copy_face(&mut self, source: &EditMesh, ring: &[u32]) {
        let out: Vec<u32> = ring.iter().map(|&v| self.carry(source, v)).collect();
        self.mesh.add_face(&out).ok();
    }

    /// Adds a clipped ring, dropping consecutive duplicates a cut close to a
    /// corner can leave behind.
    fn add_ring(&mut self, ring: &[u32]) {
        let mut cleaned: Vec<u32> = Vec::with_capacity(ring.len());
        for &v in ring {
            if cleaned.last() != Some(&v) {
                cleaned.push(v);
            }
        }
        while cleaned.len() > 1 && cleaned.first() == cleaned.last() {
            cleaned.pop();
        }
        if cleaned.len() >= 3 {
            self.mesh.add_face(&cleaned).ok();
        }
    }

    /// Chains seam segments into loops and caps each closed loop with a face.
    ///
    /// Every clipped face leaves its seam edge running cut-exit to cut-entry,
    /// so the segments recorded entry-to-exit wind the opposite way and the
    /// cap twins with the fragment along the whole seam. Chains that do not
    /// close come from open sheets and are discarded.
    fn close_seams(&mut self) {
        let mut segments = std::mem::take(&mut self.seams);
        while let Some((start, first)) = segments.pop() {
            let mut ring = vec![start];
            let mut cursor = first;
            while cursor != start {
                ring.push(cursor);
                match segments.iter().position(|&(from, _)| from == cursor) {
                    Some(i) => cursor = segments.swap_remove(i).1,
                    None => break,
                }
            }
            if cursor == start && ring.len() >= 3 {
                self.mesh.add_face(&ring).ok();
            }
        }
    }

    fn finish(self) -> Option<EditMesh> {
        if self.mesh.face_count() > 0 {
            Some(self.mesh)
        } else {
            None
        }
    }
}

/// Cuts `mesh` with the plane through `center` with the given `normal` and
/// returns the two fragments as independent meshes.
///
/// The source mesh is left untouched. Cut vertices interpolate position,
/// normal, uv, and color along the crossing edge. Closed seams are capped so
/// a closed input produces closed fragments; a plane that misses the mesh or
/// only touches it tangentially yields a no-op result.
pub fn slice(mesh: &EditMesh, center: Point3, normal: Vector3) -> SliceResult {
    let Some(unit) = normal.try_normalize() else {
        tracing::warn!("slice rejected: degenerate plane normal");
        return SliceResult::default();
    };
    let plane = Plane::new(center, unit);

    let signs: Vec<i8> = mesh
        .vertices
        .iter()
        .map(|v| plane.classify_point(v.position, &mesh.tolerance))
        .collect();
    let has_positive = signs.iter().any(|&s| s > 0);
    let has_negative = signs.iter().any(|&s| s < 0);
    if !has_positive || !has_negative {
        tracing::warn!("slice rejected: plane does not cross the mesh");
        return SliceResult::default();
    }

    let mut positive = SideBuilder::new(mesh.tolerance);
    let mut negative = SideBuilder::new(mesh.tolerance);

    for face in 0..mesh.face_count() as u32 {
        if mesh.face(face).vertex_count < 3 {
            continue;
        }
        let ring = mesh.face_vertices(face);
        let face_negative = ring.iter().any(|&v| signs[v as usize] < 0);
        let face_positive = ring.iter().any(|&v| signs[v as usize] > 0);
        if !face_negative {
            positive.copy_face(mesh, &ring);
        } else if !face_positive {
            negative.copy_face(mesh, &ring);
        } else {
            split_face(mesh, &ring, &signs, &plane, &mut positive, &mut negative);
        }
    }

    positive.close_seams();
    negative.close_seams();
    tracing::debug!(
        positive_faces = positive.mesh.face_count(),
        negative_faces = negative.mesh.face_count(),
        "sliced mesh"
    );
    SliceResult {
        positive: positive.finish(),
        negative: negative.finish(),
    }
}

/// Clips one straddling face into both fragments and records the seam
/// segment each side gains.
fn split_face(
    source: &EditMesh,
    ring: &[u32],
    signs: &[i8],
    plane: &Plane,
    positive: &mut SideBuilder,
    negative: &mut SideBuilder,
) {
    let mut positive_ring: Vec<u32> = Vec::with_capacity(ring.len() + 2);
    let mut negative_ring: Vec<u32> = Vec::with_capacity(ring.len() + 2);
    let mut positive_entry = NONE;
    let mut positive_exit = NONE;
    let mut negative_entry = NONE;
    let mut negative_exit = NONE;

    for i in 0..ring.len() {
        let v = ring[i];
        let w = ring[(i + 1) % ring.len()];
        let sv = signs[v as usize];
        if sv >= 0 {
            positive_ring.push(positive.carry(source, v));
        }
        if sv <= 0 {
            negative_ring.push(negative.carry(source, v));
        }
        if sv * signs[w as usize] < 0 {
            let pv = positive.cut(source, plane, v, w);
            let nv = negative.cut(source, plane, v, w);
            positive_ring.push(pv);
            negative_ring.push(nv);
            if sv > 0 {
                positive_exit = pv;
                negative_entry = nv;
            } else {
                positive_entry = pv;
                negative_exit = nv;
            }
        }
    }

    positive.add_ring(&positive_ring);
    negative.add_ring(&negative_ring);
    // A seam endpoint can fall on an original vertex that sits exactly in the
    // plane band; the cap chain just stays open there.
    if positive_entry != NONE && positive_exit != NONE {
        positive.seams.push((positive_entry, positive_exit));
    }
    if negative_entry != NONE && negative_exit != NONE {
        negative.seams.push((negative_entry, negative_exit));
    }
}

/// Cuts every face straddling `plane` in place, without discarding either
/// side. Fragments inherit the face selection and share cut vertices, so the
/// new seam edges pair up as interior twins. Returns the number of faces
/// split.
pub(crate) fn split_faces_in_place(mesh: &mut EditMesh, plane: &Plane) -> usize {
    let signs: Vec<i8> = mesh
        .vertices
        .iter()
        .map(|v| plane.classify_point(v.position, &mesh.tolerance))
        .collect();

    let mut cuts: HashMap<u64, u32> = HashMap::new();
    let mut split = 0;
    for face in 0..mesh.face_count() as u32 {
        if mesh.face(face).vertex_count < 3 {
            continue;
        }
        let ring = mesh.face_vertices(face);
        let face_negative = ring.iter().any(|&v| signs[v as usize] < 0);
        let face_positive = ring.iter().any(|&v| signs[v as usize] > 0);
        if !face_negative || !face_positive {
            continue;
        }
        let selected = mesh.face(face).selected;

        let mut positive_ring: Vec<u32> = Vec::with_capacity(ring.len() + 2);
        let mut negative_ring: Vec<u32> = Vec::with_capacity(ring.len() + 2);
        for i in 0..ring.len() {
            let v = ring[i];
            let w = ring[(i + 1) % ring.len()];
            let sv = signs[v as usize];
            if sv >= 0 {
                positive_ring.push(v);
            }
            if sv <= 0 {
                negative_ring.push(v);
            }
            if sv * signs[w as usize] < 0 {
                let cut = match cuts.get(&edge_key(v, w)) {
                    Some(&cut) => cut,
                    None => {
                        let a = mesh.vertex(v);
                        let b = mesh.vertex(w);
                        let d0 = plane.signed_distance(a.position);
                        let d1 = plane.signed_distance(b.position);
                        let index = mesh.add_vertex(Vertex::lerp(a, b, d0 / (d0 - d1)));
                        cuts.insert(edge_key(v, w), index);
                        index
                    }
                };
                positive_ring.push(cut);
                negative_ring.push(cut);
            }
        }

        mesh.remove_face(face);
        for fragment in [positive_ring, negative_ring] {
            let mut cleaned: Vec<u32> = Vec::with_capacity(fragment.len());
            for &v in &fragment {
                if cleaned.last() != Some(&v) {
                    cleaned.push(v);
                }
            }
            if cleaned.len() >= 3 {
                if let Ok(added) = mesh.add_face(&cleaned) {
                    mesh.face_mut(added).selected = selected;
                }
            }
        }
        split += 1;
    }
    if split > 0 {
        mesh.rebuild_from_faces();
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hew_math::{vec2, vec3, vec4};
    use hew_topology::Vertex;

    fn surface_area(mesh: &EditMesh) -> f32 {
        let mut area = 0.0;
        for face in 0..mesh.face_count() as u32 {
            let ring = mesh.face_vertices(face);
            if ring.len() < 3 {
                continue;
            }
            let origin = mesh.vertex(ring[0]).position;
            for i in 1..ring.len() - 1 {
                let a = mesh.vertex(ring[i]).position - origin;
                let b = mesh.vertex(ring[i + 1]).position - origin;
                area += a.cross(b).length() * 0.5;
            }
        }
        area
    }

    fn boundary_count(mesh: &EditMesh) -> usize {
        mesh.half_edges_data()
            .iter()
            .filter(|he| he.twin == NONE)
            .count()
    }

    #[test]
    fn test_slice_cube_yields_two_closed_solids() {
        let cube = hew_mesh::cube(2.0).unwrap();
        let result = slice(&cube, vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));

        let upper = result.positive.unwrap();
        let lower = result.negative.unwrap();
        for half in [&upper, &lower] {
            assert_eq!(half.face_count(), 6);
            assert_eq!(half.vertex_count(), 8);
            assert_eq!(boundary_count(half), 0);
            assert!(half.is_valid());

            // Exactly one face lies in the cutting plane: the cap.
            let caps = (0..half.face_count() as u32)
                .filter(|&f| {
                    half.face_vertices(f)
                        .iter()
                        .all(|&v| half.vertex(v).position.y.abs() < 1e-5)
                })
                .count();
            assert_eq!(caps, 1);
        }

        // The fragments cover the original surface plus one 2x2 cap each.
        let total = surface_area(&upper) + surface_area(&lower);
        assert_relative_eq!(total, surface_area(&cube) + 8.0, epsilon = 1e-4);
    }

    #[test]
    fn test_slice_cap_faces_outward() {
        let cube = hew_mesh::cube(2.0).unwrap();
        let result = slice(&cube, vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));

        let upper = result.positive.unwrap();
        let cap = (0..upper.face_count() as u32)
            .find(|&f| {
                upper
                    .face_vertices(f)
                    .iter()
                    .all(|&v| upper.vertex(v).position.y.abs() < 1e-5)
            })
            .unwrap();
        // The upper fragment's cap points down, away from the kept half.
        assert!(upper.face_normal(cap).y < -0.99);
    }

    #[test]
    fn test_slice_missing_the_mesh_is_noop() {
        let cube = hew_mesh::cube(2.0).unwrap();
        let result = slice(&cube, vec3(0.0, 5.0, 0.0), vec3(0.0, 1.0, 0.0));
        assert!(result.is_noop());
    }

    #[test]
    fn test_slice_tangential_plane_is_noop() {
        let cube = hew_mesh::cube(2.0).unwrap();
        // Plane resting on the bottom face: nothing strictly below it.
        let result = slice(&cube, vec3(0.0, -1.0, 0.0), vec3(0.0, 1.0, 0.0));
        assert!(result.is_noop());
    }

    #[test]
    fn test_slice_open_sheet_leaves_seam_open() {
        let mut sheet = EditMesh::new();
        sheet.add_vertex(Vertex::at(vec3(0.0, 0.0, 0.0)));
        sheet.add_vertex(Vertex::at(vec3(1.0, 0.0, 0.0)));
        sheet.add_vertex(Vertex::at(vec3(1.0, 1.0, 0.0)));
        sheet.add_vertex(Vertex::at(vec3(0.0, 1.0, 0.0)));
        sheet.add_face(&[0, 1, 2, 3]).unwrap();

        let result = slice(&sheet, vec3(0.5, 0.0, 0.0), vec3(1.0, 0.0, 0.0));
        for half in [result.positive.unwrap(), result.negative.unwrap()] {
            assert_eq!(half.face_count(), 1);
            assert_eq!(half.vertex_count(), 4);
            assert_eq!(boundary_count(&half), 4);
            assert!(half.is_valid());
        }
    }

    #[test]
    fn test_slice_interpolates_vertex_attributes() {
        let mut sheet = EditMesh::new();
        sheet.add_vertex(Vertex::at(vec3(-1.0, -1.0, 0.0)));
        sheet.add_vertex(Vertex::at(vec3(1.0, -1.0, 0.0)));
        sheet.add_vertex(Vertex::at(vec3(1.0, 1.0, 0.0)));
        sheet.add_vertex(Vertex::at(vec3(-1.0, 1.0, 0.0)));
        for (v, (uv, color)) in [
            (vec2(0.0, 0.0), vec4(1.0, 0.0, 0.0, 1.0)),
            (vec2(1.0, 0.0), vec4(1.0, 0.0, 0.0, 1.0)),
            (vec2(1.0, 1.0), vec4(0.0, 0.0, 1.0, 1.0)),
            (vec2(0.0, 1.0), vec4(0.0, 0.0, 1.0, 1.0)),
        ]
        .into_iter()
        .enumerate()
        {
            sheet.vertex_mut(v as u32).uv = uv;
            sheet.vertex_mut(v as u32).color = color;
        }
        sheet.add_face(&[0, 1, 2, 3]).unwrap();

        let result = slice(&sheet, vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));
        let upper = result.positive.unwrap();
        let cut = (0..upper.vertex_count() as u32)
            .find(|&v| {
                let p = upper.vertex(v).position;
                p.x < -0.99 && p.y.abs() < 1e-5
            })
            .unwrap();
        let vertex = upper.vertex(cut);
        assert_relative_eq!(vertex.uv.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(vertex.uv.y, 0.5, epsilon = 1e-5);
        assert_relative_eq!(vertex.color.x, 0.5, epsilon = 1e-5);
        assert_relative_eq!(vertex.color.z, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_split_faces_in_place_links_fragments() {
        let mut wall = EditMesh::new();
        wall.add_vertex(Vertex::at(vec3(-1.0, -1.0, 0.0)));
        wall.add_vertex(Vertex::at(vec3(1.0, -1.0, 0.0)));
        wall.add_vertex(Vertex::at(vec3(1.0, 1.0, 0.0)));
        wall.add_vertex(Vertex::at(vec3(-1.0, 1.0, 0.0)));
        wall.add_face(&[0, 1, 2, 3]).unwrap();
        wall.select_face(0, false);

        let plane = Plane::new(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));
        assert_eq!(split_faces_in_place(&mut wall, &plane), 1);
        assert_eq!(wall.face_count(), 2);
        assert_eq!(wall.vertex_count(), 6);
        assert!(wall.is_valid());
        assert_eq!(wall.face_neighbors(0), vec![1]);
        // Both fragments keep the parent's selection.
        assert_eq!(wall.selected_faces().len(), 2);
    }
}
