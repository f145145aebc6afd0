//! Edge loop insertion.
//!
//! Follows the quad ring perpendicular to a seed edge and cuts every quad in
//! it with `segments` evenly spaced lines, splitting each ring quad into
//! `segments + 1` quads. A non-quad face bordering a cut edge is not
//! subdivided; the new vertices are spliced into its ring instead, so it
//! grows into an n-gon and the surface stays stitched.

use std::collections::{HashMap, HashSet};

use hew_topology::{edge_key, EditMesh, Vertex};

/// Inserts `segments` parallel loops across the quad ring seeded by
/// `seed_edge`. Returns the number of quads the loop passed through, 0 when
/// the seed does not sit on a quad ring.
pub fn insert_edge_loop(mesh: &mut EditMesh, seed_edge: u32, segments: u32) -> usize {
    if segments == 0 {
        tracing::warn!("edge loop rejected: zero segments");
        return 0;
    }
    if seed_edge >= mesh.half_edge_count() as u32 {
        tracing::warn!(seed_edge, "edge loop rejected: no such half-edge");
        return 0;
    }
    let (pairs, closed) = mesh.ring_quads(seed_edge);
    if pairs.is_empty() {
        tracing::warn!(seed_edge, "edge loop rejected: seed is not on a quad");
        return 0;
    }

    // Ring corners per quad: the entry half-edge spans a->b, the exit spans
    // c->d, and d closes back to a. The cut runs from edge (a,b) across to
    // edge (d,c), parameterized the same way on both so the loop stays
    // straight.
    let mut quads = Vec::with_capacity(pairs.len());
    let mut ring_faces = HashSet::new();
    for &(entry, exit) in &pairs {
        let face = mesh.half_edge(entry).face;
        let (a, b) = mesh.edge_vertices(entry);
        let (c, d) = mesh.edge_vertices(exit);
        ring_faces.insert(face);
        quads.push((face, a, b, c, d, mesh.face(face).selected));
    }

    // One shared row of split vertices per undirected edge, stored from the
    // smaller vertex index to the larger.
    let mut splits: HashMap<u64, Vec<u32>> = HashMap::new();
    for &(_, a, b, c, d, _) in &quads {
        ensure_splits(mesh, &mut splits, a, b, segments);
        ensure_splits(mesh, &mut splits, d, c, segments);
    }

    let face_total = mesh.face_count() as u32;
    for &(face, a, b, c, d, selected) in &quads {
        let mut bottom = vec![a];
        bottom.extend(splits_between(&splits, a, b));
        bottom.push(b);
        let mut top = vec![d];
        top.extend(splits_between(&splits, d, c));
        top.push(c);

        mesh.remove_face(face);
        for k in 0..bottom.len() - 1 {
            if let Ok(new_face) =
                mesh.add_face(&[bottom[k], bottom[k + 1], top[k + 1], top[k]])
            {
                mesh.face_mut(new_face).selected = selected;
            }
        }
    }

    // Splice split vertices into untouched faces that border a cut edge.
    for face in 0..face_total {
        if ring_faces.contains(&face) {
            continue;
        }
        let ring = mesh.face_vertices(face);
        if ring.len() < 3 {
            continue;
        }
        let crosses = ring
            .iter()
            .enumerate()
            .any(|(i, &u)| splits.contains_key(&edge_key(u, ring[(i + 1) % ring.len()])));
        if !crosses {
            continue;
        }
        let selected = mesh.face(face).selected;
        let mut spliced = Vec::with_capacity(ring.len() + segments as usize);
        for (i, &u) in ring.iter().enumerate() {
            spliced.push(u);
            spliced.extend(splits_between(&splits, u, ring[(i + 1) % ring.len()]));
        }
        mesh.remove_face(face);
        if let Ok(new_face) = mesh.add_face(&spliced) {
            mesh.face_mut(new_face).selected = selected;
        }
    }

    mesh.rebuild_from_faces();
    tracing::debug!(quads = pairs.len(), segments, closed, "inserted edge loop");
    pairs.len()
}

fn ensure_splits(
    mesh: &mut EditMesh,
    splits: &mut HashMap<u64, Vec<u32>>,
    from: u32,
    to: u32,
    segments: u32,
) {
    let key = edge_key(from, to);
    if splits.contains_key(&key) {
        return;
    }
    let (lo, hi) = if from < to { (from, to) } else { (to, from) };
    let a = *mesh.vertex(lo);
    let b = *mesh.vertex(hi);
    let row = (1..=segments)
        .map(|k| {
            let t = k as f32 / (segments + 1) as f32;
            mesh.add_vertex(Vertex::lerp(&a, &b, t))
        })
        .collect();
    splits.insert(key, row);
}

/// Split vertices on the edge (from, to), ordered from `from` to `to`.
fn splits_between(splits: &HashMap<u64, Vec<u32>>, from: u32, to: u32) -> Vec<u32> {
    match splits.get(&edge_key(from, to)) {
        Some(cached) if from < to => cached.clone(),
        Some(cached) => cached.iter().rev().copied().collect(),
        None => Vec::new(),
    }
}
