//! Edge loop and edge ring traversal over quad regions.
//!
//! A loop continues "straight through" the vertex at the head of an edge,
//! a ring marches sideways across quad strips. Both stop at boundaries and
//! at non-quad faces, and detect closed cycles.

use std::collections::HashSet;

use super::mesh::EditMesh;
use super::types::{edge_key, NONE};

impl EditMesh {
    /// Next edge of the loop through `half_edge`: straight across the quad
    /// fan at its destination vertex.
    pub fn next_loop_edge(&self, half_edge: u32) -> Option<u32> {
        let he = &self.half_edges[half_edge as usize];
        if !self.is_quad(he.face) {
            return None;
        }
        let across = self.half_edges[he.next as usize].twin;
        if across == NONE || !self.is_quad(self.half_edges[across as usize].face) {
            return None;
        }
        Some(self.half_edges[across as usize].next)
    }

    /// Previous edge of the loop through `half_edge`; mirror of
    /// [`next_loop_edge`](Self::next_loop_edge) through the origin vertex.
    pub fn prev_loop_edge(&self, half_edge: u32) -> Option<u32> {
        let he = &self.half_edges[half_edge as usize];
        if !self.is_quad(he.face) {
            return None;
        }
        let across = self.half_edges[he.prev as usize].twin;
        if across == NONE || !self.is_quad(self.half_edges[across as usize].face) {
            return None;
        }
        Some(self.half_edges[across as usize].prev)
    }

    /// Edge loop through `half_edge`, walked in both directions.
    ///
    /// Contains the starting half-edge. The walk stops at boundaries and
    /// non-quad faces; a closed loop is returned once around without
    /// duplicates.
    pub fn edge_loop(&self, half_edge: u32) -> Vec<u32> {
        let mut visited = HashSet::new();
        visited.insert(half_edge);
        let mut forward = vec![half_edge];

        let mut closed = false;
        let mut current = half_edge;
        while let Some(next) = self.next_loop_edge(current) {
            if next == half_edge {
                closed = true;
                break;
            }
            if !visited.insert(next) {
                break;
            }
            forward.push(next);
            current = next;
        }

        if !closed {
            let mut current = half_edge;
            let mut backward = Vec::new();
            while let Some(prev) = self.prev_loop_edge(current) {
                if prev == half_edge || !visited.insert(prev) {
                    break;
                }
                backward.push(prev);
                current = prev;
            }
            backward.reverse();
            backward.extend(forward);
            return backward;
        }
        forward
    }

    /// Quads of the ring strip through `half_edge`, as (entry, exit) pairs
    /// of their two strip-parallel half-edges, and whether the strip closes
    /// on itself.
    ///
    /// Each surviving quad appears once; the walk extends both ways from
    /// the seed for open strips. Empty when the seed edge borders no quad.
    pub fn ring_quads(&self, half_edge: u32) -> (Vec<(u32, u32)>, bool) {
        let mut seed = half_edge;
        if !self.is_quad(self.half_edges[seed as usize].face) {
            let twin = self.half_edges[seed as usize].twin;
            if twin == NONE || !self.is_quad(self.half_edges[twin as usize].face) {
                return (Vec::new(), false);
            }
            seed = twin;
        }

        let mut pairs = Vec::new();
        let mut visited_faces = HashSet::new();
        let mut closed = false;

        let mut current = seed;
        loop {
            let face = self.half_edges[current as usize].face;
            if !self.is_quad(face) || !visited_faces.insert(face) {
                break;
            }
            let exit = {
                let next = self.half_edges[current as usize].next;
                self.half_edges[next as usize].next
            };
            pairs.push((current, exit));
            let twin = self.half_edges[exit as usize].twin;
            if twin == NONE {
                break;
            }
            if twin == seed {
                closed = true;
                break;
            }
            current = twin;
        }

        if !closed {
            let twin = self.half_edges[seed as usize].twin;
            if twin != NONE {
                let mut current = twin;
                loop {
                    let face = self.half_edges[current as usize].face;
                    if !self.is_quad(face) || !visited_faces.insert(face) {
                        break;
                    }
                    let exit = {
                        let next = self.half_edges[current as usize].next;
                        self.half_edges[next as usize].next
                    };
                    pairs.push((current, exit));
                    let next_twin = self.half_edges[exit as usize].twin;
                    if next_twin == NONE {
                        break;
                    }
                    current = next_twin;
                }
            }
        }
        (pairs, closed)
    }

    /// Edge ring through `half_edge`: one half-edge per strip-parallel edge
    /// of the quad strip, including the seed's own edge.
    pub fn edge_ring(&self, half_edge: u32) -> Vec<u32> {
        let (pairs, _) = self.ring_quads(half_edge);
        let mut seen = HashSet::new();
        let mut ring = Vec::new();
        for (entry, exit) in pairs {
            for he in [entry, exit] {
                let (v0, v1) = self.edge_vertices(he);
                if seen.insert(edge_key(v0, v1)) {
                    ring.push(he);
                }
            }
        }
        ring
    }
}
