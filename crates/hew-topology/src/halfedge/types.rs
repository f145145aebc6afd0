//! Half-edge mesh element types.
//!
//! Elements live in flat vectors and reference each other by `u32` index;
//! [`NONE`] marks a missing reference. A half-edge without a twin is a
//! boundary edge, which is a perfectly valid state for an open mesh.

use hew_math::{Point2, Point3, Vec4, Vector3};
use serde::{Deserialize, Serialize};

/// Sentinel index meaning "no element".
pub const NONE: u32 = u32::MAX;

/// Mesh vertex with render attributes and its half-edge anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3,
    pub normal: Vector3,
    pub uv: Point2,
    /// RGBA vertex color.
    pub color: Vec4,
    /// One outgoing half-edge, or `NONE` for an isolated vertex.
    pub outgoing: u32,
    pub selected: bool,
}

impl Vertex {
    /// Vertex at `position` with default attributes and no topology.
    pub fn at(position: Point3) -> Self {
        Self {
            position,
            normal: Vector3::Z,
            uv: Point2::ZERO,
            color: Vec4::ONE,
            outgoing: NONE,
            selected: false,
        }
    }

    /// Linear blend of two vertices at parameter `t`.
    ///
    /// Position, uv, and color interpolate linearly; the normal is
    /// re-normalized after interpolating. Topology links are left unset.
    pub fn lerp(a: &Vertex, b: &Vertex, t: f32) -> Self {
        let normal = a.normal.lerp(b.normal, t);
        Self {
            position: a.position.lerp(b.position, t),
            normal: normal.try_normalize().unwrap_or(a.normal),
            uv: a.uv.lerp(b.uv, t),
            color: a.color.lerp(b.color, t),
            outgoing: NONE,
            selected: false,
        }
    }
}

/// Directed half of an undirected edge.
///
/// Stores the vertex it leaves from; the destination is the origin of
/// `next`. Every half-edge belongs to exactly one face ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfEdge {
    /// Vertex this half-edge leaves from.
    pub origin: u32,
    /// Owning face.
    pub face: u32,
    /// Next half-edge around the face, counter-clockwise.
    pub next: u32,
    /// Previous half-edge around the face.
    pub prev: u32,
    /// Opposite-direction half-edge, or `NONE` on a boundary.
    pub twin: u32,
}

/// Polygonal face: a ring of `vertex_count` half-edges starting at `first`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    /// First half-edge of the ring.
    pub first: u32,
    /// Ring length; `0` marks a face pending removal during an edit.
    pub vertex_count: u32,
    pub selected: bool,
}

/// Packed key for the undirected edge between two vertices.
///
/// The smaller index goes in the high bits, so both directions of an edge
/// map to the same key.
#[inline]
pub fn edge_key(v0: u32, v1: u32) -> u64 {
    let (lo, hi) = if v0 < v1 { (v0, v1) } else { (v1, v0) };
    ((lo as u64) << 32) | hi as u64
}
