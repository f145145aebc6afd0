//! Half-edge mesh editing kernel.
//!
//! The central type is [`EditMesh`]: a mutable half-edge mesh with flat
//! `u32`-indexed element storage, element selection flags, and an undo/redo
//! history of full snapshots. Topological queries (rings, loops, adjacency)
//! and ray picking live here; the modelling operators that consume them are
//! layered on top in separate crates.

pub mod halfedge;
pub mod history;
pub mod raycast;
pub mod selection;

pub use halfedge::{edge_key, EditMesh, Face, HalfEdge, Vertex, NONE};
pub use history::{MeshSnapshot, MAX_UNDO_LEVELS};
pub use raycast::{MeshRayHit, EDGE_PICK_RADIUS, VERTEX_PICK_RADIUS};
pub use selection::SelectionMode;
