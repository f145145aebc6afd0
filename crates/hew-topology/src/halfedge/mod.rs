//! Half-edge mesh storage and topological queries.

mod bounding;
mod iter;
mod loops;
pub mod mesh;
mod rebuild;
pub mod types;
mod validate;

pub use iter::FaceHalfEdgeIter;
pub use mesh::EditMesh;
pub use types::{edge_key, Face, HalfEdge, Vertex, NONE};
