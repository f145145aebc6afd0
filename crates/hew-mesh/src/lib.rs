//! Conversions between the editable half-edge mesh and flat triangle
//! buffers, plus primitive shape builders.

pub mod buffer;
pub mod build;
pub mod primitives;
pub mod triangulate;

pub use buffer::TriangleBuffer;
pub use build::{build_from_quads, build_from_triangles, merge_triangles_to_quads};
pub use primitives::{cube, cuboid, cylinder, sphere};
pub use triangulate::{triangulate, triangulate_skipping};
