//! Structural operators over the half-edge mesh.
//!
//! Every operator validates its input (usually the current selection) up
//! front and is a silent no-op when the preconditions fail; a warn-level
//! trace line records the rejection. Operators never push history snapshots
//! themselves — the caller decides when a UI action starts and calls
//! `save_state` once, however many operator invocations the action spans.
//!
//! Edits that remove or replace faces go through the same pattern: mark the
//! old faces for removal, add the replacement rings, then compact the mesh
//! with `rebuild_from_faces`, which also re-links twins and drops degenerate
//! rings.

pub mod boolean;
pub mod bridge;
pub mod delete;
pub mod edge_loop;
pub mod extrude;
pub mod flip;
pub mod hollow;
pub mod inset;
pub mod merge;
pub mod slice;
pub mod transform;

pub use boolean::boolean_cut;
pub use bridge::{bridge_edges, bridge_selected_edges};
pub use delete::{delete_faces, delete_selected_faces};
pub use edge_loop::insert_edge_loop;
pub use extrude::{extrude_faces, extrude_selected_faces};
pub use flip::flip_selected_normals;
pub use hollow::hollow;
pub use inset::inset_selected_faces;
pub use merge::{merge_selected_vertices, merge_vertices};
pub use slice::{slice, SliceResult};
pub use transform::{
    flatten_x, flatten_y, flatten_z, make_coplanar, rotate_selected_vertices,
    scale_selected_vertices, translate_selected_vertices,
};
