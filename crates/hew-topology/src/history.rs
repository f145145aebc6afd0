//! Undo/redo history as full mesh snapshots.
//!
//! Operators never snapshot on their own: the caller records one state per
//! user-facing action with [`EditMesh::save_state`], so a compound edit
//! undoes as a single step. Snapshots capture the raw element storage and
//! the edge selection; the undirected edge map is derived data and is
//! rebuilt on restore.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::halfedge::{EditMesh, Face, HalfEdge, Vertex};

/// Oldest states fall off once the undo stack reaches this depth.
pub const MAX_UNDO_LEVELS: usize = 50;

/// Complete copyable mesh state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshSnapshot {
    pub vertices: Vec<Vertex>,
    pub half_edges: Vec<HalfEdge>,
    pub faces: Vec<Face>,
    pub selected_edges: BTreeSet<u32>,
}

impl EditMesh {
    /// Copies the current state into a snapshot.
    pub fn to_snapshot(&self) -> MeshSnapshot {
        MeshSnapshot {
            vertices: self.vertices.clone(),
            half_edges: self.half_edges.clone(),
            faces: self.faces.clone(),
            selected_edges: self.selected_edges.clone(),
        }
    }

    fn restore(&mut self, snapshot: MeshSnapshot) {
        self.vertices = snapshot.vertices;
        self.half_edges = snapshot.half_edges;
        self.faces = snapshot.faces;
        self.selected_edges = snapshot.selected_edges;
        self.rebuild_edge_map_preserving_twins();
    }

    /// Records the current state as an undo point and clears the redo
    /// stack. Call once before each user-facing edit.
    pub fn save_state(&mut self) {
        if self.undo_stack.len() >= MAX_UNDO_LEVELS {
            self.undo_stack.remove(0);
        }
        let snapshot = self.to_snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
    }

    /// Rolls back to the most recent undo point. Returns `false` when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = self.to_snapshot();
        self.redo_stack.push(current);
        self.restore(snapshot);
        true
    }

    /// Re-applies the most recently undone state. Returns `false` when
    /// there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.to_snapshot();
        self.undo_stack.push(current);
        self.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drops all recorded history without touching the mesh.
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
