use super::mesh::EditMesh;

/// Iterator over the half-edge ring of a face (follows `next` pointers).
///
/// Bounded by the face's stored `vertex_count`, so a corrupt `next` chain
/// can never loop forever. A face marked for removal yields nothing.
pub struct FaceHalfEdgeIter<'a> {
    mesh: &'a EditMesh,
    current: u32,
    remaining: u32,
}

impl<'a> FaceHalfEdgeIter<'a> {
    pub fn new(mesh: &'a EditMesh, first: u32, count: u32) -> Self {
        Self {
            mesh,
            current: first,
            remaining: count,
        }
    }
}

impl<'a> Iterator for FaceHalfEdgeIter<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.current;
        self.current = self.mesh.half_edges[current as usize].next;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl EditMesh {
    /// Iterate over the half-edges around a face.
    pub fn face_half_edges(&self, face: u32) -> FaceHalfEdgeIter<'_> {
        let face = &self.faces[face as usize];
        FaceHalfEdgeIter::new(self, face.first, face.vertex_count)
    }
}
