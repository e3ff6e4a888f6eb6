//! Renderer-facing cached vertex arrays.
//!
//! The polygon keeps its triangulated fill and its outline segments in
//! original spherical coordinates so consumers can draw them without
//! touching the face-local representation. Contents are valid until the
//! next mutating call on the owning polygon.

use glam::DVec3;

/// How a vertex array is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Consecutive vertex triples form triangles.
    Triangles,
    /// Consecutive vertex pairs form line segments.
    Lines,
}

/// A read-only list of unit-sphere vertices with a primitive type.
#[derive(Debug, Clone)]
pub struct VertexArray {
    primitive: Primitive,
    vertices: Vec<DVec3>,
}

impl VertexArray {
    pub(crate) fn new(primitive: Primitive) -> Self {
        Self {
            primitive,
            vertices: Vec::new(),
        }
    }

    #[inline]
    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The raw vertex bytes, for zero-copy upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub(crate) fn clear(&mut self) {
        self.vertices.clear();
    }

    pub(crate) fn extend(&mut self, vs: impl IntoIterator<Item = DVec3>) {
        self.vertices.extend(vs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_view_matches_vertex_count() {
        let mut a = VertexArray::new(Primitive::Triangles);
        a.extend([DVec3::X, DVec3::Y, DVec3::Z]);
        assert_eq!(a.len(), 3);
        assert_eq!(a.as_bytes().len(), 3 * 3 * std::mem::size_of::<f64>());
    }
}
