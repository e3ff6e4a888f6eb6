//! Core vertex and contour types.

use glam::DVec3;

/// A polygon vertex together with the nature of its outgoing edge.
///
/// `edge_flag` is a property of the edge *leaving* this vertex toward the
/// next vertex in the ring: `true` means the edge is part of the true
/// polygon boundary, `false` means it is an artificial seam introduced by
/// octahedral splitting and must not appear in outline output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeVertex {
    pub vertex: DVec3,
    pub edge_flag: bool,
}

impl EdgeVertex {
    #[inline]
    pub const fn new(vertex: DVec3, edge_flag: bool) -> Self {
        Self { vertex, edge_flag }
    }
}

/// An ordered, non-empty sequence of vertices forming a single closed ring;
/// the last vertex implicitly connects back to the first.
///
/// After octahedral classification every vertex of a sub-contour lies on,
/// or on one chosen side of, each of the three coordinate planes, so a
/// sub-contour always belongs entirely to one octant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubContour(pub(crate) Vec<EdgeVertex>);

impl SubContour {
    /// Build a ring from spherical vertices. Non-unit input is normalised.
    ///
    /// When `closed` is true every edge is real boundary. When false the
    /// first and last edge flags are cleared: the inbound edge of the first
    /// vertex and the implied last-to-first edge are artificial.
    pub fn from_spherical(vertices: &[DVec3], closed: bool) -> Self {
        let mut ring: Vec<EdgeVertex> = vertices
            .iter()
            .map(|v| EdgeVertex::new(v.normalize(), true))
            .collect();
        if !closed {
            if let Some(first) = ring.first_mut() {
                first.edge_flag = false;
            }
            if let Some(last) = ring.last_mut() {
                last.edge_flag = false;
            }
        }
        SubContour(ring)
    }

    /// The ring with vertex order reversed.
    ///
    /// Because an edge flag describes the *outgoing* edge of its vertex,
    /// reversing the ring also shifts every flag by one position: the flag
    /// that described edge `v[i] -> v[i+1]` ends up on the vertex the
    /// reversed ring leaves along that same edge. `reversed()` applied
    /// twice is the identity.
    pub fn reversed(&self) -> SubContour {
        let n = self.0.len();
        let mut out = Vec::with_capacity(n);
        for j in 0..n {
            let vertex = self.0[n - 1 - j].vertex;
            let edge_flag = self.0[(2 * n - 2 - j) % n].edge_flag;
            out.push(EdgeVertex::new(vertex, edge_flag));
        }
        SubContour(out)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, EdgeVertex> {
        self.0.iter()
    }

    #[inline]
    pub(crate) fn first(&self) -> &EdgeVertex {
        &self.0[0]
    }

    #[inline]
    pub(crate) fn last(&self) -> &EdgeVertex {
        &self.0[self.0.len() - 1]
    }

    #[inline]
    pub(crate) fn push(&mut self, v: EdgeVertex) {
        self.0.push(v);
    }
}

impl std::ops::Index<usize> for SubContour {
    type Output = EdgeVertex;

    #[inline]
    fn index(&self, i: usize) -> &EdgeVertex {
        &self.0[i]
    }
}

impl<'a> IntoIterator for &'a SubContour {
    type Item = &'a EdgeVertex;
    type IntoIter = std::slice::Iter<'a, EdgeVertex>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64, f64)]) -> SubContour {
        let vs: Vec<DVec3> = points.iter().map(|&(x, y, z)| DVec3::new(x, y, z)).collect();
        SubContour::from_spherical(&vs, true)
    }

    #[test]
    fn closed_ring_has_all_edges_real() {
        let c = ring(&[(1.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 0.0, 1.0)]);
        assert_eq!(c.len(), 3);
        assert!(c.iter().all(|v| v.edge_flag));
    }

    #[test]
    fn open_ring_clears_terminal_flags() {
        let vs = [DVec3::X, DVec3::Y, DVec3::Z, DVec3::new(1.0, 1.0, 0.0)];
        let c = SubContour::from_spherical(&vs, false);
        assert!(!c[0].edge_flag);
        assert!(c[1].edge_flag);
        assert!(c[2].edge_flag);
        assert!(!c[3].edge_flag);
    }

    #[test]
    fn from_spherical_normalises_input() {
        let c = ring(&[(2.0, 0.0, 0.0), (0.0, 3.0, 0.0), (0.0, 0.0, 0.5)]);
        for v in c.iter() {
            assert!((v.vertex.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn reversed_keeps_flags_on_their_edges() {
        // Ring a -> b -> c -> d with the edge b -> c artificial.
        let mut c = ring(&[(1.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 0.0, 1.0), (1.0, 0.0, 1.0)]);
        c.0[1].edge_flag = false;
        let r = c.reversed();
        // Reversed order is d, c, b, a; the edge c -> b in the reversed ring
        // is the same physical edge b -> c, so the flag must sit on c.
        assert_eq!(r[0].vertex, c[3].vertex);
        assert_eq!(r[1].vertex, c[2].vertex);
        assert!(!r[1].edge_flag);
        assert!(r[0].edge_flag);
        assert!(r[2].edge_flag);
        assert!(r[3].edge_flag);
    }

    #[test]
    fn reversed_twice_is_identity() {
        let mut c = ring(&[(1.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 0.0, 1.0), (1.0, 1.0, 1.0)]);
        c.0[0].edge_flag = false;
        c.0[2].edge_flag = false;
        assert_eq!(c.reversed().reversed(), c);
    }
}
