//! The octahedron polygon: per-face contours, boolean algebra and caches.

use std::sync::OnceLock;

use glam::DVec3;

use crate::arrays::{Primitive, VertexArray};
use crate::cap::BoundingCap;
use crate::geom;
use crate::octant::{self, SIDE_DIRECTIONS};
use crate::splitter;
use crate::tess::{self, WindingRule};
use crate::types::{EdgeVertex, SubContour};

/// Area slack below which a union that fails to grow proves containment.
const CONTAINS_AREA_EPS: f64 = 1e-11;

/// An arbitrary region on the unit sphere, held as the radial projection of
/// the region onto the eight faces of the inscribed octahedron.
///
/// Each face stores a list of closed 2D sub-contours in face-local
/// coordinates. Boolean operations append the other operand's contours
/// (reversed for subtraction) and re-tessellate each face under a winding
/// rule; the triangulated fill, the outline segments and a conservative
/// bounding cap are cached in spherical coordinates after every mutation.
///
/// Input contours are closed rings of unit vectors wound counter-clockwise
/// as seen from outside the sphere. A polygon is not internally
/// synchronised: mutate from one thread at a time; quiescent polygons may
/// be read from many.
#[derive(Debug, Clone)]
pub struct OctahedronPolygon {
    pub(crate) sides: [Vec<SubContour>; 8],
    fill: VertexArray,
    outline: VertexArray,
    pub(crate) cap: BoundingCap,
}

impl Default for OctahedronPolygon {
    fn default() -> Self {
        Self::empty()
    }
}

impl OctahedronPolygon {
    /// The empty polygon.
    pub fn empty() -> Self {
        Self {
            sides: Default::default(),
            fill: VertexArray::new(Primitive::Triangles),
            outline: VertexArray::new(Primitive::Lines),
            cap: BoundingCap::EMPTY,
        }
    }

    /// Build from a single closed contour. Non-unit vectors are normalised.
    pub fn from_contour(contour: &[DVec3]) -> Self {
        Self::build(std::iter::once(SubContour::from_spherical(contour, true)))
    }

    /// Build from a list of closed contours.
    pub fn from_contours(contours: &[Vec<DVec3>]) -> Self {
        Self::build(contours.iter().map(|c| SubContour::from_spherical(c, true)))
    }

    /// Build from a pre-assembled ring, open or closed.
    pub fn from_sub_contour(contour: &SubContour) -> Self {
        Self::build(std::iter::once(contour.clone()))
    }

    fn build(contours: impl Iterator<Item = SubContour>) -> Self {
        let mut poly = Self::empty();
        for c in contours {
            if !c.is_empty() {
                poly.append_sub_contour(&c);
            }
        }
        poly.tessellate(WindingRule::Positive);
        poly.update_vertex_array();
        poly
    }

    /// The polygon covering the whole sphere, built once and shared.
    ///
    /// Every face holds its face-filling triangle with all edge flags
    /// false, so the all-sky polygon has fill but no outline.
    pub fn all_sky() -> &'static OctahedronPolygon {
        static ALL_SKY: OnceLock<OctahedronPolygon> = OnceLock::new();
        ALL_SKY.get_or_init(|| {
            let mut poly = OctahedronPolygon::empty();
            for side in 0..8 {
                let dir = SIDE_DIRECTIONS[side];
                let a = DVec3::ZERO;
                let b = DVec3::new(dir.x, 0.0, 0.0);
                let c = DVec3::new(0.0, dir.y, 0.0);
                // Wind for +1 about the face normal: counter-clockwise in
                // standard orientation on the odd (northern) faces.
                let ccw = side % 2 == 1;
                let ring = if (dir.x * dir.y > 0.0) == ccw {
                    [a, b, c]
                } else {
                    [a, c, b]
                };
                poly.sides[side] = vec![SubContour(
                    ring.iter().map(|&v| EdgeVertex::new(v, false)).collect(),
                )];
            }
            poly.update_vertex_array();
            // The full sphere admits no proper bounding cap, and the
            // empty-outline default would reject every candidate; widen the
            // cap to cover everything instead.
            poly.cap = BoundingCap::FULL;
            poly
        })
    }

    /// Split a spherical ring across the three planes, project the pieces
    /// and file them on their faces. Raw building block: no tessellation,
    /// no cache refresh.
    fn append_sub_contour(&mut self, contour: &SubContour) {
        let octants = splitter::split_onto_octants(contour);
        for (i, subs) in octants.into_iter().enumerate() {
            for mut sub in subs {
                for v in sub.0.iter_mut() {
                    v.vertex = octant::project(v.vertex, i);
                }
                self.sides[i].push(sub);
            }
        }
    }

    /// Append `other`'s face contours to this polygon's, face by face.
    /// Raw building block: no tessellation, no cache refresh.
    pub fn append(&mut self, other: &Self) {
        for i in 0..8 {
            self.sides[i].extend(other.sides[i].iter().cloned());
        }
    }

    /// Like [`append`](Self::append) with every appended ring reversed, so
    /// its area cancels under positive winding.
    pub fn append_reversed(&mut self, other: &Self) {
        for i in 0..8 {
            for sub in &other.sides[i] {
                self.sides[i].push(sub.reversed());
            }
        }
    }

    /// Grow this polygon to the union with `other`.
    ///
    /// When the bounding caps are disjoint the two regions are independent
    /// and concatenation alone is exact; the tessellation pass is skipped.
    pub fn union_in_place(&mut self, other: &Self) {
        let overlapping = self.cap.intersects(&other.cap);
        self.append(other);
        if overlapping {
            self.tessellate(WindingRule::Positive);
        }
        self.update_vertex_array();
    }

    /// Shrink this polygon to the intersection with `other`: the area
    /// covered at least twice after concatenation. Disjoint bounding caps
    /// make the result empty outright.
    pub fn intersection_in_place(&mut self, other: &Self) {
        if !self.cap.intersects(&other.cap) {
            self.sides = Default::default();
            self.update_vertex_array();
            return;
        }
        self.append(other);
        self.tessellate(WindingRule::AbsGeqTwo);
        self.update_vertex_array();
    }

    /// Remove `other`'s region from this polygon. Disjoint bounding caps
    /// leave it unchanged.
    pub fn subtraction_in_place(&mut self, other: &Self) {
        if !self.cap.intersects(&other.cap) {
            return;
        }
        self.append_reversed(other);
        self.tessellate(WindingRule::Positive);
        self.update_vertex_array();
    }

    /// Whether the two polygons share any area.
    pub fn intersects(&self, other: &Self) -> bool {
        if !self.cap.intersects(&other.cap) {
            return false;
        }
        let mut probe = self.clone();
        probe.intersection_in_place(other);
        !probe.is_empty()
    }

    /// Whether `other` lies entirely inside this polygon: their union must
    /// not grow this polygon's area.
    pub fn contains(&self, other: &Self) -> bool {
        if !self.cap.contains(&other.cap) {
            return false;
        }
        let mut probe = self.clone();
        probe.union_in_place(other);
        probe.area() - self.area() < CONTAINS_AREA_EPS
    }

    /// Whether the point `p` (a unit vector) lies inside this polygon.
    pub fn contains_point(&self, p: DVec3) -> bool {
        if self.sides[octant::side_number(p)].is_empty() {
            return false;
        }
        self.fill
            .vertices()
            .chunks_exact(3)
            .any(|t| geom::spherical_triangle_contains(t[0], t[1], t[2], p))
    }

    /// Total area in square radians, summed over the cached triangles by
    /// Girard's theorem.
    pub fn area(&self) -> f64 {
        self.fill
            .vertices()
            .chunks_exact(3)
            .map(|t| geom::girard_area(t[0], t[1], t[2]))
            .sum()
    }

    /// A point inside the polygon, or `None` when it is empty.
    pub fn point_inside(&self) -> Option<DVec3> {
        let v = self.fill.vertices();
        if v.len() < 3 {
            return None;
        }
        Some((v[0] + v[1] + v[2]).normalize())
    }

    /// True when all eight face lists are empty.
    pub fn is_empty(&self) -> bool {
        self.sides.iter().all(|s| s.is_empty())
    }

    /// The cached triangle list on the unit sphere.
    #[inline]
    pub fn fill_vertex_array(&self) -> &VertexArray {
        &self.fill
    }

    /// The cached outline segment list on the unit sphere. Seam edges
    /// introduced by octahedral splitting never appear here.
    #[inline]
    pub fn outline_vertex_array(&self) -> &VertexArray {
        &self.outline
    }

    /// The conservative bounding cap `(axis, min_dot)`.
    #[inline]
    pub fn bounding_cap(&self) -> (DVec3, f64) {
        (self.cap.n, self.cap.d)
    }

    /// Normalise every face's contour list under `rule`, resolving planar
    /// overlap into non-self-intersecting boundary loops.
    pub(crate) fn tessellate(&mut self, rule: WindingRule) {
        for side in 0..8 {
            if self.sides[side].is_empty() {
                continue;
            }
            self.sides[side] =
                tess::tessellate_boundary(&self.sides[side], rule, octant::face_normal_z(side));
        }
    }

    /// Rebuild the spherical caches: triangulate each non-empty face,
    /// unproject, collect the outline segments whose either endpoint flag
    /// is real, and recompute the bounding cap.
    pub(crate) fn update_vertex_array(&mut self) {
        let face = |side: usize| -> (Vec<DVec3>, Vec<DVec3>) {
            let subs = &self.sides[side];
            if subs.is_empty() {
                return (Vec::new(), Vec::new());
            }
            let mut fill =
                tess::tessellate_triangles(subs, WindingRule::Positive, octant::face_normal_z(side));
            debug_assert_eq!(fill.len() % 3, 0);
            for v in fill.iter_mut() {
                *v = octant::unproject(*v, side);
            }
            let mut outline = Vec::new();
            for c in subs {
                let n = c.len();
                for j in 0..n {
                    let v = &c[j];
                    let w = &c[(j + 1) % n];
                    if v.edge_flag || w.edge_flag {
                        outline.push(octant::unproject(v.vertex, side));
                        outline.push(octant::unproject(w.vertex, side));
                    }
                }
            }
            (fill, outline)
        };

        #[cfg(feature = "rayon")]
        let parts: Vec<(Vec<DVec3>, Vec<DVec3>)> = {
            use rayon::prelude::*;
            (0..8usize).into_par_iter().map(face).collect()
        };
        #[cfg(not(feature = "rayon"))]
        let parts: Vec<(Vec<DVec3>, Vec<DVec3>)> = (0..8usize).map(face).collect();

        self.fill.clear();
        self.outline.clear();
        for (fill, outline) in parts {
            self.fill.extend(fill);
            self.outline.extend(outline);
        }
        self.cap = BoundingCap::from_outline(self.outline.vertices());
    }
}
