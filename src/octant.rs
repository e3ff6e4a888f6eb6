//! Octahedral face numbering and radial projection.
//!
//! The sphere is partitioned into the eight faces of the regularly
//! inscribed octahedron. Faces are indexed by the signs of `(x, y, z)` as
//! `4*[y<0] + 2*[x<0] + [z>=0]`, so southern octants take the even indices.
//! Even faces tessellate about the normal `(0,0,-1)` and odd faces about
//! `(0,0,+1)`; with input contours wound counter-clockwise as seen from
//! outside the sphere, every projected region then carries winding number
//! +1 about its face normal.

use glam::DVec3;

/// Direction through the centre of each octant face, in face order.
pub(crate) const SIDE_DIRECTIONS: [DVec3; 8] = [
    DVec3::new(1.0, 1.0, -1.0),
    DVec3::new(1.0, 1.0, 1.0),
    DVec3::new(-1.0, 1.0, -1.0),
    DVec3::new(-1.0, 1.0, 1.0),
    DVec3::new(1.0, -1.0, -1.0),
    DVec3::new(1.0, -1.0, 1.0),
    DVec3::new(-1.0, -1.0, -1.0),
    DVec3::new(-1.0, -1.0, 1.0),
];

/// Normal hint for the planar tessellation of a face.
#[inline]
pub(crate) fn face_normal_z(side: usize) -> f64 {
    if side % 2 == 0 {
        -1.0
    } else {
        1.0
    }
}

/// Index of the octant containing `p`. Points on a coordinate plane land on
/// the side the splitter classifies as `>= 0`.
#[inline]
pub(crate) fn side_number(p: DVec3) -> usize {
    4 * usize::from(p.y < 0.0) + 2 * usize::from(p.x < 0.0) + usize::from(p.z >= 0.0)
}

/// Radial projection of a unit vector onto the plane of face `side`,
/// keeping the face-local x/y and zeroing z.
#[inline]
pub(crate) fn project(v: DVec3, side: usize) -> DVec3 {
    let w = v / SIDE_DIRECTIONS[side].dot(v);
    DVec3::new(w.x, w.y, 0.0)
}

/// Inverse of [`project`]: recover the unit-sphere point from face-local
/// coordinates `(x, y, 0)`.
#[inline]
pub(crate) fn unproject(v: DVec3, side: usize) -> DVec3 {
    debug_assert!(v.z.abs() < 1e-6, "face vertex off the face plane: z = {}", v.z);
    let dir = SIDE_DIRECTIONS[side];
    let z = (1.0 - dir.x * v.x - dir.y * v.y) / dir.z;
    DVec3::new(v.x, v.y, z).normalize()
}
