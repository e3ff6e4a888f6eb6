//! Spherical and planar geometric primitives.

use glam::DVec3;

use std::f64::consts::PI;

/// Squared-length threshold below which a great-circle/plane intersection
/// direction is considered ill-conditioned (near-colinear or near-antipodal
/// edge endpoints).
const INTERSECTION_EPS2: f64 = 1e-20;

/// Intersection of the great circle through `p1` and `p2` with the
/// coordinate plane whose normal is the given axis (0 = X, 1 = Y, 2 = Z).
///
/// Returns the unit vector on the minor arc side (positive dot with
/// `p1 + p2`), or `None` when the direction is numerically ill-conditioned.
pub(crate) fn great_circle_plane_intersection(p1: DVec3, p2: DVec3, axis: usize) -> Option<DVec3> {
    let plane = match axis {
        0 => DVec3::X,
        1 => DVec3::Y,
        _ => DVec3::Z,
    };
    let dir = p1.cross(p2).cross(plane);
    if dir.length_squared() < INTERSECTION_EPS2 {
        return None;
    }
    let dir = dir.normalize();
    if dir.dot(p1 + p2) < 0.0 {
        Some(-dir)
    } else {
        Some(dir)
    }
}

/// True iff `p` lies on the interior side of the oriented great circle
/// through `a` and `b`: `(a x b) . p >= 0`.
#[inline]
pub fn side_half_space_contains(a: DVec3, b: DVec3, p: DVec3) -> bool {
    a.cross(b).dot(p) >= 0.0
}

/// True iff the spherical triangle `(a, b, c)`, stored counter-clockwise as
/// seen from outside the sphere, contains `p`.
#[inline]
pub fn spherical_triangle_contains(a: DVec3, b: DVec3, c: DVec3, p: DVec3) -> bool {
    side_half_space_contains(a, b, p)
        && side_half_space_contains(b, c, p)
        && side_half_space_contains(c, a, p)
}

/// Area of the spherical triangle `(a, b, c)` in square radians, by
/// Girard's theorem on the angles between the edge-plane normals.
pub(crate) fn girard_area(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    let n1 = a.cross(b);
    let n2 = b.cross(c);
    let n3 = c.cross(a);
    if n1.length_squared() < INTERSECTION_EPS2
        || n2.length_squared() < INTERSECTION_EPS2
        || n3.length_squared() < INTERSECTION_EPS2
    {
        // Two vertices coincide; the triangle encloses nothing.
        return 0.0;
    }
    2.0 * PI - n1.angle_between(n2) - n2.angle_between(n3) - n3.angle_between(n1)
}

/// Cartesian to spherical: returns `(ra, dec)` in radians, with
/// `ra` in `(-pi, pi]` and `dec` in `[-pi/2, pi/2]`.
pub(crate) fn rect_to_sphe(v: DVec3) -> (f64, f64) {
    let ra = v.y.atan2(v.x);
    let r = v.length();
    let dec = if r > 0.0 {
        (v.z / r).clamp(-1.0, 1.0).asin()
    } else {
        0.0
    };
    (ra, dec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_intersection_lies_on_plane_and_arc() {
        let p1 = DVec3::new(1.0, 0.5, 0.2).normalize();
        let p2 = DVec3::new(1.0, -0.5, 0.3).normalize();
        let v = great_circle_plane_intersection(p1, p2, 1).expect("well conditioned");
        assert!(v.y.abs() < 1e-12);
        assert!((v.length() - 1.0).abs() < 1e-12);
        // On the great circle through p1 and p2.
        assert!(p1.cross(p2).dot(v).abs() < 1e-12);
        // On the minor arc side.
        assert!(v.dot(p1 + p2) > 0.0);
    }

    #[test]
    fn plane_intersection_rejects_degenerate_edges() {
        let p = DVec3::new(0.3, 0.4, 0.5).normalize();
        assert!(great_circle_plane_intersection(p, p, 0).is_none());
        assert!(great_circle_plane_intersection(p, -p, 2).is_none());
        // An edge lying in the plane itself has no single crossing point.
        let a = DVec3::new(1.0, 0.0, 0.0);
        let b = DVec3::new(0.0, 0.0, 1.0);
        assert!(great_circle_plane_intersection(a, b, 1).is_none());
    }

    #[test]
    fn octant_triangle_contains_its_centroid() {
        let a = DVec3::X;
        let b = DVec3::Y;
        let c = DVec3::Z;
        let centroid = (a + b + c).normalize();
        assert!(spherical_triangle_contains(a, b, c, centroid));
        assert!(!spherical_triangle_contains(a, b, c, -centroid));
        // Reversed orientation does not contain the centroid.
        assert!(!spherical_triangle_contains(c, b, a, centroid));
    }

    #[test]
    fn octant_triangle_area_is_half_pi() {
        let area = girard_area(DVec3::X, DVec3::Y, DVec3::Z);
        assert!((area - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_triangle_area_is_zero() {
        assert_eq!(girard_area(DVec3::X, DVec3::X, DVec3::Y), 0.0);
    }

    #[test]
    fn rect_to_sphe_poles_and_equator() {
        let (ra, dec) = rect_to_sphe(DVec3::X);
        assert!(ra.abs() < 1e-12 && dec.abs() < 1e-12);
        let (_, dec) = rect_to_sphe(DVec3::Z);
        assert!((dec - PI / 2.0).abs() < 1e-12);
        let (ra, _) = rect_to_sphe(DVec3::Y);
        assert!((ra - PI / 2.0).abs() < 1e-12);
    }
}
