//! Conservative bounding spherical cap.

use glam::DVec3;

/// A spherical cap `{ v : n . v >= d }` conservatively enclosing a polygon.
///
/// `n` is the cap axis, `d` the minimum dot product of any boundary point
/// with the axis. `d = 2` encloses nothing (the empty polygon), `d = -2`
/// encloses the whole sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingCap {
    pub n: DVec3,
    pub d: f64,
}

impl BoundingCap {
    /// Cap covering nothing; every reject test against it succeeds.
    pub(crate) const EMPTY: BoundingCap = BoundingCap { n: DVec3::X, d: 2.0 };

    /// Cap covering the whole sphere.
    pub(crate) const FULL: BoundingCap = BoundingCap { n: DVec3::X, d: -2.0 };

    /// Compute the cap from the polygon's outline vertices: the axis is the
    /// normalised vertex sum, the aperture the minimum dot product, widened
    /// slightly so tangent points never misclassify.
    pub(crate) fn from_outline(points: &[DVec3]) -> BoundingCap {
        if points.is_empty() {
            return BoundingCap::EMPTY;
        }
        let sum: DVec3 = points.iter().sum();
        // An outline spread symmetrically over the sphere (an equator ring,
        // say) sums to nearly zero; any axis then works since d ends up
        // close to -1 and the cap stays conservative.
        let n = if sum.length_squared() < 1e-20 {
            DVec3::X
        } else {
            sum.normalize()
        };
        let mut d: f64 = 1.0;
        for v in points {
            d = d.min(n.dot(*v));
        }
        d *= if d > 0.0 { 0.9999999 } else { 1.0000001 };
        debug_assert!(points.iter().all(|v| n.dot(*v) >= d));
        BoundingCap { n, d }
    }

    /// True when the two caps can share a point. Conservative: may return
    /// true for caps that merely touch.
    pub(crate) fn intersects(&self, other: &BoundingCap) -> bool {
        let a = self.d * other.d - self.n.dot(other.n);
        self.d + other.d <= 0.0
            || a <= 0.0
            || (a <= 1.0 && a * a <= (1.0 - self.d * self.d) * (1.0 - other.d * other.d))
    }

    /// True when this cap wholly contains `other`. Necessary (never
    /// sufficient) for the polygon inside `other` to be contained in the
    /// polygon inside `self`.
    pub(crate) fn contains(&self, other: &BoundingCap) -> bool {
        // The squared test below is only meaningful for d in [-1, 1]; a cap
        // at or past the antipode covers the whole sphere.
        if self.d <= -1.0 {
            return true;
        }
        let a = self.n.dot(other.n) - self.d * other.d;
        self.d <= other.d
            && (a >= 1.0
                || (a >= 0.0 && a * a >= (1.0 - self.d * self.d) * (1.0 - other.d * other.d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(n: DVec3, d: f64) -> BoundingCap {
        BoundingCap { n: n.normalize(), d }
    }

    #[test]
    fn disjoint_small_caps_do_not_intersect() {
        let a = cap(DVec3::Z, 0.9);
        let b = cap(DVec3::NEG_Z, 0.9);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn overlapping_caps_intersect() {
        let a = cap(DVec3::Z, 0.5);
        let b = cap(DVec3::new(0.0, 0.6, 0.8), 0.5);
        assert!(a.intersects(&b));
    }

    #[test]
    fn hemispheres_always_intersect_something() {
        let a = cap(DVec3::Z, 0.0);
        let b = cap(DVec3::NEG_Z, 0.0);
        // Two closed hemispheres share the equator.
        assert!(a.intersects(&b));
    }

    #[test]
    fn nested_caps_contain() {
        let big = cap(DVec3::Z, 0.2);
        let small = cap(DVec3::new(0.1, 0.0, 1.0), 0.9);
        assert!(big.contains(&small));
        assert!(!small.contains(&big));
    }

    #[test]
    fn tilted_cap_not_contained() {
        let a = cap(DVec3::Z, 0.5);
        let b = cap(DVec3::X, 0.5);
        assert!(!a.contains(&b));
    }

    #[test]
    fn full_cap_contains_everything_empty_nothing() {
        let c = cap(DVec3::new(0.3, -0.2, 0.9), 0.7);
        assert!(BoundingCap::FULL.contains(&c));
        assert!(!BoundingCap::EMPTY.contains(&c));
        // A wide cap far from the full cap's nominal +X axis; the squared
        // test alone would reject it.
        let wide = cap(DVec3::NEG_X, 70f64.to_radians().cos());
        assert!(BoundingCap::FULL.contains(&wide));
    }

    #[test]
    fn outline_cap_encloses_every_point() {
        let pts: Vec<DVec3> = (0..16)
            .map(|i| {
                let t = i as f64 / 16.0 * std::f64::consts::TAU;
                DVec3::new(0.3 * t.cos(), 0.3 * t.sin(), 1.0).normalize()
            })
            .collect();
        let c = BoundingCap::from_outline(&pts);
        for p in &pts {
            assert!(c.n.dot(*p) >= c.d);
        }
        assert!(c.d > 0.8);
    }

    #[test]
    fn empty_outline_gets_the_empty_cap() {
        assert_eq!(BoundingCap::from_outline(&[]), BoundingCap::EMPTY);
    }
}
