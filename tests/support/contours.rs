//! Shared contour generators for the integration tests.
//!
//! All contours are wound counter-clockwise as seen from outside the
//! sphere, so the enclosed region sits on the left of the walk.

use glam::DVec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::{PI, TAU};

/// Sample `n` points of the small circle of the given angular radius
/// around `axis`. The enclosed region is the cap around `axis`.
pub fn circle_contour(axis: DVec3, radius: f64, n: usize) -> Vec<DVec3> {
    let axis = axis.normalize();
    let seed = if axis.x.abs() <= axis.y.abs() && axis.x.abs() <= axis.z.abs() {
        DVec3::X
    } else if axis.y.abs() <= axis.z.abs() {
        DVec3::Y
    } else {
        DVec3::Z
    };
    let u = axis.cross(seed).normalize();
    let v = axis.cross(u);
    (0..n)
        .map(|i| {
            // Half-step offset keeps samples off the coordinate planes for
            // the axis-aligned cases.
            let t = (i as f64 + 0.5) / n as f64 * TAU;
            (radius.sin() * (t.cos() * u + t.sin() * v) + radius.cos() * axis).normalize()
        })
        .collect()
}

/// The equator sampled `n` times; encloses the northern hemisphere.
pub fn equator_contour(n: usize) -> Vec<DVec3> {
    (0..n)
        .map(|i| {
            let t = (i as f64 + 0.5) / n as f64 * TAU;
            DVec3::new(t.cos(), t.sin(), 0.0)
        })
        .collect()
}

/// A lune between the meridians `lon_west` and `lon_east` (radians,
/// `lon_west < lon_east`): down the western meridian, up the eastern one.
/// The ring stops just short of the poles so no vertex lands exactly on a
/// coordinate plane; the truncated polar corners are a few 1e-4 sr.
pub fn lune_contour(lon_west: f64, lon_east: f64, n: usize) -> Vec<DVec3> {
    let eps = 0.02;
    let meridian_point = |lon: f64, colat: f64| {
        DVec3::new(colat.sin() * lon.cos(), colat.sin() * lon.sin(), colat.cos())
    };
    let colat_at = |i: usize| eps + (PI - 2.0 * eps) * i as f64 / (n - 1) as f64;
    let mut out = Vec::with_capacity(2 * n);
    for i in 0..n {
        out.push(meridian_point(lon_west, colat_at(i)));
    }
    for i in (0..n).rev() {
        out.push(meridian_point(lon_east, colat_at(i)));
    }
    out
}

/// Random unit vectors, uniform on the sphere, deterministic per seed.
pub fn random_unit_vectors(n: usize, seed: u64) -> Vec<DVec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let z: f64 = rng.gen_range(-1.0..1.0);
            let theta: f64 = rng.gen_range(0.0..TAU);
            let r = (1.0 - z * z).sqrt();
            DVec3::new(r * theta.cos(), r * theta.sin(), z)
        })
        .collect()
}

/// Area of the spherical cap of the given angular radius.
pub fn cap_area(radius: f64) -> f64 {
    TAU * (1.0 - radius.cos())
}
