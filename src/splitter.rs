//! Splitting of spherical contours by the three coordinate planes.
//!
//! A full three-plane split classifies a closed contour into the eight
//! octants: first by the Y plane, then X (yielding the four longitude
//! columns), then Z. Contours left open by the first two splits crossed the
//! pole region of their column and are closed on the matching pole before
//! the Z split.

use glam::DVec3;

use crate::geom;
use crate::types::{EdgeVertex, SubContour};

const POLE_EPS: f64 = 1e-8;

#[inline]
fn side_of(v: DVec3, axis: usize) -> usize {
    let c = match axis {
        0 => v.x,
        1 => v.y,
        _ => v.z,
    };
    usize::from(c < 0.0)
}

/// Cut a ring by the coordinate plane `axis`, appending the resulting rings
/// to `out[0]` (coordinate >= 0) and `out[1]` (coordinate < 0).
///
/// The ring is walked once with a rotation: the leading run of same-side
/// vertices is held aside and appended onto the final sub-contour, so a
/// ring that never crosses the plane comes back whole, flags untouched.
/// Synthesised transition vertices on the plane carry `edge_flag = false`
/// in both the closing and the opening sub-contour. When the great-circle/
/// plane intersection is ill-conditioned no vertex is synthesised: the
/// current sub-contour closes on the previous vertex with its last edge
/// flag cleared, and the next opens on the current vertex.
pub(crate) fn split_contour_by_plane(
    axis: usize,
    input: &SubContour,
    out: [&mut Vec<SubContour>; 2],
) {
    debug_assert!(!input.is_empty());
    let n = input.len();
    let mut current = SubContour::default();
    let mut unfinished = SubContour::default();
    let mut prev_side = side_of(input.first().vertex, axis);
    let mut cur_side = prev_side;
    let mut prev_vertex = *input.first();
    let mut i = 0;

    // Leading same-side run.
    while i < n {
        let v = input[i];
        cur_side = side_of(v.vertex, axis);
        if cur_side != prev_side {
            debug_assert!(current.is_empty());
            if let Some(p) = geom::great_circle_plane_intersection(prev_vertex.vertex, v.vertex, axis)
            {
                unfinished.push(EdgeVertex::new(p, false));
                current.push(EdgeVertex::new(p, false));
            }
            prev_side = cur_side;
            // The vertex at `i` is re-read by the main walk below.
            break;
        }
        unfinished.push(v);
        prev_vertex = v;
        i += 1;
    }

    // Main walk.
    while i < n {
        let v = input[i];
        cur_side = side_of(v.vertex, axis);
        if cur_side == prev_side {
            current.push(v);
        } else {
            match geom::great_circle_plane_intersection(prev_vertex.vertex, v.vertex, axis) {
                Some(p) => {
                    current.push(EdgeVertex::new(p, false));
                    out[prev_side].push(std::mem::take(&mut current));
                    current.push(EdgeVertex::new(p, false));
                    current.push(v);
                }
                None => {
                    if let Some(last) = current.0.last_mut() {
                        last.edge_flag = false;
                    }
                    out[prev_side].push(std::mem::take(&mut current));
                    current.push(EdgeVertex::new(v.vertex, false));
                }
            }
            prev_side = cur_side;
        }
        prev_vertex = v;
        i += 1;
    }

    // Closing edge from the last vertex back to the first.
    prev_side = cur_side;
    cur_side = side_of(input.first().vertex, axis);
    if cur_side != prev_side {
        match geom::great_circle_plane_intersection(prev_vertex.vertex, input.first().vertex, axis)
        {
            Some(p) => {
                current.push(EdgeVertex::new(p, false));
                out[prev_side].push(std::mem::take(&mut current));
                current.push(EdgeVertex::new(p, false));
            }
            None => {
                if let Some(last) = current.0.last_mut() {
                    last.edge_flag = false;
                }
                out[prev_side].push(std::mem::take(&mut current));
            }
        }
    }

    // Rotate the held-aside leading run onto the final sub-contour.
    current.0.extend_from_slice(&unfinished.0);
    if !current.is_empty() {
        out[cur_side].push(current);
    }
}

/// Classify a closed spherical contour into the eight octants.
///
/// The returned sub-contours are still in spherical coordinates; the
/// caller projects them onto the face planes.
pub(crate) fn split_onto_octants(contour: &SubContour) -> [Vec<SubContour>; 8] {
    let mut y_pos = Vec::new();
    let mut y_neg = Vec::new();
    split_contour_by_plane(1, contour, [&mut y_pos, &mut y_neg]);

    let mut quadrants: [Vec<SubContour>; 4] = Default::default();
    {
        let [q0, q1, q2, q3] = &mut quadrants;
        for sub in &y_pos {
            split_contour_by_plane(0, sub, [&mut *q0, &mut *q1]);
        }
        for sub in &y_neg {
            split_contour_by_plane(0, sub, [&mut *q2, &mut *q3]);
        }
    }

    // Contours whose last edge flag is false were opened by the splits and
    // cross from one side of their column to the other over a pole; close
    // them on the pole picked by the z sign of first x last. Contours whose
    // closing run stays on one meridian need nothing.
    for quad in quadrants.iter_mut() {
        for sub in quad.iter_mut() {
            if sub.last().edge_flag {
                continue;
            }
            let v = sub.first().vertex.cross(sub.last().vertex);
            if v.z > POLE_EPS {
                sub.push(EdgeVertex::new(DVec3::Z, false));
            } else if v.z < -POLE_EPS {
                sub.push(EdgeVertex::new(DVec3::NEG_Z, false));
            }
        }
    }

    let mut sides: [Vec<SubContour>; 8] = Default::default();
    for (q, quad) in quadrants.iter().enumerate() {
        let mut north = Vec::new();
        let mut south = Vec::new();
        for sub in quad {
            split_contour_by_plane(2, sub, [&mut north, &mut south]);
        }
        // Northern octants sit at the odd indices.
        sides[2 * q + 1] = north;
        sides[2 * q] = south;
    }
    sides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64, f64)]) -> SubContour {
        let vs: Vec<DVec3> = points.iter().map(|&(x, y, z)| DVec3::new(x, y, z)).collect();
        SubContour::from_spherical(&vs, true)
    }

    #[test]
    fn uncrossed_ring_comes_back_whole() {
        let c = ring(&[(1.0, 0.2, 0.1), (0.5, 1.0, 0.2), (0.3, 0.3, 1.0)]);
        let mut pos = Vec::new();
        let mut neg = Vec::new();
        split_contour_by_plane(0, &c, [&mut pos, &mut neg]);
        assert_eq!(pos.len(), 1);
        assert!(neg.is_empty());
        assert_eq!(pos[0], c);
    }

    #[test]
    fn crossing_ring_splits_on_the_plane() {
        // A ring straddling the X plane.
        let c = ring(&[
            (1.0, 0.1, 0.5),
            (1.0, 1.0, 0.5),
            (-1.0, 1.0, 0.5),
            (-1.0, 0.1, 0.5),
        ]);
        let mut pos = Vec::new();
        let mut neg = Vec::new();
        split_contour_by_plane(0, &c, [&mut pos, &mut neg]);
        assert_eq!(pos.len(), 1);
        assert_eq!(neg.len(), 1);
        for sub in pos.iter() {
            assert!(sub.iter().all(|v| v.vertex.x >= 0.0));
        }
        for sub in neg.iter() {
            assert!(sub.iter().all(|v| v.vertex.x < 1e-12));
        }
        // Each side gained exactly two synthetic seam vertices on the plane.
        for sub in pos.iter().chain(neg.iter()) {
            let seams: Vec<_> = sub.iter().filter(|v| !v.edge_flag).collect();
            assert_eq!(seams.len(), 2);
            for s in &seams {
                assert!(s.vertex.x.abs() < 1e-12);
            }
        }
    }

    #[test]
    fn octant_split_respects_all_three_planes() {
        let c = ring(&[
            (1.0, 0.3, 0.4),
            (0.2, 1.0, -0.3),
            (-0.8, 0.5, 0.6),
            (-0.2, -1.0, 0.1),
            (0.6, -0.4, -0.9),
        ]);
        let sides = split_onto_octants(&c);
        // No sub-contour may hold vertices strictly on both sides of any of
        // the three coordinate planes.
        for (i, subs) in sides.iter().enumerate() {
            for sub in subs {
                for axis in 0..3 {
                    let coord = |v: &EdgeVertex| match axis {
                        0 => v.vertex.x,
                        1 => v.vertex.y,
                        _ => v.vertex.z,
                    };
                    let min = sub.iter().map(coord).fold(f64::INFINITY, f64::min);
                    let max = sub.iter().map(coord).fold(f64::NEG_INFINITY, f64::max);
                    assert!(
                        min > -1e-12 || max < 1e-12,
                        "face {} sub-contour straddles plane {}: [{}, {}]",
                        i,
                        axis,
                        min,
                        max
                    );
                }
            }
        }
    }

    #[test]
    fn equator_ring_closes_on_the_north_pole() {
        // Counter-clockwise from outside, interior = northern hemisphere.
        let pts: Vec<(f64, f64, f64)> = (0..16)
            .map(|i| {
                let t = (i as f64 + 0.5) / 16.0 * std::f64::consts::TAU;
                (t.cos(), t.sin(), 0.0)
            })
            .collect();
        let sides = split_onto_octants(&ring(&pts));
        for q in 0..4 {
            assert!(sides[2 * q].is_empty(), "southern face {} not empty", 2 * q);
            assert_eq!(sides[2 * q + 1].len(), 1);
            let sub = &sides[2 * q + 1][0];
            let poles: Vec<_> = sub
                .iter()
                .filter(|v| (v.vertex - DVec3::Z).length() < 1e-9)
                .collect();
            assert_eq!(poles.len(), 1, "face {} pole vertices", 2 * q + 1);
            assert!(!poles[0].edge_flag);
        }
    }

    #[test]
    fn south_circle_closes_on_the_south_pole() {
        // A small circle of colatitude 150 degrees, counter-clockwise from
        // outside: interior is the south polar cap, walked westward.
        let colat: f64 = 150f64.to_radians();
        let pts: Vec<(f64, f64, f64)> = (0..12)
            .map(|i| {
                let t = -(i as f64 + 0.5) / 12.0 * std::f64::consts::TAU;
                (colat.sin() * t.cos(), colat.sin() * t.sin(), colat.cos())
            })
            .collect();
        let sides = split_onto_octants(&ring(&pts));
        for q in 0..4 {
            assert!(sides[2 * q + 1].is_empty(), "northern face {} not empty", 2 * q + 1);
            assert_eq!(sides[2 * q].len(), 1);
            let sub = &sides[2 * q][0];
            assert!(sub
                .iter()
                .any(|v| (v.vertex - DVec3::NEG_Z).length() < 1e-9 && !v.edge_flag));
        }
    }
}
