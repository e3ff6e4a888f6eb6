//! Planar tessellation of face contours under a winding rule.
//!
//! This is the adapter the polygon core drives once per face: either a
//! triangulation of the selected region (fill output) or its boundary
//! loops (normalisation of the face's sub-contour list). Both modes take a
//! face-normal hint of `(0,0,±1)`; winding numbers and output orientation
//! are taken counter-clockwise about that normal. Faces tessellated about
//! `-Z` are handled by mirroring x, running the standard scan, and
//! mirroring back.

mod boundary;
mod slab;

use std::sync::atomic::{AtomicU64, Ordering};

use glam::DVec3;

use crate::types::{EdgeVertex, SubContour};
use slab::{clusters, Arrangement, Cluster};

/// Twice-signed-area threshold below which an output triangle is
/// considered degenerate.
const DEGENERATE_AREA2: f64 = 1e-14;

/// Inclusion rule applied to planar winding numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindingRule {
    /// Inside where the signed winding number is positive.
    Positive,
    /// Inside where the region is covered at least twice in either
    /// orientation; realises intersection by contour concatenation.
    AbsGeqTwo,
}

impl WindingRule {
    #[inline]
    pub(crate) fn contains(self, winding: i32) -> bool {
        match self {
            WindingRule::Positive => winding > 0,
            WindingRule::AbsGeqTwo => winding.abs() >= 2,
        }
    }
}

static TESSELLATION_PASSES: AtomicU64 = AtomicU64::new(0);

/// Number of per-face tessellation passes (either mode) run by this
/// process so far. Diagnostic instrumentation; the bounding-cap short
/// circuits are observable as operations that leave this untouched.
pub fn tessellation_pass_count() -> u64 {
    TESSELLATION_PASSES.load(Ordering::Relaxed)
}

#[inline]
fn count_pass() {
    TESSELLATION_PASSES.fetch_add(1, Ordering::Relaxed);
}

#[inline]
fn check_face_plane(contours: &[SubContour]) {
    debug_assert!(
        contours
            .iter()
            .flat_map(|c| c.iter())
            .all(|v| v.vertex.z.abs() < 1e-6),
        "face contour vertex off the face plane"
    );
}

/// Triangulate the region of `contours` selected by `rule`, as a flat list
/// of face-local vertices, three per triangle, each triangle wound
/// counter-clockwise about the normal hint. Degenerate or mis-oriented
/// trapezoid output is discarded.
pub(crate) fn tessellate_triangles(
    contours: &[SubContour],
    rule: WindingRule,
    normal_z: f64,
) -> Vec<DVec3> {
    count_pass();
    check_face_plane(contours);
    let mirror = normal_z < 0.0;
    let sign = if mirror { -1.0 } else { 1.0 };
    let arr = Arrangement::build(contours, mirror);

    let mut out = Vec::new();
    for s in &arr.slabs {
        let mut w = 0;
        let mut open: Option<Cluster> = None;
        for c in clusters(&s.crossings) {
            let was = rule.contains(w);
            w += c.delta;
            let now = rule.contains(w);
            if now && !was {
                open = Some(c);
            } else if !now && was {
                if let Some(left) = open.take() {
                    emit_trapezoid(&mut out, &left, &c, s.y_lo, s.y_hi, sign);
                }
            }
        }
        debug_assert_eq!(w, 0, "contours not closed");
    }
    out
}

fn emit_trapezoid(out: &mut Vec<DVec3>, left: &Cluster, right: &Cluster, y_lo: f64, y_hi: f64, sign: f64) {
    let bl = (left.x_lo, y_lo);
    let br = (right.x_lo, y_lo);
    let tr = (right.x_hi, y_hi);
    let tl = (left.x_hi, y_hi);
    for (a, b, c) in [(bl, br, tr), (bl, tr, tl)] {
        let area2 = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
        if area2 > DEGENERATE_AREA2 {
            out.push(DVec3::new(sign * a.0, a.1, 0.0));
            out.push(DVec3::new(sign * b.0, b.1, 0.0));
            out.push(DVec3::new(sign * c.0, c.1, 0.0));
        }
    }
}

/// Replace `contours` by the boundary loops of the region selected by
/// `rule`: non-self-intersecting, wound counter-clockwise about the normal
/// hint (holes clockwise), with edge flags carried from the source edges
/// and synthesised vertices taking the OR of their contributors.
pub(crate) fn tessellate_boundary(
    contours: &[SubContour],
    rule: WindingRule,
    normal_z: f64,
) -> Vec<SubContour> {
    count_pass();
    check_face_plane(contours);
    let mirror = normal_z < 0.0;
    let sign = if mirror { -1.0 } else { 1.0 };
    let arr = Arrangement::build(contours, mirror);

    boundary::extract_loops(&arr, |w| rule.contains(w))
        .into_iter()
        .map(|ring| {
            SubContour(
                ring.into_iter()
                    .map(|v| EdgeVertex::new(DVec3::new(sign * v.x, v.y, 0.0), v.flag))
                    .collect(),
            )
        })
        .collect()
}
