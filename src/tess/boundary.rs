//! Boundary-loop extraction from a slab decomposition.
//!
//! A crossing where the winding rule flips contributes a boundary fragment
//! lying on its source edge, directed so the interior stays on the left.
//! Horizontal stretches of boundary are recovered from the difference of
//! the inside intervals on the two sides of each slab line. Fragments are
//! then stitched into closed loops on quantised endpoints, and collinear
//! runs from the same source edge are merged back into single edges.

use rustc_hash::FxHashMap;

use super::slab::{clusters, Arrangement, Slab, MIN_SLAB};

/// Endpoint quantum for stitching. Coarse enough to absorb skipped
/// degenerate slabs, fine enough to keep distinct vertices apart.
const QUANT: f64 = 1e-8;

#[derive(Debug, Clone, Copy)]
pub(super) struct LoopVertex {
    pub x: f64,
    pub y: f64,
    pub flag: bool,
}

#[derive(Debug, Clone)]
struct Fragment {
    fx: f64,
    fy: f64,
    tx: f64,
    ty: f64,
    flag: bool,
    src: u32,
}

#[inline]
fn quantise(x: f64, y: f64) -> (i64, i64) {
    ((x / QUANT).round() as i64, (y / QUANT).round() as i64)
}

pub(super) fn extract_loops(
    arr: &Arrangement,
    inside: impl Fn(i32) -> bool + Copy,
) -> Vec<Vec<LoopVertex>> {
    let mut frags: Vec<Fragment> = Vec::new();

    // Slanted fragments at rule transitions.
    for slab in &arr.slabs {
        let mut w = 0;
        for c in clusters(&slab.crossings) {
            let was = inside(w);
            w += c.delta;
            let now = inside(w);
            if now && !was {
                // Interior opens to the east; walk the fragment downward to
                // keep it on the left.
                frags.push(Fragment {
                    fx: c.x_hi,
                    fy: slab.y_hi,
                    tx: c.x_lo,
                    ty: slab.y_lo,
                    flag: c.flag,
                    src: c.src,
                });
            } else if !now && was {
                frags.push(Fragment {
                    fx: c.x_lo,
                    fy: slab.y_lo,
                    tx: c.x_hi,
                    ty: slab.y_hi,
                    flag: c.flag,
                    src: c.src,
                });
            }
        }
    }

    // Horizontal pieces where coverage changes across a slab line.
    for line in 0..=arr.slabs.len() {
        let below = if line > 0 { Some(&arr.slabs[line - 1]) } else { None };
        let above = arr.slabs.get(line);
        let y = match (below, above) {
            (_, Some(a)) => a.y_lo,
            (Some(b), None) => b.y_hi,
            (None, None) => continue,
        };
        let below_iv = below.map_or_else(Vec::new, |s| line_coverage(s, true, inside));
        let above_iv = above.map_or_else(Vec::new, |s| line_coverage(s, false, inside));
        let src = u32::MAX - line as u32;
        for (xa, xb) in subtract_intervals(&above_iv, &below_iv) {
            // Interior above only: walk east.
            frags.push(Fragment {
                fx: xa,
                fy: y,
                tx: xb,
                ty: y,
                flag: horizontal_flag(arr, y, xa, xb),
                src,
            });
        }
        for (xa, xb) in subtract_intervals(&below_iv, &above_iv) {
            // Interior below only: walk west.
            frags.push(Fragment {
                fx: xb,
                fy: y,
                tx: xa,
                ty: y,
                flag: horizontal_flag(arr, y, xa, xb),
                src,
            });
        }
    }

    stitch(frags)
}

fn line_coverage(slab: &Slab, top: bool, inside: impl Fn(i32) -> bool) -> Vec<(f64, f64)> {
    Arrangement::line_intervals(slab, top, inside)
}

/// OR of the edge flags of the input horizontal edges coincident with the
/// piece; a piece matching no input edge is an artificial seam.
fn horizontal_flag(arr: &Arrangement, y: f64, xa: f64, xb: f64) -> bool {
    arr.horizontals
        .iter()
        .filter(|h| (h.y - y).abs() < QUANT)
        .filter(|h| h.x1.min(xb) - h.x0.max(xa) > MIN_SLAB)
        .any(|h| h.flag)
}

/// Parts of `a` not covered by `b`; sub-quantum slivers are dropped.
fn subtract_intervals(a: &[(f64, f64)], b: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    for &(alo, ahi) in a {
        let mut lo = alo;
        for &(blo, bhi) in b {
            if bhi <= lo || blo >= ahi {
                continue;
            }
            if blo - lo > MIN_SLAB {
                out.push((lo, blo));
            }
            lo = lo.max(bhi);
            if lo >= ahi {
                break;
            }
        }
        if ahi - lo > MIN_SLAB {
            out.push((lo, ahi));
        }
    }
    out
}

fn stitch(frags: Vec<Fragment>) -> Vec<Vec<LoopVertex>> {
    let mut by_start: FxHashMap<(i64, i64), Vec<usize>> = FxHashMap::default();
    for (i, f) in frags.iter().enumerate() {
        by_start.entry(quantise(f.fx, f.fy)).or_default().push(i);
    }

    let mut used = vec![false; frags.len()];
    let mut loops = Vec::new();

    for s in 0..frags.len() {
        if used[s] {
            continue;
        }
        let start_key = quantise(frags[s].fx, frags[s].fy);
        let mut verts: Vec<(f64, f64, bool, u32)> = Vec::new();
        let mut cur = s;
        let closed = loop {
            used[cur] = true;
            let f = &frags[cur];
            verts.push((f.fx, f.fy, f.flag, f.src));
            let to = quantise(f.tx, f.ty);
            if to == start_key {
                break true;
            }
            let din = (f.tx - f.fx, f.ty - f.fy);
            match pick_next(&by_start, &used, &frags, to, din) {
                Some(n) => cur = n,
                // Dangling endpoint: the fragments of this loop are an
                // artefact of tolerance clipping; discard them.
                None => break false,
            }
        };
        if closed {
            if let Some(cleaned) = clean_loop(verts) {
                loops.push(cleaned);
            }
        }
    }
    loops
}

/// At a junction, continue along the outgoing fragment making the sharpest
/// left turn; with the interior kept on the left this separates loops that
/// merely touch at a vertex.
fn pick_next(
    by_start: &FxHashMap<(i64, i64), Vec<usize>>,
    used: &[bool],
    frags: &[Fragment],
    at: (i64, i64),
    din: (f64, f64),
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &i in by_start.get(&at)? {
        if used[i] {
            continue;
        }
        let f = &frags[i];
        let dout = (f.tx - f.fx, f.ty - f.fy);
        let cross = din.0 * dout.1 - din.1 * dout.0;
        let dot = din.0 * dout.0 + din.1 * dout.1;
        let angle = cross.atan2(dot);
        if best.map_or(true, |(_, a)| angle > a) {
            best = Some((i, angle));
        }
    }
    best.map(|(i, _)| i)
}

/// Merge collinear runs from the same source, drop coincident vertices,
/// and reject rings degenerated below a triangle.
fn clean_loop(verts: Vec<(f64, f64, bool, u32)>) -> Option<Vec<LoopVertex>> {
    let n = verts.len();
    let mut merged: Vec<(f64, f64, bool, u32)> = Vec::with_capacity(n);
    for i in 0..n {
        let prev_src = verts[(i + n - 1) % n].3;
        if verts[i].3 != prev_src {
            merged.push(verts[i]);
        }
    }

    let mut out: Vec<(f64, f64, bool, u32)> = Vec::with_capacity(merged.len());
    for v in merged {
        match out.last_mut() {
            Some(last) if (last.0 - v.0).abs() < QUANT && (last.1 - v.1).abs() < QUANT => {
                // The previous vertex's outgoing edge collapsed; it now
                // leaves along this vertex's edge.
                last.2 = v.2;
                last.3 = v.3;
            }
            _ => out.push(v),
        }
    }
    if out.len() >= 2 {
        let (first, last) = (out[0], *out.last().unwrap());
        if (first.0 - last.0).abs() < QUANT && (first.1 - last.1).abs() < QUANT {
            out.pop();
        }
    }

    if out.len() < 3 {
        return None;
    }
    Some(
        out.into_iter()
            .map(|(x, y, flag, _)| LoopVertex { x, y, flag })
            .collect(),
    )
}
