//! Slab (trapezoidal) decomposition of a set of planar contours.
//!
//! Slab boundaries sit at every vertex ordinate and every pairwise edge
//! intersection ordinate, so edges never cross strictly inside a slab and
//! the left-to-right order of edge crossings is constant there. Winding
//! numbers then accumulate along each slab in a single scan.

use crate::types::SubContour;

/// Edges flatter than this are treated as horizontal; slabs thinner than
/// this are degenerate and skipped. Stitching downstream absorbs the
/// resulting sub-quantum gaps.
pub(super) const MIN_SLAB: f64 = 1e-9;

/// Coincident-crossing clustering width.
pub(super) const CLUSTER_EPS: f64 = 1e-12;

/// A non-horizontal edge, endpoints ordered by ascending y.
#[derive(Debug, Clone)]
pub(super) struct Edge {
    pub x_lo: f64,
    pub y_lo: f64,
    pub x_hi: f64,
    pub y_hi: f64,
    /// Winding-scan delta when a left-to-right scan passes this edge:
    /// +1 for an edge travelled downward, -1 for upward.
    pub delta: i32,
    pub flag: bool,
}

impl Edge {
    pub(super) fn x_at(&self, y: f64) -> f64 {
        if y <= self.y_lo {
            self.x_lo
        } else if y >= self.y_hi {
            self.x_hi
        } else {
            let t = (y - self.y_lo) / (self.y_hi - self.y_lo);
            self.x_lo + t * (self.x_hi - self.x_lo)
        }
    }
}

/// A horizontal edge at ordinate `y`, span ordered `x0 < x1`.
#[derive(Debug, Clone)]
pub(super) struct HorizontalEdge {
    pub y: f64,
    pub x0: f64,
    pub x1: f64,
    pub flag: bool,
}

/// One edge passing through one slab.
#[derive(Debug, Clone)]
pub(super) struct Crossing {
    pub x_lo: f64,
    pub x_mid: f64,
    pub x_hi: f64,
    pub delta: i32,
    pub flag: bool,
    pub edge: u32,
}

#[derive(Debug)]
pub(super) struct Slab {
    pub y_lo: f64,
    pub y_hi: f64,
    /// Sorted left to right by midline abscissa.
    pub crossings: Vec<Crossing>,
}

/// A maximal run of coincident crossings, merged for the winding scan.
/// Coincident opposite edges cancel here instead of producing zero-width
/// regions.
#[derive(Debug, Clone)]
pub(super) struct Cluster {
    pub x_lo: f64,
    pub x_hi: f64,
    pub delta: i32,
    pub flag: bool,
    pub src: u32,
}

pub(super) fn clusters(crossings: &[Crossing]) -> Vec<Cluster> {
    let mut out = Vec::with_capacity(crossings.len());
    let mut i = 0;
    while i < crossings.len() {
        let first = &crossings[i];
        let mut delta = first.delta;
        let mut flag = first.flag;
        let mut src = first.edge;
        let mut j = i + 1;
        while j < crossings.len()
            && (crossings[j].x_mid - crossings[j - 1].x_mid).abs() < CLUSTER_EPS
            && (crossings[j].x_lo - first.x_lo).abs() < CLUSTER_EPS
        {
            delta += crossings[j].delta;
            flag |= crossings[j].flag;
            src = src.min(crossings[j].edge);
            j += 1;
        }
        out.push(Cluster {
            x_lo: first.x_lo,
            x_hi: first.x_hi,
            delta,
            flag,
            src,
        });
        i = j;
    }
    out
}

/// The full decomposition of one face's contour set.
#[derive(Debug)]
pub(super) struct Arrangement {
    pub horizontals: Vec<HorizontalEdge>,
    pub slabs: Vec<Slab>,
}

impl Arrangement {
    /// Build from face-local contours, optionally mirroring x (used to run
    /// the standard y-up/x-right scan for faces tessellated about `-Z`).
    pub(super) fn build(contours: &[SubContour], mirror: bool) -> Arrangement {
        let sign = if mirror { -1.0 } else { 1.0 };
        let mut edges: Vec<Edge> = Vec::new();
        let mut horizontals: Vec<HorizontalEdge> = Vec::new();
        let mut events: Vec<f64> = Vec::new();

        for contour in contours {
            let n = contour.len();
            for i in 0..n {
                let v = &contour[i];
                let w = &contour[(i + 1) % n];
                let (x0, y0) = (sign * v.vertex.x, v.vertex.y);
                let (x1, y1) = (sign * w.vertex.x, w.vertex.y);
                if (y1 - y0).abs() < MIN_SLAB {
                    if (x1 - x0).abs() >= CLUSTER_EPS {
                        horizontals.push(HorizontalEdge {
                            y: 0.5 * (y0 + y1),
                            x0: x0.min(x1),
                            x1: x0.max(x1),
                            flag: v.edge_flag,
                        });
                        events.push(0.5 * (y0 + y1));
                    }
                    continue;
                }
                let (x_lo, y_lo, x_hi, y_hi, delta) = if y0 < y1 {
                    // Travelled upward: a scan passing it leaves an upward
                    // edge behind, so the winding to the right drops.
                    (x0, y0, x1, y1, -1)
                } else {
                    (x1, y1, x0, y0, 1)
                };
                events.push(y_lo);
                events.push(y_hi);
                edges.push(Edge {
                    x_lo,
                    y_lo,
                    x_hi,
                    y_hi,
                    delta,
                    flag: v.edge_flag,
                });
            }
        }

        // Pairwise interior intersections become slab boundaries too.
        for i in 0..edges.len() {
            for j in (i + 1)..edges.len() {
                if let Some(y) = intersection_ordinate(&edges[i], &edges[j]) {
                    events.push(y);
                }
            }
        }

        events.sort_by(|a, b| a.partial_cmp(b).expect("finite ordinates"));
        events.dedup();

        let mut slabs = Vec::new();
        for pair in events.windows(2) {
            let (y_lo, y_hi) = (pair[0], pair[1]);
            if y_hi - y_lo < MIN_SLAB {
                continue;
            }
            let mut crossings: Vec<Crossing> = Vec::new();
            for (id, e) in edges.iter().enumerate() {
                if e.y_lo <= y_lo && e.y_hi >= y_hi {
                    let x_lo = e.x_at(y_lo);
                    let x_hi = e.x_at(y_hi);
                    crossings.push(Crossing {
                        x_lo,
                        x_mid: 0.5 * (x_lo + x_hi),
                        x_hi,
                        delta: e.delta,
                        flag: e.flag,
                        edge: id as u32,
                    });
                }
            }
            crossings.sort_by(|a, b| {
                (a.x_mid, a.x_lo, a.x_hi)
                    .partial_cmp(&(b.x_mid, b.x_lo, b.x_hi))
                    .expect("finite abscissae")
            });
            slabs.push(Slab {
                y_lo,
                y_hi,
                crossings,
            });
        }

        Arrangement { horizontals, slabs }
    }

    /// Inside intervals along the top (`top = true`) or bottom edge of a
    /// slab under the given inclusion predicate on winding numbers.
    pub(super) fn line_intervals(slab: &Slab, top: bool, inside: impl Fn(i32) -> bool) -> Vec<(f64, f64)> {
        let mut out: Vec<(f64, f64)> = Vec::new();
        let mut w = 0;
        let mut open: Option<f64> = None;
        for c in clusters(&slab.crossings) {
            let x = if top { c.x_hi } else { c.x_lo };
            let was = inside(w);
            w += c.delta;
            let now = inside(w);
            if now && !was {
                open = Some(x);
            } else if !now && was {
                if let Some(start) = open.take() {
                    if x - start > CLUSTER_EPS {
                        // Merge with the previous interval when they touch.
                        match out.last_mut() {
                            Some(last) if start - last.1 < MIN_SLAB => last.1 = x,
                            _ => out.push((start, x)),
                        }
                    }
                }
            }
        }
        debug_assert!(open.is_none(), "unclosed winding interval");
        out
    }
}

/// Ordinate of the proper intersection of two edges, if any.
fn intersection_ordinate(a: &Edge, b: &Edge) -> Option<f64> {
    if a.y_lo.max(b.y_lo) >= a.y_hi.min(b.y_hi) {
        return None;
    }
    if a.x_lo.min(a.x_hi) > b.x_lo.max(b.x_hi) || b.x_lo.min(b.x_hi) > a.x_lo.max(a.x_hi) {
        return None;
    }
    let (dax, day) = (a.x_hi - a.x_lo, a.y_hi - a.y_lo);
    let (dbx, dby) = (b.x_hi - b.x_lo, b.y_hi - b.y_lo);
    let denom = dax * dby - day * dbx;
    if denom.abs() < 1e-18 {
        return None; // parallel or collinear; endpoints are events already
    }
    let (ex, ey) = (b.x_lo - a.x_lo, b.y_lo - a.y_lo);
    let t = (ex * dby - ey * dbx) / denom;
    let s = (ex * day - ey * dax) / denom;
    if (-1e-12..=1.0 + 1e-12).contains(&t) && (-1e-12..=1.0 + 1e-12).contains(&s) {
        Some(a.y_lo + t * day)
    } else {
        None
    }
}
