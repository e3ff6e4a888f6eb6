//! Invariant audit for octahedron polygons.
//!
//! Verifies the structural guarantees a quiescent polygon must satisfy.
//! Useful for debugging, testing, and catching numerical issues.

use crate::OctahedronPolygon;

/// Detailed validation report for one polygon.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Number of cached fill vertices.
    pub fill_vertex_count: usize,
    /// Number of cached outline vertices.
    pub outline_vertex_count: usize,

    /// The fill array must hold whole triangles.
    pub fill_length_divisible_by_three: bool,
    /// Cached triangles not counter-clockwise as seen from outside.
    pub misoriented_triangles: usize,
    /// Outline vertices the bounding cap fails to enclose.
    pub outline_vertices_outside_cap: usize,
    /// Face-local vertices off their face plane (|z| >= 1e-6).
    pub off_plane_face_vertices: usize,
    /// Cached spherical vertices measurably off the unit sphere.
    pub off_sphere_cached_vertices: usize,
    /// Outline vertex count must be even (vertex pairs form segments).
    pub outline_length_divisible_by_two: bool,
}

impl ValidationReport {
    /// True when every audited invariant holds exactly.
    pub fn is_valid(&self) -> bool {
        self.fill_length_divisible_by_three
            && self.outline_length_divisible_by_two
            && self.misoriented_triangles == 0
            && self.outline_vertices_outside_cap == 0
            && self.off_plane_face_vertices == 0
            && self.off_sphere_cached_vertices == 0
    }
}

/// Audit `poly` against the cached-state invariants.
pub fn validate(poly: &OctahedronPolygon) -> ValidationReport {
    let fill = poly.fill_vertex_array().vertices();
    let outline = poly.outline_vertex_array().vertices();
    let (cap_n, cap_d) = poly.bounding_cap();

    let misoriented_triangles = fill
        .chunks_exact(3)
        .filter(|t| t[0].cross(t[1]).dot(t[2]) < -1e-12)
        .count();

    let outline_vertices_outside_cap = outline.iter().filter(|v| cap_n.dot(**v) < cap_d).count();

    let off_plane_face_vertices = poly
        .sides
        .iter()
        .flatten()
        .flat_map(|sub| sub.iter())
        .filter(|v| v.vertex.z.abs() >= 1e-6)
        .count();

    let off_sphere_cached_vertices = fill
        .iter()
        .chain(outline.iter())
        .filter(|v| (v.length() - 1.0).abs() > 1e-9)
        .count();

    ValidationReport {
        fill_vertex_count: fill.len(),
        outline_vertex_count: outline.len(),
        fill_length_divisible_by_three: fill.len() % 3 == 0,
        misoriented_triangles,
        outline_vertices_outside_cap,
        off_plane_face_vertices,
        off_sphere_cached_vertices,
        outline_length_divisible_by_two: outline.len() % 2 == 0,
    }
}
