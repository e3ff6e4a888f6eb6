//! Boolean algebra on spherical polygons via octahedral projection.
//!
//! A region on the unit sphere is held as the radial projection of its
//! contours onto the eight faces of the regularly inscribed octahedron;
//! each face keeps a flat list of 2D sub-contours. Union, intersection and
//! subtraction reduce to concatenating face contours (reversing them for
//! subtraction) and re-tessellating each face under a winding rule, while
//! per-edge flags keep the true polygon boundary apart from the artificial
//! seams the splitting introduces. The triangulated fill, the outline and
//! a conservative bounding spherical cap are cached in spherical
//! coordinates for fast point membership, area and rendering.
//!
//! Input contours are closed rings of unit vectors wound counter-clockwise
//! as seen from outside the sphere.
//!
//! # Example
//!
//! ```
//! use glam::DVec3;
//! use octapoly::OctahedronPolygon;
//!
//! // The octant with all-positive coordinates.
//! let octant = OctahedronPolygon::from_contour(&[DVec3::X, DVec3::Y, DVec3::Z]);
//! assert!((octant.area() - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
//! assert!(octant.contains_point(DVec3::new(1.0, 1.0, 1.0).normalize()));
//!
//! // Union with the neighbouring octant across the x = 0 plane.
//! let neighbour = OctahedronPolygon::from_contour(&[DVec3::NEG_X, DVec3::Z, DVec3::Y]);
//! let mut both = octant.clone();
//! both.union_in_place(&neighbour);
//! assert!((both.area() - std::f64::consts::PI).abs() < 1e-9);
//! ```

mod arrays;
mod cap;
mod error;
mod geom;
mod octant;
mod polygon;
mod serial;
mod splitter;
mod tess;
mod types;
pub mod validation;

pub use arrays::{Primitive, VertexArray};
pub use error::PolygonError;
pub use geom::{side_half_space_contains, spherical_triangle_contains};
pub use polygon::OctahedronPolygon;
pub use tess::{tessellation_pass_count, WindingRule};
pub use types::{EdgeVertex, SubContour};
