//! Binary and JSON-debug serialisation.
//!
//! The binary form writes the eight face lists in order, each a
//! count-prefixed list of sub-contours, each sub-contour a count-prefixed
//! list of `(x, y, z, edge_flag)` records in native endianness. It is an
//! opaque process-private cache format, not long-term storage. Reading
//! rebuilds the spherical caches.
//!
//! The JSON form emits `[ra_deg, dec_deg, edge_flag]` triples at twelve
//! significant digits and exists strictly for diagnostics.

use std::io::{Read, Write};

use glam::DVec3;

use crate::error::PolygonError;
use crate::geom;
use crate::polygon::OctahedronPolygon;
use crate::types::{EdgeVertex, SubContour};

/// Upper bound on any count field; a foreign or corrupt stream trips this
/// long before an allocation could.
const MAX_COUNT: u32 = 1 << 27;

fn write_u32<W: Write>(out: &mut W, n: usize) -> Result<(), PolygonError> {
    debug_assert!(n <= u32::MAX as usize);
    out.write_all(&(n as u32).to_ne_bytes())?;
    Ok(())
}

fn read_u32<R: Read>(input: &mut R) -> Result<u32, PolygonError> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;
    Ok(u32::from_ne_bytes(buf))
}

fn read_f64<R: Read>(input: &mut R) -> Result<f64, PolygonError> {
    let mut buf = [0u8; 8];
    input.read_exact(&mut buf)?;
    let v = f64::from_ne_bytes(buf);
    if !v.is_finite() {
        return Err(PolygonError::Malformed("non-finite coordinate"));
    }
    Ok(v)
}

impl OctahedronPolygon {
    /// Write the eight face lists to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<(), PolygonError> {
        for side in &self.sides {
            write_u32(out, side.len())?;
            for sub in side {
                write_u32(out, sub.len())?;
                for v in sub.iter() {
                    out.write_all(&v.vertex.x.to_ne_bytes())?;
                    out.write_all(&v.vertex.y.to_ne_bytes())?;
                    out.write_all(&v.vertex.z.to_ne_bytes())?;
                    out.write_all(&[u8::from(v.edge_flag)])?;
                }
            }
        }
        Ok(())
    }

    /// Read a polygon previously written with
    /// [`write_to`](Self::write_to) and rebuild its caches.
    pub fn read_from<R: Read>(input: &mut R) -> Result<Self, PolygonError> {
        let mut poly = Self::empty();
        for side in poly.sides.iter_mut() {
            let sub_count = read_u32(input)?;
            if sub_count > MAX_COUNT {
                return Err(PolygonError::Malformed("sub-contour count"));
            }
            for _ in 0..sub_count {
                let vertex_count = read_u32(input)?;
                if vertex_count == 0 || vertex_count > MAX_COUNT {
                    return Err(PolygonError::Malformed("vertex count"));
                }
                let mut sub = SubContour::default();
                for _ in 0..vertex_count {
                    let x = read_f64(input)?;
                    let y = read_f64(input)?;
                    let z = read_f64(input)?;
                    let mut flag = [0u8; 1];
                    input.read_exact(&mut flag)?;
                    sub.push(EdgeVertex::new(DVec3::new(x, y, z), flag[0] != 0));
                }
                side.push(sub);
            }
        }
        poly.update_vertex_array();
        Ok(poly)
    }

    /// Diagnostic JSON: the eight face lists of sub-contours, each vertex
    /// as `[ra_deg, dec_deg, edge_flag]`.
    pub fn to_json(&self) -> String {
        let mut out = String::from("[");
        for (i, side) in self.sides.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push('[');
            for (j, sub) in side.iter().enumerate() {
                if j > 0 {
                    out.push(',');
                }
                sub.write_json(&mut out);
            }
            out.push(']');
        }
        out.push(']');
        out
    }
}

impl SubContour {
    /// Diagnostic JSON for one ring: `[[ra_deg, dec_deg, edge_flag], ...]`.
    ///
    /// Face-local rings come out in projected coordinates; call this on
    /// spherical-space rings for meaningful angles.
    pub fn to_json(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out);
        out
    }

    fn write_json(&self, out: &mut String) {
        out.push('[');
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let (ra, dec) = geom::rect_to_sphe(v.vertex);
            out.push('[');
            push_sig12(out, ra.to_degrees());
            out.push(',');
            push_sig12(out, dec.to_degrees());
            out.push(',');
            out.push_str(if v.edge_flag { "true" } else { "false" });
            out.push(']');
        }
        out.push(']');
    }
}

/// Append `x` with twelve significant digits, scientific notation with the
/// mantissa trimmed of trailing zeros.
fn push_sig12(out: &mut String, x: f64) {
    let s = format!("{:.11e}", x);
    match s.split_once('e') {
        Some((mantissa, exponent)) => {
            out.push_str(mantissa.trim_end_matches('0').trim_end_matches('.'));
            if exponent != "0" {
                out.push('e');
                out.push_str(exponent);
            }
        }
        None => out.push_str(&s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn binary_round_trip_preserves_sides() {
        let p = OctahedronPolygon::from_contour(&[DVec3::X, DVec3::Y, DVec3::Z]);
        let mut buf = Vec::new();
        p.write_to(&mut buf).unwrap();
        let q = OctahedronPolygon::read_from(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(p.sides, q.sides);
        assert!((p.area() - q.area()).abs() < 1e-12);
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let p = OctahedronPolygon::from_contour(&[DVec3::X, DVec3::Y, DVec3::Z]);
        let mut buf = Vec::new();
        p.write_to(&mut buf).unwrap();
        buf.truncate(buf.len() - 5);
        assert!(OctahedronPolygon::read_from(&mut Cursor::new(&buf)).is_err());
    }

    #[test]
    fn garbage_count_is_rejected() {
        let buf = vec![0xffu8; 64];
        assert!(matches!(
            OctahedronPolygon::read_from(&mut Cursor::new(&buf)),
            Err(PolygonError::Malformed(_))
        ));
    }

    #[test]
    fn empty_polygon_round_trips() {
        let mut buf = Vec::new();
        OctahedronPolygon::empty().write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), 8 * 4);
        let q = OctahedronPolygon::read_from(&mut Cursor::new(&buf)).unwrap();
        assert!(q.is_empty());
    }

    #[test]
    fn sig12_formatting() {
        let mut s = String::new();
        push_sig12(&mut s, 45.0);
        assert_eq!(s, "4.5e1");
        s.clear();
        push_sig12(&mut s, 0.0);
        assert_eq!(s, "0");
        s.clear();
        push_sig12(&mut s, -1.0);
        assert_eq!(s, "-1");
    }

    #[test]
    fn polygon_json_has_eight_faces() {
        let p = OctahedronPolygon::from_contour(&[DVec3::X, DVec3::Y, DVec3::Z]);
        let json = p.to_json();
        assert!(json.starts_with('['));
        assert!(json.ends_with(']'));
        assert_eq!(json.matches("[[[").count(), 1, "one non-empty face: {}", json);
        assert!(json.contains("true"));
    }
}
