/*
This code is part of the parcel overlap detection tools.
Created: 05/10/2026
Last Modified: 11/10/2026
License: MIT
*/

use geo_types::{Geometry, LineString, MultiPolygon, Polygon};
use std::fmt::Write;
use std::str::FromStr;

/// Parses well-known text into a geometry. The error is a human-readable
/// description of why the text was rejected.
pub fn parse_wkt(text: &str) -> Result<Geometry<f64>, String> {
    wkt::Wkt::<f64>::from_str(text.trim())
        .map_err(|e| e.to_string())
        .and_then(|w| {
            w.try_into()
                .map_err(|e: wkt::conversion::Error| e.to_string())
        })
}

/// The WKT type name of a geometry, used in diagnostics.
pub fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Re-serializes a shape with a fixed number format and no optional
/// whitespace. Two shapes with exactly the same coordinates produce the same
/// text however they were originally written. A single-part shape is always
/// written as a POLYGON.
pub fn canonical_wkt(shape: &MultiPolygon<f64>) -> String {
    let mut s = String::new();
    if shape.0.len() == 1 {
        s.push_str("POLYGON");
        write_polygon(&mut s, &shape.0[0]);
    } else {
        s.push_str("MULTIPOLYGON(");
        for (i, poly) in shape.0.iter().enumerate() {
            if i > 0 {
                s.push(',');
            }
            write_polygon(&mut s, poly);
        }
        s.push(')');
    }
    s
}

fn write_polygon(s: &mut String, poly: &Polygon<f64>) {
    s.push('(');
    write_ring(s, poly.exterior());
    for hole in poly.interiors() {
        s.push(',');
        write_ring(s, hole);
    }
    s.push(')');
}

fn write_ring(s: &mut String, ring: &LineString<f64>) {
    s.push('(');
    for (i, c) in ring.0.iter().enumerate() {
        if i > 0 {
            s.push(',');
        }
        // adding zero folds -0 into 0
        let _ = write!(s, "{} {}", c.x + 0f64, c.y + 0f64);
    }
    s.push(')');
}

#[cfg(test)]
mod test {
    use super::*;

    fn shape(text: &str) -> MultiPolygon<f64> {
        match parse_wkt(text).unwrap() {
            Geometry::Polygon(p) => MultiPolygon(vec![p]),
            Geometry::MultiPolygon(mp) => mp,
            _ => panic!("not areal"),
        }
    }

    #[test]
    fn test_parse_polygon() {
        let geom = parse_wkt("POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))").unwrap();
        assert!(matches!(geom, Geometry::Polygon(_)));
        assert_eq!(geometry_kind(&geom), "Polygon");
    }

    #[test]
    fn test_parse_failure() {
        assert!(parse_wkt("NOT A GEOMETRY").is_err());
        assert!(parse_wkt("POLYGON((0 0, 1 0, 1").is_err());
        assert!(parse_wkt("").is_err());
    }

    #[test]
    fn test_canonical_text_ignores_spelling() {
        let a = shape("POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))");
        let b = shape("MULTIPOLYGON (((0.0 0.0,1.0 0.0,1 1,0 1,0 0)))");
        assert_eq!(canonical_wkt(&a), "POLYGON((0 0,1 0,1 1,0 1,0 0))");
        assert_eq!(canonical_wkt(&a), canonical_wkt(&b));
    }

    #[test]
    fn test_canonical_text_keeps_vertex_order() {
        let a = shape("POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))");
        let b = shape("POLYGON((0 0, 0 1, 1 1, 1 0, 0 0))");
        assert_ne!(canonical_wkt(&a), canonical_wkt(&b));
    }

    #[test]
    fn test_canonical_text_multipart_and_holes() {
        let mp = shape(
            "MULTIPOLYGON(((0 0,4 0,4 4,0 4,0 0),(1 1,2 1,2 2,1 2,1 1)),((5 5,6 5,6 6,5 5)))",
        );
        assert_eq!(
            canonical_wkt(&mp),
            "MULTIPOLYGON(((0 0,4 0,4 4,0 4,0 0),(1 1,2 1,2 2,1 2,1 1)),((5 5,6 5,6 6,5 5)))"
        );
    }

    #[test]
    fn test_negative_zero_is_folded() {
        let a = shape("POLYGON((-0 0, 1 0, 1 1, 0 0))");
        assert_eq!(canonical_wkt(&a), "POLYGON((0 0,1 0,1 1,0 0))");
    }
}
