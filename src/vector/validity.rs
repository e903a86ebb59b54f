/*
This code is part of the parcel overlap detection tools.
Created: 06/10/2026
Last Modified: 12/10/2026
License: MIT
*/

use super::wkt_text::geometry_kind;
use geo_types::{Geometry, LineString, MultiPolygon, Polygon};
use overlap_common::algorithms::{
    is_simple_ring, point_in_poly, point_on_ring, polygon_area, remove_repeated_points,
    ring_contacts, ring_segments,
};
use overlap_common::structures::{BoundingBox, Point2D};
use thiserror::Error;

/// Why a parsed geometry cannot take part in overlap scoring.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidReason {
    #[error("a {0} has no area")]
    NotAreal(String),

    #[error("the geometry is empty")]
    Empty,

    #[error("polygon {part} has a non-finite coordinate")]
    NonFinite { part: usize },

    #[error("ring {ring} of polygon {part} has fewer than three distinct vertices")]
    TooFewPoints { part: usize, ring: usize },

    #[error("ring {ring} of polygon {part} is not simple")]
    SelfIntersection { part: usize, ring: usize },

    #[error("ring {ring} of polygon {part} encloses no area")]
    ZeroArea { part: usize, ring: usize },

    #[error("hole {ring} of polygon {part} lies outside its shell")]
    HoleOutsideShell { part: usize, ring: usize },

    #[error("hole {ring} of polygon {part} lies inside another hole")]
    NestedHoles { part: usize, ring: usize },

    #[error("ring {ring} of polygon {part} meets another ring along an edge or at more than one point")]
    RingsTouch { part: usize, ring: usize },

    #[error("polygons {part_a} and {part_b} overlap")]
    OverlappingParts { part_a: usize, part_b: usize },
}

/// A polygon's rings, closed and with repeated vertices removed.
struct Rings {
    shell: Vec<Point2D>,
    holes: Vec<Vec<Point2D>>,
    bounding_box: BoundingBox,
}

impl Rings {
    fn all(&self) -> impl Iterator<Item = &Vec<Point2D>> {
        std::iter::once(&self.shell).chain(self.holes.iter())
    }

    /// True if p lies in the interior of the polygon, not on any ring.
    fn strictly_contains(&self, p: &Point2D) -> bool {
        if point_on_ring(p, &self.shell) || !point_in_poly(p, &self.shell) {
            return false;
        }
        !self
            .holes
            .iter()
            .any(|h| point_on_ring(p, h) || point_in_poly(p, h))
    }
}

/// Checks that a geometry is an areal shape suitable for exact overlap
/// computation and returns it as a MultiPolygon. A geometry is accepted when
/// every ring is closed, simple and encloses area, holes lie inside their
/// shell without nesting and touch other rings at no more than one point,
/// and the parts of a MultiPolygon do not overlap.
pub fn validate(geometry: Geometry<f64>) -> Result<MultiPolygon<f64>, InvalidReason> {
    let shape = match geometry {
        Geometry::Polygon(p) => MultiPolygon(vec![p]),
        Geometry::MultiPolygon(mp) => mp,
        other => return Err(InvalidReason::NotAreal(geometry_kind(&other).to_string())),
    };
    if shape.0.is_empty() || shape.0.iter().all(|p| p.exterior().0.is_empty()) {
        return Err(InvalidReason::Empty);
    }

    let mut parts: Vec<Rings> = Vec::with_capacity(shape.0.len());
    for (part, poly) in shape.0.iter().enumerate() {
        parts.push(check_polygon(part, poly)?);
    }

    for a in 0..parts.len() {
        for b in (a + 1)..parts.len() {
            if !parts[a].bounding_box.overlaps(parts[b].bounding_box) {
                continue;
            }
            if interiors_meet(&parts[a], &parts[b]) {
                return Err(InvalidReason::OverlappingParts {
                    part_a: a,
                    part_b: b,
                });
            }
        }
    }

    Ok(shape)
}

fn to_points(ring: &LineString<f64>) -> Vec<Point2D> {
    ring.0.iter().map(|c| Point2D::new(c.x, c.y)).collect()
}

fn check_ring(part: usize, ring: usize, raw: &LineString<f64>) -> Result<Vec<Point2D>, InvalidReason> {
    let points = to_points(raw);
    if points.iter().any(|p| !p.is_finite()) {
        return Err(InvalidReason::NonFinite { part });
    }
    let points = remove_repeated_points(&points);
    // closed, so three distinct vertices need four entries
    if points.len() < 4 {
        return Err(InvalidReason::TooFewPoints { part, ring });
    }
    if !is_simple_ring(&points) {
        return Err(InvalidReason::SelfIntersection { part, ring });
    }
    if polygon_area(&points) == 0f64 {
        return Err(InvalidReason::ZeroArea { part, ring });
    }
    Ok(points)
}

fn check_polygon(part: usize, poly: &Polygon<f64>) -> Result<Rings, InvalidReason> {
    let shell = check_ring(part, 0, poly.exterior())?;
    let mut holes: Vec<Vec<Point2D>> = Vec::with_capacity(poly.interiors().len());
    for (i, raw) in poly.interiors().iter().enumerate() {
        let ring = i + 1;
        let hole = check_ring(part, ring, raw)?;

        let contact = ring_contacts(&hole, &shell);
        if contact.shares_edge || contact.points.len() > 1 {
            return Err(InvalidReason::RingsTouch { part, ring });
        }
        if hole
            .iter()
            .any(|p| !point_on_ring(p, &shell) && !point_in_poly(p, &shell))
        {
            return Err(InvalidReason::HoleOutsideShell { part, ring });
        }

        for other in &holes {
            let contact = ring_contacts(&hole, other);
            if contact.shares_edge || contact.points.len() > 1 {
                return Err(InvalidReason::RingsTouch { part, ring });
            }
            // with at most one contact, one of the rings has a vertex off the other
            let nested = hole
                .iter()
                .any(|p| !point_on_ring(p, other) && point_in_poly(p, other))
                || other
                    .iter()
                    .any(|p| !point_on_ring(p, &hole) && point_in_poly(p, &hole));
            if nested {
                return Err(InvalidReason::NestedHoles { part, ring });
            }
        }
        holes.push(hole);
    }
    let bounding_box = BoundingBox::from_points(&shell);
    Ok(Rings {
        shell,
        holes,
        bounding_box,
    })
}

/// Tests whether the interiors of two valid polygons intersect. Rings that
/// share an edge count as overlapping. Otherwise the boundaries meet at
/// isolated points only, so each edge is cut at those points and the pieces
/// are tested for lying strictly inside the other polygon.
fn interiors_meet(a: &Rings, b: &Rings) -> bool {
    for (first, second) in [(a, b), (b, a)] {
        for ring in first.all() {
            let mut cuts: Vec<Point2D> = vec![];
            for other in second.all() {
                let contact = ring_contacts(ring, other);
                if contact.shares_edge {
                    return true;
                }
                cuts.extend(contact.points);
            }
            if edge_pieces(ring, &cuts)
                .iter()
                .any(|p| second.strictly_contains(p))
            {
                return true;
            }
        }
    }
    false
}

/// The midpoints of a ring's edges after splitting them at the cut points.
fn edge_pieces(ring: &[Point2D], cuts: &[Point2D]) -> Vec<Point2D> {
    let mut ret = vec![];
    for ls in ring_segments(ring) {
        let mut stops = vec![ls.p1, ls.p2];
        for c in cuts {
            if ls.is_point_on_line_segment(*c) {
                stops.push(*c);
            }
        }
        stops.sort_by(|p, q| {
            ls.p1
                .distance_squared(p)
                .total_cmp(&ls.p1.distance_squared(q))
        });
        stops.dedup_by(|p, q| p.nearly_equals(q));
        for w in stops.windows(2) {
            ret.push(Point2D::midpoint(&w[0], &w[1]));
        }
    }
    ret
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::vector::parse_wkt;

    fn check(text: &str) -> Result<MultiPolygon<f64>, InvalidReason> {
        validate(parse_wkt(text).unwrap())
    }

    #[test]
    fn test_valid_shapes() {
        assert!(check("POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))").is_ok());
        // open ring, closed on parse
        assert!(check("POLYGON((0 0, 1 0, 1 1, 0 1))").is_ok());
        // repeated vertex
        assert!(check("POLYGON((0 0, 1 0, 1 0, 1 1, 0 1, 0 0))").is_ok());
        assert!(check("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0),(1 1, 2 1, 2 2, 1 2, 1 1))").is_ok());
        // hole touching the shell at a single vertex
        assert!(check("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0),(0 2, 1 1, 1 3, 0 2))").is_ok());
        assert!(check("MULTIPOLYGON(((0 0, 1 0, 1 1, 0 1, 0 0)),((2 2, 3 2, 3 3, 2 3, 2 2)))").is_ok());
        // parts touching at a corner
        assert!(check("MULTIPOLYGON(((0 0, 1 0, 1 1, 0 1, 0 0)),((1 1, 2 1, 2 2, 1 2, 1 1)))").is_ok());
        // island inside a hole of another part
        assert!(check(
            "MULTIPOLYGON(((0 0, 9 0, 9 9, 0 9, 0 0),(2 2, 7 2, 7 7, 2 7, 2 2)),((3 3, 6 3, 6 6, 3 6, 3 3)))"
        )
        .is_ok());
    }

    #[test]
    fn test_non_areal_kinds() {
        assert_eq!(
            check("LINESTRING(0 0, 1 1)"),
            Err(InvalidReason::NotAreal("LineString".to_string()))
        );
        assert_eq!(
            check("POINT(1 1)"),
            Err(InvalidReason::NotAreal("Point".to_string()))
        );
    }

    #[test]
    fn test_degenerate_rings() {
        assert_eq!(
            check("POLYGON((0 0, 1 0, 0 0))"),
            Err(InvalidReason::TooFewPoints { part: 0, ring: 0 })
        );
        assert_eq!(
            check("POLYGON((0 0, 1 0, 2 0, 0 0))"),
            Err(InvalidReason::SelfIntersection { part: 0, ring: 0 })
        );
    }

    #[test]
    fn test_bowtie_is_invalid() {
        assert_eq!(
            check("POLYGON((0 0, 1 1, 1 0, 0 1, 0 0))"),
            Err(InvalidReason::SelfIntersection { part: 0, ring: 0 })
        );
    }

    #[test]
    fn test_hole_errors() {
        assert_eq!(
            check("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0),(5 5, 6 5, 6 6, 5 6, 5 5))"),
            Err(InvalidReason::HoleOutsideShell { part: 0, ring: 1 })
        );
        assert_eq!(
            check("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0),(0 1, 1 1, 1 2, 0 2, 0 1))"),
            Err(InvalidReason::RingsTouch { part: 0, ring: 1 })
        );
        assert_eq!(
            check("POLYGON((0 0, 9 0, 9 9, 0 9, 0 0),(1 1, 8 1, 8 8, 1 8, 1 1),(2 2, 3 2, 3 3, 2 3, 2 2))"),
            Err(InvalidReason::NestedHoles { part: 0, ring: 2 })
        );
    }

    #[test]
    fn test_overlapping_parts() {
        assert_eq!(
            check("MULTIPOLYGON(((0 0, 2 0, 2 2, 0 2, 0 0)),((1 1, 3 1, 3 3, 1 3, 1 1)))"),
            Err(InvalidReason::OverlappingParts { part_a: 0, part_b: 1 })
        );
        // one part inside the other
        assert!(check("MULTIPOLYGON(((0 0, 4 0, 4 4, 0 4, 0 0)),((1 1, 2 1, 2 2, 1 2, 1 1)))").is_err());
        // parts sharing an edge
        assert!(check("MULTIPOLYGON(((0 0, 1 0, 1 1, 0 1, 0 0)),((1 0, 2 0, 2 1, 1 1, 1 0)))").is_err());
    }

    #[test]
    fn test_non_finite() {
        let poly = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            vec![],
        );
        assert_eq!(
            validate(Geometry::Polygon(poly)),
            Err(InvalidReason::NonFinite { part: 0 })
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(
            validate(Geometry::MultiPolygon(MultiPolygon(vec![]))),
            Err(InvalidReason::Empty)
        );
    }
}
