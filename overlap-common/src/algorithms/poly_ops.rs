/*
This code is part of the parcel overlap detection tools.
Created: 03/10/2026
Last Modified: 08/10/2026
License: MIT
*/

use crate::structures::{LineSegment, Point2D};

/// Tests if a point is Left|On|Right of an infinite line,
/// based on http://geomalgorithms.com/a03-_inclusion.html.
///
/// Input:  three points p0, p1, and p2
///
/// Return: > 0 for p2 left of the line through p0 and p1
///         = 0 for p2 on the line through p0 and p1
///         < 0 for p2 right of the line through p0 and p1
fn is_left(p0: &Point2D, p1: &Point2D, p2: &Point2D) -> f64 {
    (p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y)
}

/// Calculates the winding number (wn) of a ring around a point. The ring
/// may be open or closed; an open ring is treated as implicitly closed.
pub fn winding_number(p: &Point2D, poly: &[Point2D]) -> i32 {
    let n = poly.len();
    if n < 3 {
        return 0i32;
    }
    let mut wn = 0i32;
    // loop through all edges of the polygon
    for i in 0..n {
        let a = &poly[i];
        let b = &poly[(i + 1) % n];
        if a.y <= p.y {
            if b.y > p.y && is_left(a, b, p) > 0f64 {
                // an upward crossing with p left of edge
                wn += 1i32;
            }
        } else if b.y <= p.y && is_left(a, b, p) < 0f64 {
            // a downward crossing with p right of edge
            wn -= 1i32;
        }
    }
    wn
}

/// Tests whether a point is within a polygon ring using the winding number.
/// Notice that points on the edge of the ring may be deemed either inside or
/// outside; use `point_on_ring` to screen them first.
pub fn point_in_poly(p: &Point2D, poly: &[Point2D]) -> bool {
    winding_number(p, poly) % 2 != 0i32
}

/// Tests whether a point lies on one of the edges of a ring.
pub fn point_on_ring(p: &Point2D, ring: &[Point2D]) -> bool {
    let n = ring.len();
    for i in 0..n {
        let ls = LineSegment::new(ring[i], ring[(i + 1) % n]);
        if ls.p1 == *p || ls.p2 == *p || ls.is_point_on_line_segment(*p) {
            return true;
        }
    }
    false
}
