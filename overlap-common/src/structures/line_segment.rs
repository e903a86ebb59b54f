/*
This code is part of the parcel overlap detection tools.
Created: 02/10/2026
Last Modified: 07/10/2026
License: MIT
*/

use super::{BoundingBox, Point2D};

const EPSILON: f64 = std::f64::EPSILON;

/// A data structure to hold line segments, defined by
/// starting and ending points.
#[derive(Default, Copy, Clone, Debug)]
pub struct LineSegment {
    pub p1: Point2D,
    pub p2: Point2D,
}

impl PartialEq for LineSegment {
    fn eq(&self, other: &Self) -> bool {
        (self.p1.nearly_equals(&other.p1) && self.p2.nearly_equals(&other.p2))
            || (self.p1.nearly_equals(&other.p2) && self.p2.nearly_equals(&other.p1))
    }
}

impl LineSegment {
    /// Creates a new LineSegment.
    pub fn new(p1: Point2D, p2: Point2D) -> LineSegment {
        LineSegment { p1, p2 }
    }

    /// Finds intersections between two line segments. Notice that segments
    /// can intersect at points or line segments. The function returns a
    /// line segment, but when the two test segments intersect at a point
    /// instead, output.p1 = output.p2.
    ///
    /// Based on https://en.wikipedia.org/wiki/Line%E2%80%93line_intersection
    pub fn get_intersection(&self, other: &Self) -> Option<LineSegment> {
        if self == other {
            return Some(self.clone());
        }
        if self.p1 == self.p2 || other.p1 == other.p2 {
            return None;
        }
        if !self.get_bounding_box().overlaps(other.get_bounding_box()) {
            return None;
        }

        let denom = (self.p1.x - self.p2.x) * (other.p1.y - other.p2.y)
            - (self.p1.y - self.p2.y) * (other.p1.x - other.p2.x);
        if denom != 0f64 {
            let t = ((self.p1.x - other.p1.x) * (other.p1.y - other.p2.y)
                - (self.p1.y - other.p1.y) * (other.p1.x - other.p2.x))
                / denom;

            let u = -((self.p1.x - self.p2.x) * (self.p1.y - other.p1.y)
                - (self.p1.y - self.p2.y) * (self.p1.x - other.p1.x))
                / denom;

            if t >= 0f64 && t <= 1f64 && u >= 0f64 && u <= 1f64 {
                // snap to shared end points so touching segments report the exact vertex
                let p = if t == 0f64 {
                    self.p1
                } else if t == 1f64 {
                    self.p2
                } else if u == 0f64 {
                    other.p1
                } else if u == 1f64 {
                    other.p2
                } else {
                    Point2D::new(
                        self.p1.x + t * (self.p2.x - self.p1.x),
                        self.p1.y + t * (self.p2.y - self.p1.y),
                    )
                };
                return Some(LineSegment::new(p, p));
            }
            return None;
        }

        // parallel; are the lines coincident?
        if !self.is_point_on_line(other.p1) {
            return None;
        }

        // what is the coincident interval?
        let candidates = [self.p1, other.p1, self.p2, other.p2];
        let contained = [
            self.p1.is_between(&other.p1, &other.p2),
            other.p1.is_between(&self.p1, &self.p2),
            self.p2.is_between(&other.p1, &other.p2),
            other.p2.is_between(&self.p1, &self.p2),
        ];

        let mut ends: Vec<Point2D> = Vec::with_capacity(4);
        for a in 0..4 {
            if contained[a] && !ends.iter().any(|p| p.nearly_equals(&candidates[a])) {
                ends.push(candidates[a]);
            }
        }
        match ends.len() {
            0 => None,
            1 => Some(LineSegment::new(ends[0], ends[0])),
            _ => Some(LineSegment::new(ends[0], ends[1])),
        }
    }

    /// True if this segment degenerates to a single point.
    pub fn is_point(&self) -> bool {
        self.p1.nearly_equals(&self.p2)
    }

    pub fn get_bounding_box(&self) -> BoundingBox {
        BoundingBox::from_two_points(self.p1, self.p2)
    }

    /// Checks if a Point is on a line defined by two points. Notice that
    /// this test whether the test point lies on the infinite line passing
    /// through the test line segment, and not on the line segment itself.
    fn is_point_on_line(&self, p: Point2D) -> bool {
        let d = self.p2 - self.p1;
        let v = p - self.p1;
        let r = d.cross(v);
        r.abs() <= 4f64 * EPSILON * (d.x.abs() + d.y.abs()) * (v.x.abs() + v.y.abs())
    }

    pub fn is_point_on_line_segment(&self, p: Point2D) -> bool {
        self.is_point_on_line(p) && p.is_between(&self.p1, &self.p2)
    }
}
