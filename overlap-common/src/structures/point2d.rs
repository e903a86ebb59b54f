/*
This code is part of the parcel overlap detection tools.
Created: 02/10/2026
Last Modified: 09/10/2026
License: MIT
*/
use std::fmt;
use std::ops::{Add, Sub};

const EPSILON: f64 = std::f64::EPSILON;

/// A 2-D point, with x and y fields.
#[derive(Default, Copy, Clone, Debug)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(x: {}, y: {})", self.x, self.y)
    }
}

impl Point2D {
    /// Creates a new Point2D,
    pub fn new(x: f64, y: f64) -> Point2D {
        Point2D { x: x, y: y }
    }

    /// Calculates the midpoint between two Point2Ds.
    pub fn midpoint(p1: &Point2D, p2: &Point2D) -> Point2D {
        Point2D::new((p1.x + p2.x) / 2f64, (p1.y + p2.y) / 2f64)
    }

    /// Squared Euclidean distance between the point and another.
    pub fn distance_squared(&self, other: &Self) -> f64 {
        (self.x - other.x) * (self.x - other.x) + (self.y - other.y) * (self.y - other.y)
    }

    /// Equality within machine precision, scaled by the magnitude of the coordinates.
    pub fn nearly_equals(&self, other: &Self) -> bool {
        let scale_x = 1f64.max(self.x.abs()).max(other.x.abs());
        let scale_y = 1f64.max(self.y.abs()).max(other.y.abs());
        (self.x - other.x).abs() <= EPSILON * scale_x
            && (self.y - other.y).abs() <= EPSILON * scale_y
    }

    /// The z-component of the cross product of the two points taken as vectors.
    pub fn cross(&self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Returns true if the point lies within the box spanned by p1 and p2,
    /// boundaries included. Intended for points already known to be collinear.
    pub fn is_between(&self, p1: &Point2D, p2: &Point2D) -> bool {
        self.x >= p1.x.min(p2.x)
            && self.x <= p1.x.max(p2.x)
            && self.y >= p1.y.min(p2.y)
            && self.y <= p1.y.max(p2.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Eq for Point2D {}

impl PartialEq for Point2D {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, rhs: Self) -> Point2D {
        Point2D {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    fn sub(self, rhs: Self) -> Point2D {
        Point2D {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Point2D;

    #[test]
    fn test_nearly_equals_scales_with_magnitude() {
        let p1 = Point2D::new(500_000.0, 4_800_000.0);
        let p2 = Point2D::new(500_000.0 + 1e-11, 4_800_000.0);
        assert!(p1.nearly_equals(&p2));
        assert!(!p1.nearly_equals(&Point2D::new(500_000.001, 4_800_000.0)));
    }

    #[test]
    fn test_is_between_is_inclusive() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(2.0, 0.0);
        assert!(Point2D::new(1.0, 0.0).is_between(&a, &b));
        assert!(a.is_between(&a, &b));
        assert!(!Point2D::new(2.5, 0.0).is_between(&a, &b));
    }

    #[test]
    fn test_cross() {
        let v1 = Point2D::new(1.0, 0.0);
        let v2 = Point2D::new(0.0, 1.0);
        assert_eq!(v1.cross(v2), 1.0);
        assert_eq!(v2.cross(v1), -1.0);
    }
}
