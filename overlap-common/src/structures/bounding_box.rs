use super::Point2D;

/// An axis-aligned rectangle. All comparisons treat the box as closed, so
/// boxes that only share an edge or a corner still overlap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    /// An empty box; expanding it by any other box yields that box.
    fn default() -> BoundingBox {
        BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }
}

impl BoundingBox {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> BoundingBox {
        let (x1, x2) = if min_x < max_x {
            (min_x, max_x)
        } else {
            (max_x, min_x)
        };
        let (y1, y2) = if min_y < max_y {
            (min_y, max_y)
        } else {
            (max_y, min_y)
        };
        BoundingBox {
            min_x: x1,
            min_y: y1,
            max_x: x2,
            max_y: y2,
        }
    }

    pub fn from_two_points(p1: Point2D, p2: Point2D) -> BoundingBox {
        BoundingBox::new(p1.x, p2.x, p1.y, p2.y)
    }

    pub fn from_points(points: &[Point2D]) -> BoundingBox {
        let mut bb = BoundingBox::default();
        for p in points {
            bb.min_x = bb.min_x.min(p.x);
            bb.min_y = bb.min_y.min(p.y);
            bb.max_x = bb.max_x.max(p.x);
            bb.max_y = bb.max_y.max(p.y);
        }
        bb
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn overlaps(&self, other: BoundingBox) -> bool {
        if self.max_y < other.min_y
            || self.max_x < other.min_x
            || self.min_y > other.max_y
            || self.min_x > other.max_x
        {
            return false;
        }
        true
    }

    pub fn expand_to(&mut self, other: BoundingBox) {
        self.max_y = self.max_y.max(other.max_y);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.min_x = self.min_x.min(other.min_x);
    }

    /// The lower-left and upper-right corners, in the form used by the R-tree.
    pub fn corners(&self) -> ([f64; 2], [f64; 2]) {
        ([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}
