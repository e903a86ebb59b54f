use super::BoundingBox;
use rstar::primitives::Rectangle;
use rstar::{RTreeObject, AABB};

type RectangleF64 = Rectangle<[f64; 2]>;

/// An R-tree entry: a rectangle carrying a payload, typically the position
/// of the bounded feature in some external collection.
#[derive(Debug, Clone)]
pub struct RectangleWithData<T> {
    pub data: T,
    pub rectangle: RectangleF64,
}

impl<T> RectangleWithData<T> {
    pub fn new(data: T, corner1: [f64; 2], corner2: [f64; 2]) -> Self {
        let rectangle = Rectangle::from_corners(corner1, corner2);
        RectangleWithData { data, rectangle }
    }

    pub fn from_bounding_box(data: T, bb: &BoundingBox) -> Self {
        let (lower, upper) = bb.corners();
        RectangleWithData::new(data, lower, upper)
    }
}

impl<T> RTreeObject for RectangleWithData<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.rectangle.envelope()
    }
}

#[cfg(test)]
mod test {
    use super::RectangleWithData;
    use rstar::{RTree, AABB};

    #[test]
    fn rectangle_locate_in_envelope_intersecting() {
        let tree = RTree::bulk_load(vec![
            RectangleWithData::new(1, [0.0, 0.0], [2.0, 2.0]),
            RectangleWithData::new(2, [1.0, 1.0], [3.0, 3.0]),
            RectangleWithData::new(3, [2.5, 2.5], [4.0, 4.0]),
        ]);

        let query = AABB::from_corners([1.5, 1.5], [1.75, 1.75]);
        let mut ret: Vec<i32> = tree
            .locate_in_envelope_intersecting(&query)
            .map(|r| r.data)
            .collect();
        ret.sort();
        assert_eq!(ret, vec![1, 2]);

        // boxes touching only along an edge are still reported
        let query = AABB::from_corners([4.0, 0.0], [5.0, 4.0]);
        let ret: Vec<i32> = tree
            .locate_in_envelope_intersecting(&query)
            .map(|r| r.data)
            .collect();
        assert_eq!(ret, vec![3]);

        let query = AABB::from_corners([-2.0, -2.0], [-1.0, -1.0]);
        assert_eq!(tree.locate_in_envelope_intersecting(&query).count(), 0);
    }
}
