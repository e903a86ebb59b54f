/*
This code is part of the parcel overlap detection tools.
Created: 04/10/2026
Last Modified: 09/10/2026
License: MIT
*/

use crate::structures::{LineSegment, Point2D, RectangleWithData};
use rstar::{RTree, RTreeObject};

/// Returns a closed copy of the ring with consecutive repeated vertices removed.
pub fn remove_repeated_points(ring: &[Point2D]) -> Vec<Point2D> {
    let mut ret: Vec<Point2D> = Vec::with_capacity(ring.len() + 1);
    for p in ring {
        if ret.last() != Some(p) {
            ret.push(*p);
        }
    }
    if ret.len() > 1 && ret[0] == ret[ret.len() - 1] {
        return ret;
    }
    if let Some(first) = ret.first().copied() {
        ret.push(first);
    }
    ret
}

/// Splits a closed ring into its edges.
pub fn ring_segments(ring: &[Point2D]) -> Vec<LineSegment> {
    let mut ret = Vec::with_capacity(ring.len());
    for i in 1..ring.len() {
        ret.push(LineSegment::new(ring[i - 1], ring[i]));
    }
    ret
}

fn segment_tree(segments: &[LineSegment]) -> RTree<RectangleWithData<usize>> {
    let entries = segments
        .iter()
        .enumerate()
        .map(|(i, s)| RectangleWithData::from_bounding_box(i, &s.get_bounding_box()))
        .collect();
    RTree::bulk_load(entries)
}

/// Checks whether a closed ring without repeated points is simple: edges that
/// are not neighbours never meet, and neighbouring edges meet only at their
/// shared vertex. A ring with fewer than three distinct vertices is not simple.
pub fn is_simple_ring(ring: &[Point2D]) -> bool {
    if ring.len() < 4 {
        return false;
    }
    let segments = ring_segments(ring);
    let n = segments.len();
    let tree = segment_tree(&segments);
    for i in 0..n {
        let envelope = RectangleWithData::from_bounding_box(i, &segments[i].get_bounding_box()).envelope();
        for entry in tree.locate_in_envelope_intersecting(&envelope) {
            let j = entry.data;
            if j <= i {
                continue;
            }
            let neighbours = j == i + 1 || (i == 0 && j == n - 1);
            match segments[i].get_intersection(&segments[j]) {
                Some(ls) => {
                    if !neighbours || !ls.is_point() {
                        return false;
                    }
                }
                None => {}
            }
        }
    }
    true
}

/// How two rings meet.
#[derive(Default, Clone, Debug)]
pub struct RingContact {
    /// The distinct points where the rings touch or cross.
    pub points: Vec<Point2D>,
    /// True if the rings run along one another for some length.
    pub shares_edge: bool,
}

impl RingContact {
    pub fn is_disjoint(&self) -> bool {
        self.points.is_empty() && !self.shares_edge
    }
}

/// Finds where two closed rings meet.
pub fn ring_contacts(ring1: &[Point2D], ring2: &[Point2D]) -> RingContact {
    let mut ret = RingContact::default();
    let segments1 = ring_segments(ring1);
    let segments2 = ring_segments(ring2);
    let tree = segment_tree(&segments2);
    for ls1 in &segments1 {
        let envelope = RectangleWithData::from_bounding_box(0usize, &ls1.get_bounding_box()).envelope();
        for entry in tree.locate_in_envelope_intersecting(&envelope) {
            if let Some(ls) = ls1.get_intersection(&segments2[entry.data]) {
                if !ls.is_point() {
                    ret.shares_edge = true;
                } else if !ret.points.iter().any(|p| p.nearly_equals(&ls.p1)) {
                    ret.points.push(ls.p1);
                }
            }
        }
    }
    ret
}
