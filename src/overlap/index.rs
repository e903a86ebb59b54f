/*
This code is part of the parcel overlap detection tools.
Created: 08/10/2026
Last Modified: 12/10/2026
License: MIT
*/

use super::store::ValidatedGeometry;
use overlap_common::structures::RectangleWithData;
use rstar::{RTree, AABB};
use std::sync::Arc;

/// A read-only R-tree over the bounding boxes of the corpus geometries.
pub struct SpatialIndex {
    corpus: Vec<Arc<ValidatedGeometry>>,
    tree: RTree<RectangleWithData<usize>>,
}

impl SpatialIndex {
    /// Bulk loads the index. Each entry carries the geometry's position in
    /// the corpus.
    pub fn build(geometries: &[Arc<ValidatedGeometry>]) -> SpatialIndex {
        let entries: Vec<RectangleWithData<usize>> = geometries
            .iter()
            .enumerate()
            .map(|(i, g)| RectangleWithData::from_bounding_box(i, &g.bounding_box()))
            .collect();
        SpatialIndex {
            corpus: geometries.to_vec(),
            tree: RTree::bulk_load(entries),
        }
    }

    /// Corpus positions of every geometry whose bounding box meets the query's,
    /// ascending. Touching boxes count, and so does the query itself.
    pub fn query_positions(&self, query: &ValidatedGeometry) -> Vec<usize> {
        let (lower, upper) = query.bounding_box().corners();
        let envelope = AABB::from_corners(lower, upper);
        let mut ret: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.data)
            .collect();
        ret.sort_unstable();
        ret
    }

    /// The candidate set for a query shape, in corpus order.
    pub fn query(&self, query: &ValidatedGeometry) -> Vec<&Arc<ValidatedGeometry>> {
        self.query_positions(query)
            .into_iter()
            .map(|i| &self.corpus[i])
            .collect()
    }

    pub fn get(&self, position: usize) -> Option<&Arc<ValidatedGeometry>> {
        self.corpus.get(position)
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }
}
