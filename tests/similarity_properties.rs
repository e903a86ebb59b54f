//! Property tests of the overlap engine: similarity symmetry, candidate
//! completeness of the spatial index and the range of reported scores.

use geo::{Area, BooleanOps};
use parcel_overlap::io_utils::DiagnosticLog;
use parcel_overlap::overlap::{
    detect_overlaps, GeometryStore, OverlapEngine, OverlapOptions, SpatialIndex,
};
use proptest::prelude::*;

fn quad_wkt(q: &[(f64, f64); 4]) -> String {
    format!(
        "POLYGON(({} {}, {} {}, {} {}, {} {}, {} {}))",
        q[0].0, q[0].1, q[1].0, q[1].1, q[2].0, q[2].1, q[3].0, q[3].1, q[0].0, q[0].1
    )
}

/// A convex quadrilateral: a rectangle with its corners pushed inwards.
fn quad() -> impl Strategy<Value = [(f64, f64); 4]> {
    (
        -10.0..10.0f64,
        -10.0..10.0f64,
        0.5..5.0f64,
        0.5..5.0f64,
        0.0..0.2f64,
        0.0..0.2f64,
    )
        .prop_map(|(x, y, w, h, s, t)| {
            [
                (x + s * w, y),
                (x + w, y + t * h),
                (x + w - s * w, y + h),
                (x, y + h - t * h),
            ]
        })
}

#[test]
fn proptest_similarity_is_symmetric() {
    proptest!(|(a in quad(), b in quad())| {
        let mut store = GeometryStore::new();
        store.ingest(&quad_wkt(&a), "A", true).unwrap();
        store.ingest(&quad_wkt(&b), "B", true).unwrap();
        let index = SpatialIndex::build(store.all_geometries());
        let engine = OverlapEngine::new(&store, &index, 0.05);
        let ga = &store.all_geometries()[0];
        let gb = &store.all_geometries()[1];
        let ab = engine.similarity(ga, gb);
        let ba = engine.similarity(gb, ga);
        prop_assert_eq!(&ab, &ba);
        if let Ok(Some(s)) = ab {
            prop_assert!((0.0..=1.0 + 1e-9).contains(&s));
        }
    });
}

#[test]
fn proptest_index_returns_every_true_overlap() {
    proptest!(|(shapes in prop::collection::vec(quad(), 2..12))| {
        let mut store = GeometryStore::new();
        for (i, q) in shapes.iter().enumerate() {
            store.ingest(&quad_wkt(q), &format!("P{}", i), true).unwrap();
        }
        let corpus = store.all_geometries();
        let index = SpatialIndex::build(corpus);
        for (i, g) in corpus.iter().enumerate() {
            let candidates = index.query_positions(g);
            prop_assert!(candidates.windows(2).all(|w| w[0] < w[1]));
            for (j, other) in corpus.iter().enumerate() {
                if g.shape().intersection(other.shape()).unsigned_area() > 0.0 {
                    prop_assert!(candidates.contains(&j), "{} missing from candidates of {}", j, i);
                }
            }
        }
    });
}

#[test]
fn proptest_reported_pairs_are_distinct_and_above_threshold() {
    proptest!(|(shapes in prop::collection::vec(quad(), 2..10), threshold in 0.0..0.5f64)| {
        let mut store = GeometryStore::new();
        for (i, q) in shapes.iter().enumerate() {
            store.ingest(&quad_wkt(q), &format!("P{}", i), true).unwrap();
        }
        let options = OverlapOptions { threshold, num_threads: 2, ..Default::default() };
        let detection = detect_overlaps(&store, &options, &DiagnosticLog::new()).unwrap();
        let mut seen = std::collections::HashSet::new();
        for r in &detection.overlaps {
            prop_assert!(r.similarity > threshold);
            prop_assert!(r.parcel_a != r.parcel_b);
            let key = if r.parcel_a < r.parcel_b {
                (r.parcel_a.clone(), r.parcel_b.clone())
            } else {
                (r.parcel_b.clone(), r.parcel_a.clone())
            };
            prop_assert!(seen.insert(key));
        }
    });
}
